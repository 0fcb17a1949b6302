use clap::Parser;
use portfolio_contact::utils::error::ErrorSeverity;
use portfolio_contact::utils::{logger, validation::Validate};
use portfolio_contact::{start_server, AppConfig, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置：指定檔案時讀 TOML，否則讀環境變數
    let loaded = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::from_env(),
    };

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    config.apply_cli(&cli);

    // 初始化日誌
    logger::init_logger(config.logging.format, cli.verbose);

    tracing::info!("Starting portfolio-contact");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置，郵件設定缺漏在這裡就終止
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = start_server(config).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Critical => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}
