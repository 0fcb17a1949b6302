use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "portfolio-contact")]
#[command(about = "Contact form backend for the portfolio site")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML config file; environment variables are used when omitted")]
    pub config: Option<String>,

    #[arg(long, help = "Address to bind, overrides the config value")]
    pub host: Option<String>,

    #[arg(long, help = "Port to listen on, overrides the config value")]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
