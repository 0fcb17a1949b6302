pub mod cli;
pub mod toml_config;

use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;

pub use cli::CliConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAIL_ENDPOINT: &str = "https://send.api.mailtrap.io";
pub const DEFAULT_RECAPTCHA_ENDPOINT: &str = "https://recaptchaenterprise.googleapis.com";
pub const DEFAULT_SENDER_NAME: &str = "Portfolio";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub api_token: Option<String>,
    #[serde(default = "default_mail_endpoint")]
    pub endpoint: String,
    pub owner_email: Option<String>,
    pub sender_email: Option<String>,
    /// 寄件者顯示名稱，只出現在 `from`
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// 收件確認信的署名；未設定時不署名
    pub owner_name: Option<String>,
}

/// reCAPTCHA Enterprise 設定；缺值時每次請求才報錯，不阻擋啟動
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecaptchaConfig {
    pub project_id: Option<String>,
    pub site_key: Option<String>,
    /// 服務帳戶 JSON，可為原始 JSON 或 base64 編碼
    pub credentials_json: Option<String>,
    /// 服務帳戶金鑰檔路徑
    pub credentials_file: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_recaptcha_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_mail_endpoint() -> String {
    DEFAULT_MAIL_ENDPOINT.to_string()
}

fn default_recaptcha_endpoint() -> String {
    DEFAULT_RECAPTCHA_ENDPOINT.to_string()
}

fn default_sender_name() -> String {
    DEFAULT_SENDER_NAME.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            site_key: None,
            credentials_json: None,
            credentials_file: None,
            api_key: None,
            endpoint: default_recaptcha_endpoint(),
        }
    }
}

/// 讀取環境變數，空字串視為未設定
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 未設定時用預設值，無法解析時回報錯誤
fn parse_port(value: Option<String>) -> Result<u16> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|e| ContactError::InvalidConfigValueError {
                field: "PORT".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        None => Ok(DEFAULT_PORT),
    }
}

fn parse_log_format(value: Option<String>) -> Result<LogFormat> {
    match value {
        Some(raw) => raw
            .parse::<LogFormat>()
            .map_err(|reason| ContactError::InvalidConfigValueError {
                field: "LOG_FORMAT".to_string(),
                value: raw.clone(),
                reason,
            }),
        None => Ok(LogFormat::default()),
    }
}

impl AppConfig {
    /// 從環境變數載入配置；此時日誌尚未初始化，錯誤一律回傳給呼叫端
    pub fn from_env() -> Result<Self> {
        let port = parse_port(env_opt("PORT"))?;
        let format = parse_log_format(env_opt("LOG_FORMAT"))?;

        Ok(Self {
            server: ServerConfig {
                host: env_opt("HOST").unwrap_or_else(default_host),
                port,
            },
            mail: MailConfig {
                api_token: env_opt("MAILTRAP_API_TOKEN"),
                endpoint: env_opt("MAILTRAP_ENDPOINT").unwrap_or_else(default_mail_endpoint),
                owner_email: env_opt("CONTACT_OWNER_EMAIL"),
                sender_email: env_opt("CONTACT_SENDER_EMAIL"),
                sender_name: env_opt("CONTACT_SENDER_NAME").unwrap_or_else(default_sender_name),
                owner_name: env_opt("CONTACT_OWNER_NAME"),
            },
            recaptcha: RecaptchaConfig {
                project_id: env_opt("RECAPTCHA_PROJECT_ID"),
                site_key: env_opt("RECAPTCHA_SITE_KEY"),
                credentials_json: env_opt("GOOGLE_APPLICATION_CREDENTIALS_JSON"),
                credentials_file: env_opt("GOOGLE_APPLICATION_CREDENTIALS"),
                api_key: env_opt("RECAPTCHA_API_KEY"),
                endpoint: env_opt("RECAPTCHA_ENDPOINT")
                    .unwrap_or_else(default_recaptcha_endpoint),
            },
            logging: LoggingConfig { format },
        })
    }

    /// 將空白字串的選填欄位正規化為 None
    pub fn normalize(mut self) -> Self {
        self.mail.api_token = non_blank(self.mail.api_token);
        self.mail.owner_email = non_blank(self.mail.owner_email);
        self.mail.sender_email = non_blank(self.mail.sender_email);
        self.mail.owner_name = non_blank(self.mail.owner_name);
        self.recaptcha.project_id = non_blank(self.recaptcha.project_id);
        self.recaptcha.site_key = non_blank(self.recaptcha.site_key);
        self.recaptcha.credentials_json = non_blank(self.recaptcha.credentials_json);
        self.recaptcha.credentials_file = non_blank(self.recaptcha.credentials_file);
        self.recaptcha.api_key = non_blank(self.recaptcha.api_key);
        self
    }

    /// 套用命令列覆寫值
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if cli.json_logs {
            self.logging.format = LogFormat::Json;
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// reCAPTCHA 的設定是否齊全（只用於啟動時提示）
    pub fn recaptcha_configured(&self) -> bool {
        let r = &self.recaptcha;
        r.project_id.is_some()
            && r.site_key.is_some()
            && (r.credentials_json.is_some() || r.credentials_file.is_some() || r.api_key.is_some())
    }
}

impl Validate for MailConfig {
    fn validate(&self) -> Result<()> {
        let token = validate_required_field("mail.api_token", &self.api_token)?;
        validate_non_empty_string("mail.api_token", token)?;
        validate_url("mail.endpoint", &self.endpoint)?;

        let owner = validate_required_field("mail.owner_email", &self.owner_email)?;
        validate_email("mail.owner_email", owner)?;

        let sender = validate_required_field("mail.sender_email", &self.sender_email)?;
        validate_email("mail.sender_email", sender)?;
        validate_non_empty_string("mail.sender_name", &self.sender_name)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        self.mail.validate()?;
        validate_url("recaptcha.endpoint", &self.recaptcha.endpoint)?;
        Ok(())
    }
}
