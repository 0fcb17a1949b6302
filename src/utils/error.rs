use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Credential decoding error: {0}")]
    CredentialDecodeError(#[from] base64::DecodeError),

    #[error("Token signing error: {0}")]
    SigningError(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{service} responded with status {status}: {message}")]
    ServiceError {
        service: String,
        status: u16,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContactError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContactError::ConfigError { .. }
            | ContactError::MissingConfigError { .. }
            | ContactError::InvalidConfigValueError { .. }
            | ContactError::ConfigValidationError { .. }
            | ContactError::CredentialDecodeError(_)
            | ContactError::SigningError(_) => ErrorCategory::Configuration,
            ContactError::ValidationError { .. } => ErrorCategory::Validation,
            ContactError::TransportError(_)
            | ContactError::IoError(_)
            | ContactError::SerializationError(_)
            | ContactError::ServiceError { .. } => ErrorCategory::Transport,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不洩漏內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            ContactError::ValidationError { message } => message.clone(),
            ContactError::ServiceError { service, .. } => {
                format!("{} could not process the request", service)
            }
            ContactError::TransportError(_) | ContactError::IoError(_) => {
                "A remote service could not be reached".to_string()
            }
            ContactError::SerializationError(_) => {
                "A remote service returned an unexpected response".to_string()
            }
            _ => "The service is not configured correctly".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ContactError::MissingConfigError { .. } => {
                "Set the missing environment variable or add it to the config file"
            }
            ContactError::InvalidConfigValueError { .. }
            | ContactError::ConfigValidationError { .. }
            | ContactError::ConfigError { .. } => "Fix the configuration value and restart",
            ContactError::CredentialDecodeError(_) | ContactError::SigningError(_) => {
                "Check that the service-account credentials are valid JSON (raw or base64)"
            }
            ContactError::ValidationError { .. } => "Correct the submitted fields and retry",
            ContactError::ServiceError { .. } => "Check the remote service dashboard and API token",
            ContactError::TransportError(_) | ContactError::IoError(_) => {
                "Check network connectivity and retry"
            }
            ContactError::SerializationError(_) => "Check the remote service API version",
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
