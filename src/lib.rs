pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::adapters::{MailtrapClient, RecaptchaClient};
pub use crate::config::{AppConfig, CliConfig};
pub use crate::core::{ContactFlow, NotificationDispatcher, VerificationGate};
pub use crate::server::{create_router, start_server, AppState};
pub use crate::utils::error::{ContactError, Result};
