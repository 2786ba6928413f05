pub mod app;
pub mod config;
pub mod logging;
pub mod utils;

pub use app::{ClearanceCertificate, Session, SessionError, build_registry};
pub use config::{AppConfig, ConfigError};
