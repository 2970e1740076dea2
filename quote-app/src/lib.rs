pub mod app;
pub mod config;
pub mod logging;
pub mod session;

pub use app::App;
pub use config::{AppConfig, ConfigError};
pub use session::QuoteSession;
