pub mod config;
pub mod subscriber;

pub use config::{LogFormat, LogLevel, LoggingConfig};
pub use subscriber::{build_filter, init_logging, LoggingError};
