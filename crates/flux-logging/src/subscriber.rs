use crate::config::{LogFormat, LoggingConfig};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to initialize logging: {0}")]
    InitError(String),
}

/// 构建过滤器；设置了 `RUST_LOG` 时以环境变量为准
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::try_from_default_env()
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()));
    }

    let mut directives = vec![config.level.to_string()];
    directives.extend(config.directives.iter().cloned());

    EnvFilter::try_new(directives.join(","))
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))
}

/// 初始化全局 tracing subscriber，只能调用一次
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = match config.format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };

    result.map_err(|e| LoggingError::InitError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_filter_with_directives() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }

        let config = LoggingConfig {
            level: LogLevel::Warn,
            directives: vec!["flux_rule=debug".to_string()],
            ..Default::default()
        };
        let filter = build_filter(&config).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("warn"));
        assert!(rendered.contains("flux_rule=debug"));
    }

    #[test]
    fn test_invalid_directive() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }

        let config = LoggingConfig {
            directives: vec!["flux_rule=notalevel".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            build_filter(&config),
            Err(LoggingError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_init_twice_fails() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
