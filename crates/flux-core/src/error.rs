use thiserror::Error;

/// FLUX Core 统一错误类型
#[derive(Error, Debug)]
pub enum FluxError {
    #[error("Module not registered: {0}")]
    ModuleNotFound(String),

    #[error("Module already registered: {0}")]
    ModuleAlreadyRegistered(String),

    #[error("Channel send error: {0}")]
    ChannelSend(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, FluxError>;

impl From<anyhow::Error> for FluxError {
    fn from(err: anyhow::Error) -> Self {
        FluxError::Internal(err.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for FluxError {
    fn from(err: tokio::sync::mpsc::error::SendError<T>) -> Self {
        FluxError::ChannelSend(err.to_string())
    }
}
