//! 组合层错误

use thiserror::Error;

/// 组合层错误
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("Failed to load extender settings: {source}")]
    Settings {
        #[from]
        source: config::ConfigError,
    },

    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    #[error("Missing container collaborator: {name}")]
    MissingCollaborator { name: &'static str },

    #[error("No tokio runtime available to drive the container")]
    NoRuntime,
}

/// 结果类型别名
pub type CompositionResult<T> = Result<T, CompositionError>;
