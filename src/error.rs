use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("storage error: {message}")]
    Storage { message: String },
    #[error("invalid config: {message}")]
    Config { message: String },
    #[error("unknown action: {tag}")]
    UnknownAction { tag: String },
    #[error("collaborator error: {message}")]
    Collaborator { message: String },
    #[error(transparent)]
    QueueFull(#[from] crate::notify::QueueFull),
    #[error("engine stopped")]
    Stopped,
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HeraldError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HeraldError>;
