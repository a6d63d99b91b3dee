use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot load config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Unknown capability '{0}'")]
    UnknownCapability(String),

    #[error("Role matrix is missing roles: {missing:?}")]
    IncompleteRoleMatrix { missing: Vec<String> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
