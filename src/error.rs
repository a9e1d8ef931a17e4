use thiserror::Error;

#[derive(Error, Debug)]
pub enum GantryError {
    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("invalid ticket id '{0}'")]
    InvalidTicketId(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unknown workflow operation '{0}'")]
    UnknownOperation(String),

    #[error("notification dispatch failed: {0}")]
    Notify(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GantryError>;
