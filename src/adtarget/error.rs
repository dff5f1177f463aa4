use crate::model::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetingError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("Invalid anchor: {0} (expected restaurant:<id> or campaign:<id>)")]
    InvalidAnchor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TargetingError>;
