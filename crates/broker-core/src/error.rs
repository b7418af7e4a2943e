use thiserror::Error;

use crate::request::Operation;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to decode stored entry: {0}")]
    Decode(String),

    #[error("Failed to encode entry: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(#[source] anyhow::Error),

    #[error("Unsupported path: {0}")]
    UnsupportedPath(String),

    #[error("Unsupported operation '{operation}' on path '{path}'")]
    UnsupportedOperation { path: String, operation: Operation },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BrokerError {
    pub fn storage(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Storage {
            context: context.into(),
            source: source.into(),
        }
    }
}

pub type BrokerResult<T> = Result<T, BrokerError>;
