use std::{fmt, io, path::StripPrefixError};

use serde_json::Error as JsonError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocweaveError {
    #[error("Build cache error: {0}")]
    Cache(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Comment block parse error: {0}")]
    Parse(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Comment block opened but its end marker was never found")]
    UnterminatedBlock,
}

impl From<io::Error> for DocweaveError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => DocweaveError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => DocweaveError::PermissionDenied,
            _ => DocweaveError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for DocweaveError {
    fn from(src: fmt::Error) -> DocweaveError {
        DocweaveError::Custom(format!("Formatting error: {src}"))
    }
}

impl From<StripPrefixError> for DocweaveError {
    fn from(src: StripPrefixError) -> DocweaveError {
        DocweaveError::NotFound(format!("Strip prefix failed for path. Error: {src}"))
    }
}

impl From<JsonError> for DocweaveError {
    fn from(src: JsonError) -> DocweaveError {
        DocweaveError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<JoinError> for DocweaveError {
    fn from(src: JoinError) -> DocweaveError {
        DocweaveError::Custom(format!("Build worker join failed: {src}"))
    }
}
