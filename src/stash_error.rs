use std::io;
use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, StashError>;

#[derive(Debug, Error)]
pub(crate) enum StashError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed json: {0}")]
    Json(#[from] json::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid data uri: {0}")]
    InvalidDataUri(String),

    #[error("photo {0} is not in the library")]
    PhotoNotFound(String),

    #[error("bad configuration: {0}")]
    Config(String),
}

impl StashError {
    pub(crate) fn is_not_found(&self) -> bool {
        match self {
            StashError::NotFound(_) => true,
            StashError::Io(err) => err.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
