// Error types shared by the client library. Every failure a remote call can
// produce is one variant here, so callers match on the enum (or on
// `ErrorKind`) instead of inspecting messages.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LycheeError>;

#[derive(Debug, Error)]
pub enum LycheeError {
    /// Connection refused, timeout, DNS failure and anything else that
    /// happens before a complete response arrives.
    #[error("server communication failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The client or the request could not be built; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    #[error("server answered with status {code}, expected 2xx")]
    Status { code: u16 },

    /// Login answered 2xx but the body was not `true`.
    #[error("unable to login, status {status}, response body: {body}")]
    Authentication { status: u16, body: String },

    #[error("unexpected response format: {0}")]
    Decode(String),

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("path does not point to a file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("file is not an image of the allowed types JPG, JPEG, GIF or PNG: {}", path.display())]
    UnsupportedFileType { path: PathBuf },

    #[error("could not upload picture, server response: {body}")]
    UploadRejected { body: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse failure category, for callers that only care which stage broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    InvalidRequest,
    Status,
    Authentication,
    Decode,
    Validation,
    UploadRejected,
    Io,
}

impl LycheeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LycheeError::Transport(_) => ErrorKind::Transport,
            LycheeError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            LycheeError::Status { .. } => ErrorKind::Status,
            LycheeError::Authentication { .. } => ErrorKind::Authentication,
            LycheeError::Decode(_) | LycheeError::Json(_) => ErrorKind::Decode,
            LycheeError::NotAFile { .. } | LycheeError::UnsupportedFileType { .. } => {
                ErrorKind::Validation
            }
            LycheeError::UploadRejected { .. } => ErrorKind::UploadRejected,
            LycheeError::Io(_) => ErrorKind::Io,
        }
    }
}
