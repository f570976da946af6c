use thiserror::Error;

/// Coarse failure classes the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request rejected or answered with a non-success status
    NetworkFailure,
    /// Successful response without the expected payload
    MalformedResponse,
    /// Rejected locally before any request was made
    ValidationFailure,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed response: missing `{0}`")]
    MissingField(&'static str),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Enter search text or pick a channel or user filter")]
    EmptySearch,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) | ClientError::Status { .. } => ErrorKind::NetworkFailure,
            ClientError::MissingField(_) | ClientError::Decode(_) => ErrorKind::MalformedResponse,
            ClientError::EmptySearch => ErrorKind::ValidationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Unwraps an optional envelope field, reporting it as malformed when absent
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(ClientError::MissingField(field))
}
