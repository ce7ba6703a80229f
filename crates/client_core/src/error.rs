use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single top-stories request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid stories api url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("stories request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("stories api returned {} {status_text}", .status.as_u16())]
    Status {
        status: StatusCode,
        status_text: String,
        body: String,
    },
    #[error("malformed stories response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("stories request task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

impl FetchError {
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        Self::Status {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        }
    }

    /// HTTP status of the failed response, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) | Self::Decode(err) => err.status(),
            Self::InvalidUrl { .. } | Self::Task(_) => None,
        }
    }
}
