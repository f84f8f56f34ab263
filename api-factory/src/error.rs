// api-factory/src/error.rs
use crate::http::HttpError;
use serde_json::Value;
use thiserror::Error;

/// Rejection of a request method call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. A transport aborted by the cancellation signal
    /// lands here too, with status 0 and `is_cancelled` set.
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        data: Value,
        is_cancelled: bool,
    },

    /// The cancelable wrapper of a GET_WITH_XHR request was canceled
    #[error("request was canceled")]
    Canceled,

    #[error(transparent)]
    Transport(#[from] HttpError),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid request data: {0}")]
    InvalidData(String),

    #[error("request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status of the rejection, if a status was observed
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status,
            _ => None,
        }
    }

    /// Parsed (or raw text) response body of a status rejection
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Status { data, .. } => Some(data),
            _ => None,
        }
    }

    /// True for both cancellation paths: the cancellation signal and the
    /// cancelable wrapper.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Status { is_cancelled: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_accessors() {
        let err = ApiError::Status {
            status: 404,
            data: json!({"message": "missing"}),
            is_cancelled: false,
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.data(), Some(&json!({"message": "missing"})));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_both_cancel_paths_report_cancelled() {
        let aborted = ApiError::Status {
            status: 0,
            data: json!(""),
            is_cancelled: true,
        };
        assert!(aborted.is_cancelled());
        assert!(ApiError::Canceled.is_cancelled());
        assert_eq!(ApiError::Canceled.status(), None);
    }
}
