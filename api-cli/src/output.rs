// api-cli/src/output.rs
use api_factory::ApiError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Standard JSON response envelope
#[derive(Debug, Serialize)]
pub struct Response<T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> Response<()> {
        Response::<()> {
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    type_: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    retryable: bool,
}

impl ErrorResponse {
    pub fn validation_failed(message: String) -> Self {
        Self {
            type_: "validation_failed",
            message,
            status: None,
            data: None,
            retryable: false,
        }
    }

    pub fn from_api_error(err: &ApiError) -> Self {
        let type_ = match err {
            e if e.is_cancelled() => "canceled",
            ApiError::Status { .. } => "http_status",
            ApiError::Transport(_) => "transport_error",
            _ => "internal_error",
        };
        Self {
            type_,
            message: err.to_string(),
            status: err.status(),
            data: err.data().cloned(),
            retryable: exit_code_for(err) == ExitCode::TransientError,
        }
    }
}

/// Exit codes for scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    TransientError = 1,
    PermanentError = 2,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::TransientError => write!(f, "transient_error"),
            Self::PermanentError => write!(f, "permanent_error"),
        }
    }
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// 4xx is the caller's problem; everything else may go away on retry
pub fn exit_code_for(err: &ApiError) -> ExitCode {
    match err {
        ApiError::Status { status, .. } if (400..500).contains(status) => ExitCode::PermanentError,
        ApiError::Encode(_) | ApiError::InvalidData(_) => ExitCode::PermanentError,
        _ => ExitCode::TransientError,
    }
}

// Print response to stdout
pub fn print_response<T: Serialize>(resp: &Response<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    Ok(())
}

/// Print a styled info/header
pub fn print_header(key: &str, value: &str) {
    let term = console::Term::stdout();
    let _ = term.write_str(&format!("{}: {}\n", console::style(key).bold(), value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let resp = Response::ok(json!({"id": 1}));
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"ok":true,"result":{"id":1}}"#
        );
    }

    #[test]
    fn test_status_error_envelope() {
        let err = ApiError::Status {
            status: 404,
            data: json!("Not found."),
            is_cancelled: false,
        };
        let resp = Response::<()>::error(ErrorResponse::from_api_error(&err));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["error"]["type"], json!("http_status"));
        assert_eq!(value["error"]["status"], json!(404));
        assert_eq!(value["error"]["data"], json!("Not found."));
        assert_eq!(value["error"]["retryable"], json!(false));
    }

    #[test]
    fn test_cancel_is_transient() {
        let err = ApiError::Canceled;
        assert_eq!(exit_code_for(&err), ExitCode::TransientError);
        let resp = ErrorResponse::from_api_error(&err);
        assert_eq!(resp.type_, "canceled");
    }

    #[test]
    fn test_exit_codes() {
        let server_error = ApiError::Status {
            status: 503,
            data: Value::Null,
            is_cancelled: false,
        };
        assert_eq!(exit_code_for(&server_error), ExitCode::TransientError);
        assert_eq!(
            exit_code_for(&ApiError::InvalidData("x".to_string())).code(),
            2
        );
    }
}
