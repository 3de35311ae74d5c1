use thiserror::Error;

/// Errors surfaced by every backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, broken transfer …
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-2xx status.  `message` is the
    /// `error` field of its JSON body, when there is one.
    #[error("backend returned status {status}")]
    Status { status: u16, message: Option<String> },

    /// A 2xx body could not be parsed as the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(msg), ..
            } => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

/// Pull the `error` string out of an error-response body.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
