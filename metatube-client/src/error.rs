//! MetaTube client error types
//!
//! Every failure of a client call surfaces through [`MetatubeError`]. Nothing
//! is retried or swallowed here; the caller decides whether to fall back.

use bytes::Bytes;
use thiserror::Error;

/// Maximum response body size for MetaTube HTTP calls (16 MB).
/// Prevents OOM from a misbehaving upstream server.
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Error type for all MetaTube client operations.
#[derive(Debug, Error)]
pub enum MetatubeError {
    #[error("Request cancelled")]
    Cancelled,

    #[error("API error (code {code}): {message}")]
    Api { code: String, message: String },

    #[error("Empty response: server returned no data")]
    EmptyResponse,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl MetatubeError {
    /// Whether the error came from caller cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Remote error code, when the server reported one.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Read a response body, enforcing [`MAX_RESPONSE_SIZE`].
///
/// Checks the `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes.
pub(crate) async fn bytes_with_limit(response: reqwest::Response) -> Result<Bytes, MetatubeError> {
    if let Some(cl) = response.content_length() {
        if cl > MAX_RESPONSE_SIZE as u64 {
            return Err(MetatubeError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(MetatubeError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    Ok(bytes)
}

impl From<serde_json::Error> for MetatubeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for MetatubeError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_cancelled() {
        assert_eq!(MetatubeError::Cancelled.to_string(), "Request cancelled");
    }

    #[test]
    fn test_error_display_api() {
        let err = MetatubeError::Api {
            code: "not_found".to_string(),
            message: "actor not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (code not_found): actor not found");
        assert_eq!(err.api_code(), Some("not_found"));
    }

    #[test]
    fn test_error_display_http() {
        let err = MetatubeError::Http {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "https://metatube.example.com/v1/translate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error 502 Bad Gateway for https://metatube.example.com/v1/translate"
        );
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = MetatubeError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: MetatubeError = json_err.into();
        assert!(matches!(err, MetatubeError::Parse(_)));
        assert!(!err.is_cancelled());
        assert_eq!(err.api_code(), None);
    }
}
