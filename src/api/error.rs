use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    /// The server rejected the request with an explicit user-facing message.
    #[error("{0}")]
    Rejected(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Minimal shape of an error body carrying a displayable message
#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Extract the server's `{"message": ...}` field from an error body, if any
    fn body_message(body: &str) -> Option<String> {
        serde_json::from_str::<MessageBody>(body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => match Self::body_message(body) {
                Some(message) => ApiError::Rejected(message),
                None => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
            },
        }
    }

    /// The server's own message for rejections that should be shown verbatim
    pub fn user_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "no"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
    }

    #[test]
    fn test_rejection_message_surfaced() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"success": false, "message": "User already exists"}"#,
        );
        assert_eq!(err.user_message(), Some("User already exists"));
    }

    #[test]
    fn test_unparseable_body_is_invalid_response() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "<html>nope</html>");
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(err.user_message().is_none());
    }
}
