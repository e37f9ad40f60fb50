//! Error types for task store operations.

use thiserror::Error;

/// Errors a task store can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No session, or the session has expired
    #[error("not authenticated")]
    Unauthenticated,

    /// Create or update payload rejected
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Mutation or delete on an id the store does not hold
    #[error("task not found: {id}")]
    NotFound { id: String },

    /// Transport failure; never retried automatically
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with an unexpected status
    #[error("backend error {status}: {message}")]
    Backend { status: u16, message: String },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Map a non-success HTTP status and body to a store error.
    ///
    /// `id` names the task the request targeted, if any.
    pub fn from_http_status(status: u16, body: &str, id: Option<&str>) -> Self {
        match status {
            401 | 403 => Self::Unauthenticated,
            400 | 409 | 422 => Self::validation("payload", truncate(body)),
            404 => Self::not_found(id.unwrap_or_default()),
            _ => Self::Backend {
                status,
                message: truncate(body),
            },
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_http_status(status.as_u16(), &err.to_string(), None)
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 300;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found("task-1");
        assert_eq!(err.to_string(), "task not found: task-1");
    }

    #[test]
    fn test_http_status_classification() {
        assert_eq!(
            StoreError::from_http_status(401, "", None),
            StoreError::Unauthenticated
        );
        assert!(matches!(
            StoreError::from_http_status(422, "bad", None),
            StoreError::Validation { .. }
        ));
        assert_eq!(
            StoreError::from_http_status(404, "", Some("t9")),
            StoreError::not_found("t9")
        );
        assert!(matches!(
            StoreError::from_http_status(503, "down", None),
            StoreError::Backend { status: 503, .. }
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        match StoreError::from_http_status(500, &body, None) {
            StoreError::Backend { message, .. } => assert!(message.len() < 310),
            other => panic!("unexpected {other:?}"),
        }
    }
}
