//! Tagged failure model handed to the exception handlers.
//!
//! A request can fail with an error value (anything implementing [`AppError`]),
//! with a list of validation violations, or with an arbitrary payload that is
//! not an error at all. Handlers pick the variants they understand.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

/// Error value that can be rendered as an API error
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Embedded numeric code; positive values are used as the HTTP status
    fn code(&self) -> i64 {
        0
    }

    /// Short type label, only surfaced in development mode
    fn kind(&self) -> &str {
        "error"
    }

    /// Extra diagnostic payload, only surfaced in development mode
    fn diagnostics(&self) -> Option<Value> {
        None
    }
}

/// A single input validation violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    /// Offending field (dotted path), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn global(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// What a request failed with
#[derive(Clone)]
pub enum Failure {
    /// Throwable-like error value
    Exception(Arc<dyn AppError>),
    /// Input rejected by validation
    Validation(Vec<Violation>),
    /// Something that is not an error value
    Opaque(Value),
}

impl Failure {
    pub fn exception<E: AppError>(error: E) -> Self {
        Self::Exception(Arc::new(error))
    }

    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation(violations)
    }

    pub fn is_throwable(&self) -> bool {
        matches!(self, Self::Exception(_))
    }

    /// Type label for logs and development diagnostics
    pub fn kind(&self) -> &str {
        match self {
            Self::Exception(error) => error.kind(),
            Self::Validation(_) => "validation",
            Self::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exception(error) => f
                .debug_struct("Exception")
                .field("kind", &error.kind())
                .field("code", &error.code())
                .field("message", &error.to_string())
                .finish(),
            Self::Validation(violations) => f.debug_tuple("Validation").field(violations).finish(),
            Self::Opaque(value) => f.debug_tuple("Opaque").field(value).finish(),
        }
    }
}

impl<E: AppError> From<E> for Failure {
    fn from(error: E) -> Self {
        Self::exception(error)
    }
}

/// Error raised with an explicit HTTP status
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    pub status: u16,
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(503, message)
    }
}

impl AppError for HttpError {
    fn code(&self) -> i64 {
        i64::from(self.status)
    }

    fn kind(&self) -> &str {
        "http"
    }
}

/// Error carrying an arbitrary code, as raised by application code
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CodedError {
    pub code: i64,
    pub message: String,
    pub diagnostics: Option<Value>,
}

impl CodedError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Value) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
}

impl AppError for CodedError {
    fn code(&self) -> i64 {
        self.code
    }

    fn kind(&self) -> &str {
        "coded"
    }

    fn diagnostics(&self) -> Option<Value> {
        self.diagnostics.clone()
    }
}

/// A handler panicked
#[derive(Debug, Clone, thiserror::Error)]
#[error("handler panicked: {message}")]
pub struct Panicked {
    pub message: String,
}

impl AppError for Panicked {
    fn kind(&self) -> &str {
        "panic"
    }
}

/// Adapter for errors that only exist as `anyhow::Error`
#[derive(Debug, thiserror::Error)]
#[error("{0:#}")]
pub struct Unexpected(pub anyhow::Error);

impl AppError for Unexpected {
    fn kind(&self) -> &str {
        "unexpected"
    }

    fn diagnostics(&self) -> Option<Value> {
        let chain: Vec<String> = self.0.chain().skip(1).map(|e| e.to_string()).collect();
        if chain.is_empty() {
            None
        } else {
            Some(serde_json::json!({ "caused_by": chain }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use serde_json::json;

    #[test]
    fn test_only_exceptions_are_throwable() {
        assert!(Failure::exception(HttpError::not_found("gone")).is_throwable());
        assert!(!Failure::validation(vec![Violation::global("bad")]).is_throwable());
        assert!(!Failure::Opaque(json!({"weird": true})).is_throwable());
    }

    #[test]
    fn test_http_error_code_is_status() {
        let err = HttpError::service_unavailable("db down");
        assert_eq!(err.code(), 503);
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn test_default_code_is_zero() {
        let err = Panicked {
            message: "boom".to_string(),
        };
        assert_eq!(err.code(), 0);
        assert_eq!(err.kind(), "panic");
    }

    #[test]
    fn test_unexpected_lists_causes() {
        let result: anyhow::Result<()> =
            Err(anyhow::anyhow!("connection refused")).context("loading profile");
        let err = Unexpected(result.unwrap_err());
        assert!(err.to_string().contains("loading profile"));
        assert_eq!(
            err.diagnostics(),
            Some(json!({ "caused_by": ["connection refused"] }))
        );
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(Failure::from(CodedError::new(7, "x")).kind(), "coded");
        assert_eq!(Failure::validation(vec![]).kind(), "validation");
        assert_eq!(Failure::Opaque(json!(1)).kind(), "opaque");
    }
}
