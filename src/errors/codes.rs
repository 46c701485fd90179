use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error labels for structured API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed request
    BadRequest,

    /// Authentication required or failed
    Unauthorized,

    /// Authenticated but not allowed
    Forbidden,

    /// Resource not found
    NotFound,

    /// Conflicting resource state
    Conflict,

    /// Input validation failed
    ValidationError,

    /// Too many requests / rate limit exceeded
    RateLimitExceeded,

    /// Any other status below 500
    ClientError,

    /// Internal server error
    InternalError,

    /// Dependency down or overloaded
    ServiceUnavailable,

    /// Any other status from 500 up
    ServerError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::ValidationError => write!(f, "VALIDATION_ERROR"),
            Self::RateLimitExceeded => write!(f, "RATE_LIMIT_EXCEEDED"),
            Self::ClientError => write!(f, "CLIENT_ERROR"),
            Self::InternalError => write!(f, "INTERNAL_ERROR"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
            Self::ServerError => write!(f, "SERVER_ERROR"),
        }
    }
}

impl ErrorCode {
    /// Label for a resolved status
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::ValidationError,
            429 => Self::RateLimitExceeded,
            0..=499 => Self::ClientError,
            500 => Self::InternalError,
            503 => Self::ServiceUnavailable,
            _ => Self::ServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(ErrorCode::from_status(400), ErrorCode::BadRequest);
        assert_eq!(ErrorCode::from_status(404), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_status(418), ErrorCode::ClientError);
        assert_eq!(ErrorCode::from_status(422), ErrorCode::ValidationError);
        assert_eq!(ErrorCode::from_status(500), ErrorCode::InternalError);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::ServiceUnavailable);
        assert_eq!(ErrorCode::from_status(502), ErrorCode::ServerError);
        assert_eq!(ErrorCode::from_status(42), ErrorCode::ClientError);
        assert_eq!(ErrorCode::from_status(599), ErrorCode::ServerError);
    }

    #[test]
    fn test_display_matches_serde() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::RateLimitExceeded,
            ErrorCode::ServiceUnavailable,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
    }
}
