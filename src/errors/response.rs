use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::codes::ErrorCode;
use crate::status::DEFAULT_STATUS;

/// Top-level status marker of an API response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    #[default]
    Success,
    Error,
}

/// One error entry of an API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub message: String,
    /// Numeric status code
    pub code: u16,
    /// Error label for programmatic handling
    pub label: ErrorCode,
    /// Additional context (development mode, validation fields)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ApiError {
    /// Create a new error entry; the label is derived from the code
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
            label: ErrorCode::from_status(code),
            details: None,
        }
    }

    /// Create error with additional details
    pub fn with_details(message: impl Into<String>, code: u16, details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(message, code)
        }
    }

    pub fn with_label(mut self, label: ErrorCode) -> Self {
        self.label = label;
        self
    }
}

/// Structured error response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// `error` once any handler touched the response
    pub status: ResponseStatus,
    /// Errors in the order they were added
    pub errors: Vec<ApiError>,
    /// Request metadata (request id, timestamp, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[schema(value_type = Object)]
    pub meta: Map<String, Value>,
}

impl ApiErrorResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ApiError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ResponseStatus::Error
    }

    /// Status of the first error entry, 500 when there is none
    pub fn http_status(&self) -> u16 {
        self.errors
            .first()
            .map(|e| e.code)
            .unwrap_or(DEFAULT_STATUS)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

/// Response under construction for the current request
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    response: ApiErrorResponse,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the response to the error status and return it for population
    pub fn status_error(&mut self) -> &mut ApiErrorResponse {
        self.response.status = ResponseStatus::Error;
        &mut self.response
    }

    pub fn response(&self) -> &ApiErrorResponse {
        &self.response
    }

    pub fn into_inner(self) -> ApiErrorResponse {
        self.response
    }
}
