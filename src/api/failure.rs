//! Routes every failed request through the exception handler chain.
//!
//! Request handlers return [`ApiFailure`]; its response only carries the
//! [`Failure`] in its extensions. [`render_failures`] picks it up, builds the
//! [`ExceptionContext`] for the request and replaces the response with the
//! rendered [`ApiErrorResponse`].

use axum::{
    extract::{Request, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use tracing::error;

use super::handlers::AppState;
use super::middleware::RequestId;
use crate::context::ExceptionContext;
use crate::errors::{ApiError, ApiErrorResponse, ResponseBuilder};
use crate::failure::{AppError, Failure, Panicked};
use crate::metrics::PANICS_TOTAL;
use crate::status::DEFAULT_STATUS;
use crate::translation::INTERNAL_SERVER_ERROR;

/// Failure returned from a request handler
#[derive(Debug, Clone)]
pub struct ApiFailure(pub Failure);

impl ApiFailure {
    pub fn new(failure: impl Into<Failure>) -> Self {
        Self(failure.into())
    }
}

impl<E: AppError> From<E> for ApiFailure {
    fn from(error: E) -> Self {
        Self(Failure::exception(error))
    }
}

impl From<Failure> for ApiFailure {
    fn from(failure: Failure) -> Self {
        Self(failure)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        // Placeholder until render_failures replaces it
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}

/// Turn a caught panic into a failure for the handler chain
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(details = %message, "Handler panicked");
    PANICS_TOTAL.inc();

    ApiFailure::new(Panicked { message }).into_response()
}

/// Middleware rendering failures left in response extensions
pub async fn render_failures(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let locale = preferred_locale(request.headers(), &state.default_locale);

    let mut response = next.run(request).await;
    let Some(failure) = response.extensions_mut().remove::<Failure>() else {
        return response;
    };

    let ctx = ExceptionContext::new(failure, state.dev, state.translator.clone())
        .with_locale(locale)
        .with_request_id(request_id.clone())
        .with_instance_id(state.instance_id.clone());

    match state.chain.dispatch(ctx) {
        Ok(rendered) => rendered.into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to render failure");
            unhandled_response(&request_id).into_response()
        }
    }
}

/// Bare response used when the chain itself fails; never translated
fn unhandled_response(request_id: &str) -> ApiErrorResponse {
    let mut builder = ResponseBuilder::new();
    builder
        .status_error()
        .add_meta("request_id", request_id)
        .add_error(ApiError::new(INTERNAL_SERVER_ERROR, DEFAULT_STATUS));
    builder.into_inner()
}

/// Highest-weighted language from `Accept-Language`, or the default
pub fn preferred_locale(headers: &HeaderMap, default: &str) -> String {
    let Some(header) = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()) else {
        return default.to_string();
    };

    let mut candidates: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let weight = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            (weight > 0.0).then_some((tag, weight))
        })
        .collect();

    // Stable sort keeps header order between equal weights
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates
        .first()
        .map(|(tag, _)| tag.to_string())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::HttpError;
    use axum::http::HeaderValue;

    fn headers(accept_language: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept_language).unwrap());
        headers
    }

    #[test]
    fn test_preferred_locale_without_header() {
        assert_eq!(preferred_locale(&HeaderMap::new(), "en"), "en");
    }

    #[test]
    fn test_preferred_locale_by_weight() {
        assert_eq!(
            preferred_locale(&headers("en;q=0.5, fr-CA, de;q=0.8"), "en"),
            "fr-CA"
        );
        assert_eq!(preferred_locale(&headers("de;q=0.8, fr;q=0.8"), "en"), "de");
    }

    #[test]
    fn test_preferred_locale_ignores_wildcard_and_zero_weight() {
        assert_eq!(preferred_locale(&headers("*, fr;q=0"), "en"), "en");
    }

    #[test]
    fn test_api_failure_stores_failure_in_extensions() {
        let response = ApiFailure::from(HttpError::not_found("gone")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let failure = response.extensions().get::<Failure>().unwrap();
        assert!(failure.is_throwable());
    }

    #[test]
    fn test_panic_response_carries_panicked_failure() {
        let response = panic_response(Box::new("index out of bounds"));
        match response.extensions().get::<Failure>() {
            Some(Failure::Exception(error)) => {
                assert_eq!(error.kind(), "panic");
                assert!(error.to_string().contains("index out of bounds"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_unhandled_response_is_generic() {
        let response = unhandled_response("req-1");
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].code, 500);
        assert_eq!(response.meta["request_id"], "req-1");
    }
}
