use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, OriginalUri},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use utoipa::ToSchema;

use super::failure::ApiFailure;
use crate::config::Config;
use crate::errors::ApiErrorResponse;
use crate::failure::{CodedError, Failure, HttpError, Violation};
use crate::handler::HandlerChain;
use crate::translation::{MessageCatalog, Translator};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub chain: HandlerChain,
    pub translator: Arc<dyn Translator>,
    pub dev: bool,
    pub default_locale: String,
    pub instance_id: String,
}

impl AppStateInner {
    /// Standard handler chain with the configured translation catalog
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let locale = config.translation.default_locale.clone();
        let catalog = match &config.translation.catalog_path {
            Some(path) => MessageCatalog::load(path, locale.clone())
                .with_context(|| format!("Failed to load translation catalog {}", path))?,
            None => MessageCatalog::builtin(locale.clone()),
        };

        Ok(Self {
            chain: HandlerChain::standard(),
            translator: Arc::new(catalog.strict(config.translation.strict)),
            dev: config.app.is_dev(),
            default_locale: locale,
            instance_id: config.server.instance_id.clone(),
        })
    }
}

/// Kind of failure to raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedKind {
    /// Error value carrying `code`
    Exception,
    /// Validation failure carrying `violations`
    Validation,
    /// Payload that is not an error value
    Opaque,
}

/// Failure simulation request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SimulateRequest {
    pub kind: SimulatedKind,
    /// Embedded code; positive values up to 599 become the status
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub violations: Vec<Violation>,
    /// Extra diagnostics, only shown in development mode
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub diagnostics: Option<Value>,
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        ApiFailure::from(HttpError::new(
            rejection.status().as_u16(),
            rejection.body_text(),
        ))
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "api-error-handler",
        "version": env!("CARGO_PKG_VERSION"),
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
        },
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Raise the described failure and let the handler chain render it
#[utoipa::path(
    post,
    path = "/failures/simulate",
    tag = "failures",
    request_body = SimulateRequest,
    responses(
        (status = 422, description = "Validation failure", body = ApiErrorResponse),
        (status = 404, description = "Client error exposed as-is", body = ApiErrorResponse),
        (status = 500, description = "Server error, masked outside development", body = ApiErrorResponse)
    )
)]
pub async fn simulate_failure(
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiFailure> {
    let Json(request) = payload?;
    info!(kind = ?request.kind, code = request.code, "Simulating failure");

    let message = request
        .message
        .unwrap_or_else(|| format!("Simulated failure with code {}", request.code));

    let failure = match request.kind {
        SimulatedKind::Exception => {
            let mut error = CodedError::new(request.code, message);
            if let Some(diagnostics) = request.diagnostics {
                error = error.with_diagnostics(diagnostics);
            }
            Failure::exception(error)
        }
        SimulatedKind::Validation => Failure::validation(request.violations),
        SimulatedKind::Opaque => Failure::Opaque(serde_json::json!({ "message": message })),
    };

    Err(ApiFailure(failure))
}

/// Panic inside a handler
#[utoipa::path(
    get,
    path = "/failures/panic",
    tag = "failures",
    responses(
        (status = 500, description = "Panic rendered as an internal error", body = ApiErrorResponse)
    )
)]
pub async fn simulate_panic() -> Json<Value> {
    panic!("simulated panic in request handler");
}

/// Unknown routes go through the handler chain as 404s
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiFailure {
    ApiFailure::from(HttpError::not_found(format!("No route for {}", uri.path())))
}
