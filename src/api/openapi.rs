use utoipa::OpenApi;

use crate::api::handlers::{SimulateRequest, SimulatedKind};
use crate::errors::{ApiError, ApiErrorResponse, ErrorCode, ResponseStatus};
use crate::failure::Violation;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Error Handler",
        version = "0.1.0",
        description = "Renders failed requests as structured API error responses. Client errors are exposed as-is; server errors are masked behind a translated generic message outside development mode.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::simulate_failure,
        crate::api::handlers::simulate_panic,
    ),
    components(
        schemas(
            ApiErrorResponse,
            ApiError,
            ErrorCode,
            ResponseStatus,
            SimulateRequest,
            SimulatedKind,
            Violation,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "failures", description = "Failure simulation endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_error_schemas() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("/failures/simulate"));
    }
}
