use tracing::{debug, error};

use super::common::add_common_info;
use super::ExceptionHandler;
use crate::context::ExceptionContext;
use crate::errors::{ApiError, ApiErrorResponse, HandlerError};
use crate::failure::{AppError, Failure};
use crate::metrics::ERRORS_MASKED_TOTAL;
use crate::status::{is_server_error, resolve_status};
use crate::translation::INTERNAL_SERVER_ERROR;

/// Last-resort handler for any error value.
///
/// Client-classified errors (status below 500) are always exposed. Server
/// errors are exposed only in development mode; otherwise the message is
/// replaced by the translated "Internal server error" and the status kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl DefaultHandler {
    pub fn new() -> Self {
        Self
    }

    fn exposed(ctx: &ExceptionContext, error: &dyn AppError, status: u16) -> ApiError {
        match ctx.diagnostics(error) {
            Some(diagnostics) => ApiError::with_details(error.to_string(), status, diagnostics),
            None => ApiError::new(error.to_string(), status),
        }
    }
}

impl ExceptionHandler for DefaultHandler {
    fn name(&self) -> &'static str {
        "default"
    }

    fn supports(&self, ctx: &ExceptionContext) -> bool {
        ctx.failure().is_throwable()
    }

    fn handle<'a>(
        &self,
        ctx: &'a mut ExceptionContext,
    ) -> Result<&'a ApiErrorResponse, HandlerError> {
        let error = match ctx.failure() {
            Failure::Exception(error) => error.clone(),
            other => {
                return Err(HandlerError::Unhandled {
                    kind: other.kind().to_string(),
                })
            }
        };

        ctx.response_mut().status_error();
        add_common_info(ctx);

        let status = resolve_status(error.code());

        let entry = if !is_server_error(status) || ctx.is_dev() {
            debug!(
                request_id = %ctx.request_id(),
                status = status,
                kind = error.kind(),
                "Exposing error detail"
            );
            Self::exposed(ctx, error.as_ref(), status)
        } else {
            // Masked detail only lives in the server log
            error!(
                request_id = %ctx.request_id(),
                status = status,
                kind = error.kind(),
                error = %error,
                "Internal error masked"
            );
            ERRORS_MASKED_TOTAL.inc();
            let message = ctx.translator().trans(INTERNAL_SERVER_ERROR, ctx.locale())?;
            ApiError::new(message, status)
        };

        ctx.response_mut().status_error().add_error(entry);
        Ok(ctx.response().response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorCode, ResponseBuilder, TranslationError};
    use crate::failure::{CodedError, HttpError, Panicked, Violation};
    use crate::translation::{MessageCatalog, Translator};
    use serde_json::json;
    use std::sync::Arc;

    fn context(failure: Failure, dev: bool) -> ExceptionContext {
        ExceptionContext::new(failure, dev, Arc::new(MessageCatalog::default()))
    }

    fn handle(code: i64, message: &str, dev: bool) -> ApiErrorResponse {
        let mut ctx = context(Failure::exception(CodedError::new(code, message)), dev);
        DefaultHandler.handle(&mut ctx).unwrap().clone()
    }

    // ========== SCENARIOS ==========

    #[test]
    fn test_client_error_is_exposed_in_production() {
        let response = handle(404, "Not found", false);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].code, 404);
        assert_eq!(response.errors[0].message, "Not found");
        assert_eq!(response.errors[0].label, ErrorCode::NotFound);
        assert_eq!(response.http_status(), 404);
    }

    #[test]
    fn test_zero_code_is_masked_in_production() {
        let response = handle(0, "boom", false);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].code, 500);
        assert_eq!(response.errors[0].message, "Internal server error");
    }

    #[test]
    fn test_zero_code_is_exposed_in_development() {
        let response = handle(0, "boom", true);
        assert_eq!(response.errors[0].code, 500);
        assert_eq!(response.errors[0].message, "boom");
    }

    #[test]
    fn test_server_error_keeps_status_when_masked() {
        let response = handle(503, "db down", false);
        assert_eq!(response.errors[0].code, 503);
        assert_eq!(response.errors[0].message, "Internal server error");
        assert_eq!(response.errors[0].label, ErrorCode::ServiceUnavailable);
    }

    // ========== PROPERTIES ==========

    #[test]
    fn test_codes_below_500_are_used_and_exposed() {
        for code in [1_i64, 99, 400, 401, 422, 499] {
            let response = handle(code, "client problem", false);
            assert_eq!(i64::from(response.errors[0].code), code);
            assert_eq!(response.errors[0].message, "client problem");
        }
    }

    #[test]
    fn test_masked_output_never_contains_original_message() {
        for code in [0_i64, -3, 500, 502, 599, 600, 999_999] {
            let response = handle(code, "secret db password", false);
            let json = serde_json::to_string(&response).unwrap();
            assert!(!json.contains("secret db password"), "leaked for code {}", code);
        }
    }

    #[test]
    fn test_out_of_range_code_resolves_to_500() {
        let response = handle(999_999, "weird", false);
        assert_eq!(response.errors[0].code, 500);
        assert_eq!(response.errors[0].message, "Internal server error");
    }

    #[test]
    fn test_development_exposes_diagnostics() {
        let error = CodedError::new(503, "db down").with_diagnostics(json!({ "host": "db-1" }));
        let mut ctx = context(Failure::exception(error), true);
        let response = DefaultHandler.handle(&mut ctx).unwrap();

        let entry = &response.errors[0];
        assert_eq!(entry.message, "db down");
        let details = entry.details.as_ref().unwrap();
        assert_eq!(details["kind"], "coded");
        assert_eq!(details["extra"]["host"], "db-1");
        assert_eq!(response.meta["exception"], "coded");
    }

    #[test]
    fn test_production_client_error_has_no_details() {
        let error = CodedError::new(409, "taken").with_diagnostics(json!({ "row": 7 }));
        let mut ctx = context(Failure::exception(error), false);
        let response = DefaultHandler.handle(&mut ctx).unwrap();
        assert!(response.errors[0].details.is_none());
    }

    #[test]
    fn test_appends_exactly_one_error() {
        let mut existing = ResponseBuilder::new();
        existing
            .status_error()
            .add_error(ApiError::new("earlier", 400));

        let mut ctx = context(Failure::exception(HttpError::not_found("gone")), false)
            .with_response(existing);
        let response = DefaultHandler.handle(&mut ctx).unwrap();
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[1].message, "gone");
    }

    #[test]
    fn test_masked_message_is_translated() {
        let mut ctx = context(
            Failure::exception(Panicked {
                message: "index out of bounds".to_string(),
            }),
            false,
        )
        .with_locale("fr");
        let response = DefaultHandler.handle(&mut ctx).unwrap();
        assert_eq!(response.errors[0].message, "Erreur interne du serveur");
    }

    #[test]
    fn test_translation_failure_propagates() {
        struct Broken;
        impl Translator for Broken {
            fn trans(&self, key: &str, locale: &str) -> Result<String, TranslationError> {
                Err(TranslationError::MissingKey {
                    key: key.to_string(),
                    locale: locale.to_string(),
                })
            }
        }

        let mut ctx = ExceptionContext::new(
            Failure::exception(CodedError::new(0, "boom")),
            false,
            Arc::new(Broken),
        );
        let err = DefaultHandler.handle(&mut ctx).unwrap_err();
        assert!(matches!(err, HandlerError::Translation(_)));
    }

    #[test]
    fn test_supports_only_throwables() {
        let handler = DefaultHandler::new();
        assert!(handler.supports(&context(
            Failure::exception(HttpError::not_found("x")),
            false
        )));
        assert!(!handler.supports(&context(
            Failure::validation(vec![Violation::global("bad")]),
            false
        )));
        assert!(!handler.supports(&context(Failure::Opaque(json!("x")), false)));
    }

    #[test]
    fn test_handle_rejects_non_throwable() {
        let mut ctx = context(Failure::Opaque(json!(null)), false);
        let err = DefaultHandler.handle(&mut ctx).unwrap_err();
        assert!(matches!(err, HandlerError::Unhandled { .. }));
    }
}
