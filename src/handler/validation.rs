use serde_json::json;
use tracing::debug;

use super::common::add_common_info;
use super::ExceptionHandler;
use crate::context::ExceptionContext;
use crate::errors::{ApiError, ApiErrorResponse, ErrorCode, HandlerError};
use crate::failure::Failure;
use crate::translation::VALIDATION_FAILED;

/// Status used for every validation failure
pub const VALIDATION_STATUS: u16 = 422;

/// Renders validation failures, one error entry per violation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationHandler;

impl ValidationHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ExceptionHandler for ValidationHandler {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn supports(&self, ctx: &ExceptionContext) -> bool {
        matches!(ctx.failure(), Failure::Validation(_))
    }

    fn handle<'a>(
        &self,
        ctx: &'a mut ExceptionContext,
    ) -> Result<&'a ApiErrorResponse, HandlerError> {
        let violations = match ctx.failure() {
            Failure::Validation(violations) => violations.clone(),
            other => {
                return Err(HandlerError::Unhandled {
                    kind: other.kind().to_string(),
                })
            }
        };

        ctx.response_mut().status_error();
        add_common_info(ctx);

        debug!(
            request_id = %ctx.request_id(),
            violations = violations.len(),
            "Rendering validation failure"
        );

        let entries: Vec<ApiError> = if violations.is_empty() {
            let message = ctx.translator().trans(VALIDATION_FAILED, ctx.locale())?;
            vec![ApiError::new(message, VALIDATION_STATUS)]
        } else {
            violations
                .into_iter()
                .map(|violation| match violation.field {
                    Some(field) => ApiError::with_details(
                        violation.message,
                        VALIDATION_STATUS,
                        json!({ "field": field }),
                    ),
                    None => ApiError::new(violation.message, VALIDATION_STATUS),
                })
                .map(|entry| entry.with_label(ErrorCode::ValidationError))
                .collect()
        };

        let response = ctx.response_mut().status_error();
        for entry in entries {
            response.add_error(entry);
        }
        Ok(ctx.response().response())
    }
}
