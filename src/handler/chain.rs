use tracing::{debug, warn};

use super::{DefaultHandler, ExceptionHandler, ValidationHandler};
use crate::context::ExceptionContext;
use crate::errors::{ApiErrorResponse, HandlerError};
use crate::metrics::{ERRORS_HANDLED_TOTAL, ERRORS_UNHANDLED_TOTAL};

/// Ordered list of handlers; the first one that supports a failure renders it
pub struct HandlerChain {
    handlers: Vec<Box<dyn ExceptionHandler>>,
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl HandlerChain {
    /// Chain without any handler
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Validation first, then the catch-all default handler
    pub fn standard() -> Self {
        Self::empty()
            .with_handler(ValidationHandler::new())
            .with_handler(DefaultHandler::new())
    }

    /// Append a handler; it is tried after the ones already registered
    pub fn with_handler(mut self, handler: impl ExceptionHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Insert a handler ahead of every registered one
    pub fn with_priority_handler(mut self, handler: impl ExceptionHandler + 'static) -> Self {
        self.handlers.insert(0, Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// First handler supporting the context's failure
    pub fn find(&self, ctx: &ExceptionContext) -> Option<&dyn ExceptionHandler> {
        self.handlers
            .iter()
            .map(|handler| handler.as_ref())
            .find(|handler| handler.supports(ctx))
    }

    /// Render the context's failure with the first matching handler
    pub fn dispatch(&self, mut ctx: ExceptionContext) -> Result<ApiErrorResponse, HandlerError> {
        let Some(handler) = self.find(&ctx) else {
            let kind = ctx.failure().kind().to_string();
            warn!(
                request_id = %ctx.request_id(),
                kind = %kind,
                "No exception handler supports failure"
            );
            ERRORS_UNHANDLED_TOTAL.inc();
            return Err(HandlerError::Unhandled { kind });
        };

        let status = handler.handle(&mut ctx)?.http_status();

        debug!(
            request_id = %ctx.request_id(),
            handler = handler.name(),
            status = status,
            "Failure rendered"
        );
        let status_label = status.to_string();
        ERRORS_HANDLED_TOTAL
            .with_label_values(&[handler.name(), status_label.as_str()])
            .inc();

        Ok(ctx.into_response().into_inner())
    }
}
