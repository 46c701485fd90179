//! Exception handlers: turn a failed request into an [`ApiErrorResponse`].
//!
//! Handlers are tried in order by a [`HandlerChain`]; the first one whose
//! [`ExceptionHandler::supports`] returns true renders the response.

pub mod chain;
pub mod common;
pub mod default;
pub mod validation;

pub use chain::HandlerChain;
pub use default::DefaultHandler;
pub use validation::ValidationHandler;

use crate::context::ExceptionContext;
use crate::errors::{ApiErrorResponse, HandlerError};

pub trait ExceptionHandler: Send + Sync {
    /// Label used in logs and metrics
    fn name(&self) -> &'static str;

    /// Whether this handler can render the context's failure
    fn supports(&self, ctx: &ExceptionContext) -> bool;

    /// Populate the context's response and return it.
    ///
    /// Only called after `supports` returned true for the same context.
    fn handle<'a>(
        &self,
        ctx: &'a mut ExceptionContext,
    ) -> Result<&'a ApiErrorResponse, HandlerError>;
}
