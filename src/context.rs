use serde_json::{json, Value};
use std::sync::Arc;

use crate::errors::ResponseBuilder;
use crate::failure::{AppError, Failure};
use crate::translation::Translator;

/// Everything a handler needs to render one failed request.
///
/// Built once per failed request; handlers only borrow it.
pub struct ExceptionContext {
    failure: Failure,
    response: ResponseBuilder,
    dev: bool,
    translator: Arc<dyn Translator>,
    locale: String,
    request_id: String,
    instance_id: Option<String>,
}

impl ExceptionContext {
    pub fn new(failure: Failure, dev: bool, translator: Arc<dyn Translator>) -> Self {
        Self {
            failure,
            response: ResponseBuilder::new(),
            dev,
            translator,
            locale: "en".to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            instance_id: None,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Start from an existing response instead of an empty one
    pub fn with_response(mut self, response: ResponseBuilder) -> Self {
        self.response = response;
        self
    }

    pub fn failure(&self) -> &Failure {
        &self.failure
    }

    pub fn response(&self) -> &ResponseBuilder {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseBuilder {
        &mut self.response
    }

    pub fn is_dev(&self) -> bool {
        self.dev
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// Extra diagnostics for an error; empty outside development mode
    pub fn diagnostics(&self, error: &dyn AppError) -> Option<Value> {
        if !self.dev {
            return None;
        }

        let mut sources = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            sources.push(cause.to_string());
            source = cause.source();
        }

        let mut diagnostics = json!({
            "kind": error.kind(),
            "code": error.code(),
        });
        if !sources.is_empty() {
            diagnostics["sources"] = json!(sources);
        }
        if let Some(extra) = error.diagnostics() {
            diagnostics["extra"] = extra;
        }
        Some(diagnostics)
    }

    pub fn into_response(self) -> ResponseBuilder {
        self.response
    }
}
