//! Structured error handling for API responses

pub mod codes;
pub mod response;

pub use codes::ErrorCode;
pub use response::{ApiError, ApiErrorResponse, ResponseBuilder, ResponseStatus};

/// Failed to translate a message key
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("no translation for key '{key}' in locale '{locale}'")]
    MissingKey { key: String, locale: String },
}

/// Failed to load a translation catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failed to turn a failure into a response
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("no handler supports failure of kind '{kind}'")]
    Unhandled { kind: String },

    #[error(transparent)]
    Translation(#[from] TranslationError),
}
