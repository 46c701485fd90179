use tracing::warn;

/// Status used when a failure carries no usable code
pub const DEFAULT_STATUS: u16 = 500;

/// Highest code accepted as a status (inclusive)
pub const MAX_STATUS: i64 = 599;

/// Resolve the outgoing status from a failure's embedded code.
///
/// Positive codes up to [`MAX_STATUS`] are trusted as-is. Zero and negative
/// codes mean "no status information" and resolve to 500, as do codes past
/// the HTTP status range.
pub fn resolve_status(code: i64) -> u16 {
    if code <= 0 {
        return DEFAULT_STATUS;
    }

    if code > MAX_STATUS {
        warn!(
            code = code,
            fallback = DEFAULT_STATUS,
            "Failure code is outside the HTTP status range"
        );
        return DEFAULT_STATUS;
    }

    code as u16
}

/// Whether a status is server-classified (detail is masked outside development)
pub fn is_server_error(status: u16) -> bool {
    status >= 500
}
