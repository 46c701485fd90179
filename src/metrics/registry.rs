use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Error handling Metrics
    pub static ref ERRORS_HANDLED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "api_errors_handled_total",
        "Failures rendered into API error responses",
        &["handler", "status"]
    )
    .unwrap();

    pub static ref ERRORS_MASKED_TOTAL: IntCounter = register_int_counter!(
        "api_errors_masked_total",
        "Server errors whose detail was replaced by a generic message"
    )
    .unwrap();

    pub static ref ERRORS_UNHANDLED_TOTAL: IntCounter = register_int_counter!(
        "api_errors_unhandled_total",
        "Failures no exception handler supported"
    )
    .unwrap();

    pub static ref PANICS_TOTAL: IntCounter = register_int_counter!(
        "api_handler_panics_total",
        "Request handlers that panicked"
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&ERRORS_HANDLED_TOTAL);
    lazy_static::initialize(&ERRORS_MASKED_TOTAL);
    lazy_static::initialize(&ERRORS_UNHANDLED_TOTAL);
    lazy_static::initialize(&PANICS_TOTAL);
}
