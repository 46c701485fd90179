// Library exports for testing
pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod failure;
pub mod handler;
pub mod metrics;
pub mod status;
pub mod translation;
