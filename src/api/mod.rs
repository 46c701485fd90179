pub mod failure;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use failure::ApiFailure;
