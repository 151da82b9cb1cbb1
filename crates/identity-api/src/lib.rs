//! # identity-api
//!
//! HTTP API layer for the identity service built on Axum.
//!
//! Provides the REST endpoints, bearer token extractors, DTOs, middleware
//! (CORS, request logging) and the mapping from `AppError` to responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
