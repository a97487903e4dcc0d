//! HTTP adapter - axum routes, handlers, and DTOs.

mod dto;
mod handlers;
mod routes;

pub use handlers::{ApiError, AppState, AuthenticatedUser};
pub use routes::api_router;
