pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod learn;
pub mod middleware;
pub mod rest;
pub mod routes;
pub mod state;

pub use middleware::require_auth;
pub use routes::router;

use axum::http::StatusCode;
use marketplace_core::ports::PortError;
use tracing::debug;

/// Maps a port error onto the status/message pair every handler returns.
pub(crate) fn port_error(e: PortError, context: &str) -> (StatusCode, String) {
    debug!("{}: {}", context, e);
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
    }
}
