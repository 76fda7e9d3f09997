//! Web layer for the transit map server.
//!
//! Provides the JSON API consumed by the browser map client.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
