//! Reference bookmark service
//!
//! In-memory HTTP backend speaking the API `HttpBookmarkStore` consumes.
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
