//! HTTP server for the browser client
//!
//! - GET /stream - WebSocket upgrade, one relay session per connection
//! - GET /health - Health check
//! - everything else - static client assets

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
