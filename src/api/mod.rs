//! API Module
//!
//! HTTP handlers and routing for the governance facade. This is the thin
//! orchestration surface: application callers read/write memoized values,
//! check rate limits before sensitive actions, and reach the cache proxy
//! through it.
//!
//! # Endpoints
//! - `PUT /cache/set` - Memoize a value with a TTL
//! - `GET /cache/get/:key` - Retrieve a live value
//! - `DELETE /cache/del/:key` - Remove a key
//! - `DELETE /cache/clear` - Clear the namespace
//! - `GET /cache/size` - Approximate namespace footprint
//! - `POST /limits/:class/check` - Record and decide an attempt
//! - `GET /limits/:class/status/:key` - Read-only limiter status
//! - `DELETE /limits/:class/:key` - Reset a subject's window
//! - `POST /proxy/fetch` - Run a request through the interception policy
//! - `GET /stats` - Aggregated statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
