//! Rate Limiting Module
//!
//! Fixed-window throttling for sensitive operations. Each operation class
//! owns an independent limiter; counters for different classes never
//! interact. State is process-lifetime only, never persisted.

mod limiter;
mod registry;
mod tracker;
mod window;

// Re-export public types
pub use limiter::RateLimiter;
pub use registry::{LimitPolicy, LimiterRegistry};
pub use tracker::KeyTracker;
pub use window::RateWindow;
