//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the layer is up.
//!
//! # Tasks
//! - Sweep: purges expired TTL entries and stale rate windows at
//!   configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
