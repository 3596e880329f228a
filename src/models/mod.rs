//! Models Module
//!
//! Request and response DTOs for the governance facade.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
