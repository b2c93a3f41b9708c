//! HTTP REST API interfaces
//!
//! - `common`: Response envelope and error-to-status mapping
//! - `modules`: Route handlers and middleware grouped by resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
