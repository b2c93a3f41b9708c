//! User aggregate
//!
//! Contains the User entity and the store interface the listing reads through.

pub mod model;
pub mod store;

pub use model::User;
pub use store::{RecordStore, Slice};
