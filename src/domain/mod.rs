//! Core directory entities and the record store port.

pub mod user;

pub use user::{RecordStore, Slice, User};

pub use crate::shared::{DomainError, DomainResult};
