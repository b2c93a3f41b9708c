//! User directory listing use case

pub mod navigation;
pub mod projection;
pub mod service;

pub use navigation::{NavControl, Navigation, PageLink};
pub use projection::{assemble, PublicProjection, ResponsePayload, DEFAULT_PUBLIC_FIELDS};
pub use service::{DirectoryPage, DirectoryService, DEFAULT_STORE_TIMEOUT};
