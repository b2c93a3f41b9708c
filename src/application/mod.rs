pub mod directory;

pub use directory::{DirectoryPage, DirectoryService, Navigation, PublicProjection, ResponsePayload};
