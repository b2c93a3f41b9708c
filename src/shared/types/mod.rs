pub mod errors;
pub mod page_window;
pub mod pagination;

pub use errors::*;
pub use page_window::*;
pub use pagination::*;
