//! Server-rendered directory page
//!
//! Renders the user table with its page bar, or a single error notice when
//! the listing failed or came back empty.

pub mod handlers;
pub mod render;
pub mod view;

pub use handlers::{directory_page, WebState};
pub use view::{PageModel, TableModel};
