//! # User Directory
//!
//! Paginated, read-only listing of user records, served as an HTML table
//! with page navigation and as a JSON API.
//!
//! ## Architecture
//!
//! - **shared**: pagination math, the visible page window, errors, shutdown
//! - **domain**: the `User` record and the `RecordStore` port
//! - **application**: `DirectoryService`, public-field projection, navigation
//! - **infrastructure**: SQLite repository (SeaORM) and an in-memory store
//! - **interfaces**: the JSON API (`/users`) and the HTML page (`/`)
//! - **server**: startup, migrations, seeding and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{DirectoryPage, DirectoryService, PublicProjection, ResponsePayload};
pub use domain::{RecordStore, Slice, User};
pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserStore, UserRepository};
pub use interfaces::http::create_api_router;
pub use server::{init_tracing, ServerHandle, ServerOptions};
pub use shared::{build_window, PageRequest, PaginationPolicy, PaginationView};
