//! EventHub backend core
//!
//! Event management backend built around three pieces: the event lifecycle
//! (create/list/view/update/delete with ownership and visibility rules), the
//! registration state machine (register/unregister with capacity accounting),
//! and the query filter builder that turns search parameters into SQL while
//! keeping role-based visibility intact.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventHubError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
