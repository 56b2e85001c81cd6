//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod file;
pub mod registration;
pub mod user;

// Re-export repositories
pub use event::EventRepository;
pub use file::FileRepository;
pub use registration::RegistrationRepository;
pub use user::UserRepository;
