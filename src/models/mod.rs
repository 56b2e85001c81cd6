//! Data models
//!
//! Row types, request/patch types and enums shared by the repositories and
//! services.

pub mod event;
pub mod file;
pub mod pagination;
pub mod registration;
pub mod user;

pub use event::{
    CreateEventRequest, Event, EventCategory, EventDetails, EventStatus, UpdateEventRequest,
};
pub use file::StoredFile;
pub use pagination::{Page, PageInfo};
pub use registration::{Registration, RegistrationStatus};
pub use user::{Caller, User, UserRole};
