//! Services module
//!
//! This module contains business logic services

pub mod event;
pub mod registration;
pub mod storage;

// Re-export commonly used services
pub use event::EventService;
pub use registration::RegistrationService;
pub use storage::FileStorage;

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService};

/// Service factory for creating and wiring all services. Everything is
/// constructed explicitly from the pool and settings; no process-wide state.
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub registration_service: RegistrationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, settings: Settings) -> Self {
        let db = DatabaseService::new(pool);
        let storage = FileStorage::new(&settings.storage);

        let event_service = EventService::new(
            db.events.clone(),
            db.registrations.clone(),
            db.files.clone(),
            storage,
            settings.clone(),
        );
        let registration_service =
            RegistrationService::new(db.registrations, db.events, settings);

        Self {
            event_service,
            registration_service,
        }
    }
}
