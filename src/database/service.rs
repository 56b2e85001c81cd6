//! Database service layer
//!
//! Aggregates the repositories over one shared pool.

use crate::database::{
    DatabasePool, EventRepository, FileRepository, RegistrationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub users: UserRepository,
    pub files: FileRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }
}
