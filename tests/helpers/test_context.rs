//! Full test context: database plus wired services

use EventHub::config::Settings;
use EventHub::database::DatabaseService;
use EventHub::services::{EventService, RegistrationService, ServiceFactory};

use super::database_helper::TestDatabase;

/// Everything an integration test needs: a migrated database, the service
/// factory and a temporary upload directory standing in for file storage.
pub struct TestContext {
    pub db: TestDatabase,
    pub repos: DatabaseService,
    pub events: EventService,
    pub registrations: RegistrationService,
    pub upload_dir: tempfile::TempDir,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let db = TestDatabase::new().await?;
        let upload_dir = tempfile::tempdir()?;

        let mut settings = Settings::default();
        settings.storage.upload_dir = upload_dir.path().to_string_lossy().into_owned();

        let repos = DatabaseService::new(db.pool.clone());
        let factory = ServiceFactory::new(db.pool.clone(), settings);

        Ok(Self {
            db,
            repos,
            events: factory.event_service,
            registrations: factory.registration_service,
            upload_dir,
        })
    }
}
