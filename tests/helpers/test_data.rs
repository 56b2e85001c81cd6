//! Test fixture builders

use chrono::{Duration, Utc};
use uuid::Uuid;
use EventHub::models::event::CreateEventRequest;
use EventHub::models::user::User;

use super::database_helper::TestDatabase;

/// Insert a user with a unique email and the given role
pub async fn create_user(db: &TestDatabase, first_name: &str, role: &str) -> anyhow::Result<User> {
    let repo = EventHub::database::UserRepository::new(db.pool.clone());
    let email = format!("{}-{}@example.com", first_name.to_lowercase(), Uuid::new_v4());
    let user = repo.create(&email, first_name, "Tester", role).await?;
    Ok(user)
}

/// A valid event creation request, a week in the future
pub fn event_request(title: &str, status: &str, capacity: i32) -> CreateEventRequest {
    let start = Utc::now() + Duration::days(7);
    CreateEventRequest {
        title: title.to_string(),
        description: format!("{title} description"),
        category: "networking".to_string(),
        status: Some(status.to_string()),
        start_date: start,
        end_date: start + Duration::hours(3),
        address: "1 rue de la Paix".to_string(),
        city: "Paris".to_string(),
        postal_code: Some("75002".to_string()),
        country: None,
        capacity,
        price: Some(0.0),
        cover_image: None,
        tags: Some(vec!["test".to_string()]),
    }
}
