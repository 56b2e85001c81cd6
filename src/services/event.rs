//! Event lifecycle service
//!
//! Create/read/list/update/delete with ownership and visibility enforcement.
//! Non-published events are invisible to outsiders and surface as not-found
//! rather than forbidden, so their existence never leaks.

use tracing::{debug, info};

use crate::config::Settings;
use crate::database::filter::{clamp_pagination, parse_sort, ListParams};
use crate::database::repositories::{EventRepository, FileRepository, RegistrationRepository};
use crate::models::event::{
    CreateEventRequest, Event, EventCategory, EventDetails, EventStatus, UpdateEventRequest,
    MAX_TAGS, MAX_TAG_LENGTH,
};
use crate::models::{Caller, Page, PageInfo, Registration};
use crate::services::storage::FileStorage;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::logging::log_cleanup_failure;

/// Event service for lifecycle operations
#[derive(Debug, Clone)]
pub struct EventService {
    events: EventRepository,
    registrations: RegistrationRepository,
    files: FileRepository,
    storage: FileStorage,
    settings: Settings,
}

impl EventService {
    pub fn new(
        events: EventRepository,
        registrations: RegistrationRepository,
        files: FileRepository,
        storage: FileStorage,
        settings: Settings,
    ) -> Self {
        Self {
            events,
            registrations,
            files,
            storage,
            settings,
        }
    }

    /// Create a new event with the caller as organizer. Status defaults to
    /// draft.
    pub async fn create(
        &self,
        request: CreateEventRequest,
        organizer_id: i64,
    ) -> Result<Event> {
        validate_create(&request)?;

        let event = self.events.create(request, organizer_id).await?;
        info!(
            event_id = event.id,
            organizer_id = organizer_id,
            status = %event.status,
            "Event created"
        );

        Ok(event)
    }

    /// Fetch a single event as seen by `caller`, augmented with the live
    /// confirmed-registration count and the caller's own registration state.
    pub async fn find_by_id(&self, event_id: i64, caller: &Caller) -> Result<EventDetails> {
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        // Draft/cancelled/completed events exist only for their organizer
        // and admins; everyone else gets not-found, not forbidden.
        if !event.is_published() && !caller.can_manage(event.organizer_id) {
            return Err(EventHubError::EventNotFound { event_id });
        }

        let live_count = self.registrations.count_confirmed(event_id).await?;
        event.registration_count = live_count as i32;

        let (is_registered, registration_status) = match caller.user_id() {
            Some(user_id) => {
                let registration = self.registrations.find_confirmed(event_id, user_id).await?;
                (
                    Some(registration.is_some()),
                    registration.map(|r| r.status),
                )
            }
            None => (None, None),
        };

        Ok(EventDetails {
            is_full: event.is_full(),
            available_spots: event.available_spots(),
            is_past: event.is_past(),
            event,
            is_registered,
            registration_status,
        })
    }

    /// List events visible to `caller`, filtered, sorted and paginated
    pub async fn list(&self, params: ListParams, caller: &Caller) -> Result<Page<Event>> {
        let (page, limit) = clamp_pagination(params.page, params.limit, &self.settings.pagination);
        let sort = parse_sort(params.sort.as_deref());

        debug!(page = page, limit = limit, "Listing events");
        let (events, total) = self
            .events
            .list(&params.filters, caller, &sort, limit, (page - 1) * limit)
            .await?;

        Ok(Page {
            data: events,
            pagination: PageInfo::new(page, limit, total),
        })
    }

    /// List every event an organizer owns, drafts included
    pub async fn list_by_organizer(
        &self,
        organizer_id: i64,
        mut params: ListParams,
    ) -> Result<Page<Event>> {
        params.filters.organizer = Some(organizer_id);
        self.list(params, &Caller::user(organizer_id)).await
    }

    /// Apply a partial update. Only the organizer or an admin may update;
    /// status changes must follow the lifecycle transition table.
    pub async fn update(
        &self,
        event_id: i64,
        patch: UpdateEventRequest,
        caller: &Caller,
    ) -> Result<Event> {
        if patch.is_empty() {
            return Err(EventHubError::InvalidInput(
                "At least one field is required".to_string(),
            ));
        }
        validate_patch(&patch)?;

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        if !caller.can_manage(event.organizer_id) {
            return Err(EventHubError::Forbidden(
                "Only the organizer or an admin can update this event".to_string(),
            ));
        }

        if let Some(next) = &patch.status {
            let from: EventStatus = event.status.parse()?;
            let to: EventStatus = next.parse()?;
            if !from.can_transition_to(to) {
                return Err(EventHubError::InvalidStateTransition {
                    from: from.as_str().to_string(),
                    to: to.as_str().to_string(),
                });
            }
        }

        // Dates are validated on the values the row will end up with.
        let start = patch.start_date.unwrap_or(event.start_date);
        let end = patch.end_date.unwrap_or(event.end_date);
        if end <= start {
            return Err(EventHubError::InvalidInput(
                "End date must be after start date".to_string(),
            ));
        }

        if let Some(capacity) = patch.capacity {
            if capacity < event.registration_count {
                return Err(EventHubError::InvalidInput(format!(
                    "Capacity cannot drop below the current registration count ({})",
                    event.registration_count
                )));
            }
        }

        let updated = self.events.update(event_id, patch).await?;
        info!(event_id = event_id, "Event updated");

        Ok(updated)
    }

    /// Delete an event and cascade: cover file (best-effort), registrations,
    /// then the event row itself.
    pub async fn delete(&self, event_id: i64, caller: &Caller) -> Result<()> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        if !caller.can_manage(event.organizer_id) {
            return Err(EventHubError::Forbidden(
                "Only the organizer or an admin can delete this event".to_string(),
            ));
        }

        if let Some(file_id) = event.cover_image {
            self.remove_cover_file(event_id, file_id).await;
        }

        let removed = self.registrations.delete_by_event(event_id).await?;
        self.events.delete(event_id).await?;

        info!(
            event_id = event_id,
            registrations_removed = removed,
            "Event deleted"
        );

        Ok(())
    }

    /// List registrations of an event. Restricted to the organizer and
    /// admins, newest first.
    pub async fn registrations(
        &self,
        event_id: i64,
        caller: &Caller,
    ) -> Result<Vec<Registration>> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        if !caller.can_manage(event.organizer_id) {
            return Err(EventHubError::Forbidden(
                "Only the organizer or an admin can view registrations".to_string(),
            ));
        }

        self.registrations.list_by_event(event_id).await
    }

    /// Cover-file cleanup is best-effort: a failure is logged and never
    /// fails the deletion.
    async fn remove_cover_file(&self, event_id: i64, file_id: i64) {
        match self.files.find_by_id(file_id).await {
            Ok(Some(file)) => {
                if let Err(err) = self.storage.remove(&file.filename).await {
                    log_cleanup_failure(event_id, &file.filename, &err.to_string());
                }
                if let Err(err) = self.files.delete(file.id).await {
                    log_cleanup_failure(event_id, &file.filename, &err.to_string());
                }
            }
            Ok(None) => {}
            Err(err) => log_cleanup_failure(event_id, "cover image", &err.to_string()),
        }
    }
}

fn validate_create(request: &CreateEventRequest) -> Result<()> {
    if request.title.trim().is_empty() {
        return Err(EventHubError::InvalidInput("Title is required".to_string()));
    }
    validate_lengths(&request.title, &request.description)?;
    if request.description.trim().is_empty() {
        return Err(EventHubError::InvalidInput(
            "Description is required".to_string(),
        ));
    }
    if request.address.trim().is_empty() || request.city.trim().is_empty() {
        return Err(EventHubError::InvalidInput(
            "Address and city are required".to_string(),
        ));
    }

    request.category.parse::<EventCategory>()?;
    if let Some(status) = &request.status {
        status.parse::<EventStatus>()?;
    }

    if request.end_date <= request.start_date {
        return Err(EventHubError::InvalidInput(
            "End date must be after start date".to_string(),
        ));
    }
    if request.capacity < 1 {
        return Err(EventHubError::InvalidInput(
            "Capacity must be at least 1".to_string(),
        ));
    }
    if request.price.is_some_and(|p| p < 0.0) {
        return Err(EventHubError::InvalidInput(
            "Price cannot be negative".to_string(),
        ));
    }

    if let Some(tags) = &request.tags {
        validate_tags(tags)?;
    }

    Ok(())
}

fn validate_patch(patch: &UpdateEventRequest) -> Result<()> {
    if let Some(category) = &patch.category {
        category.parse::<EventCategory>()?;
    }
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(EventHubError::InvalidInput(
            "Title cannot be empty".to_string(),
        ));
    }
    validate_lengths(
        patch.title.as_deref().unwrap_or(""),
        patch.description.as_deref().unwrap_or(""),
    )?;
    if patch.capacity.is_some_and(|c| c < 1) {
        return Err(EventHubError::InvalidInput(
            "Capacity must be at least 1".to_string(),
        ));
    }
    if patch.price.is_some_and(|p| p < 0.0) {
        return Err(EventHubError::InvalidInput(
            "Price cannot be negative".to_string(),
        ));
    }
    if let Some(tags) = &patch.tags {
        validate_tags(tags)?;
    }

    Ok(())
}

fn validate_lengths(title: &str, description: &str) -> Result<()> {
    if title.chars().count() > 200 {
        return Err(EventHubError::InvalidInput(
            "Title cannot exceed 200 characters".to_string(),
        ));
    }
    if description.chars().count() > 5000 {
        return Err(EventHubError::InvalidInput(
            "Description cannot exceed 5000 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(EventHubError::InvalidInput(format!(
            "At most {MAX_TAGS} tags are allowed"
        )));
    }
    if tags.iter().any(|t| t.len() > MAX_TAG_LENGTH) {
        return Err(EventHubError::InvalidInput(format!(
            "Tags cannot exceed {MAX_TAG_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    fn valid_request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Rust Meetup".to_string(),
            description: "Monthly community meetup".to_string(),
            category: "networking".to_string(),
            status: Some("published".to_string()),
            start_date: Utc::now() + Duration::days(7),
            end_date: Utc::now() + Duration::days(7) + Duration::hours(3),
            address: "1 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: None,
            country: None,
            capacity: 50,
            price: Some(0.0),
            cover_image: None,
            tags: Some(vec!["rust".to_string(), "meetup".to_string()]),
        }
    }

    #[test]
    fn accepts_valid_create_request() {
        assert!(validate_create(&valid_request()).is_ok());
    }

    #[test]
    fn rejects_inverted_dates() {
        let mut request = valid_request();
        request.end_date = request.start_date - Duration::hours(1);
        assert_matches!(
            validate_create(&request),
            Err(EventHubError::InvalidInput(_))
        );
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut request = valid_request();
        request.capacity = 0;
        assert_matches!(
            validate_create(&request),
            Err(EventHubError::InvalidInput(_))
        );
    }

    #[test]
    fn rejects_unknown_category() {
        let mut request = valid_request();
        request.category = "rave".to_string();
        assert_matches!(
            validate_create(&request),
            Err(EventHubError::InvalidInput(_))
        );
    }

    #[test]
    fn rejects_too_many_tags() {
        let mut request = valid_request();
        request.tags = Some((0..11).map(|i| format!("tag{i}")).collect());
        assert_matches!(
            validate_create(&request),
            Err(EventHubError::InvalidInput(_))
        );
    }

    #[test]
    fn rejects_overlong_title() {
        let mut request = valid_request();
        request.title = "x".repeat(201);
        assert_matches!(
            validate_create(&request),
            Err(EventHubError::InvalidInput(_))
        );
    }

    #[test]
    fn rejects_negative_price_in_patch() {
        let patch = UpdateEventRequest {
            price: Some(-1.0),
            ..Default::default()
        };
        assert_matches!(validate_patch(&patch), Err(EventHubError::InvalidInput(_)));
    }
}
