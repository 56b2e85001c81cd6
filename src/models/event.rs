//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::EventHubError;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub country: String,
    pub capacity: i32,
    pub price: f64,
    pub cover_image: Option<i64>,
    pub organizer_id: i64,
    pub registration_count: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.registration_count >= self.capacity
    }

    pub fn available_spots(&self) -> i32 {
        (self.capacity - self.registration_count).max(0)
    }

    pub fn is_past(&self) -> bool {
        Utc::now() > self.end_date
    }

    pub fn is_published(&self) -> bool {
        self.status == EventStatus::Published.as_str()
    }
}

/// Event augmented with live-computed registration data, returned by the
/// single-event read path.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub is_full: bool,
    pub available_spots: i32,
    pub is_past: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_registered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub capacity: i32,
    pub price: Option<f64>,
    pub cover_image: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// Explicit partial update. Protected fields (id, organizer, registration
/// count) are not representable here, so a patch can never touch them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub capacity: Option<i32>,
    pub price: Option<f64>,
    pub cover_image: Option<i64>,
    pub tags: Option<Vec<String>>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
            && self.capacity.is_none()
            && self.price.is_none()
            && self.cover_image.is_none()
            && self.tags.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Conference,
    Workshop,
    Concert,
    Sport,
    Networking,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Conference => "conference",
            EventCategory::Workshop => "workshop",
            EventCategory::Concert => "concert",
            EventCategory::Sport => "sport",
            EventCategory::Networking => "networking",
            EventCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for EventCategory {
    type Err = EventHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conference" => Ok(EventCategory::Conference),
            "workshop" => Ok(EventCategory::Workshop),
            "concert" => Ok(EventCategory::Concert),
            "sport" => Ok(EventCategory::Sport),
            "networking" => Ok(EventCategory::Networking),
            "other" => Ok(EventCategory::Other),
            other => Err(EventHubError::InvalidInput(format!(
                "Unknown category: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }

    /// Allowed lifecycle moves. Cancelled and completed are terminal;
    /// writing the current status back is accepted as a no-op.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (EventStatus::Draft, EventStatus::Published)
                | (EventStatus::Published, EventStatus::Cancelled)
                | (EventStatus::Published, EventStatus::Completed)
        )
    }
}

impl std::str::FromStr for EventStatus {
    type Err = EventHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "published" => Ok(EventStatus::Published),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            other => Err(EventHubError::InvalidInput(format!(
                "Unknown status: {other}"
            ))),
        }
    }
}
