//! User model and caller identity
//!
//! Credential verification lives outside this crate; the core only needs a
//! user id and a role, passed in per request as a [`Caller`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::EventHubError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = EventHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(EventHubError::InvalidInput(format!(
                "Unknown role: {other}"
            ))),
        }
    }
}

/// Identity of the caller of a core operation, as supplied by the
/// authentication collaborator. The core trusts this value as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated { user_id: i64, role: UserRole },
}

impl Caller {
    pub fn user(user_id: i64) -> Self {
        Caller::Authenticated {
            user_id,
            role: UserRole::User,
        }
    }

    pub fn admin(user_id: i64) -> Self {
        Caller::Authenticated {
            user_id,
            role: UserRole::Admin,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated { user_id, .. } => Some(*user_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Caller::Authenticated {
                role: UserRole::Admin,
                ..
            }
        )
    }

    /// Whether this caller may mutate an event owned by `organizer_id`
    pub fn can_manage(&self, organizer_id: i64) -> bool {
        self.is_admin() || self.user_id() == Some(organizer_id)
    }
}
