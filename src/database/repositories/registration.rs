//! Registration repository implementation
//!
//! The `(user_id, event_id)` unique index guarantees one row per pair; the
//! write paths here only ever insert the first row or flip its status.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::registration::{Registration, RegistrationStatus};
use crate::utils::errors::EventHubError;

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, status, registered_at";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a confirmed registration for (user, event). Fails with a
    /// unique violation if a row for the pair already exists.
    pub async fn create(&self, event_id: i64, user_id: i64) -> Result<Registration, EventHubError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (event_id, user_id, status, registered_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find the registration for a (user, event) pair, whatever its status
    pub async fn find_by_pair(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<Registration>, EventHubError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find a confirmed registration for a (user, event) pair
    pub async fn find_confirmed(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<Registration>, EventHubError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 AND user_id = $2 AND status = 'confirmed'"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Flip a row to confirmed, unless it already is. Returns `None` when
    /// the row was confirmed before this call, so two concurrent flips of
    /// the same row resolve to exactly one winner.
    pub async fn confirm(&self, id: i64) -> Result<Option<Registration>, EventHubError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations
            SET status = $2
            WHERE id = $1 AND status <> $2
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Flip a confirmed row to cancelled. Returns `false` when the row was
    /// not confirmed, which means a concurrent cancel got there first.
    pub async fn cancel(&self, id: i64) -> Result<bool, EventHubError> {
        let result = sqlx::query(
            "UPDATE registrations SET status = $2 WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(RegistrationStatus::Cancelled.as_str())
        .bind(RegistrationStatus::Confirmed.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// List all registrations for an event, newest first
    pub async fn list_by_event(&self, event_id: i64) -> Result<Vec<Registration>, EventHubError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 ORDER BY registered_at DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Count confirmed registrations for an event
    pub async fn count_confirmed(&self, event_id: i64) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'confirmed'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// List a user's confirmed registrations with pagination, newest first
    pub async fn list_confirmed_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Registration>, EventHubError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE user_id = $1 AND status = 'confirmed' \
             ORDER BY registered_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Count a user's confirmed registrations
    pub async fn count_confirmed_by_user(&self, user_id: i64) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE user_id = $1 AND status = 'confirmed'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Delete all registrations for an event (event deletion cascade)
    pub async fn delete_by_event(&self, event_id: i64) -> Result<u64, EventHubError> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
