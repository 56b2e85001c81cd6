//! Registration state machine
//!
//! Per (user, event) pair the states are: no row, confirmed, cancelled.
//! Register and unregister flip the status of a single reused row; the
//! event's `registration_count` is only ever touched through the conditional
//! increment/decrement on the event repository, so the capacity check and
//! the counter write are one indivisible step even under concurrent calls.

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::database::filter::clamp_pagination;
use crate::database::repositories::{EventRepository, RegistrationRepository};
use crate::models::registration::Registration;
use crate::models::{Page, PageInfo, UserRole};
use crate::utils::errors::{EventHubError, Result};

/// Registration service for attendee state transitions
#[derive(Debug, Clone)]
pub struct RegistrationService {
    registrations: RegistrationRepository,
    events: EventRepository,
    settings: Settings,
}

impl RegistrationService {
    pub fn new(
        registrations: RegistrationRepository,
        events: EventRepository,
        settings: Settings,
    ) -> Self {
        Self {
            registrations,
            events,
            settings,
        }
    }

    /// Register `user_id` for a published event. The caller's role arrives
    /// as a parameter; admins are rejected by policy.
    pub async fn register(
        &self,
        event_id: i64,
        user_id: i64,
        role: UserRole,
    ) -> Result<Registration> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        // Unpublished events are invisible to registrants.
        if !event.is_published() {
            return Err(EventHubError::EventNotFound { event_id });
        }

        if role == UserRole::Admin {
            return Err(EventHubError::Forbidden(
                "Administrators cannot register as attendees".to_string(),
            ));
        }

        match self.registrations.find_by_pair(event_id, user_id).await? {
            Some(existing) if existing.is_confirmed() => {
                debug!(event_id = event_id, user_id = user_id, "Duplicate registration attempt");
                Err(EventHubError::AlreadyRegistered { event_id })
            }
            Some(existing) => {
                // Cancelled (or pending) row: claim a spot first, then
                // reactivate the same row. The flip is conditional, so a
                // concurrent register of the same pair confirms exactly once.
                self.claim_spot(event_id).await?;
                match self.registrations.confirm(existing.id).await? {
                    Some(registration) => {
                        info!(
                            event_id = event_id,
                            user_id = user_id,
                            registration_id = registration.id,
                            "Registration reactivated"
                        );
                        Ok(registration)
                    }
                    None => {
                        // A concurrent call confirmed the row between our
                        // read and the flip; release the spot we claimed.
                        if let Err(rollback) =
                            self.events.decrement_registration_count(event_id).await
                        {
                            warn!(
                                event_id = event_id,
                                error = %rollback,
                                "Failed to release spot after registration failure"
                            );
                        }
                        Err(EventHubError::AlreadyRegistered { event_id })
                    }
                }
            }
            None => {
                self.claim_spot(event_id).await?;
                match self.registrations.create(event_id, user_id).await {
                    Ok(registration) => {
                        info!(
                            event_id = event_id,
                            user_id = user_id,
                            registration_id = registration.id,
                            "Registration confirmed"
                        );
                        Ok(registration)
                    }
                    Err(err) => {
                        // The insert failed after the spot was claimed; give
                        // it back before surfacing the error.
                        if let Err(rollback) =
                            self.events.decrement_registration_count(event_id).await
                        {
                            warn!(
                                event_id = event_id,
                                error = %rollback,
                                "Failed to release spot after registration failure"
                            );
                        }
                        if is_unique_violation(&err) {
                            // Lost a same-pair race to a concurrent register.
                            Err(EventHubError::AlreadyRegistered { event_id })
                        } else {
                            Err(err)
                        }
                    }
                }
            }
        }
    }

    /// Cancel a confirmed registration. The row is kept and flipped to
    /// cancelled; the spot is released with a floored decrement.
    pub async fn unregister(&self, event_id: i64, user_id: i64) -> Result<()> {
        let registration = self
            .registrations
            .find_confirmed(event_id, user_id)
            .await?
            .ok_or(EventHubError::NotRegistered { event_id })?;

        // Conditional flip: if a concurrent unregister already cancelled the
        // row, it also released the spot, so we must not decrement again.
        if !self.registrations.cancel(registration.id).await? {
            return Err(EventHubError::NotRegistered { event_id });
        }
        self.events.decrement_registration_count(event_id).await?;

        info!(
            event_id = event_id,
            user_id = user_id,
            registration_id = registration.id,
            "Registration cancelled"
        );

        Ok(())
    }

    /// List a user's confirmed registrations, newest first
    pub async fn list_user_registrations(
        &self,
        user_id: i64,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<Registration>> {
        let (page, limit) = clamp_pagination(page, limit, &self.settings.pagination);

        let (registrations, total) = futures::try_join!(
            self.registrations
                .list_confirmed_by_user(user_id, limit, (page - 1) * limit),
            self.registrations.count_confirmed_by_user(user_id),
        )?;

        Ok(Page {
            data: registrations,
            pagination: PageInfo::new(page, limit, total),
        })
    }

    /// Claim one spot via the conditional counter increment; a report of no
    /// matched row means the event is full.
    async fn claim_spot(&self, event_id: i64) -> Result<()> {
        if self.events.increment_registration_count(event_id).await? {
            Ok(())
        } else {
            debug!(event_id = event_id, "Registration rejected, event full");
            Err(EventHubError::EventFull { event_id })
        }
    }
}

fn is_unique_violation(err: &EventHubError) -> bool {
    matches!(
        err,
        EventHubError::Database(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}
