//! Event repository implementation
//!
//! Point lookups, the filtered/paginated listing query and the two sanctioned
//! mutators of `registration_count`.

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::filter::{apply_event_filters, push_order_by, EventFilters, SortField};
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::models::Caller;
use crate::utils::errors::EventHubError;

const EVENT_COLUMNS: &str = "id, title, description, category, status, start_date, end_date, \
     address, city, postal_code, country, capacity, price, cover_image, organizer_id, \
     registration_count, tags, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event owned by `organizer_id`
    pub async fn create(
        &self,
        request: CreateEventRequest,
        organizer_id: i64,
    ) -> Result<Event, EventHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, category, status, start_date, end_date,
                                address, city, postal_code, country, capacity, price,
                                cover_image, organizer_id, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.status.unwrap_or_else(|| "draft".to_string()))
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.address)
        .bind(request.city)
        .bind(request.postal_code)
        .bind(request.country.unwrap_or_else(|| "France".to_string()))
        .bind(request.capacity)
        .bind(request.price.unwrap_or(0.0))
        .bind(request.cover_image)
        .bind(organizer_id)
        .bind(request.tags.unwrap_or_default())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Apply a partial update. Fields absent from the patch keep their
    /// current value; organizer and registration count are not updatable.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event, EventHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                status = COALESCE($5, status),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                address = COALESCE($8, address),
                city = COALESCE($9, city),
                postal_code = COALESCE($10, postal_code),
                country = COALESCE($11, country),
                capacity = COALESCE($12, capacity),
                price = COALESCE($13, price),
                cover_image = COALESCE($14, cover_image),
                tags = COALESCE($15, tags),
                updated_at = $16
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.status)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.address)
        .bind(request.city)
        .bind(request.postal_code)
        .bind(request.country)
        .bind(request.capacity)
        .bind(request.price)
        .bind(request.cover_image)
        .bind(request.tags)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List events matching `filters` as visible to `caller`, together with
    /// the total match count. Data and count run with identical conjuncts.
    pub async fn list(
        &self,
        filters: &EventFilters,
        caller: &Caller,
        sort: &[SortField],
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Event>, i64), EventHubError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {EVENT_COLUMNS} FROM events"));
        apply_event_filters(&mut qb, filters, caller);
        push_order_by(&mut qb, sort);
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        apply_event_filters(&mut count_qb, filters, caller);

        let events_query = qb.build_query_as::<Event>();
        let count_query = count_qb.build_query_scalar::<i64>();

        let (events, total) = futures::try_join!(
            events_query.fetch_all(&self.pool),
            count_query.fetch_one(&self.pool),
        )?;

        Ok((events, total))
    }

    /// Claim one spot: increments `registration_count` only while it is
    /// below capacity, in a single statement. Returns `false` when the event
    /// is full. This and [`Self::decrement_registration_count`] are the only
    /// writers of the counter, so two concurrent claims on the last spot
    /// cannot both succeed.
    pub async fn increment_registration_count(&self, id: i64) -> Result<bool, EventHubError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET registration_count = registration_count + 1, updated_at = $2
            WHERE id = $1 AND registration_count < capacity
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Release one spot. Decrementing an already-zero counter is a no-op.
    pub async fn decrement_registration_count(&self, id: i64) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            UPDATE events
            SET registration_count = registration_count - 1, updated_at = $2
            WHERE id = $1 AND registration_count > 0
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
