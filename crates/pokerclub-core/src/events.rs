//! Event CRUD at the service boundary.
//!
//! Lifecycle fields (`state`, `rebuys`) are not editable here; see
//! [`crate::lifecycle`].

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use pokerclub_db::{EventStore, SemesterStore};
use pokerclub_types::{Event, EventId, EventUpdate, NewEvent, SemesterId};

use crate::error::ServiceError;
use crate::lifecycle::lock_event;
use crate::tx::finish;

/// Create, read, list, and update events.
pub struct EventService<'p> {
    pool: &'p PgPool,
}

impl<'p> EventService<'p> {
    /// Create an event service over a connection pool.
    pub const fn new(pool: &'p PgPool) -> Self {
        Self { pool }
    }

    /// Create an event in the [`pokerclub_types::EventState::Started`] state
    /// with zero rebuys.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidRequest`] for a blank name or a negative
    ///   multiplier.
    /// - [`ServiceError::NotFound`] if the semester does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn create_event(&self, new: &NewEvent) -> Result<Event, ServiceError> {
        validate_name(&new.name)?;
        validate_multiplier(new.points_multiplier)?;

        let mut conn = self.pool.acquire().await?;
        ensure_semester(&mut conn, new.semester_id).await?;
        let event = EventStore::new(&mut conn)
            .insert(EventId::new(), new)
            .await?;

        tracing::info!(event_id = %event.id, semester_id = %event.semester_id, "Event created");
        Ok(event)
    }

    /// Fetch one event.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the event does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn get_event(&self, event_id: EventId) -> Result<Event, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        EventStore::new(&mut conn)
            .get(event_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("event", event_id))
    }

    /// List a semester's events, most recent start first.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the semester does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn list_events(&self, semester_id: SemesterId) -> Result<Vec<Event>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        ensure_semester(&mut conn, semester_id).await?;
        Ok(EventStore::new(&mut conn)
            .list_by_semester(semester_id)
            .await?)
    }

    /// Apply a partial update to an event's descriptive fields.
    ///
    /// The multiplier of an ended event is frozen: undoing the end recomputes
    /// the awards from it.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidRequest`] for a blank name or a negative
    ///   multiplier.
    /// - [`ServiceError::NotFound`] if the event does not exist.
    /// - [`ServiceError::Forbidden`] when changing the multiplier of an
    ///   ended event.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn update_event(
        &self,
        event_id: EventId,
        update: &EventUpdate,
    ) -> Result<Event, ServiceError> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        if let Some(multiplier) = update.points_multiplier {
            validate_multiplier(multiplier)?;
        }

        let mut tx = self.pool.begin().await?;
        let result = update_in_tx(&mut tx, event_id, update).await;
        let event = finish(tx, "update_event", result).await?;

        tracing::info!(event_id = %event_id, "Event updated");
        Ok(event)
    }
}

async fn update_in_tx(
    conn: &mut PgConnection,
    event_id: EventId,
    update: &EventUpdate,
) -> Result<Event, ServiceError> {
    let current = lock_event(conn, event_id).await?;
    let multiplier_changes = update
        .points_multiplier
        .is_some_and(|m| m != current.points_multiplier);
    if current.state.is_ended() && multiplier_changes {
        return Err(ServiceError::Forbidden(format!(
            "event {event_id} has ended; its points multiplier is frozen"
        )));
    }

    EventStore::new(conn)
        .update(event_id, update)
        .await?
        .ok_or_else(|| ServiceError::not_found("event", event_id))
}

async fn ensure_semester(
    conn: &mut PgConnection,
    semester_id: SemesterId,
) -> Result<(), ServiceError> {
    SemesterStore::new(conn)
        .get(semester_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("semester", semester_id))
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidRequest(
            "event name must not be blank".to_owned(),
        ));
    }
    Ok(())
}

fn validate_multiplier(multiplier: Decimal) -> Result<(), ServiceError> {
    if multiplier.is_sign_negative() && !multiplier.is_zero() {
        return Err(ServiceError::InvalidRequest(format!(
            "points multiplier must not be negative, got {multiplier}"
        )));
    }
    Ok(())
}
