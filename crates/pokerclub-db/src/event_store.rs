//! Event persistence.
//!
//! Lifecycle code re-reads an event with [`EventStore::get_for_update`]
//! inside its transaction. The row lock serializes concurrent end/undo/rebuy
//! calls on the same event, so each one sees the state left by the previous
//! commit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use pokerclub_types::{Event, EventId, EventState, EventUpdate, NewEvent, SemesterId, StructureId};

use crate::error::DbError;

/// Operations on the `events` table.
pub struct EventStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> EventStore<'c> {
    /// Create a store over a connection or an open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a new event in the [`EventState::Started`] state.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    /// Returns [`DbError::Decode`] if the returned row is malformed.
    pub async fn insert(&mut self, id: EventId, new: &NewEvent) -> Result<Event, DbError> {
        let row = sqlx::query_as::<_, EventRow>(
            r"INSERT INTO events (id, semester_id, structure_id, name, location, start_date, state, points_multiplier)
              VALUES ($1, $2, $3, $4, $5, $6, $7::event_state, $8)
              RETURNING id, semester_id, structure_id, name, location, start_date, state::TEXT AS state, rebuys, points_multiplier, created_at",
        )
        .bind(id.into_inner())
        .bind(new.semester_id.into_inner())
        .bind(new.structure_id.into_inner())
        .bind(&new.name)
        .bind(new.location.as_deref())
        .bind(new.start_date)
        .bind(EventState::Started.as_str())
        .bind(new.points_multiplier)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(event_id = %id, semester_id = %new.semester_id, "Inserted event");
        row.try_into()
    }

    /// Fetch an event by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if the row is malformed.
    pub async fn get(&mut self, id: EventId) -> Result<Option<Event>, DbError> {
        let row = sqlx::query_as::<_, EventRow>(
            r"SELECT id, semester_id, structure_id, name, location, start_date, state::TEXT AS state, rebuys, points_multiplier, created_at
              FROM events
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Event::try_from).transpose()
    }

    /// Fetch an event by ID and lock its row until the transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if the row is malformed.
    pub async fn get_for_update(&mut self, id: EventId) -> Result<Option<Event>, DbError> {
        let row = sqlx::query_as::<_, EventRow>(
            r"SELECT id, semester_id, structure_id, name, location, start_date, state::TEXT AS state, rebuys, points_multiplier, created_at
              FROM events
              WHERE id = $1
              FOR UPDATE",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Event::try_from).transpose()
    }

    /// List a semester's events, most recent start first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if a row is malformed.
    pub async fn list_by_semester(&mut self, semester_id: SemesterId) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, semester_id, structure_id, name, location, start_date, state::TEXT AS state, rebuys, points_multiplier, created_at
              FROM events
              WHERE semester_id = $1
              ORDER BY start_date DESC, id",
        )
        .bind(semester_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    /// Apply a partial update to the descriptive fields of an event.
    ///
    /// Returns `None` if no event has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    /// Returns [`DbError::Decode`] if the returned row is malformed.
    pub async fn update(
        &mut self,
        id: EventId,
        update: &EventUpdate,
    ) -> Result<Option<Event>, DbError> {
        let row = sqlx::query_as::<_, EventRow>(
            r"UPDATE events SET
                structure_id = COALESCE($2, structure_id),
                name = COALESCE($3, name),
                location = COALESCE($4, location),
                start_date = COALESCE($5, start_date),
                points_multiplier = COALESCE($6, points_multiplier)
              WHERE id = $1
              RETURNING id, semester_id, structure_id, name, location, start_date, state::TEXT AS state, rebuys, points_multiplier, created_at",
        )
        .bind(id.into_inner())
        .bind(update.structure_id.map(StructureId::into_inner))
        .bind(update.name.as_deref())
        .bind(update.location.as_deref())
        .bind(update.start_date)
        .bind(update.points_multiplier)
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Event::try_from).transpose()
    }

    /// Persist a new lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no event has this ID.
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_state(&mut self, id: EventId, state: EventState) -> Result<(), DbError> {
        let result = sqlx::query(r"UPDATE events SET state = $2::event_state WHERE id = $1")
            .bind(id.into_inner())
            .bind(state.as_str())
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "event",
                id: id.into_inner(),
            });
        }

        tracing::debug!(event_id = %id, %state, "Persisted event state");
        Ok(())
    }

    /// Atomically increment the rebuy counter and return the new count.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no event has this ID.
    /// Returns [`DbError::Postgres`] if the update fails.
    /// Returns [`DbError::Decode`] if the stored count is negative.
    pub async fn increment_rebuys(&mut self, id: EventId) -> Result<u32, DbError> {
        let row: Option<(i32,)> =
            sqlx::query_as(r"UPDATE events SET rebuys = rebuys + 1 WHERE id = $1 RETURNING rebuys")
                .bind(id.into_inner())
                .fetch_optional(&mut *self.conn)
                .await?;

        let (rebuys,) = row.ok_or(DbError::NotFound {
            entity: "event",
            id: id.into_inner(),
        })?;

        u32::try_from(rebuys).map_err(|e| DbError::Decode(format!("event rebuys {rebuys}: {e}")))
    }
}

/// A row from the `events` table.
///
/// `state` is cast to `TEXT` in every query so the row decodes without a
/// custom `sqlx::Type` for the `PostgreSQL` enum.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event UUID.
    pub id: Uuid,
    /// Owning semester.
    pub semester_id: Uuid,
    /// Blind structure.
    pub structure_id: Uuid,
    /// Display name.
    pub name: String,
    /// Venue.
    pub location: Option<String>,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Lifecycle state label.
    pub state: String,
    /// Rebuy counter.
    pub rebuys: i32,
    /// Points multiplier.
    pub points_multiplier: Decimal,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let state = EventState::from_db(&row.state)
            .ok_or_else(|| DbError::Decode(format!("unknown event state '{}'", row.state)))?;
        let rebuys = u32::try_from(row.rebuys)
            .map_err(|e| DbError::Decode(format!("event rebuys {}: {e}", row.rebuys)))?;

        Ok(Self {
            id: EventId::from(row.id),
            semester_id: SemesterId::from(row.semester_id),
            structure_id: StructureId::from(row.structure_id),
            name: row.name,
            location: row.location,
            start_date: row.start_date,
            state,
            rebuys,
            points_multiplier: row.points_multiplier,
            created_at: row.created_at,
        })
    }
}
