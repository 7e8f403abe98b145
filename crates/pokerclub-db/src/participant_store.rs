//! Participant persistence: event entry, sign-in/out, forced sign-out of
//! stragglers, and placement writes.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use pokerclub_types::{EventId, MembershipId, Participant, ParticipantId};

use crate::error::DbError;

/// Operations on the `participants` table.
pub struct ParticipantStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ParticipantStore<'c> {
    /// Create a store over a connection or an open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Enter a membership into an event.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, including a unique
    /// violation when the membership is already entered.
    /// Returns [`DbError::Decode`] if the returned row is malformed.
    pub async fn insert(
        &mut self,
        id: ParticipantId,
        event_id: EventId,
        membership_id: MembershipId,
    ) -> Result<Participant, DbError> {
        let row = sqlx::query_as::<_, ParticipantRow>(
            r"INSERT INTO participants (id, membership_id, event_id)
              VALUES ($1, $2, $3)
              RETURNING id, membership_id, event_id, placement, signed_out_at, created_at",
        )
        .bind(id.into_inner())
        .bind(membership_id.into_inner())
        .bind(event_id.into_inner())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(participant_id = %id, event_id = %event_id, "Entered participant");
        row.try_into()
    }

    /// Fetch a participant by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if the row is malformed.
    pub async fn get(&mut self, id: ParticipantId) -> Result<Option<Participant>, DbError> {
        let row = sqlx::query_as::<_, ParticipantRow>(
            r"SELECT id, membership_id, event_id, placement, signed_out_at, created_at
              FROM participants
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Participant::try_from).transpose()
    }

    /// List an event's participants, latest sign-out first.
    ///
    /// Rows without a sign-out time come last; ties are ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if a row is malformed.
    pub async fn list_by_event(&mut self, event_id: EventId) -> Result<Vec<Participant>, DbError> {
        let rows = sqlx::query_as::<_, ParticipantRow>(
            r"SELECT id, membership_id, event_id, placement, signed_out_at, created_at
              FROM participants
              WHERE event_id = $1
              ORDER BY signed_out_at DESC NULLS LAST, id",
        )
        .bind(event_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Participant::try_from).collect()
    }

    /// Set or clear a participant's sign-out time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no participant has this ID.
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_signed_out_at(
        &mut self,
        id: ParticipantId,
        signed_out_at: Option<DateTime<Utc>>,
    ) -> Result<(), DbError> {
        let result = sqlx::query(r"UPDATE participants SET signed_out_at = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(signed_out_at)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "participant",
                id: id.into_inner(),
            });
        }
        Ok(())
    }

    /// Sign out every participant of the event who is still active, stamping
    /// them with `at`. Returns the number of participants signed out.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn force_sign_out_remaining(
        &mut self,
        event_id: EventId,
        at: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r"UPDATE participants
              SET signed_out_at = $2
              WHERE event_id = $1 AND signed_out_at IS NULL",
        )
        .bind(event_id.into_inner())
        .bind(at)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Write final placements in one statement.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] if a placement does not fit an `INTEGER`.
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_placements(
        &mut self,
        placements: &[(ParticipantId, u32)],
    ) -> Result<u64, DbError> {
        if placements.is_empty() {
            return Ok(0);
        }

        let mut ids = Vec::with_capacity(placements.len());
        let mut values = Vec::with_capacity(placements.len());
        for &(id, placement) in placements {
            ids.push(id.into_inner());
            values.push(
                i32::try_from(placement)
                    .map_err(|e| DbError::Decode(format!("placement {placement}: {e}")))?,
            );
        }

        let result = sqlx::query(
            r"UPDATE participants AS p
              SET placement = u.placement
              FROM UNNEST($1::UUID[], $2::INTEGER[]) AS u(id, placement)
              WHERE p.id = u.id",
        )
        .bind(&ids)
        .bind(&values)
        .execute(&mut *self.conn)
        .await?;

        tracing::debug!(count = result.rows_affected(), "Wrote placements (batch UNNEST)");
        Ok(result.rows_affected())
    }
}

/// A row from the `participants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    /// Participant UUID.
    pub id: Uuid,
    /// Entered membership.
    pub membership_id: Uuid,
    /// Event entered.
    pub event_id: Uuid,
    /// Final placement; 0 while unset.
    pub placement: i32,
    /// Sign-out time; null while active.
    pub signed_out_at: Option<DateTime<Utc>>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = DbError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        let placement = u32::try_from(row.placement)
            .map_err(|e| DbError::Decode(format!("placement {}: {e}", row.placement)))?;

        Ok(Self {
            id: ParticipantId::from(row.id),
            membership_id: MembershipId::from(row.membership_id),
            event_id: EventId::from(row.event_id),
            placement,
            signed_out_at: row.signed_out_at,
            created_at: row.created_at,
        })
    }
}
