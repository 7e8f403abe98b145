//! Event entry and sign-in/out.
//!
//! Sign-out time is what orders the finish when an event ends, so it is
//! frozen once the event is ended. Every write here locks the owning event
//! first, which keeps it from racing with [`crate::lifecycle`].

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use pokerclub_db::{EventStore, MembershipStore, ParticipantStore};
use pokerclub_types::{EventId, MembershipId, Participant, ParticipantId};

use crate::error::ServiceError;
use crate::lifecycle::lock_event;
use crate::tx::finish;

/// Manages participants of events.
pub struct ParticipantService<'p> {
    pool: &'p PgPool,
}

impl<'p> ParticipantService<'p> {
    /// Create a participant service over a connection pool.
    pub const fn new(pool: &'p PgPool) -> Self {
        Self { pool }
    }

    /// Enter a membership into an event. The new participant is active and
    /// unplaced.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the event or membership does not
    ///   exist.
    /// - [`ServiceError::Forbidden`] if the event has ended.
    /// - [`ServiceError::InvalidRequest`] if the membership belongs to
    ///   another semester or is already entered.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn enter_event(
        &self,
        event_id: EventId,
        membership_id: MembershipId,
    ) -> Result<Participant, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = enter_in_tx(&mut tx, event_id, membership_id).await;
        let participant = finish(tx, "enter_event", result).await?;

        tracing::info!(
            event_id = %event_id,
            membership_id = %membership_id,
            participant_id = %participant.id,
            "Participant entered"
        );
        Ok(participant)
    }

    /// Sign a participant out now.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the participant does not exist.
    /// - [`ServiceError::Forbidden`] if the event has ended.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn sign_out(&self, participant_id: ParticipantId) -> Result<Participant, ServiceError> {
        self.set_signed_out_at(participant_id, Some(Utc::now()), "sign_out")
            .await
    }

    /// Sign a participant back in, clearing the sign-out time.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the participant does not exist.
    /// - [`ServiceError::Forbidden`] if the event has ended.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn sign_in(&self, participant_id: ParticipantId) -> Result<Participant, ServiceError> {
        self.set_signed_out_at(participant_id, None, "sign_in").await
    }

    /// List an event's participants, latest sign-out first.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the event does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn list_participants(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Participant>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        if EventStore::new(&mut conn)
            .get(event_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("event", event_id));
        }
        Ok(ParticipantStore::new(&mut conn)
            .list_by_event(event_id)
            .await?)
    }

    async fn set_signed_out_at(
        &self,
        participant_id: ParticipantId,
        at: Option<DateTime<Utc>>,
        operation: &'static str,
    ) -> Result<Participant, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = set_sign_out_in_tx(&mut tx, participant_id, at).await;
        let participant = finish(tx, operation, result).await?;

        tracing::info!(
            participant_id = %participant_id,
            event_id = %participant.event_id,
            operation,
            signed_out = at.is_some(),
            "Participant sign-out time changed"
        );
        Ok(participant)
    }
}

async fn enter_in_tx(
    conn: &mut PgConnection,
    event_id: EventId,
    membership_id: MembershipId,
) -> Result<Participant, ServiceError> {
    let event = lock_event(conn, event_id).await?;
    if event.state.is_ended() {
        return Err(ServiceError::Forbidden(format!(
            "event {event_id} has ended; entries are closed"
        )));
    }

    let membership = MembershipStore::new(conn)
        .get(membership_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("membership", membership_id))?;
    if membership.semester_id != event.semester_id {
        return Err(ServiceError::InvalidRequest(format!(
            "membership {membership_id} belongs to semester {}, event {event_id} to semester {}",
            membership.semester_id, event.semester_id
        )));
    }

    ParticipantStore::new(conn)
        .insert(ParticipantId::new(), event_id, membership_id)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ServiceError::InvalidRequest(format!(
                    "membership {membership_id} is already entered in event {event_id}"
                ))
            } else {
                e.into()
            }
        })
}

async fn set_sign_out_in_tx(
    conn: &mut PgConnection,
    participant_id: ParticipantId,
    at: Option<DateTime<Utc>>,
) -> Result<Participant, ServiceError> {
    let participant = ParticipantStore::new(conn)
        .get(participant_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("participant", participant_id))?;

    let event = lock_event(conn, participant.event_id).await?;
    if event.state.is_ended() {
        return Err(ServiceError::Forbidden(format!(
            "event {} has ended; sign-out order is frozen",
            event.id
        )));
    }

    ParticipantStore::new(conn)
        .set_signed_out_at(participant_id, at)
        .await?;

    Ok(Participant {
        signed_out_at: at,
        ..participant
    })
}
