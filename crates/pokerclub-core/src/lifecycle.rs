//! Event lifecycle: ending an event, undoing the end, and rebuys.
//!
//! ```text
//!            end_event
//!   Started ----------> Ended
//!      ^                  |
//!      +------------------+
//!         undo_end_event
//! ```
//!
//! Each operation is one transaction. The event row is locked with
//! `SELECT ... FOR UPDATE` before its state is checked, so two concurrent
//! calls on the same event run one after the other and the second sees the
//! first one's outcome.
//!
//! Ending an event signs out every participant still at the table (stamped
//! with the event's start date, which puts them last), fixes placements by
//! sign-out time, and credits each membership's ranking. Undoing debits the
//! same points, recomputed from the recorded placements. Placements and the
//! forced sign-out times stay as they are.
//!
//! Ranking rows are written in one batch ordered by membership id, so two
//! events sharing members always lock those rows in the same order.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use pokerclub_db::{EventStore, ParticipantStore, RankingStore, SemesterStore};
use pokerclub_ranking::{order_by_sign_out, plan_awards, plan_reversal, total_points, Award};
use pokerclub_types::{Event, EventId, EventState, MembershipId, ParticipantId};

use crate::error::ServiceError;
use crate::tx::finish;

/// The outcome of ending an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventStandings {
    /// The event that was ended.
    pub event_id: EventId,
    /// Number of participants placed.
    pub field_size: u32,
    /// Awards in finishing order, winner first.
    pub awards: Vec<Award>,
}

impl EventStandings {
    /// Sum of all awarded points, or `None` on overflow.
    pub fn total_points(&self) -> Option<i64> {
        total_points(&self.awards)
    }
}

/// The outcome of a rebuy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebuyOutcome {
    /// The event the rebuy was recorded on.
    pub event_id: EventId,
    /// The event's rebuy count after this rebuy.
    pub rebuys: u32,
    /// The semester budget after the rebuy fee was added.
    pub current_budget: Decimal,
}

/// Drives events through their lifecycle.
pub struct EventLifecycle<'p> {
    pool: &'p PgPool,
}

impl<'p> EventLifecycle<'p> {
    /// Create a lifecycle manager over a connection pool.
    pub const fn new(pool: &'p PgPool) -> Self {
        Self { pool }
    }

    /// End a started event: force-sign-out stragglers, assign placements,
    /// and credit points.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the event does not exist.
    /// - [`ServiceError::Forbidden`] if the event is already ended.
    /// - [`ServiceError::Internal`] on any persistence or points failure;
    ///   nothing is written in that case.
    pub async fn end_event(&self, event_id: EventId) -> Result<EventStandings, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = end_in_tx(&mut tx, event_id).await;
        let standings = finish(tx, "end_event", result).await?;

        tracing::info!(
            event_id = %event_id,
            field_size = standings.field_size,
            total_points = standings.total_points(),
            "Event ended"
        );
        Ok(standings)
    }

    /// Reverse a previous [`EventLifecycle::end_event`] and return the event
    /// to [`EventState::Started`].
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the event does not exist.
    /// - [`ServiceError::Forbidden`] if the event is not ended.
    /// - [`ServiceError::Internal`] on any persistence or points failure;
    ///   nothing is written in that case.
    pub async fn undo_end_event(&self, event_id: EventId) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = undo_in_tx(&mut tx, event_id).await;
        let reversed = finish(tx, "undo_end_event", result).await?;

        tracing::info!(
            event_id = %event_id,
            reversed_awards = reversed.len(),
            total_points = total_points(&reversed),
            "Event end undone"
        );
        Ok(())
    }

    /// Record a rebuy and add the semester's rebuy fee to its budget.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the event or its semester does not
    ///   exist.
    /// - [`ServiceError::Forbidden`] if the event is ended.
    /// - [`ServiceError::Internal`] on persistence failure; neither the
    ///   counter nor the budget changes in that case.
    pub async fn new_rebuy(&self, event_id: EventId) -> Result<RebuyOutcome, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = rebuy_in_tx(&mut tx, event_id).await;
        let outcome = finish(tx, "new_rebuy", result).await?;

        tracing::info!(
            event_id = %event_id,
            rebuys = outcome.rebuys,
            budget = %outcome.current_budget,
            "Rebuy recorded"
        );
        Ok(outcome)
    }
}

/// Lock and load an event, or fail with `NotFound`.
pub(crate) async fn lock_event(
    conn: &mut PgConnection,
    event_id: EventId,
) -> Result<Event, ServiceError> {
    EventStore::new(conn)
        .get_for_update(event_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("event", event_id))
}

async fn end_in_tx(
    conn: &mut PgConnection,
    event_id: EventId,
) -> Result<EventStandings, ServiceError> {
    let event = lock_event(conn, event_id).await?;
    if event.state.is_ended() {
        return Err(ServiceError::Forbidden(format!(
            "event {event_id} has already ended"
        )));
    }

    let forced = ParticipantStore::new(conn)
        .force_sign_out_remaining(event_id, event.start_date)
        .await?;
    if forced > 0 {
        tracing::debug!(event_id = %event_id, forced, "Forced sign-out of remaining participants");
    }

    EventStore::new(conn)
        .set_state(event_id, EventState::Ended)
        .await?;

    let mut participants = ParticipantStore::new(conn).list_by_event(event_id).await?;
    order_by_sign_out(&mut participants, event.start_date);
    let awards = plan_awards(&participants, event.points_multiplier)?;

    apply_to_rankings(conn, &awards).await?;

    let placements: Vec<(ParticipantId, u32)> = awards
        .iter()
        .map(|award| (award.participant_id, award.placement))
        .collect();
    ParticipantStore::new(conn).set_placements(&placements).await?;

    let field_size = u32::try_from(awards.len())
        .map_err(|e| ServiceError::Internal(format!("field size {}: {e}", awards.len())))?;

    Ok(EventStandings {
        event_id,
        field_size,
        awards,
    })
}

async fn undo_in_tx(conn: &mut PgConnection, event_id: EventId) -> Result<Vec<Award>, ServiceError> {
    let event = lock_event(conn, event_id).await?;
    if !event.state.is_ended() {
        return Err(ServiceError::Forbidden(format!(
            "event {event_id} has not ended"
        )));
    }

    let participants = ParticipantStore::new(conn).list_by_event(event_id).await?;
    let reversal = plan_reversal(&participants, event.points_multiplier).map_err(|e| {
        tracing::error!(event_id = %event_id, error = %e, "Recorded placements cannot be reversed");
        match ServiceError::from(e) {
            ServiceError::Internal(message) => {
                ServiceError::Internal(format!("event {event_id}: {message}"))
            }
            other => other,
        }
    })?;

    apply_to_rankings(conn, &reversal).await?;

    EventStore::new(conn)
        .set_state(event_id, EventState::Started)
        .await?;

    Ok(reversal)
}

/// Net the plan per membership and write it as one ordered batch.
async fn apply_to_rankings(conn: &mut PgConnection, plan: &[Award]) -> Result<(), ServiceError> {
    let mut deltas: BTreeMap<MembershipId, i64> = BTreeMap::new();
    for award in plan {
        let delta = deltas.entry(award.membership_id).or_insert(0);
        *delta = delta.checked_add(award.points).ok_or_else(|| {
            ServiceError::Internal(format!(
                "points overflow for membership {}",
                award.membership_id
            ))
        })?;
    }

    RankingStore::new(conn).batch_update_rankings(&deltas).await?;
    Ok(())
}

async fn rebuy_in_tx(
    conn: &mut PgConnection,
    event_id: EventId,
) -> Result<RebuyOutcome, ServiceError> {
    let event = lock_event(conn, event_id).await?;
    if event.state.is_ended() {
        return Err(ServiceError::Forbidden(format!(
            "event {event_id} has ended; rebuys are closed"
        )));
    }

    let rebuys = EventStore::new(conn).increment_rebuys(event_id).await?;

    let mut semesters = SemesterStore::new(conn);
    let semester = semesters
        .get(event.semester_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("semester", event.semester_id))?;
    let current_budget = semesters
        .adjust_budget(semester.id, semester.rebuy_fee)
        .await?;

    Ok(RebuyOutcome {
        event_id,
        rebuys,
        current_budget,
    })
}
