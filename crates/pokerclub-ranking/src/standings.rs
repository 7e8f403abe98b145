//! Finishing order and award plans.
//!
//! The last player standing is the last one to sign out, so finishing order
//! is sign-out time descending. Participants still active when an event is
//! ended are force-signed-out at the event's start date. That timestamp
//! precedes every real sign-out, so stragglers share last place in the
//! ordering. Ties on the timestamp are broken by participant id ascending,
//! and ids are UUID v7, which means entry order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pokerclub_types::{MembershipId, Participant, ParticipantId};

use crate::points::award_points;
use crate::RankingError;

/// Points credited (or, for a reversal, debited) to one membership for one
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    /// The participant the award belongs to.
    pub participant_id: ParticipantId,
    /// The membership whose ranking receives the points.
    pub membership_id: MembershipId,
    /// 1-based finishing position.
    pub placement: u32,
    /// Signed points delta; negative in a reversal plan.
    pub points: i64,
}

/// Sort participants into finishing order, best first.
///
/// A participant without a sign-out time is treated as signed out at
/// `forced_at`, which matches what the forced sign-out step writes. The
/// sort is stable and total.
pub fn order_by_sign_out(participants: &mut [Participant], forced_at: DateTime<Utc>) {
    participants.sort_by(|a, b| {
        let a_out = a.signed_out_at.unwrap_or(forced_at);
        let b_out = b.signed_out_at.unwrap_or(forced_at);
        b_out.cmp(&a_out).then_with(|| a.id.cmp(&b.id))
    });
}

/// Build the awards for ending an event.
///
/// `ordered` must already be in finishing order (see
/// [`order_by_sign_out`]). The participant at index `i` gets placement
/// `i + 1` and the points for that placement in a field of `ordered.len()`.
///
/// # Errors
///
/// Returns [`RankingError::FieldTooLarge`] if the field does not fit a
/// `u32`, or any error from [`award_points`].
pub fn plan_awards(
    ordered: &[Participant],
    multiplier: Decimal,
) -> Result<Vec<Award>, RankingError> {
    let field_size =
        u32::try_from(ordered.len()).map_err(|_e| RankingError::FieldTooLarge(ordered.len()))?;

    (1..=field_size)
        .zip(ordered)
        .map(|(placement, participant)| -> Result<Award, RankingError> {
            Ok(Award {
                participant_id: participant.id,
                membership_id: participant.membership_id,
                placement,
                points: award_points(field_size, placement, multiplier)?,
            })
        })
        .collect()
}

/// Build the debits that cancel a previous [`plan_awards`] for the same
/// event.
///
/// Points are recomputed from each participant's recorded placement, so the
/// debit equals the original credit exactly. Participants with placement 0
/// never received an award and are skipped. The field size is the number of
/// placed participants.
///
/// # Errors
///
/// Returns [`RankingError::InvalidPlacement`] if recorded placements do not
/// fit the placed field (for example after a placed participant was deleted),
/// or any other error from [`award_points`].
pub fn plan_reversal(
    participants: &[Participant],
    multiplier: Decimal,
) -> Result<Vec<Award>, RankingError> {
    let placed: Vec<&Participant> = participants.iter().filter(|p| p.placement > 0).collect();
    let skipped = participants.len().saturating_sub(placed.len());
    if skipped > 0 {
        tracing::warn!(
            skipped,
            "Participants without a placement are excluded from the reversal"
        );
    }

    let field_size =
        u32::try_from(placed.len()).map_err(|_e| RankingError::FieldTooLarge(placed.len()))?;

    placed
        .into_iter()
        .map(|participant| -> Result<Award, RankingError> {
            let credited = award_points(field_size, participant.placement, multiplier)?;
            Ok(Award {
                participant_id: participant.id,
                membership_id: participant.membership_id,
                placement: participant.placement,
                points: credited
                    .checked_neg()
                    .ok_or(RankingError::Overflow("negated points"))?,
            })
        })
        .collect()
}

/// Sum the points of a plan.
///
/// Returns `None` on overflow.
pub fn total_points(awards: &[Award]) -> Option<i64> {
    awards
        .iter()
        .try_fold(0_i64, |acc, award| acc.checked_add(award.points))
}
