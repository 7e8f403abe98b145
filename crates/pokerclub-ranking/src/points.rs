//! The points function.
//!
//! ```text
//! base(N, p) = PARTICIPATION_POINTS + POINTS_PER_PLAYER_OUTLASTED * (N - p)
//! points     = round_half_even(multiplier * base(N, p))
//! ```
//!
//! Every finisher gets the participation points, plus a fixed amount for
//! each player they outlasted. The winner of an N-player field therefore
//! outlasts N - 1 players. The constants are compiled in: an award is
//! recomputed when an event end is undone, so the formula must not change
//! between the two calls.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::RankingError;

/// Points every finisher receives, before the multiplier.
pub const PARTICIPATION_POINTS: u32 = 10;

/// Points for each player finishing below, before the multiplier.
pub const POINTS_PER_PLAYER_OUTLASTED: u32 = 10;

/// Compute the points awarded for finishing at `placement` in a field of
/// `field_size`, scaled by `multiplier`.
///
/// The result is monotone non-increasing in `placement` and linear in
/// `multiplier` up to half-even rounding to whole points. A multiplier of
/// zero yields zero for every placement.
///
/// # Errors
///
/// Returns [`RankingError::InvalidPlacement`] unless
/// `1 <= placement <= field_size`, [`RankingError::NegativeMultiplier`] for a
/// negative multiplier, and [`RankingError::Overflow`] if the scaled value
/// does not fit an `i64`.
pub fn award_points(
    field_size: u32,
    placement: u32,
    multiplier: Decimal,
) -> Result<i64, RankingError> {
    if placement == 0 || placement > field_size {
        return Err(RankingError::InvalidPlacement {
            placement,
            field_size,
        });
    }
    if multiplier < Decimal::ZERO {
        return Err(RankingError::NegativeMultiplier { multiplier });
    }

    let outlasted = field_size
        .checked_sub(placement)
        .ok_or(RankingError::Overflow("players outlasted"))?;
    let base = u64::from(outlasted)
        .checked_mul(u64::from(POINTS_PER_PLAYER_OUTLASTED))
        .and_then(|v| v.checked_add(u64::from(PARTICIPATION_POINTS)))
        .ok_or(RankingError::Overflow("base points"))?;

    Decimal::from(base)
        .checked_mul(multiplier)
        .ok_or(RankingError::Overflow("scaled points"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(RankingError::Overflow("points do not fit i64"))
}
