//! Points and placement engine for the poker club.
//!
//! Everything in this crate is pure: no I/O, no clock reads, no global
//! state. The lifecycle services call into it inside their database
//! transactions, and the undo path relies on that purity. Recomputing an
//! award from the same `(field size, placement, multiplier)` always yields
//! the same number, so subtracting it exactly cancels the original award.
//!
//! # Modules
//!
//! - [`points`] -- The points function and its constants.
//! - [`standings`] -- Finishing order from sign-out times, and the award
//!   plans for ending and un-ending an event.
//! - [`positions`] -- Competition ("1-2-2-4") positions for a leaderboard.
//!
//! # Usage
//!
//! ```
//! use pokerclub_ranking::points::award_points;
//! use rust_decimal::Decimal;
//!
//! // Winner of a 3-player field at multiplier 1.
//! assert_eq!(award_points(3, 1, Decimal::ONE).ok(), Some(30));
//! // Multiplier 0 awards nothing.
//! assert_eq!(award_points(3, 1, Decimal::ZERO).ok(), Some(0));
//! ```

pub mod points;
pub mod positions;
pub mod standings;

pub use points::award_points;
pub use positions::competition_positions;
pub use standings::{order_by_sign_out, plan_awards, plan_reversal, total_points, Award};

use rust_decimal::Decimal;

/// Errors produced by the points engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    /// A placement outside `1..=field_size` was supplied.
    #[error("placement {placement} is outside a field of {field_size}")]
    InvalidPlacement {
        /// The offending placement.
        placement: u32,
        /// The field size it was checked against.
        field_size: u32,
    },

    /// The points multiplier was negative.
    #[error("points multiplier must not be negative, got {multiplier}")]
    NegativeMultiplier {
        /// The offending multiplier.
        multiplier: Decimal,
    },

    /// The field has more participants than a placement can express.
    #[error("field of {0} participants is too large")]
    FieldTooLarge(usize),

    /// A points computation overflowed.
    #[error("points overflow: {0}")]
    Overflow(&'static str),
}
