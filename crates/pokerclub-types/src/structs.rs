//! Core entity structs: semesters, memberships, events, participants, and
//! rankings.
//!
//! Monetary amounts and the points multiplier use [`Decimal`]. Points are
//! whole numbers and use `i64` so a negative delta (undo) has a natural
//! representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EventState;
use crate::ids::{EventId, MembershipId, ParticipantId, SemesterId, StructureId, UserId};

// ---------------------------------------------------------------------------
// Semester
// ---------------------------------------------------------------------------

/// A semester: the scope of a budget, a set of memberships, and a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Semester {
    /// Semester identifier.
    pub id: SemesterId,
    /// Display name, e.g. "Spring 2026".
    pub name: String,
    /// First day of the semester.
    pub start_date: DateTime<Utc>,
    /// Last day of the semester.
    pub end_date: DateTime<Utc>,
    /// Budget at semester creation.
    #[ts(as = "String")]
    pub initial_budget: Decimal,
    /// Running budget, adjusted only through atomic increments.
    #[ts(as = "String")]
    pub current_budget: Decimal,
    /// Fee collected from a regular paid membership.
    #[ts(as = "String")]
    pub membership_fee: Decimal,
    /// Fee collected from a discounted paid membership.
    #[ts(as = "String")]
    pub membership_fee_discounted: Decimal,
    /// Fee collected for each rebuy in an event of this semester.
    #[ts(as = "String")]
    pub rebuy_fee: Decimal,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl Semester {
    /// The fee a paid membership contributes to the budget.
    pub const fn membership_fee_for(&self, discounted: bool) -> Decimal {
        if discounted {
            self.membership_fee_discounted
        } else {
            self.membership_fee
        }
    }
}

/// Input for creating a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSemester {
    /// Display name.
    pub name: String,
    /// First day of the semester.
    pub start_date: DateTime<Utc>,
    /// Last day of the semester.
    pub end_date: DateTime<Utc>,
    /// Starting budget; also the initial running budget.
    pub initial_budget: Decimal,
    /// Regular membership fee.
    pub membership_fee: Decimal,
    /// Discounted membership fee.
    pub membership_fee_discounted: Decimal,
    /// Rebuy fee.
    pub rebuy_fee: Decimal,
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// A user's membership in one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Membership {
    /// Membership identifier.
    pub id: MembershipId,
    /// Owning semester.
    pub semester_id: SemesterId,
    /// The member's user account.
    pub user_id: UserId,
    /// Whether the membership fee has been paid.
    pub paid: bool,
    /// Whether the discounted fee applies.
    pub discounted: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Owning semester.
    pub semester_id: SemesterId,
    /// Blind structure the tournament is played with.
    pub structure_id: StructureId,
    /// Display name.
    pub name: String,
    /// Where the tournament takes place.
    pub location: Option<String>,
    /// Scheduled start. Also the forced sign-out time for stragglers.
    pub start_date: DateTime<Utc>,
    /// Lifecycle state.
    pub state: EventState,
    /// Number of rebuys taken so far.
    pub rebuys: u32,
    /// Factor applied to every award of this event.
    #[ts(as = "String")]
    pub points_multiplier: Decimal,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Owning semester.
    pub semester_id: SemesterId,
    /// Blind structure.
    pub structure_id: StructureId,
    /// Display name.
    pub name: String,
    /// Venue.
    pub location: Option<String>,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Points multiplier; must not be negative.
    pub points_multiplier: Decimal,
}

/// Partial update of an event's descriptive fields.
///
/// `None` leaves a field unchanged. The lifecycle state and rebuy counter are
/// deliberately absent: they only change through the lifecycle operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUpdate {
    /// New blind structure.
    pub structure_id: Option<StructureId>,
    /// New display name.
    pub name: Option<String>,
    /// New venue.
    pub location: Option<String>,
    /// New scheduled start.
    pub start_date: Option<DateTime<Utc>>,
    /// New points multiplier; must not be negative.
    pub points_multiplier: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A membership's entry in one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Participant {
    /// Participant identifier.
    pub id: ParticipantId,
    /// The entered membership.
    pub membership_id: MembershipId,
    /// The event entered.
    pub event_id: EventId,
    /// Final placement; 0 while unset, 1 for the winner.
    pub placement: u32,
    /// When the participant busted out; `None` while still playing.
    pub signed_out_at: Option<DateTime<Utc>>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Whether the participant is still in the tournament.
    pub const fn is_active(&self) -> bool {
        self.signed_out_at.is_none()
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// A membership's cumulative points and attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Ranking {
    /// The ranked membership.
    pub membership_id: MembershipId,
    /// Cumulative points.
    pub points: i64,
    /// Number of events counted for this membership. Maintained outside
    /// the club services; ending or undoing an event leaves it unchanged.
    pub attendance: u32,
}

/// A membership's points together with its competition position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RankingPosition {
    /// The ranked membership.
    pub membership_id: MembershipId,
    /// Cumulative points.
    pub points: i64,
    /// 1-based competition position (ties share, the next rank skips).
    pub position: u32,
}
