//! Enumeration types for the tournament program.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle state of an event.
///
/// The only transitions are `Started -> Ended` (ending an event) and
/// `Ended -> Started` (undoing the end). Events are created `Started`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    /// The tournament is running; participants may sign in, sign out, and rebuy.
    #[default]
    Started,
    /// The tournament is finished; placements and points have been awarded.
    Ended,
}

impl EventState {
    /// The `PostgreSQL` `event_state` enum label for this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ended => "ended",
        }
    }

    /// Parse a `PostgreSQL` `event_state` label.
    ///
    /// Returns `None` for unknown labels.
    pub fn from_db(label: &str) -> Option<Self> {
        match label {
            "started" => Some(Self::Started),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }

    /// Whether the event has been ended.
    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl core::fmt::Display for EventState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
