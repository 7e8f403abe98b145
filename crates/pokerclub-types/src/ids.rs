//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Semesters, memberships, events, and participants each get a distinct ID
//! type so a membership ID can never be passed where an event ID is expected.
//! All IDs are UUID v7 (time-ordered), which also gives participants a
//! natural entry-order tie-break.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a semester (budget and ranking scope).
    SemesterId
}

define_id! {
    /// Unique identifier for a user's membership in one semester.
    MembershipId
}

define_id! {
    /// Unique identifier for an event (one tournament).
    EventId
}

define_id! {
    /// Unique identifier for a membership's entry into one event.
    ParticipantId
}

define_id! {
    /// Unique identifier for a blind structure, owned by the structure CRUD layer.
    StructureId
}

define_id! {
    /// Unique identifier for a user account, owned by the user CRUD layer.
    UserId
}
