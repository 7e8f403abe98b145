//! Shared type definitions for the poker club tournament program.
//!
//! This crate is the single source of truth for the entities shared by the
//! ranking engine, the data layer, and the lifecycle services. Types flow
//! downstream to `TypeScript` via `ts-rs` for the club dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- The event lifecycle state
//! - [`structs`] -- Semesters, memberships, events, participants, rankings

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::EventState;
pub use ids::{EventId, MembershipId, ParticipantId, SemesterId, StructureId, UserId};
pub use structs::{
    Event, EventUpdate, Membership, NewEvent, NewSemester, Participant, Ranking, RankingPosition,
    Semester,
};
