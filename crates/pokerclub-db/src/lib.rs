//! `PostgreSQL` data layer for the poker club tournament program.
//!
//! Every store borrows a `&mut PgConnection`, which may be a plain pooled
//! connection or an open transaction. The lifecycle services build all the
//! stores they need over one transaction, so one commit covers a whole
//! workflow.
//!
//! # Architecture
//!
//! ```text
//! Lifecycle operation
//!     |
//!     +-- pool.begin() ----------> Transaction
//!         |-- EventStore        (lock, state, rebuy counter)
//!         |-- ParticipantStore  (forced sign-out, placements)
//!         |-- RankingStore      (atomic point upserts)
//!         +-- SemesterStore     (atomic budget adjust)
//!     +-- commit / rollback
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool, configuration, migrations
//! - [`semester_store`] -- Semester accessor and the budget ledger
//! - [`membership_store`] -- Memberships
//! - [`event_store`] -- Events and their lifecycle columns
//! - [`participant_store`] -- Entry, sign-in/out, placements
//! - [`ranking_store`] -- Cumulative points and positions
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_store;
pub mod membership_store;
pub mod participant_store;
pub mod postgres;
pub mod ranking_store;
pub mod semester_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use event_store::{EventRow, EventStore};
pub use membership_store::{MembershipRow, MembershipStore};
pub use participant_store::{ParticipantRow, ParticipantStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use ranking_store::{RankingPositionRow, RankingRow, RankingStore};
pub use semester_store::{SemesterRow, SemesterStore};
