//! Service layer for the poker club tournament program.
//!
//! Services are thin handles over a borrowed [`sqlx::PgPool`]; build one per
//! request scope. Each state-changing operation runs in a single
//! transaction that commits on success and rolls back on any error.
//!
//! # Modules
//!
//! - [`lifecycle`] -- End an event, undo the end, record rebuys.
//! - [`events`] -- Event create/read/list/update.
//! - [`rankings`] -- Point adjustments, positions, leaderboard.
//! - [`participants`] -- Event entry, sign-in, sign-out.
//! - [`memberships`] -- Memberships and their fee contribution.
//! - [`semesters`] -- Semester accessor.
//! - [`config`] -- YAML configuration with environment overrides.
//! - [`telemetry`] -- Tracing subscriber setup.
//! - [`error`] -- The [`ServiceError`] taxonomy.
//!
//! # Wiring
//!
//! ```no_run
//! use pokerclub_core::config::ClubConfig;
//! use pokerclub_core::lifecycle::EventLifecycle;
//! use pokerclub_core::telemetry::init_tracing;
//! use pokerclub_db::PostgresPool;
//! use pokerclub_types::EventId;
//!
//! # async fn run(event_id: EventId) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClubConfig::from_file("pokerclub.yaml".as_ref())?;
//! init_tracing(&config.logging)?;
//! let db = PostgresPool::connect(&config.database.to_postgres_config()).await?;
//!
//! let standings = EventLifecycle::new(db.pool()).end_event(event_id).await?;
//! println!("{} players placed", standings.field_size);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod memberships;
pub mod participants;
pub mod rankings;
pub mod semesters;
pub mod telemetry;

mod tx;

pub use error::ServiceError;
pub use events::EventService;
pub use lifecycle::{EventLifecycle, EventStandings, RebuyOutcome};
pub use memberships::{MembershipService, NewMembership};
pub use participants::ParticipantService;
pub use rankings::RankingService;
pub use semesters::SemesterService;
