//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and adds the cases the stores detect themselves: a row
//! that must exist but does not, and a column value that does not map onto
//! the domain type.

use uuid::Uuid;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A conditional update matched no row.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The table's entity name, e.g. `"semester"`.
        entity: &'static str,
        /// The identifier that matched nothing.
        id: Uuid,
    },

    /// A stored value could not be converted into its domain type.
    #[error("decode error: {0}")]
    Decode(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether this error is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Postgres(sqlx::Error::Database(db)) if db.is_unique_violation())
    }

    /// Whether this error is a foreign-key violation.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::Postgres(sqlx::Error::Database(db)) if db.is_foreign_key_violation())
    }
}
