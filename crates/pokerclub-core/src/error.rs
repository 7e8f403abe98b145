//! Service-level error taxonomy.
//!
//! Every public service operation returns [`ServiceError`]. Lower layers
//! keep their own error enums and convert through the `From` impls below:
//! a missing row stays `NotFound`, an invalid multiplier becomes
//! `InvalidRequest`, and everything else is `Internal` with the underlying
//! message preserved.

use pokerclub_db::DbError;
use pokerclub_ranking::RankingError;
use uuid::Uuid;

/// Errors returned by the club services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"event"`.
        entity: &'static str,
        /// The identifier that matched nothing.
        id: Uuid,
    },

    /// The operation is not allowed in the entity's current state.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The request itself is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A persistence or computation failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Build a [`ServiceError::NotFound`] for any typed ID.
    pub fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::from(DbError::from(err))
    }
}

impl From<RankingError> for ServiceError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NegativeMultiplier { .. } => Self::InvalidRequest(err.to_string()),
            RankingError::InvalidPlacement { .. }
            | RankingError::FieldTooLarge(_)
            | RankingError::Overflow(_) => Self::Internal(err.to_string()),
        }
    }
}
