//! Ranking queries and point adjustments.
//!
//! [`RankingService::get_ranking`] positions one membership with SQL
//! `RANK()`; [`RankingService::list_rankings`] positions a whole semester
//! with [`competition_positions`]. Both give tied points the same position
//! and skip the following ones (1, 1, 3).

use std::collections::BTreeMap;

use sqlx::PgPool;

use pokerclub_db::{DbError, RankingStore};
use pokerclub_ranking::competition_positions;
use pokerclub_types::{MembershipId, RankingPosition, SemesterId};

use crate::error::ServiceError;

/// Reads and adjusts semester rankings.
pub struct RankingService<'p> {
    pool: &'p PgPool,
}

impl<'p> RankingService<'p> {
    /// Create a ranking service over a connection pool.
    pub const fn new(pool: &'p PgPool) -> Self {
        Self { pool }
    }

    /// Add `delta` points to a membership, creating its ranking if needed.
    /// Returns the new total.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the membership does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn update_ranking(
        &self,
        membership_id: MembershipId,
        delta: i64,
    ) -> Result<i64, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        RankingStore::new(&mut conn)
            .update_ranking(membership_id, delta)
            .await
            .map_err(|e| {
                if e.is_foreign_key_violation() {
                    ServiceError::not_found("membership", membership_id)
                } else {
                    e.into()
                }
            })
    }

    /// Apply many deltas in one statement. An empty map writes nothing.
    /// Returns the number of rankings written.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidRequest`] if any membership does not exist;
    ///   no ranking changes in that case.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn batch_update_rankings(
        &self,
        deltas: &BTreeMap<MembershipId, i64>,
    ) -> Result<u64, ServiceError> {
        if deltas.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool.acquire().await?;
        let written = RankingStore::new(&mut conn)
            .batch_update_rankings(deltas)
            .await
            .map_err(|e: DbError| {
                if e.is_foreign_key_violation() {
                    ServiceError::InvalidRequest(
                        "batch references a membership that does not exist".to_owned(),
                    )
                } else {
                    e.into()
                }
            })?;

        tracing::info!(count = written, "Rankings updated");
        Ok(written)
    }

    /// A membership's points and competition position in a semester.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the membership has no ranking in this
    ///   semester.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn get_ranking(
        &self,
        semester_id: SemesterId,
        membership_id: MembershipId,
    ) -> Result<RankingPosition, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        RankingStore::new(&mut conn)
            .get_position(semester_id, membership_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("ranking", membership_id))
    }

    /// The semester leaderboard, best first.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn list_rankings(
        &self,
        semester_id: SemesterId,
    ) -> Result<Vec<RankingPosition>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        let rankings = RankingStore::new(&mut conn)
            .list_by_semester(semester_id)
            .await?;
        Ok(competition_positions(rankings))
    }
}
