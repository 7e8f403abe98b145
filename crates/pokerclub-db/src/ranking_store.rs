//! Ranking persistence: cumulative points per membership.
//!
//! Points only ever change through `INSERT ... ON CONFLICT DO UPDATE SET
//! points = rankings.points + EXCLUDED.points`. A missing row is created
//! with the delta; an existing row is incremented in place. Concurrent
//! deltas for the same membership therefore commute, and negative deltas
//! (undo) net out exactly.

use std::collections::BTreeMap;

use sqlx::PgConnection;
use uuid::Uuid;

use pokerclub_types::{MembershipId, Ranking, RankingPosition, SemesterId};

use crate::error::DbError;

/// Operations on the `rankings` table.
pub struct RankingStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> RankingStore<'c> {
    /// Create a store over a connection or an open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Add `delta` to a membership's points, creating the row if absent.
    /// Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the upsert fails (for example when
    /// the membership does not exist).
    pub async fn update_ranking(
        &mut self,
        membership_id: MembershipId,
        delta: i64,
    ) -> Result<i64, DbError> {
        let (points,): (i64,) = sqlx::query_as(
            r"INSERT INTO rankings (membership_id, points)
              VALUES ($1, $2)
              ON CONFLICT (membership_id) DO UPDATE
              SET points = rankings.points + EXCLUDED.points, updated_at = now()
              RETURNING points",
        )
        .bind(membership_id.into_inner())
        .bind(delta)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(membership_id = %membership_id, delta, points, "Updated ranking");
        Ok(points)
    }

    /// Apply many point deltas in one statement.
    ///
    /// Missing rows are inserted with the delta and zero attendance; existing
    /// rows get the delta added and keep their attendance. Rows are written
    /// in membership id order. An empty map issues no statement. Returns the
    /// number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the upsert fails.
    pub async fn batch_update_rankings(
        &mut self,
        deltas: &BTreeMap<MembershipId, i64>,
    ) -> Result<u64, DbError> {
        if deltas.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = deltas.keys().map(|id| id.into_inner()).collect();
        let points: Vec<i64> = deltas.values().copied().collect();

        let result = sqlx::query(
            r"INSERT INTO rankings (membership_id, points, attendance)
              SELECT u.membership_id, u.points, 0
              FROM UNNEST($1::UUID[], $2::BIGINT[]) AS u(membership_id, points)
              ORDER BY u.membership_id
              ON CONFLICT (membership_id) DO UPDATE
              SET points = rankings.points + EXCLUDED.points, updated_at = now()",
        )
        .bind(&ids)
        .bind(&points)
        .execute(&mut *self.conn)
        .await?;

        tracing::debug!(count = result.rows_affected(), "Updated rankings (batch UNNEST)");
        Ok(result.rows_affected())
    }

    /// Fetch a membership's ranking row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if the row is malformed.
    pub async fn get(&mut self, membership_id: MembershipId) -> Result<Option<Ranking>, DbError> {
        let row = sqlx::query_as::<_, RankingRow>(
            r"SELECT membership_id, points, attendance
              FROM rankings
              WHERE membership_id = $1",
        )
        .bind(membership_id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Ranking::try_from).transpose()
    }

    /// Fetch a membership's points and competition position within a
    /// semester.
    ///
    /// Returns `None` when the membership has no ranking row or belongs to
    /// another semester.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if the position does not fit a `u32`.
    pub async fn get_position(
        &mut self,
        semester_id: SemesterId,
        membership_id: MembershipId,
    ) -> Result<Option<RankingPosition>, DbError> {
        let row = sqlx::query_as::<_, RankingPositionRow>(
            r"SELECT membership_id, points, position
              FROM (
                  SELECT r.membership_id, r.points,
                         RANK() OVER (ORDER BY r.points DESC) AS position
                  FROM rankings r
                  JOIN memberships m ON m.id = r.membership_id
                  WHERE m.semester_id = $1
              ) ranked
              WHERE membership_id = $2",
        )
        .bind(semester_id.into_inner())
        .bind(membership_id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(RankingPosition::try_from).transpose()
    }

    /// List every ranking row of a semester's memberships.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if a row is malformed.
    pub async fn list_by_semester(
        &mut self,
        semester_id: SemesterId,
    ) -> Result<Vec<Ranking>, DbError> {
        let rows = sqlx::query_as::<_, RankingRow>(
            r"SELECT r.membership_id, r.points, r.attendance
              FROM rankings r
              JOIN memberships m ON m.id = r.membership_id
              WHERE m.semester_id = $1",
        )
        .bind(semester_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Ranking::try_from).collect()
    }
}

/// A row from the `rankings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankingRow {
    /// Ranked membership.
    pub membership_id: Uuid,
    /// Cumulative points.
    pub points: i64,
    /// Events counted.
    pub attendance: i32,
}

impl TryFrom<RankingRow> for Ranking {
    type Error = DbError;

    fn try_from(row: RankingRow) -> Result<Self, Self::Error> {
        let attendance = u32::try_from(row.attendance)
            .map_err(|e| DbError::Decode(format!("attendance {}: {e}", row.attendance)))?;
        Ok(Self {
            membership_id: MembershipId::from(row.membership_id),
            points: row.points,
            attendance,
        })
    }
}

/// A ranking row with its `RANK()` position.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankingPositionRow {
    /// Ranked membership.
    pub membership_id: Uuid,
    /// Cumulative points.
    pub points: i64,
    /// Competition position from `RANK()`.
    pub position: i64,
}

impl TryFrom<RankingPositionRow> for RankingPosition {
    type Error = DbError;

    fn try_from(row: RankingPositionRow) -> Result<Self, Self::Error> {
        let position = u32::try_from(row.position)
            .map_err(|e| DbError::Decode(format!("position {}: {e}", row.position)))?;
        Ok(Self {
            membership_id: MembershipId::from(row.membership_id),
            points: row.points,
            position,
        })
    }
}
