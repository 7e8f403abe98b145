//! Membership persistence.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use pokerclub_types::{Membership, MembershipId, SemesterId, UserId};

use crate::error::DbError;

/// Operations on the `memberships` table.
pub struct MembershipStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> MembershipStore<'c> {
    /// Create a store over a connection or an open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a membership.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, including a unique
    /// violation when the user already holds a membership in the semester
    /// (see [`DbError::is_unique_violation`]).
    pub async fn insert(
        &mut self,
        id: MembershipId,
        semester_id: SemesterId,
        user_id: UserId,
        paid: bool,
        discounted: bool,
    ) -> Result<Membership, DbError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r"INSERT INTO memberships (id, semester_id, user_id, paid, discounted)
              VALUES ($1, $2, $3, $4, $5)
              RETURNING id, semester_id, user_id, paid, discounted, created_at",
        )
        .bind(id.into_inner())
        .bind(semester_id.into_inner())
        .bind(user_id.into_inner())
        .bind(paid)
        .bind(discounted)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row.into())
    }

    /// Fetch a membership by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: MembershipId) -> Result<Option<Membership>, DbError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r"SELECT id, semester_id, user_id, paid, discounted, created_at
              FROM memberships
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Membership::from))
    }
}

/// A row from the `memberships` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MembershipRow {
    /// Membership UUID.
    pub id: Uuid,
    /// Owning semester.
    pub semester_id: Uuid,
    /// Member's user account.
    pub user_id: Uuid,
    /// Fee paid.
    pub paid: bool,
    /// Discounted fee applies.
    pub discounted: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Self {
            id: MembershipId::from(row.id),
            semester_id: SemesterId::from(row.semester_id),
            user_id: UserId::from(row.user_id),
            paid: row.paid,
            discounted: row.discounted,
            created_at: row.created_at,
        }
    }
}
