//! Semester persistence and the budget ledger.
//!
//! The running budget is shared by every event and membership of a
//! semester, so it is never read-modified-written. [`SemesterStore::adjust_budget`]
//! is one conditional `UPDATE ... SET current_budget = current_budget + $2`,
//! which the database serializes per row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use pokerclub_types::{NewSemester, Semester, SemesterId};

use crate::error::DbError;

/// Operations on the `semesters` table.
pub struct SemesterStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> SemesterStore<'c> {
    /// Create a store over a connection or an open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a semester. The running budget starts at the initial budget.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&mut self, id: SemesterId, new: &NewSemester) -> Result<Semester, DbError> {
        let row = sqlx::query_as::<_, SemesterRow>(
            r"INSERT INTO semesters (id, name, start_date, end_date, initial_budget, current_budget, membership_fee, membership_fee_discounted, rebuy_fee)
              VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $8)
              RETURNING id, name, start_date, end_date, initial_budget, current_budget, membership_fee, membership_fee_discounted, rebuy_fee, created_at",
        )
        .bind(id.into_inner())
        .bind(&new.name)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.initial_budget)
        .bind(new.membership_fee)
        .bind(new.membership_fee_discounted)
        .bind(new.rebuy_fee)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(semester_id = %id, "Inserted semester");
        Ok(row.into())
    }

    /// Fetch a semester by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: SemesterId) -> Result<Option<Semester>, DbError> {
        let row = sqlx::query_as::<_, SemesterRow>(
            r"SELECT id, name, start_date, end_date, initial_budget, current_budget, membership_fee, membership_fee_discounted, rebuy_fee, created_at
              FROM semesters
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Semester::from))
    }

    /// Atomically add `amount` (which may be negative) to the running budget
    /// and return the new budget.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no semester has this ID.
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn adjust_budget(
        &mut self,
        id: SemesterId,
        amount: Decimal,
    ) -> Result<Decimal, DbError> {
        let row: Option<(Decimal,)> = sqlx::query_as(
            r"UPDATE semesters
              SET current_budget = current_budget + $2
              WHERE id = $1
              RETURNING current_budget",
        )
        .bind(id.into_inner())
        .bind(amount)
        .fetch_optional(&mut *self.conn)
        .await?;

        let (budget,) = row.ok_or(DbError::NotFound {
            entity: "semester",
            id: id.into_inner(),
        })?;

        tracing::debug!(semester_id = %id, %amount, %budget, "Adjusted semester budget");
        Ok(budget)
    }
}

/// A row from the `semesters` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SemesterRow {
    /// Semester UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: DateTime<Utc>,
    /// Last day.
    pub end_date: DateTime<Utc>,
    /// Budget at creation.
    pub initial_budget: Decimal,
    /// Running budget.
    pub current_budget: Decimal,
    /// Regular membership fee.
    pub membership_fee: Decimal,
    /// Discounted membership fee.
    pub membership_fee_discounted: Decimal,
    /// Fee per rebuy.
    pub rebuy_fee: Decimal,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl From<SemesterRow> for Semester {
    fn from(row: SemesterRow) -> Self {
        Self {
            id: SemesterId::from(row.id),
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            initial_budget: row.initial_budget,
            current_budget: row.current_budget,
            membership_fee: row.membership_fee,
            membership_fee_discounted: row.membership_fee_discounted,
            rebuy_fee: row.rebuy_fee,
            created_at: row.created_at,
        }
    }
}
