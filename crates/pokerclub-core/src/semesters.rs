//! Semester accessor.

use rust_decimal::Decimal;
use sqlx::PgPool;

use pokerclub_db::SemesterStore;
use pokerclub_types::{NewSemester, Semester, SemesterId};

use crate::error::ServiceError;

/// Creates and reads semesters.
pub struct SemesterService<'p> {
    pool: &'p PgPool,
}

impl<'p> SemesterService<'p> {
    /// Create a semester service over a connection pool.
    pub const fn new(pool: &'p PgPool) -> Self {
        Self { pool }
    }

    /// Create a semester whose running budget starts at its initial budget.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidRequest`] for a blank name, an end before the
    ///   start, or a negative fee.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn create_semester(&self, new: &NewSemester) -> Result<Semester, ServiceError> {
        validate(new)?;

        let mut conn = self.pool.acquire().await?;
        let semester = SemesterStore::new(&mut conn)
            .insert(SemesterId::new(), new)
            .await?;

        tracing::info!(semester_id = %semester.id, name = %semester.name, "Semester created");
        Ok(semester)
    }

    /// Fetch one semester.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the semester does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn get_semester(&self, semester_id: SemesterId) -> Result<Semester, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        SemesterStore::new(&mut conn)
            .get(semester_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("semester", semester_id))
    }
}

fn validate(new: &NewSemester) -> Result<(), ServiceError> {
    if new.name.trim().is_empty() {
        return Err(ServiceError::InvalidRequest(
            "semester name must not be blank".to_owned(),
        ));
    }
    if new.end_date < new.start_date {
        return Err(ServiceError::InvalidRequest(
            "semester must not end before it starts".to_owned(),
        ));
    }
    let fees = [
        ("membership fee", new.membership_fee),
        ("discounted membership fee", new.membership_fee_discounted),
        ("rebuy fee", new.rebuy_fee),
    ];
    for (label, fee) in fees {
        if fee < Decimal::ZERO {
            return Err(ServiceError::InvalidRequest(format!(
                "{label} must not be negative, got {fee}"
            )));
        }
    }
    Ok(())
}
