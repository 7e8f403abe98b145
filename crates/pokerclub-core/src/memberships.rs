//! Memberships and the budget side of membership fees.

use sqlx::{PgConnection, PgPool};

use pokerclub_db::{MembershipStore, SemesterStore};
use pokerclub_types::{Membership, MembershipId, SemesterId, UserId};

use crate::error::ServiceError;
use crate::tx::finish;

/// Input for [`MembershipService::create_membership`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMembership {
    /// Semester to join.
    pub semester_id: SemesterId,
    /// Joining user.
    pub user_id: UserId,
    /// Whether the fee has been paid.
    pub paid: bool,
    /// Whether the discounted fee applies.
    pub discounted: bool,
}

/// Creates and reads memberships.
pub struct MembershipService<'p> {
    pool: &'p PgPool,
}

impl<'p> MembershipService<'p> {
    /// Create a membership service over a connection pool.
    pub const fn new(pool: &'p PgPool) -> Self {
        Self { pool }
    }

    /// Create a membership. A paid membership adds its fee (regular or
    /// discounted) to the semester budget in the same transaction.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the semester does not exist.
    /// - [`ServiceError::InvalidRequest`] if the user already holds a
    ///   membership in the semester.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn create_membership(&self, new: NewMembership) -> Result<Membership, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let result = create_in_tx(&mut tx, new).await;
        let membership = finish(tx, "create_membership", result).await?;

        tracing::info!(
            membership_id = %membership.id,
            semester_id = %membership.semester_id,
            paid = membership.paid,
            discounted = membership.discounted,
            "Membership created"
        );
        Ok(membership)
    }

    /// Fetch one membership.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the membership does not exist.
    /// - [`ServiceError::Internal`] on persistence failure.
    pub async fn get_membership(
        &self,
        membership_id: MembershipId,
    ) -> Result<Membership, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        MembershipStore::new(&mut conn)
            .get(membership_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("membership", membership_id))
    }
}

async fn create_in_tx(
    conn: &mut PgConnection,
    new: NewMembership,
) -> Result<Membership, ServiceError> {
    let semester = SemesterStore::new(conn)
        .get(new.semester_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("semester", new.semester_id))?;

    let membership = MembershipStore::new(conn)
        .insert(
            MembershipId::new(),
            new.semester_id,
            new.user_id,
            new.paid,
            new.discounted,
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ServiceError::InvalidRequest(format!(
                    "user {} already holds a membership in semester {}",
                    new.user_id, new.semester_id
                ))
            } else {
                e.into()
            }
        })?;

    if membership.paid {
        let fee = semester.membership_fee_for(membership.discounted);
        SemesterStore::new(conn)
            .adjust_budget(semester.id, fee)
            .await?;
    }

    Ok(membership)
}
