//! Unit-of-work helper shared by the services.

use sqlx::{Postgres, Transaction};

use crate::error::ServiceError;

/// Commit `tx` if `result` is `Ok`, otherwise roll it back explicitly.
///
/// A failed rollback is logged and the original error is returned. The
/// connection is discarded by the pool in that case, which ends the
/// transaction server-side.
pub(crate) async fn finish<T>(
    tx: Transaction<'static, Postgres>,
    operation: &'static str,
    result: Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(operation, error = %rollback, "Rollback failed");
            } else {
                tracing::debug!(operation, error = %err, "Rolled back");
            }
            Err(err)
        }
    }
}
