//! Database operations for the `commission_records` cache table.
//!
//! The cache holds the output of the commission pipeline for a period so
//! dashboards can read it without recomputing. It is always refreshed as a
//! whole: the stored copy is overwritten, never patched row by row.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use adops_core::{CommissionRecord, CommissionStatus, OperatorId};

use crate::DbError;

/// A row from the `commission_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommissionRecordRow {
    pub id: i64,
    pub operator_slug: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub order_count: i64,
    pub roi: Decimal,
    pub commission_per_order: Decimal,
    pub total_commission: Decimal,
    pub status: String,
    pub computed_at: DateTime<Utc>,
}

impl CommissionRecordRow {
    /// Map the row back into the pipeline's record type.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] wrapping a decode error if the stored
    /// status string is not a known variant.
    pub fn to_record(&self) -> Result<CommissionRecord, DbError> {
        let status: CommissionStatus = self
            .status
            .parse()
            .map_err(|e: String| DbError::Sqlx(sqlx::Error::Decode(e.into())))?;
        Ok(CommissionRecord {
            operator: OperatorId::new(self.operator_slug.clone()),
            period_start: self.period_start,
            period_end: self.period_end,
            order_count: self.order_count,
            roi: self.roi,
            commission_per_order: self.commission_per_order,
            total_commission: self.total_commission,
            status,
        })
    }
}

/// Replaces the cached records for a period with a freshly computed set.
///
/// DELETE and INSERT run inside one transaction, so a reader never observes
/// the window between them and a failed insert rolls the delete back,
/// leaving the previous cache intact. Recomputing is idempotent; callers
/// retry by calling again.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn replace_commission_records(
    pool: &PgPool,
    period_start: NaiveDate,
    period_end: NaiveDate,
    records: &[CommissionRecord],
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM commission_records WHERE period_start = $1 AND period_end = $2")
        .bind(period_start)
        .bind(period_end)
        .execute(&mut *tx)
        .await?;

    for record in records {
        sqlx::query(
            "INSERT INTO commission_records \
                 (operator_slug, period_start, period_end, order_count, roi, \
                  commission_per_order, total_commission, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.operator.as_str())
        .bind(record.period_start)
        .bind(record.period_end)
        .bind(record.order_count)
        .bind(record.roi)
        .bind(record.commission_per_order)
        .bind(record.total_commission)
        .bind(record.status.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Lists the cached records for a period, highest commission first with the
/// same operator tie-break the ranking engine uses.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_commission_records(
    pool: &PgPool,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<Vec<CommissionRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, CommissionRecordRow>(
        "SELECT id, operator_slug, period_start, period_end, order_count, roi, \
                commission_per_order, total_commission, status, computed_at \
         FROM commission_records \
         WHERE period_start = $1 AND period_end = $2 \
         ORDER BY total_commission DESC, operator_slug ASC",
    )
    .bind(period_start)
    .bind(period_end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
