//! Database operations for the `daily_entries` table.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use adops_core::{DailyEntry, OperatorId};

use crate::DbError;

/// A row from the `daily_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyEntryRow {
    pub id: i64,
    pub entry_date: NaiveDate,
    pub operator_slug: String,
    pub ad_spend: Decimal,
    pub credit_card_amount: Decimal,
    pub order_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyEntryRow {
    /// Map the row into the canonical pipeline record.
    #[must_use]
    pub fn to_entry(&self) -> DailyEntry {
        DailyEntry {
            date: self.entry_date,
            operator: OperatorId::new(self.operator_slug.clone()),
            ad_spend: self.ad_spend,
            credit_card_amount: self.credit_card_amount,
            order_count: self.order_count,
        }
    }
}

/// Fields for inserting or updating a daily entry.
#[derive(Debug, Clone)]
pub struct NewEntry<'a> {
    pub entry_date: NaiveDate,
    pub operator_slug: &'a str,
    pub ad_spend: Decimal,
    pub credit_card_amount: Decimal,
    pub order_count: i64,
}

/// Input filters for entry listing.
///
/// `limit` is `None` to return everything in range.
#[derive(Debug, Clone, Default)]
pub struct EntryFilters<'a> {
    pub operator_slug: Option<&'a str>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

/// Inserts a daily entry and returns its internal `id`.
///
/// Multiple entries per (date, operator) are allowed; the aggregation
/// pipeline sums them.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_entry(pool: &PgPool, entry: &NewEntry<'_>) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO daily_entries \
             (entry_date, operator_slug, ad_spend, credit_card_amount, order_count) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(entry.entry_date)
    .bind(entry.operator_slug)
    .bind(entry.ad_spend)
    .bind(entry.credit_card_amount)
    .bind(entry.order_count)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Overwrites all mutable fields of an existing entry.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_entry(pool: &PgPool, id: i64, entry: &NewEntry<'_>) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE daily_entries SET \
             entry_date         = $2, \
             operator_slug      = $3, \
             ad_spend           = $4, \
             credit_card_amount = $5, \
             order_count        = $6, \
             updated_at         = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(entry.entry_date)
    .bind(entry.operator_slug)
    .bind(entry.ad_spend)
    .bind(entry.credit_card_amount)
    .bind(entry.order_count)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes an entry by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_entry(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let rows_affected = sqlx::query("DELETE FROM daily_entries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Fetches a single entry by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_entry(pool: &PgPool, id: i64) -> Result<DailyEntryRow, DbError> {
    sqlx::query_as::<_, DailyEntryRow>(
        "SELECT id, entry_date, operator_slug, ad_spend, credit_card_amount, \
                order_count, created_at, updated_at \
         FROM daily_entries \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Lists entries matching the filters, newest date first, id descending
/// within a date so repeated submissions keep a stable order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_entries(
    pool: &PgPool,
    filters: EntryFilters<'_>,
) -> Result<Vec<DailyEntryRow>, DbError> {
    let rows = sqlx::query_as::<_, DailyEntryRow>(
        "SELECT id, entry_date, operator_slug, ad_spend, credit_card_amount, \
                order_count, created_at, updated_at \
         FROM daily_entries \
         WHERE ($1::TEXT IS NULL OR operator_slug = $1) \
           AND ($2::DATE IS NULL OR entry_date >= $2) \
           AND ($3::DATE IS NULL OR entry_date <= $3) \
         ORDER BY entry_date DESC, id DESC \
         LIMIT COALESCE($4, 9223372036854775807)",
    )
    .bind(filters.operator_slug)
    .bind(filters.from)
    .bind(filters.to)
    .bind(filters.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
