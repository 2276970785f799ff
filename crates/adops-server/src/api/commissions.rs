use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adops_core::{aggregate, compute_commission, CommissionRecord, DailyEntry, Period};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CommissionQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(super) struct CommissionItem {
    pub operator: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub order_count: i64,
    pub roi: Decimal,
    pub commission_per_order: Decimal,
    pub total_commission: Decimal,
    pub status: String,
    pub computed_at: DateTime<Utc>,
}

impl From<adops_db::CommissionRecordRow> for CommissionItem {
    fn from(row: adops_db::CommissionRecordRow) -> Self {
        Self {
            operator: row.operator_slug,
            period_start: row.period_start,
            period_end: row.period_end,
            order_count: row.order_count,
            roi: row.roi,
            commission_per_order: row.commission_per_order,
            total_commission: row.total_commission,
            status: row.status,
            computed_at: row.computed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub records_written: usize,
}

/// Read the cached commission set for a period.
pub(super) async fn list_commissions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CommissionQuery>,
) -> Result<Json<ApiResponse<Vec<CommissionItem>>>, ApiError> {
    let rows = adops_db::list_commission_records(&state.pool, query.from, query.to)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CommissionItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Recompute the period's commissions from the raw entries and replace the
/// cached set in one transaction. Safe to repeat; a failed refresh leaves
/// the previous cache in place.
pub(super) async fn refresh_commissions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CommissionQuery>,
) -> Result<Json<ApiResponse<RefreshSummary>>, ApiError> {
    if query.from > query.to {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "'from' must not be after 'to'",
        ));
    }

    let rows = adops_db::list_entries(
        &state.pool,
        adops_db::EntryFilters {
            operator_slug: None,
            from: Some(query.from),
            to: Some(query.to),
            limit: None,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let entries: Vec<DailyEntry> = rows.iter().map(adops_db::DailyEntryRow::to_entry).collect();
    let period = Period::new(query.from, query.to);
    let records: Vec<CommissionRecord> = aggregate(&entries, period, state.fx_rate)
        .iter()
        .map(compute_commission)
        .collect();

    adops_db::replace_commission_records(&state.pool, query.from, query.to, &records)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(
        period_start = %query.from,
        period_end = %query.to,
        records = records.len(),
        "commission cache refreshed"
    );

    Ok(Json(ApiResponse {
        data: RefreshSummary {
            period_start: query.from,
            period_end: query.to,
            records_written: records.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
