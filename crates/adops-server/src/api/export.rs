use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub operator: Option<String>,
}

/// Stream the period's entries as a CSV attachment.
pub(super) async fn export_entries_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let rows = adops_db::list_entries(
        &state.pool,
        adops_db::EntryFilters {
            operator_slug: query.operator.as_deref(),
            from: query.from,
            to: query.to,
            limit: None,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let csv_bytes = write_entries_csv(&rows)
        .map_err(|e| ApiError::new(req_id.0.clone(), "internal_error", e.to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"daily_entries.csv\"".to_string(),
            ),
        ],
        csv_bytes,
    )
        .into_response())
}

fn write_entries_csv(rows: &[adops_db::DailyEntryRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "date",
        "operator",
        "ad_spend",
        "credit_card_amount",
        "order_count",
    ])?;
    for row in rows {
        writer.write_record([
            row.entry_date.to_string(),
            row.operator_slug.clone(),
            row.ad_spend.to_string(),
            row.credit_card_amount.to_string(),
            row.order_count.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}
