use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adops_core::{DailyEntry, OperatorId};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct EntryItem {
    pub id: i64,
    pub date: NaiveDate,
    pub operator: String,
    pub ad_spend: Decimal,
    pub credit_card_amount: Decimal,
    pub order_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<adops_db::DailyEntryRow> for EntryItem {
    fn from(row: adops_db::DailyEntryRow) -> Self {
        Self {
            id: row.id,
            date: row.entry_date,
            operator: row.operator_slug,
            ad_spend: row.ad_spend,
            credit_card_amount: row.credit_card_amount,
            order_count: row.order_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct EntryListQuery {
    pub operator: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EntryBody {
    pub date: NaiveDate,
    pub operator: String,
    pub ad_spend: Decimal,
    pub credit_card_amount: Decimal,
    pub order_count: i64,
}

impl EntryBody {
    /// Boundary validation: everything is checked here so the pipeline and
    /// the store only ever see well-formed entries.
    fn validate(&self, state: &AppState, request_id: &str) -> Result<(), ApiError> {
        let candidate = DailyEntry {
            date: self.date,
            operator: OperatorId::new(self.operator.clone()),
            ad_spend: self.ad_spend,
            credit_card_amount: self.credit_card_amount,
            order_count: self.order_count,
        };
        candidate.validate().map_err(|e| {
            ApiError::new(request_id.to_string(), "validation_error", e.to_string())
        })?;

        if !state.roster.iter().any(|o| o.as_str() == self.operator) {
            return Err(ApiError::new(
                request_id.to_string(),
                "validation_error",
                format!("unknown operator: '{}'", self.operator),
            ));
        }
        Ok(())
    }
}

pub(super) async fn list_entries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<ApiResponse<Vec<EntryItem>>>, ApiError> {
    let rows = adops_db::list_entries(
        &state.pool,
        adops_db::EntryFilters {
            operator_slug: query.operator.as_deref(),
            from: query.from,
            to: query.to,
            limit: query.limit,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(EntryItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<EntryBody>,
) -> Result<Json<ApiResponse<EntryItem>>, ApiError> {
    body.validate(&state, &req_id.0)?;

    let id = adops_db::insert_entry(
        &state.pool,
        &adops_db::NewEntry {
            entry_date: body.date,
            operator_slug: &body.operator,
            ad_spend: body.ad_spend,
            credit_card_amount: body.credit_card_amount,
            order_count: body.order_count,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let row = adops_db::get_entry(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: EntryItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn update_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<EntryBody>,
) -> Result<Json<ApiResponse<EntryItem>>, ApiError> {
    body.validate(&state, &req_id.0)?;

    adops_db::update_entry(
        &state.pool,
        id,
        &adops_db::NewEntry {
            entry_date: body.date,
            operator_slug: &body.operator,
            ad_spend: body.ad_spend,
            credit_card_amount: body.credit_card_amount,
            order_count: body.order_count,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let row = adops_db::get_entry(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: EntryItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    adops_db::delete_entry(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": id }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::api::test_support::{seed_entry, test_app};

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_entry_persists_and_echoes_row(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(post_json(
                "/api/v1/entries",
                r#"{"date":"2025-08-01","operator":"alice","ad_spend":"100.00","credit_card_amount":"2000.00","order_count":10}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["operator"].as_str(), Some("alice"));
        assert_eq!(json["data"]["ad_spend"].as_str(), Some("100.00"));
        assert!(json["data"]["id"].as_i64().is_some());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_entry_rejects_negative_spend(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(post_json(
                "/api/v1/entries",
                r#"{"date":"2025-08-01","operator":"alice","ad_spend":"-1","credit_card_amount":"0","order_count":0}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_entry_rejects_unknown_operator(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(post_json(
                "/api/v1/entries",
                r#"{"date":"2025-08-01","operator":"mallory","ad_spend":"10","credit_card_amount":"0","order_count":0}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_entries_filters_by_operator(pool: PgPool) {
        seed_entry(&pool, 1, "alice", 100, 2000, 10).await;
        seed_entry(&pool, 2, "bob", 50, 900, 4).await;

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/entries?operator=bob")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["operator"].as_str(), Some("bob"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn delete_missing_entry_is_404(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/v1/entries/424242")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
