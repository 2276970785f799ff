use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use adops_core::{
    aggregate, compute_commission, rank, with_full_roster, DailyEntry, Period, RankedEntry,
};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct LeaderboardQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// When true, operators with no entries appear as zero rows at the
    /// bottom of the board.
    #[serde(default)]
    pub full_roster: bool,
}

/// Fetch the period's entries and run the pure pipeline over them.
///
/// Nothing is cached here; every call recomputes from the rows currently in
/// the store.
pub(super) async fn get_leaderboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<RankedEntry>>>, ApiError> {
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

    let mut aggregates = aggregate(&entries, period, state.fx_rate);
    if query.full_roster {
        aggregates = with_full_roster(aggregates, &state.roster, period);
    }

    let records = aggregates.iter().map(compute_commission).collect();
    let ranked = rank(records);

    Ok(Json(ApiResponse {
        data: ranked,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::api::test_support::{seed_entry, test_app};

    #[sqlx::test(migrations = "../../migrations")]
    async fn leaderboard_orders_operators_by_commission(pool: PgPool) {
        // alice: roi 1.0 over 10 orders → 70; bob: roi 0.9 over 10 orders → 50.
        seed_entry(&pool, 1, "alice", 100, 2000, 10).await;
        seed_entry(&pool, 2, "bob", 100, 1800, 10).await;

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leaderboard?from=2025-08-01&to=2025-08-31")
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
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["operator"].as_str(), Some("alice"));
        assert_eq!(data[0]["tier_title"].as_str(), Some("🥇 Top Earner"));
        assert_eq!(data[1]["operator"].as_str(), Some("bob"));
        assert_eq!(data[1]["rank"].as_u64(), Some(2));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn full_roster_includes_zero_rows(pool: PgPool) {
        seed_entry(&pool, 1, "alice", 100, 2000, 10).await;

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leaderboard?from=2025-08-01&to=2025-08-31&full_roster=true")
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
        // Test roster has alice, bob, carol.
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["operator"].as_str(), Some("alice"));
        assert_eq!(data[1]["status"].as_str(), Some("no_commission"));
        assert_eq!(data[2]["status"].as_str(), Some("no_commission"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn inverted_range_is_rejected(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leaderboard?from=2025-08-31&to=2025-08-01")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn empty_period_yields_empty_board(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/leaderboard?from=2025-08-01&to=2025-08-31")
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
        assert!(json["data"].as_array().expect("data array").is_empty());
    }
}
