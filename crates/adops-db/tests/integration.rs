//! Offline unit tests for adops-db pool configuration and row types.
//! These tests do not require a live database connection.

use adops_core::{AppConfig, Environment};
use adops_db::{CommissionRecordRow, DailyEntryRow, PoolConfig};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        operators_path: PathBuf::from("./config/operators.yaml"),
        fx_rate: Decimal::new(20, 0),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`DailyEntryRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn daily_entry_row_has_expected_fields() {
    let row = DailyEntryRow {
        id: 1_i64,
        entry_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        operator_slug: "alice".to_string(),
        ad_spend: Decimal::new(100, 0),
        credit_card_amount: Decimal::new(2000, 0),
        order_count: 10_i64,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.operator_slug, "alice");
    assert_eq!(row.order_count, 10);
    assert_eq!(row.to_entry().operator.as_str(), "alice");
}

/// Compile-time smoke test: confirm that [`CommissionRecordRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn commission_record_row_has_expected_fields() {
    let row = CommissionRecordRow {
        id: 3_i64,
        operator_slug: "bob".to_string(),
        period_start: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        period_end: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        order_count: 4_i64,
        roi: Decimal::new(9, 1),
        commission_per_order: Decimal::new(5, 0),
        total_commission: Decimal::new(20, 0),
        status: "calculated".to_string(),
        computed_at: Utc::now(),
    };

    assert_eq!(row.id, 3);
    assert_eq!(row.status, "calculated");
    let record = row.to_record().expect("status parses");
    assert_eq!(record.total_commission, Decimal::new(20, 0));
}
