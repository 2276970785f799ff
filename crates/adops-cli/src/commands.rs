//! Command handlers, called from `main` after the pool and config are
//! established. `leaderboard` and `export` are read-only; `refresh` rewrites
//! the commission cache for the requested period.

use chrono::NaiveDate;
use std::path::Path;

use adops_core::{
    aggregate, compute_commission, rank, with_full_roster, AppConfig, CommissionRecord,
    DailyEntry, Period,
};

/// Print the ranked commission table for a period.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded or the database query fails.
pub(crate) async fn run_leaderboard(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    from: NaiveDate,
    to: NaiveDate,
    full_roster: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(from <= to, "--from must not be after --to");

    let entries = fetch_entries(pool, from, to).await?;
    let period = Period::new(from, to);

    let mut aggregates = aggregate(&entries, period, config.fx_rate);
    if full_roster {
        let operators = adops_core::load_operators(&config.operators_path)?;
        aggregates = with_full_roster(aggregates, &operators.ids(), period);
    }

    let records: Vec<CommissionRecord> = aggregates.iter().map(compute_commission).collect();
    let ranked = rank(records);

    if ranked.is_empty() {
        println!("no entries between {from} and {to}");
        return Ok(());
    }

    let header = format!(
        "{:<6}{:<16}{:<9}{:<9}{:<12}TITLE",
        "RANK", "OPERATOR", "ORDERS", "ROI", "COMMISSION"
    );
    println!("{header}");
    for entry in &ranked {
        println!(
            "{:<6}{:<16}{:<9}{:<9.4}{:<12}{}",
            entry.rank,
            entry.record.operator,
            entry.record.order_count,
            entry.record.roi.round_dp(4),
            entry.record.total_commission,
            entry.tier_title
        );
    }

    Ok(())
}

/// Recompute the period's commissions and replace the cached set.
///
/// # Errors
///
/// Returns an error if the database read or the transactional replace fails.
pub(crate) async fn run_refresh(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<()> {
    anyhow::ensure!(from <= to, "--from must not be after --to");

    let entries = fetch_entries(pool, from, to).await?;
    let period = Period::new(from, to);
    let records: Vec<CommissionRecord> = aggregate(&entries, period, config.fx_rate)
        .iter()
        .map(compute_commission)
        .collect();

    adops_db::replace_commission_records(pool, from, to, &records).await?;
    println!(
        "replaced commission cache for {from}..{to}: {} record(s)",
        records.len()
    );

    Ok(())
}

/// Write entries in range as CSV to a file, or stdout when no path given.
///
/// # Errors
///
/// Returns an error if the database query or the write fails.
pub(crate) async fn run_export(
    pool: &sqlx::PgPool,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let rows = adops_db::list_entries(
        pool,
        adops_db::EntryFilters {
            operator_slug: None,
            from,
            to,
            limit: None,
        },
    )
    .await?;

    let mut writer: csv::Writer<Box<dyn std::io::Write>> = match out {
        Some(path) => csv::Writer::from_writer(Box::new(std::fs::File::create(path)?)),
        None => csv::Writer::from_writer(Box::new(std::io::stdout())),
    };

    writer.write_record([
        "date",
        "operator",
        "ad_spend",
        "credit_card_amount",
        "order_count",
    ])?;
    for row in &rows {
        writer.write_record([
            row.entry_date.to_string(),
            row.operator_slug.clone(),
            row.ad_spend.to_string(),
            row.credit_card_amount.to_string(),
            row.order_count.to_string(),
        ])?;
    }
    writer.flush()?;

    if let Some(path) = out {
        eprintln!("wrote {} row(s) to {}", rows.len(), path.display());
    }

    Ok(())
}

async fn fetch_entries(
    pool: &sqlx::PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<DailyEntry>> {
    let rows = adops_db::list_entries(
        pool,
        adops_db::EntryFilters {
            operator_slug: None,
            from: Some(from),
            to: Some(to),
            limit: None,
        },
    )
    .await?;
    Ok(rows.iter().map(adops_db::DailyEntryRow::to_entry).collect())
}
