//! The spend → commission → ranking pipeline.
//!
//! Each stage is a pure function over the previous stage's output; nothing
//! here performs I/O or keeps state between calls. The database rows are
//! fetched by the caller, and any caching of the results is the caller's
//! explicitly-owned store.

mod aggregate;
mod commission;
mod ranking;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entry::DailyEntry;
use crate::operators::OperatorId;

pub use aggregate::{aggregate, with_full_roster};
pub use commission::compute_commission;
pub use ranking::rank;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Per-operator totals over a period, derived from daily entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorAggregate {
    pub operator: OperatorId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Total ad spend, USD.
    pub total_spend: Decimal,
    /// Total credit-card revenue after FX conversion, USD.
    pub total_revenue_converted: Decimal,
    pub total_orders: i64,
}

impl OperatorAggregate {
    /// Revenue over spend; zero when there was no spend.
    #[must_use]
    pub fn roi(&self) -> Decimal {
        if self.total_spend > Decimal::ZERO {
            self.total_revenue_converted / self.total_spend
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Calculated,
    NoCommission,
}

impl CommissionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CommissionStatus::Calculated => "calculated",
            CommissionStatus::NoCommission => "no_commission",
        }
    }
}

impl std::str::FromStr for CommissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calculated" => Ok(CommissionStatus::Calculated),
            "no_commission" => Ok(CommissionStatus::NoCommission),
            other => Err(format!("unknown commission status: '{other}'")),
        }
    }
}

/// One operator's commission for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRecord {
    pub operator: OperatorId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub order_count: i64,
    /// Unrounded ROI; display rounding is the presentation layer's concern.
    pub roi: Decimal,
    /// Flat per-order bonus, RMB.
    pub commission_per_order: Decimal,
    pub total_commission: Decimal,
    pub status: CommissionStatus,
}

/// A commission record with its leaderboard position attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// 1-based position; ties get consecutive ranks, see [`rank`].
    pub rank: u32,
    pub tier_title: &'static str,
    #[serde(flatten)]
    pub record: CommissionRecord,
}

/// Full pipeline: aggregate entries, compute commissions, rank.
///
/// Pure and idempotent; calling it twice with the same input yields the
/// same output.
#[must_use]
pub fn leaderboard(entries: &[DailyEntry], period: Period, fx_rate: Decimal) -> Vec<RankedEntry> {
    let aggregates = aggregate(entries, period, fx_rate);
    let records: Vec<CommissionRecord> = aggregates.iter().map(compute_commission).collect();
    rank(records)
}
