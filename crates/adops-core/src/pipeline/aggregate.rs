use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::entry::DailyEntry;
use crate::operators::OperatorId;

use super::{OperatorAggregate, Period};

/// Sum daily entries into per-operator totals over an inclusive period.
///
/// Credit-card amounts are converted to USD per entry, before summation, so
/// that the totals do not accumulate rounding drift across many small rows.
/// `fx_rate` is local currency per USD and must be positive; the single
/// configured rate is injected here rather than read from a constant.
///
/// Operators with no matching entries are absent from the output. Use
/// [`with_full_roster`] when a complete roster is required. Output is sorted
/// by operator id.
#[must_use]
pub fn aggregate(entries: &[DailyEntry], period: Period, fx_rate: Decimal) -> Vec<OperatorAggregate> {
    let mut totals: BTreeMap<&OperatorId, (Decimal, Decimal, i64)> = BTreeMap::new();

    for entry in entries {
        if !period.contains(entry.date) {
            continue;
        }
        let converted = entry.credit_card_amount / fx_rate;
        let (spend, revenue, orders) = totals
            .entry(&entry.operator)
            .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        *spend += entry.ad_spend;
        *revenue += converted;
        *orders += entry.order_count;
    }

    totals
        .into_iter()
        .map(|(operator, (total_spend, total_revenue_converted, total_orders))| {
            OperatorAggregate {
                operator: operator.clone(),
                period_start: period.start,
                period_end: period.end,
                total_spend,
                total_revenue_converted,
                total_orders,
            }
        })
        .collect()
}

/// Union aggregates against the fixed roster, emitting zero rows for
/// operators with no entries in the period.
///
/// Roster order is preserved for the zero rows' placement: operators keep
/// their aggregate when present and get an all-zero aggregate otherwise.
#[must_use]
pub fn with_full_roster(
    aggregates: Vec<OperatorAggregate>,
    roster: &[OperatorId],
    period: Period,
) -> Vec<OperatorAggregate> {
    let mut by_operator: BTreeMap<OperatorId, OperatorAggregate> = aggregates
        .into_iter()
        .map(|a| (a.operator.clone(), a))
        .collect();

    roster
        .iter()
        .map(|operator| {
            by_operator.remove(operator).unwrap_or(OperatorAggregate {
                operator: operator.clone(),
                period_start: period.start,
                period_end: period.end,
                total_spend: Decimal::ZERO,
                total_revenue_converted: Decimal::ZERO,
                total_orders: 0,
            })
        })
        .collect()
}
