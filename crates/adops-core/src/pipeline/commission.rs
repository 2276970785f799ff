use rust_decimal::Decimal;

use super::{CommissionRecord, CommissionStatus, OperatorAggregate};

/// ROI at or above this earns the top per-order rate.
const ROI_TOP_THRESHOLD: Decimal = Decimal::ONE;
/// ROI at or above this (but below the top threshold) earns the mid rate.
const ROI_MID_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Per-order bonus amounts, RMB.
const RATE_TOP: Decimal = Decimal::from_parts(7, 0, 0, false, 0);
const RATE_MID: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Decimal places used for the threshold comparison. A true ROI of exactly
/// 1.0 can arrive as 0.99999999 after division; comparing a rounded copy
/// keeps the boundary from flapping. The stored ROI stays unrounded.
const ROI_COMPARE_DP: u32 = 4;

/// Map an operator's aggregate onto the tiered commission rule.
///
/// Deterministic and total: zero spend means ROI 0, which lands in the
/// no-commission tier rather than being an error. Inputs are assumed
/// pre-validated non-negative; the aggregator's sum-of-non-negatives
/// contract guarantees that.
#[must_use]
pub fn compute_commission(aggregate: &OperatorAggregate) -> CommissionRecord {
    let roi = aggregate.roi();
    let compare_roi = roi.round_dp(ROI_COMPARE_DP);

    let (commission_per_order, status) = if compare_roi >= ROI_TOP_THRESHOLD {
        (RATE_TOP, CommissionStatus::Calculated)
    } else if compare_roi >= ROI_MID_THRESHOLD {
        (RATE_MID, CommissionStatus::Calculated)
    } else {
        (Decimal::ZERO, CommissionStatus::NoCommission)
    };

    CommissionRecord {
        operator: aggregate.operator.clone(),
        period_start: aggregate.period_start,
        period_end: aggregate.period_end,
        order_count: aggregate.total_orders,
        roi,
        commission_per_order,
        total_commission: Decimal::from(aggregate.total_orders) * commission_per_order,
        status,
    }
}
