use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operators::OperatorId;

/// One day's submission for one operator.
///
/// This is the canonical record shape; anything arriving from an external
/// table or request body is mapped into it at the boundary before it can
/// reach the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub operator: OperatorId,
    /// Ad spend in the reporting currency (USD).
    pub ad_spend: Decimal,
    /// Credit-card revenue in the local currency (MXN), pre-conversion.
    pub credit_card_amount: Decimal,
    pub order_count: i64,
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("ad_spend must be non-negative, got {0}")]
    NegativeAdSpend(Decimal),
    #[error("credit_card_amount must be non-negative, got {0}")]
    NegativeCreditCardAmount(Decimal),
    #[error("order_count must be non-negative, got {0}")]
    NegativeOrderCount(i64),
}

impl DailyEntry {
    /// Check the non-negativity invariants.
    ///
    /// Callers feeding the pipeline from untrusted input (API bodies, CSV)
    /// must validate first; the pipeline itself assumes validated entries.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError`] naming the first violated field.
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.ad_spend < Decimal::ZERO {
            return Err(EntryError::NegativeAdSpend(self.ad_spend));
        }
        if self.credit_card_amount < Decimal::ZERO {
            return Err(EntryError::NegativeCreditCardAmount(self.credit_card_amount));
        }
        if self.order_count < 0 {
            return Err(EntryError::NegativeOrderCount(self.order_count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DailyEntry {
        DailyEntry {
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            operator: OperatorId::from("alice"),
            ad_spend: Decimal::new(10_000, 2),
            credit_card_amount: Decimal::new(200_000, 2),
            order_count: 10,
        }
    }

    #[test]
    fn valid_entry_passes() {
        assert!(entry().validate().is_ok());
    }

    #[test]
    fn negative_spend_is_rejected() {
        let mut e = entry();
        e.ad_spend = Decimal::new(-1, 0);
        assert!(matches!(
            e.validate(),
            Err(EntryError::NegativeAdSpend(_))
        ));
    }

    #[test]
    fn negative_credit_card_amount_is_rejected() {
        let mut e = entry();
        e.credit_card_amount = Decimal::new(-50, 2);
        assert!(matches!(
            e.validate(),
            Err(EntryError::NegativeCreditCardAmount(_))
        ));
    }

    #[test]
    fn negative_order_count_is_rejected() {
        let mut e = entry();
        e.order_count = -1;
        assert!(matches!(
            e.validate(),
            Err(EntryError::NegativeOrderCount(-1))
        ));
    }

    #[test]
    fn entry_serializes_with_string_decimals() {
        let json = serde_json::to_value(entry()).expect("serialize");
        assert_eq!(json["operator"], "alice");
        assert_eq!(json["ad_spend"], "100.00");
    }
}
