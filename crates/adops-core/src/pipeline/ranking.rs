use super::{CommissionRecord, RankedEntry};

const TIER_TITLES: [&str; 3] = ["🥇 Top Earner", "🥈 Runner-Up", "🥉 Third Place"];
const TIER_DEFAULT: &str = "Keep trying";

fn tier_title(rank: u32) -> &'static str {
    TIER_TITLES
        .get(rank as usize - 1)
        .copied()
        .unwrap_or(TIER_DEFAULT)
}

/// Order commission records into a leaderboard.
///
/// Sorts by `total_commission` descending; equal totals tie-break by
/// operator id ascending so the order is deterministic rather than
/// whatever the input happened to be. Ranks are positional (sorted index
/// + 1): tied operators get consecutive ranks, not a shared one.
#[must_use]
pub fn rank(mut records: Vec<CommissionRecord>) -> Vec<RankedEntry> {
    records.sort_by(|a, b| {
        b.total_commission
            .cmp(&a.total_commission)
            .then_with(|| a.operator.cmp(&b.operator))
    });

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
            RankedEntry {
                rank,
                tier_title: tier_title(rank),
                record,
            }
        })
        .collect()
}
