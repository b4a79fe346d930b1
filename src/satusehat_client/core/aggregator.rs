use serde::Serialize;

use crate::satusehat_client::helpers::rounded_percentage;
use crate::satusehat_client::models::SyncCategory;

/// Percentage a category must reach before it stops needing attention.
pub const DEFAULT_ATTENTION_THRESHOLD: u8 = 100;

/// Combined view over all synchronized categories.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct AggregateSummary {
    pub overall_percentage: u8,
    /// Category with the lowest completion; the first one wins on ties.
    pub worst_category: Option<SyncCategory>,
}

impl AggregateSummary {
    /// True when the weakest category is below `threshold` percent.
    pub fn needs_attention(&self, threshold: u8) -> bool {
        self.worst_category
            .as_ref()
            .map(|category| category.percentage() < threshold)
            .unwrap_or(false)
    }
}

/// Combines per-category counters into an overall percentage and picks the
/// category most in need of attention.
pub fn aggregate(categories: &[SyncCategory]) -> AggregateSummary {
    let mut total: u64 = 0;
    let mut synced: u64 = 0;
    let mut worst: Option<(&SyncCategory, u8)> = None;

    for category in categories {
        total = total.saturating_add(category.total_records());
        synced = synced.saturating_add(category.synced_records());

        let percentage = category.percentage();
        // Strictly lower only, so ties keep the earlier category
        if worst.map(|(_, lowest)| percentage < lowest).unwrap_or(true) {
            worst = Some((category, percentage));
        }
    }

    AggregateSummary {
        overall_percentage: rounded_percentage(synced, total),
        worst_category: worst.map(|(category, _)| category.clone()),
    }
}
