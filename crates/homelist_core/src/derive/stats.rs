//! Dashboard and per-space progress aggregates.
//!
//! Soft-deleted items are excluded from every figure here.

use crate::model::household::{Category, Relevance};
use crate::model::item::Item;
use serde::Serialize;

/// Completed-over-total pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
}

impl Progress {
    /// Completion ratio in `0.0..=1.0`; 0 when there is nothing to count.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Whole-number percentage, rounded.
    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub total: i64,
    /// Price times purchased units.
    pub spent: i64,
    /// May be negative once the budget is exceeded.
    pub remaining: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelevanceProgress {
    pub relevance: Relevance,
    /// Items of this relevance; `completed` counts fully completed ones.
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Fully completed items over active items.
    pub progress: Progress,
    pub budget: BudgetSummary,
    /// High, Medium, Low.
    pub relevance: Vec<RelevanceProgress>,
}

impl DashboardStats {
    pub fn for_relevance(&self, relevance: Relevance) -> Progress {
        self.relevance
            .iter()
            .find(|entry| entry.relevance == relevance)
            .map(|entry| entry.progress)
            .unwrap_or_default()
    }
}

pub fn dashboard_stats(items: &[Item], budget: i64) -> DashboardStats {
    let active = items.iter().filter(|item| item.is_active());

    let mut progress = Progress::default();
    let mut spent = 0_i64;
    let mut relevance = Relevance::ALL.map(|relevance| RelevanceProgress {
        relevance,
        progress: Progress::default(),
    });

    for item in active {
        let done = u64::from(item.is_completed());
        progress.total += 1;
        progress.completed += done;
        spent = spent.saturating_add(item.spent());

        if let Some(entry) = relevance
            .iter_mut()
            .find(|entry| entry.relevance == item.relevance)
        {
            entry.progress.total += 1;
            entry.progress.completed += done;
        }
    }

    DashboardStats {
        progress,
        budget: BudgetSummary {
            total: budget,
            spent,
            remaining: budget.saturating_sub(spent),
        },
        relevance: relevance.to_vec(),
    }
}

/// Unit progress of one household space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub category: Category,
    /// Purchased units over total units.
    pub units: Progress,
}

/// Unit progress per category in display order, skipping empty spaces.
pub fn category_progress(items: &[Item]) -> Vec<CategoryProgress> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let mut units = Progress::default();
            let mut any = false;
            for item in items
                .iter()
                .filter(|item| item.is_active() && item.category == category)
            {
                any = true;
                units.total += u64::from(item.quantity.max(1));
                units.completed += u64::from(item.completed_quantity);
            }
            any.then_some(CategoryProgress { category, units })
        })
        .collect()
}
