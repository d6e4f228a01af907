//! List filtering, ordering and per-category counts.

use crate::model::household::{Category, Relevance};
use crate::model::item::Item;
use serde::Serialize;
use std::cmp::Ordering;

/// Completion status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "todos" => Some(Self::All),
            "pending" | "pendientes" => Some(Self::Pending),
            "completed" | "done" | "completados" => Some(Self::Completed),
            _ => None,
        }
    }

    fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !item.is_completed(),
            Self::Completed => item.is_completed(),
        }
    }
}

/// Criteria for the visible checklist.
///
/// `None` category and an empty relevance set mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<Category>,
    pub relevances: Vec<Relevance>,
    pub search: String,
    pub status: StatusFilter,
}

impl ItemFilter {
    /// Whether `item` passes every criterion. Soft-deleted items never do.
    pub fn matches(&self, item: &Item) -> bool {
        if item.is_deleted {
            return false;
        }
        if self.category.is_some_and(|category| category != item.category) {
            return false;
        }
        if !self.relevances.is_empty() && !self.relevances.contains(&item.relevance) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !item.name.to_lowercase().contains(&needle) {
            return false;
        }
        self.status.matches(item)
    }
}

/// Items passing `filter`, in input order.
pub fn filter_items(items: &[Item], filter: &ItemFilter) -> Vec<Item> {
    items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect()
}

/// Orders items for display.
///
/// Pending items come first, by relevance rank then name. Completed items
/// follow, by name only. Names compare case-insensitively; id breaks ties.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare_for_display);
}

fn compare_for_display(a: &Item, b: &Item) -> Ordering {
    a.is_completed()
        .cmp(&b.is_completed())
        .then_with(|| {
            if a.is_completed() {
                Ordering::Equal
            } else {
                a.relevance.rank().cmp(&b.relevance.rank())
            }
        })
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filtered and display-ordered view.
pub fn visible_items(items: &[Item], filter: &ItemFilter) -> Vec<Item> {
    let mut visible = filter_items(items, filter);
    sort_items(&mut visible);
    visible
}

/// Item counts per category for filter chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub total: usize,
    /// Every category in display order, zero when empty.
    pub per_category: Vec<(Category, usize)>,
}

impl CategoryCounts {
    pub fn count(&self, category: Category) -> usize {
        self.per_category
            .iter()
            .find(|(current, _)| *current == category)
            .map_or(0, |(_, count)| *count)
    }
}

/// Counts `items` per category. Callers pass an already filtered list.
pub fn category_counts(items: &[Item]) -> CategoryCounts {
    let per_category = Category::ALL
        .into_iter()
        .map(|category| {
            let count = items.iter().filter(|item| item.category == category).count();
            (category, count)
        })
        .collect();
    CategoryCounts {
        total: items.len(),
        per_category,
    }
}
