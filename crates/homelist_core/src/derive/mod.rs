//! Pure read-side derivations over item snapshots.
//!
//! # Responsibility
//! - Turn a list of items into the views a client renders: filtered and
//!   ordered lists, dashboard figures, per-space progress, the activity
//!   feed and the shareable pending list.
//!
//! # Invariants
//! - Functions here never touch storage and never mutate their input.
//! - Soft-deleted items are hidden everywhere except the activity feed.

pub mod activity;
pub mod filter;
pub mod format;
pub mod share;
pub mod stats;

pub use activity::{activity_feed, ActivityEvent, ActivityKind, DEFAULT_ACTIVITY_LIMIT};
pub use filter::{
    category_counts, filter_items, sort_items, visible_items, CategoryCounts, ItemFilter,
    StatusFilter,
};
pub use format::{format_clp, format_relative_time, format_thousands, parse_price_input};
pub use share::{share_text, ALL_DONE_MESSAGE};
pub use stats::{
    category_progress, dashboard_stats, BudgetSummary, CategoryProgress, DashboardStats, Progress,
    RelevanceProgress,
};
