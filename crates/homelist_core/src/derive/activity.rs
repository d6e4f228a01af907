//! Recent-activity feed built from item lifecycle stamps.

use crate::derive::format::format_relative_time;
use crate::model::household::User;
use crate::model::item::{Item, ItemId};
use serde::Serialize;

/// Number of events shown by default.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Added,
    Completed,
    Deleted,
}

impl ActivityKind {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Added => "agregó",
            Self::Completed => "completó",
            Self::Deleted => "eliminó",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEvent {
    pub item_id: ItemId,
    pub kind: ActivityKind,
    pub user: User,
    pub item_name: String,
    /// Unix epoch milliseconds.
    pub at_ms: i64,
}

impl ActivityEvent {
    /// `"Valeria completó Sofá · hace 2 h."`
    pub fn describe(&self, now_ms: i64) -> String {
        format!(
            "{} {} {} · {}",
            self.user,
            self.kind.verb(),
            self.item_name,
            format_relative_time(self.at_ms, now_ms)
        )
    }
}

/// Newest-first events over every item, tombstones included.
///
/// An event is emitted only when both its actor and timestamp are known.
/// Completion events require the item to still be fully completed.
pub fn activity_feed(items: &[Item], limit: usize) -> Vec<ActivityEvent> {
    let mut events = Vec::new();

    for item in items {
        let mut push = |kind, user: Option<User>, at_ms: Option<i64>| {
            if let (Some(user), Some(at_ms)) = (user, at_ms) {
                events.push(ActivityEvent {
                    item_id: item.id,
                    kind,
                    user,
                    item_name: item.name.clone(),
                    at_ms,
                });
            }
        };

        push(ActivityKind::Added, item.added_by, item.created_at);
        if item.is_completed() {
            push(ActivityKind::Completed, item.completed_by, item.completed_at);
        }
        if item.is_deleted {
            push(ActivityKind::Deleted, item.deleted_by, item.deleted_at);
        }
    }

    events.sort_by(|a, b| b.at_ms.cmp(&a.at_ms));
    events.truncate(limit);
    events
}
