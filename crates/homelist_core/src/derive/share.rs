//! Plain-text pending list for messaging apps.

use crate::model::household::Category;
use crate::model::item::Item;

pub const ALL_DONE_MESSAGE: &str =
    "¡Todos los artículos de la lista de compras están completados! 🎉";
const SHARE_HEADER: &str = "🛒 Lista de Compras Pendiente:";

/// Pending units grouped by category in display order.
///
/// Returns [`ALL_DONE_MESSAGE`] when no active item has pending units.
pub fn share_text(items: &[Item]) -> String {
    let pending = items
        .iter()
        .filter(|item| item.is_active() && item.pending_quantity() > 0)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return ALL_DONE_MESSAGE.to_string();
    }

    let mut text = String::from(SHARE_HEADER);
    text.push('\n');
    for category in Category::ALL {
        let group = pending
            .iter()
            .filter(|item| item.category == category)
            .collect::<Vec<_>>();
        if group.is_empty() {
            continue;
        }

        let units: u64 = group
            .iter()
            .map(|item| u64::from(item.pending_quantity()))
            .sum();
        text.push_str(&format!("\n**{category} ({units}):**\n"));
        for item in group {
            text.push_str(&format!("- {} ({})\n", item.name, item.pending_quantity()));
        }
    }

    text.trim_end().to_string()
}
