//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose checklist use-cases to Dart via FRB as sync calls.
//! - Translate wire strings into core enums and core errors into envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every DB-backed call opens, migrates and drops its own connection.
//! - Enum values cross the boundary as their storage strings
//!   (`"Cocina"`, `"Alta"`, `"Valeria"`).

use homelist_core::db::open_db;
use homelist_core::derive::{
    activity_feed, category_progress, dashboard_stats, share_text, visible_items, ActivityKind,
    ItemFilter, StatusFilter, DEFAULT_ACTIVITY_LIMIT,
};
use homelist_core::{
    accept_suggestion, core_version as core_version_inner, init_logging as init_logging_inner,
    migrate_legacy_documents, ping as ping_inner, AppConfig, BudgetService,
    CatalogSuggestionProvider, Category, Item, ItemPatch, ItemService, NewItem, Relevance,
    SqliteItemRepository, SqliteMetadataRepository, SuggestedItem, SuggestionService, User,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const ACTIVITY_LIMIT_MAX: u32 = 50;
static CHECKLIST_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One checklist row as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub item_id: String,
    pub name: String,
    pub category: String,
    /// Short label for chips and cards.
    pub category_label: String,
    pub relevance: String,
    pub price: i64,
    pub quantity: u32,
    pub completed_quantity: u32,
    pub is_completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<i64>,
    pub added_by: Option<String>,
    pub created_at: Option<i64>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id.to_string(),
            name: item.name.clone(),
            category: item.category.as_str().to_string(),
            category_label: item.category.label().to_string(),
            relevance: item.relevance.as_str().to_string(),
            price: item.price,
            quantity: item.quantity,
            completed_quantity: item.completed_quantity,
            is_completed: item.is_completed(),
            completed_by: item.completed_by.map(|user| user.as_str().to_string()),
            completed_at: item.completed_at,
            added_by: item.added_by.map(|user| user.as_str().to_string()),
            created_at: item.created_at,
        }
    }
}

/// Filtered, display-ordered checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistResponse {
    pub ok: bool,
    pub items: Vec<ItemView>,
    pub message: String,
}

/// Generic action response envelope for checklist writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected item ID, when the action targets one item.
    pub item_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ItemActionResponse {
    fn success(message: impl Into<String>, item_id: Option<String>) -> Self {
        Self {
            ok: true,
            item_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetResponse {
    pub ok: bool,
    pub budget: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    /// Relevance or category storage value; empty for overall progress.
    pub key: String,
    pub label: String,
    pub completed: u64,
    pub total: u64,
    pub percent: u8,
}

/// Dashboard cards plus per-space progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub progress: ProgressView,
    pub budget_total: i64,
    pub budget_spent: i64,
    pub budget_remaining: i64,
    pub relevance: Vec<ProgressView>,
    pub categories: Vec<ProgressView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityView {
    pub item_id: String,
    /// `added|completed|deleted`.
    pub kind: String,
    pub user: String,
    pub item_name: String,
    pub at_ms: i64,
    /// Ready-to-render sentence with relative time.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityResponse {
    pub ok: bool,
    pub items: Vec<ActivityView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    pub name: String,
    pub relevance: String,
    pub price: i64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionsResponse {
    pub ok: bool,
    pub items: Vec<SuggestionView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTextResponse {
    pub ok: bool,
    pub text: String,
    pub message: String,
}

/// Lists active items matching the given filters.
///
/// Empty `category`, empty `relevances` and empty `search` mean "any";
/// `status` is `all|pending|completed` (empty means `all`).
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_list(
    category: Option<String>,
    relevances: Vec<String>,
    search: String,
    status: String,
) -> ChecklistResponse {
    let filter = match build_filter(category, relevances, search, status) {
        Ok(filter) => filter,
        Err(err) => {
            return ChecklistResponse {
                ok: false,
                items: Vec::new(),
                message: format!("checklist_list failed: {err}"),
            }
        }
    };

    match with_connection(|conn| item_service(conn)?.list_all().map_err(|err| err.to_string())) {
        Ok(items) => {
            let items = visible_items(&items, &filter)
                .iter()
                .map(ItemView::from)
                .collect::<Vec<_>>();
            ChecklistResponse {
                ok: true,
                message: format!("{} item(s).", items.len()),
                items,
            }
        }
        Err(err) => ChecklistResponse {
            ok: false,
            items: Vec::new(),
            message: format!("checklist_list failed: {err}"),
        },
    }
}

/// Adds one item on behalf of `actor`.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_add_item(
    name: String,
    category: String,
    relevance: String,
    price: i64,
    quantity: u32,
    actor: String,
) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let new_item = NewItem {
            quantity,
            ..NewItem::new(
                name,
                parse_category(&category)?,
                parse_relevance(&relevance)?,
                price,
            )
        };
        let actor = parse_user(&actor)?;
        item_service(conn)?
            .add_item(new_item, actor)
            .map_err(|err| err.to_string())
    });
    item_action("checklist_add_item", "Item added.", result)
}

/// Sets purchased units of one item.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_update_completion(
    item_id: String,
    completed_quantity: u32,
    actor: String,
) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let id = parse_item_id(&item_id)?;
        let actor = parse_user(&actor)?;
        item_service(conn)?
            .update_completion(id, completed_quantity, actor)
            .map_err(|err| err.to_string())
    });
    item_action("checklist_update_completion", "Completion updated.", result)
}

/// Flips an item between fully completed and untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_toggle(item_id: String, actor: String) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let id = parse_item_id(&item_id)?;
        let actor = parse_user(&actor)?;
        item_service(conn)?
            .toggle_complete(id, actor)
            .map_err(|err| err.to_string())
    });
    item_action("checklist_toggle", "Item toggled.", result)
}

/// Completes a zero-price item after the price was asked for.
///
/// `price` is free text as typed (`"$24.990"`).
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_complete_with_price(
    item_id: String,
    price: String,
    actor: String,
) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let id = parse_item_id(&item_id)?;
        let actor = parse_user(&actor)?;
        let price = homelist_core::derive::parse_price_input(&price)
            .ok_or_else(|| format!("invalid price `{price}`"))?;
        item_service(conn)?
            .complete_with_price(id, price, actor)
            .map_err(|err| err.to_string())
    });
    item_action("checklist_complete_with_price", "Item completed.", result)
}

/// Applies a partial edit; `None` keeps the stored value.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_edit_item(
    item_id: String,
    name: Option<String>,
    category: Option<String>,
    relevance: Option<String>,
    price: Option<i64>,
    quantity: Option<u32>,
    added_by: Option<String>,
    completed_by: Option<String>,
) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let id = parse_item_id(&item_id)?;
        let patch = ItemPatch {
            name,
            category: category.as_deref().map(parse_category).transpose()?,
            relevance: relevance.as_deref().map(parse_relevance).transpose()?,
            price,
            quantity,
            added_by: added_by.as_deref().map(parse_user).transpose()?,
            completed_by: completed_by.as_deref().map(parse_user).transpose()?,
        };
        item_service(conn)?
            .edit_item(id, patch)
            .map_err(|err| err.to_string())
    });
    item_action("checklist_edit_item", "Item updated.", result)
}

/// Soft-deletes the selected items in one batch.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_items(item_ids: Vec<String>, actor: String) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let ids = item_ids
            .iter()
            .map(|raw| parse_item_id(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let actor = parse_user(&actor)?;
        item_service(conn)?
            .delete_items(&ids, actor)
            .map_err(|err| err.to_string())?;
        Ok(ids.len())
    });
    match result {
        Ok(count) => ItemActionResponse::success(format!("Deleted {count} item(s)."), None),
        Err(err) => ItemActionResponse::failure(format!("checklist_delete_items failed: {err}")),
    }
}

/// Inserts the starter catalog into an empty checklist.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_seed(actor: String) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let actor = parse_user(&actor)?;
        let metadata = SqliteMetadataRepository::try_new(conn).map_err(|err| err.to_string())?;
        item_service(conn)?
            .seed_if_empty(&metadata, actor)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(inserted) => ItemActionResponse::success(format!("Seeded {inserted} item(s)."), None),
        Err(err) => ItemActionResponse::failure(format!("checklist_seed failed: {err}")),
    }
}

/// Imports an exported JSON array of legacy item documents once.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_import_legacy(json: String, actor: String) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let actor = parse_user(&actor)?;
        migrate_legacy_documents(conn, &json, actor).map_err(|err| err.to_string())
    });
    match result {
        Ok(report) if report.skipped_marker => {
            ItemActionResponse::success("Legacy import already done.", None)
        }
        Ok(report) => ItemActionResponse::success(
            format!(
                "Imported {} item(s), converted {}, skipped {} existing.",
                report.imported, report.converted, report.already_present
            ),
            None,
        ),
        Err(err) => ItemActionResponse::failure(format!("checklist_import_legacy failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn budget_get() -> BudgetResponse {
    budget_response(
        "budget_get",
        with_connection(|conn| budget_service(conn)?.budget().map_err(|err| err.to_string())),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn budget_set(value: i64) -> BudgetResponse {
    budget_response(
        "budget_set",
        with_connection(|conn| {
            budget_service(conn)?
                .set_budget(value)
                .map_err(|err| err.to_string())
        }),
    )
}

/// Dashboard figures over active items.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_snapshot() -> DashboardResponse {
    let result = with_connection(|conn| {
        let items = item_service(conn)?
            .list_visible()
            .map_err(|err| err.to_string())?;
        let budget = budget_service(conn)?
            .budget()
            .map_err(|err| err.to_string())?;
        Ok((items, budget))
    });

    match result {
        Ok((items, budget)) => {
            let stats = dashboard_stats(&items, budget);
            DashboardResponse {
                ok: true,
                progress: progress_view("", "Progreso", stats.progress),
                budget_total: stats.budget.total,
                budget_spent: stats.budget.spent,
                budget_remaining: stats.budget.remaining,
                relevance: stats
                    .relevance
                    .iter()
                    .map(|entry| {
                        progress_view(
                            entry.relevance.as_str(),
                            entry.relevance.as_str(),
                            entry.progress,
                        )
                    })
                    .collect(),
                categories: category_progress(&items)
                    .iter()
                    .map(|entry| {
                        progress_view(
                            entry.category.as_str(),
                            entry.category.label(),
                            entry.units,
                        )
                    })
                    .collect(),
                message: "ok".to_string(),
            }
        }
        Err(err) => DashboardResponse {
            ok: false,
            progress: progress_view("", "Progreso", Default::default()),
            budget_total: 0,
            budget_spent: 0,
            budget_remaining: 0,
            relevance: Vec::new(),
            categories: Vec::new(),
            message: format!("dashboard_snapshot failed: {err}"),
        },
    }
}

/// Recent add/complete/delete events, newest first.
///
/// `limit` defaults to 7 and is capped at 50.
#[flutter_rust_bridge::frb(sync)]
pub fn activity_recent(limit: Option<u32>) -> ActivityResponse {
    let limit = normalize_activity_limit(limit);
    match with_connection(|conn| item_service(conn)?.list_all().map_err(|err| err.to_string())) {
        Ok(items) => {
            let now = homelist_core::clock::now_epoch_ms();
            let events = activity_feed(&items, limit as usize)
                .into_iter()
                .map(|event| ActivityView {
                    item_id: event.item_id.to_string(),
                    kind: activity_kind(event.kind).to_string(),
                    user: event.user.as_str().to_string(),
                    description: event.describe(now),
                    item_name: event.item_name,
                    at_ms: event.at_ms,
                })
                .collect::<Vec<_>>();
            ActivityResponse {
                ok: true,
                message: format!("{} event(s).", events.len()),
                items: events,
            }
        }
        Err(err) => ActivityResponse {
            ok: false,
            items: Vec::new(),
            message: format!("activity_recent failed: {err}"),
        },
    }
}

/// Pending list formatted for messaging apps.
#[flutter_rust_bridge::frb(sync)]
pub fn share_pending_text() -> ShareTextResponse {
    match with_connection(|conn| item_service(conn)?.list_visible().map_err(|err| err.to_string())) {
        Ok(items) => ShareTextResponse {
            ok: true,
            text: share_text(&items),
            message: "ok".to_string(),
        },
        Err(err) => ShareTextResponse {
            ok: false,
            text: String::new(),
            message: format!("share_pending_text failed: {err}"),
        },
    }
}

/// Offline suggestions for `category`, skipping items already listed.
#[flutter_rust_bridge::frb(sync)]
pub fn suggestions_for(category: String) -> SuggestionsResponse {
    let result = with_connection(|conn| {
        let category = parse_category(&category)?;
        let items = item_service(conn)?
            .list_visible()
            .map_err(|err| err.to_string())?;
        SuggestionService::new(CatalogSuggestionProvider::excluding_items(&items))
            .suggest(category)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(suggestions) => SuggestionsResponse {
            ok: true,
            message: format!("{} suggestion(s).", suggestions.len()),
            items: suggestions.iter().map(suggestion_view).collect(),
        },
        Err(err) => SuggestionsResponse {
            ok: false,
            items: Vec::new(),
            message: format!("suggestions_for failed: {err}"),
        },
    }
}

/// Adds one accepted suggestion as an item.
#[flutter_rust_bridge::frb(sync)]
pub fn suggestion_accept(
    name: String,
    category: String,
    relevance: String,
    price: i64,
    actor: String,
) -> ItemActionResponse {
    let result = with_connection(|conn| {
        let suggestion = SuggestedItem {
            name,
            relevance: parse_relevance(&relevance)?,
            price,
            category: parse_category(&category)?,
        };
        let actor = parse_user(&actor)?;
        accept_suggestion(&item_service(conn)?, &suggestion, actor).map_err(|err| err.to_string())
    });
    item_action("suggestion_accept", "Suggestion added.", result)
}

fn item_action(
    operation: &str,
    message: &str,
    result: Result<Item, String>,
) -> ItemActionResponse {
    match result {
        Ok(item) => ItemActionResponse::success(message, Some(item.id.to_string())),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation}");
            ItemActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn budget_response(operation: &str, result: Result<i64, String>) -> BudgetResponse {
    match result {
        Ok(budget) => BudgetResponse {
            ok: true,
            budget,
            message: "ok".to_string(),
        },
        Err(err) => BudgetResponse {
            ok: false,
            budget: 0,
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn progress_view(key: &str, label: &str, progress: homelist_core::derive::Progress) -> ProgressView {
    ProgressView {
        key: key.to_string(),
        label: label.to_string(),
        completed: progress.completed,
        total: progress.total,
        percent: progress.percent(),
    }
}

fn activity_kind(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Added => "added",
        ActivityKind::Completed => "completed",
        ActivityKind::Deleted => "deleted",
    }
}

fn suggestion_view(suggestion: &SuggestedItem) -> SuggestionView {
    SuggestionView {
        name: suggestion.name.clone(),
        relevance: suggestion.relevance.as_str().to_string(),
        price: suggestion.price,
        category: suggestion.category.as_str().to_string(),
    }
}

fn build_filter(
    category: Option<String>,
    relevances: Vec<String>,
    search: String,
    status: String,
) -> Result<ItemFilter, String> {
    let category = match category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_category(raw)?),
    };
    let relevances = relevances
        .iter()
        .map(|raw| parse_relevance(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let status = if status.trim().is_empty() {
        StatusFilter::All
    } else {
        StatusFilter::parse(&status).ok_or_else(|| format!("unknown status `{status}`"))?
    };
    Ok(ItemFilter {
        category,
        relevances,
        search,
        status,
    })
}

fn normalize_activity_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => DEFAULT_ACTIVITY_LIMIT as u32,
        Some(value) => value.min(ACTIVITY_LIMIT_MAX),
    }
}

fn parse_item_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid item id `{raw}`"))
}

fn parse_user(raw: &str) -> Result<User, String> {
    raw.parse::<User>().map_err(|err| err.to_string())
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|err| err.to_string())
}

fn parse_relevance(raw: &str) -> Result<Relevance, String> {
    raw.parse::<Relevance>().map_err(|err| err.to_string())
}

fn resolve_checklist_db_path() -> PathBuf {
    CHECKLIST_DB_PATH
        .get_or_init(|| AppConfig::from_env().db_path)
        .clone()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_checklist_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("checklist DB open failed: {err}"))?;
    f(&conn)
}

fn item_service(conn: &Connection) -> Result<ItemService<SqliteItemRepository<'_>>, String> {
    let repo = SqliteItemRepository::try_new(conn)
        .map_err(|err| format!("item repo init failed: {err}"))?;
    Ok(ItemService::new(repo))
}

fn budget_service(
    conn: &Connection,
) -> Result<BudgetService<SqliteMetadataRepository<'_>>, String> {
    let metadata = SqliteMetadataRepository::try_new(conn)
        .map_err(|err| format!("metadata repo init failed: {err}"))?;
    Ok(BudgetService::new(metadata))
}
