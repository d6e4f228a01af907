//! One-time import of exported legacy item documents.
//!
//! # Responsibility
//! - Read a JSON array of item documents written by earlier app versions.
//! - Convert boolean `completed` into `completed_quantity`.
//! - Store converted items under the current schema.
//!
//! # Invariants
//! - The import runs at most once per database, guarded by
//!   `migration_v3_completed_quantity`.
//! - The marker is set even when no document needed conversion.
//! - All documents plus the marker are written in one transaction; one
//!   malformed document aborts the whole import.
//! - Documents whose id already exists are left untouched.

use crate::model::household::{Category, Relevance, User};
use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{insert_item, RepoError, SqliteItemRepository};
use crate::repo::metadata_repo::{read_metadata, write_metadata, LEGACY_COMPLETION_MARKER_KEY};
use log::{info, warn};
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum MigrationError {
    /// Input is not a JSON array.
    MalformedJson(String),
    /// Document at `index` cannot be represented as an item.
    InvalidDocument { index: usize, reason: String },
    Repo(RepoError),
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedJson(message) => write!(f, "malformed legacy export: {message}"),
            Self::InvalidDocument { index, reason } => {
                write!(f, "invalid legacy document #{index}: {reason}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MigrationError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for MigrationError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Outcome of [`migrate_legacy_documents`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyMigrationReport {
    /// Newly stored items.
    pub imported: usize,
    /// Stored items whose completion came from boolean `completed: true`.
    pub converted: usize,
    /// Documents skipped because their id was already stored.
    pub already_present: usize,
    /// The import had already run; nothing was read.
    pub skipped_marker: bool,
}

/// Timestamp as exported: epoch millis or a `{seconds, nanoseconds}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyTimestamp {
    Millis(i64),
    Parts {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: i64,
    },
}

impl LegacyTimestamp {
    fn epoch_ms(&self) -> i64 {
        match self {
            Self::Millis(ms) => *ms,
            Self::Parts {
                seconds,
                nanoseconds,
            } => seconds
                .saturating_mul(1000)
                .saturating_add(nanoseconds / 1_000_000),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDocument {
    id: String,
    name: String,
    category: String,
    relevance: String,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    completed_quantity: Option<u32>,
    #[serde(default)]
    completed_by: Option<String>,
    #[serde(default)]
    completed_at: Option<LegacyTimestamp>,
    #[serde(default)]
    added_by: Option<String>,
    #[serde(default)]
    created_at: Option<LegacyTimestamp>,
    #[serde(default)]
    deleted: Option<bool>,
    #[serde(default)]
    deleted_by: Option<String>,
    #[serde(default)]
    deleted_at: Option<LegacyTimestamp>,
}

/// Maps a legacy document id onto a stable item id.
///
/// UUID ids are kept; other ids (document-store keys) map to a name-based
/// UUID so repeated imports of the same export resolve to the same item.
pub fn legacy_item_id(legacy_id: &str) -> ItemId {
    match Uuid::parse_str(legacy_id.trim()) {
        Ok(id) if !id.is_nil() => id,
        _ => Uuid::new_v5(&Uuid::NAMESPACE_OID, legacy_id.trim().as_bytes()),
    }
}

/// Imports `json` (an array of legacy item documents) into `conn`.
///
/// `actor` is recorded in the marker note.
pub fn migrate_legacy_documents(
    conn: &Connection,
    json: &str,
    actor: User,
) -> Result<LegacyMigrationReport, MigrationError> {
    SqliteItemRepository::try_new(conn)?;

    if read_metadata(conn, LEGACY_COMPLETION_MARKER_KEY)?.is_some() {
        info!("event=legacy_migrate module=migrate status=skipped reason=marker_present");
        return Ok(LegacyMigrationReport {
            skipped_marker: true,
            ..LegacyMigrationReport::default()
        });
    }

    let documents: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|err| MigrationError::MalformedJson(err.to_string()))?;

    let mut converted_items = Vec::with_capacity(documents.len());
    for (index, value) in documents.into_iter().enumerate() {
        let document: LegacyDocument =
            serde_json::from_value(value).map_err(|err| MigrationError::InvalidDocument {
                index,
                reason: err.to_string(),
            })?;
        let was_boolean = document.completed == Some(true);
        let item = convert_document(document)
            .map_err(|reason| MigrationError::InvalidDocument { index, reason })?;
        converted_items.push((item, was_boolean));
    }

    let mut report = LegacyMigrationReport::default();
    let tx = conn.unchecked_transaction()?;
    for (item, was_boolean) in &converted_items {
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1);",
            [item.id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            report.already_present += 1;
            continue;
        }
        insert_item(&tx, item)?;
        report.imported += 1;
        if *was_boolean {
            report.converted += 1;
        }
    }

    let note = if report.converted == 0 {
        format!("no items needed migration; imported={} by={actor}", report.imported)
    } else {
        format!(
            "imported={} converted={} by={actor}",
            report.imported, report.converted
        )
    };
    write_metadata(&tx, LEGACY_COMPLETION_MARKER_KEY, &note)?;
    tx.commit()?;

    if report.already_present > 0 {
        warn!(
            "event=legacy_migrate module=migrate status=partial already_present={}",
            report.already_present
        );
    }
    info!(
        "event=legacy_migrate module=migrate status=ok imported={} converted={} actor={}",
        report.imported, report.converted, actor
    );
    Ok(report)
}

fn convert_document(document: LegacyDocument) -> Result<Item, String> {
    let category = Category::parse(&document.category)
        .ok_or_else(|| format!("unknown category `{}`", document.category))?;
    let relevance = Relevance::parse(&document.relevance)
        .ok_or_else(|| format!("unknown relevance `{}`", document.relevance))?;
    let price = match document.price {
        Some(price) if price.is_finite() && price >= 0.0 => price.round() as i64,
        Some(price) => return Err(format!("invalid price `{price}`")),
        None => 0,
    };

    let mut item = Item::with_id(
        legacy_item_id(&document.id),
        document.name.trim(),
        category,
        relevance,
        price,
    )
    .map_err(|err| err.to_string())?;

    item.quantity = document.quantity.filter(|quantity| *quantity > 0).unwrap_or(1);
    // `completed: true` wins over any stored count.
    item.completed_quantity = match (document.completed, document.completed_quantity) {
        (Some(true), _) => item.quantity,
        (_, Some(completed_quantity)) => completed_quantity.min(item.quantity),
        (_, None) => 0,
    };
    item.added_by = parse_user(document.added_by.as_deref())?;
    item.created_at = document.created_at.as_ref().map(LegacyTimestamp::epoch_ms);

    if item.is_completed() {
        item.completed_by = parse_user(document.completed_by.as_deref())?;
        item.completed_at = document.completed_at.as_ref().map(LegacyTimestamp::epoch_ms);
    }

    if document.deleted == Some(true) {
        item.is_deleted = true;
        item.deleted_by = parse_user(document.deleted_by.as_deref())?;
        item.deleted_at = document.deleted_at.as_ref().map(LegacyTimestamp::epoch_ms);
    }

    item.validate().map_err(|err| err.to_string())?;
    Ok(item)
}

fn parse_user(value: Option<&str>) -> Result<Option<User>, String> {
    match value {
        Some(value) if !value.trim().is_empty() => User::parse(value)
            .map(Some)
            .ok_or_else(|| format!("unknown user `{value}`")),
        _ => Ok(None),
    }
}
