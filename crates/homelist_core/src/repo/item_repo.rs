//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `items` storage.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Item::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Batch writes are all-or-nothing.
//! - Soft delete never overwrites an existing tombstone.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::household::{Category, Relevance, User};
use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::repo::metadata_repo::write_metadata;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    relevance,
    price,
    quantity,
    completed_quantity,
    completed_by,
    completed_at,
    added_by,
    created_at,
    is_deleted,
    deleted_by,
    deleted_at
FROM items";

const REQUIRED_ITEM_COLUMNS: &[&str] = &[
    "id",
    "name",
    "category",
    "relevance",
    "price",
    "quantity",
    "completed_quantity",
    "completed_by",
    "completed_at",
    "added_by",
    "created_at",
    "is_deleted",
    "deleted_by",
    "deleted_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing items.
#[derive(Debug, Clone, Default)]
pub struct ItemListQuery {
    pub category: Option<Category>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId>;
    /// Inserts every item or none of them.
    fn create_items(&self, items: &[Item]) -> RepoResult<Vec<ItemId>>;
    /// Inserts every item and writes the `app_metadata` marker in the same
    /// transaction. An empty batch still writes the marker.
    fn create_items_with_marker(
        &self,
        items: &[Item],
        marker_key: &str,
        note: &str,
    ) -> RepoResult<Vec<ItemId>>;
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId, include_deleted: bool) -> RepoResult<Option<Item>>;
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>>;
    /// Point-write of completion fields only.
    fn set_completion(
        &self,
        id: ItemId,
        completed_quantity: u32,
        completed_by: Option<User>,
        completed_at: Option<i64>,
    ) -> RepoResult<()>;
    fn soft_delete_item(&self, id: ItemId, actor: User, at_ms: i64) -> RepoResult<()>;
    /// Tombstones every id or none of them.
    fn soft_delete_items(&self, ids: &[ItemId], actor: User, at_ms: i64) -> RepoResult<()>;
    fn count_items(&self, include_deleted: bool) -> RepoResult<u64>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        insert_item(self.conn, item)?;
        Ok(item.id)
    }

    fn create_items(&self, items: &[Item]) -> RepoResult<Vec<ItemId>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        insert_batch(self.conn, items, None)
    }

    fn create_items_with_marker(
        &self,
        items: &[Item],
        marker_key: &str,
        note: &str,
    ) -> RepoResult<Vec<ItemId>> {
        insert_batch(self.conn, items, Some((marker_key, note)))
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?1,
                category = ?2,
                relevance = ?3,
                price = ?4,
                quantity = ?5,
                completed_quantity = ?6,
                completed_by = ?7,
                completed_at = ?8,
                added_by = ?9,
                created_at = ?10,
                is_deleted = ?11,
                deleted_by = ?12,
                deleted_at = ?13,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?14;",
            params![
                item.name.as_str(),
                item.category.as_str(),
                item.relevance.as_str(),
                item.price,
                item.quantity,
                item.completed_quantity,
                item.completed_by.map(User::as_str),
                item.completed_at,
                item.added_by.map(User::as_str),
                item.created_at,
                bool_to_int(item.is_deleted),
                item.deleted_by.map(User::as_str),
                item.deleted_at,
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn get_item(&self, id: ItemId, include_deleted: bool) -> RepoResult<Option<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY COALESCE(created_at, 0) DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn set_completion(
        &self,
        id: ItemId,
        completed_quantity: u32,
        completed_by: Option<User>,
        completed_at: Option<i64>,
    ) -> RepoResult<()> {
        let Some(mut item) = self.get_item(id, true)? else {
            return Err(RepoError::NotFound(id));
        };
        item.completed_quantity = completed_quantity;
        item.completed_by = completed_by;
        item.completed_at = completed_at;
        item.validate()?;

        self.conn.execute(
            "UPDATE items
             SET
                completed_quantity = ?2,
                completed_by = ?3,
                completed_at = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id.to_string(),
                completed_quantity,
                completed_by.map(User::as_str),
                completed_at,
            ],
        )?;

        Ok(())
    }

    fn soft_delete_item(&self, id: ItemId, actor: User, at_ms: i64) -> RepoResult<()> {
        tombstone(self.conn, id, actor, at_ms)
    }

    fn soft_delete_items(&self, ids: &[ItemId], actor: User, at_ms: i64) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            tombstone(&tx, *id, actor, at_ms)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn count_items(&self, include_deleted: bool) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM items WHERE (?1 = 1 OR is_deleted = 0);",
            [bool_to_int(include_deleted)],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative item count `{count}`")))
    }
}

/// Inserts one validated item on any connection or open transaction.
fn insert_batch(
    conn: &Connection,
    items: &[Item],
    marker: Option<(&str, &str)>,
) -> RepoResult<Vec<ItemId>> {
    let tx = conn.unchecked_transaction()?;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        insert_item(&tx, item)?;
        ids.push(item.id);
    }
    if let Some((key, note)) = marker {
        write_metadata(&tx, key, note)?;
    }
    tx.commit()?;
    Ok(ids)
}

pub(crate) fn insert_item(conn: &Connection, item: &Item) -> RepoResult<()> {
    item.validate()?;

    conn.execute(
        "INSERT INTO items (
            id,
            name,
            category,
            relevance,
            price,
            quantity,
            completed_quantity,
            completed_by,
            completed_at,
            added_by,
            created_at,
            is_deleted,
            deleted_by,
            deleted_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
        params![
            item.id.to_string(),
            item.name.as_str(),
            item.category.as_str(),
            item.relevance.as_str(),
            item.price,
            item.quantity,
            item.completed_quantity,
            item.completed_by.map(User::as_str),
            item.completed_at,
            item.added_by.map(User::as_str),
            item.created_at,
            bool_to_int(item.is_deleted),
            item.deleted_by.map(User::as_str),
            item.deleted_at,
        ],
    )?;

    Ok(())
}

fn tombstone(conn: &Connection, id: ItemId, actor: User, at_ms: i64) -> RepoResult<()> {
    let id_text = id.to_string();
    let changed = conn.execute(
        "UPDATE items
         SET
            is_deleted = 1,
            deleted_by = ?2,
            deleted_at = ?3,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1
           AND is_deleted = 0;",
        params![id_text.as_str(), actor.as_str(), at_ms],
    )?;

    if changed > 0 {
        return Ok(());
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1);",
        [id_text.as_str()],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::NotFound(id))
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in items.id")))?;

    let category_text: String = row.get("category")?;
    let category = Category::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in items.category"
        ))
    })?;

    let relevance_text: String = row.get("relevance")?;
    let relevance = Relevance::parse(&relevance_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid relevance `{relevance_text}` in items.relevance"
        ))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in items.is_deleted"
            )));
        }
    };

    let item = Item {
        id,
        name: row.get("name")?,
        category,
        relevance,
        price: row.get("price")?,
        quantity: row.get("quantity")?,
        completed_quantity: row.get("completed_quantity")?,
        completed_by: parse_user_column(row, "completed_by")?,
        completed_at: row.get("completed_at")?,
        added_by: parse_user_column(row, "added_by")?,
        created_at: row.get("created_at")?,
        is_deleted,
        deleted_by: parse_user_column(row, "deleted_by")?,
        deleted_at: row.get("deleted_at")?,
    };
    item.validate()?;
    Ok(item)
}

fn parse_user_column(row: &Row<'_>, column: &'static str) -> RepoResult<Option<User>> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => User::parse(&value).map(Some).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid user `{value}` in items.{column}"))
        }),
        None => Ok(None),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_item_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["items", "app_metadata"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for &column in REQUIRED_ITEM_COLUMNS {
        if !table_has_column(conn, "items", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "items",
                column,
            });
        }
    }

    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
