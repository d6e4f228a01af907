//! Item use-case service.
//!
//! # Responsibility
//! - Provide the checklist CRUD flows: add, complete, edit, soft-delete.
//! - Stamp actor and timestamp metadata on every lifecycle transition.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Completion metadata changes only when an item crosses the
//!   fully-completed boundary.
//! - Soft-deleted items cannot be completed or edited.
//! - Logs carry ids and counts only, never item names.

use crate::clock::{system_clock, Clock};
use crate::model::household::{Category, Relevance, User};
use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::repo::item_repo::{ItemListQuery, ItemRepository, RepoError, RepoResult};
use crate::repo::metadata_repo::{MetadataRepository, SEED_MARKER_KEY};
use crate::seed::initial_catalog;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for item use-cases.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Input violates an item invariant.
    InvalidItem(ItemValidationError),
    /// Target item does not exist or is soft-deleted.
    ItemNotFound(ItemId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidItem(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent item state: {details}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidItem(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ItemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            RepoError::Validation(err) => Self::InvalidItem(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ItemValidationError> for ItemServiceError {
    fn from(value: ItemValidationError) -> Self {
        Self::InvalidItem(value)
    }
}

pub type ItemServiceResult<T> = Result<T, ItemServiceError>;

/// Input for adding one item to the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub relevance: Relevance,
    /// Unit price in whole CLP.
    pub price: i64,
    pub quantity: u32,
}

impl NewItem {
    /// Single-unit item.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        relevance: Relevance,
        price: i64,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            relevance,
            price,
            quantity: 1,
        }
    }
}

/// Partial edit of an existing item; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub relevance: Option<Relevance>,
    pub price: Option<i64>,
    pub quantity: Option<u32>,
    pub added_by: Option<User>,
    /// Applied only while the item stays fully completed.
    pub completed_by: Option<User>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Item service facade over repository implementations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
    clock: Clock,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service stamping times from the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, system_clock())
    }

    /// Creates a service with an explicit clock.
    pub fn with_clock(repo: R, clock: Clock) -> Self {
        Self { repo, clock }
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Adds one item added by `actor`.
    ///
    /// # Contract
    /// - Name is trimmed; quantity 0 is treated as 1.
    /// - `completed_quantity` starts at 0.
    pub fn add_item(&self, new_item: NewItem, actor: User) -> ItemServiceResult<Item> {
        let item = self.build_item(new_item, actor, self.now());
        let id = self.repo.create_item(&item)?;
        info!(
            "event=item_add module=service status=ok item_id={} actor={}",
            id, actor
        );
        self.read_back(id, "created item not found in read-back")
    }

    /// Adds several items in one batch.
    ///
    /// Empty input is a no-op. Either every item is stored or none is.
    pub fn add_items(&self, new_items: Vec<NewItem>, actor: User) -> ItemServiceResult<Vec<ItemId>> {
        if new_items.is_empty() {
            return Ok(Vec::new());
        }

        let now = self.now();
        let items = new_items
            .into_iter()
            .map(|new_item| self.build_item(new_item, actor, now))
            .collect::<Vec<_>>();
        let ids = self.repo.create_items(&items)?;
        info!(
            "event=item_add_batch module=service status=ok count={} actor={}",
            ids.len(),
            actor
        );
        Ok(ids)
    }

    /// Sets the number of purchased units.
    ///
    /// # Contract
    /// - Value is clamped into `0..=quantity`.
    /// - Becoming fully completed stamps `completed_by = actor` and
    ///   `completed_at = now`; leaving full completion clears both.
    pub fn update_completion(
        &self,
        id: ItemId,
        completed_quantity: u32,
        actor: User,
    ) -> ItemServiceResult<Item> {
        let mut item = self.active_item(id)?;
        let was_complete = item.is_completed();
        item.apply_completion(completed_quantity, actor, self.now());

        self.repo.set_completion(
            id,
            item.completed_quantity,
            item.completed_by,
            item.completed_at,
        )?;
        info!(
            "event=item_completion module=service status=ok item_id={} completed_quantity={} quantity={} was_complete={} is_complete={} actor={}",
            id,
            item.completed_quantity,
            item.quantity,
            was_complete,
            item.is_completed(),
            actor
        );
        self.read_back(id, "completed item not found in read-back")
    }

    /// Boolean toggle: completed items go back to 0 units, others to all units.
    pub fn toggle_complete(&self, id: ItemId, actor: User) -> ItemServiceResult<Item> {
        let item = self.active_item(id)?;
        let target = if item.is_completed() { 0 } else { item.quantity };
        self.update_completion(id, target, actor)
    }

    /// Records the paid price and completes every unit.
    pub fn complete_with_price(
        &self,
        id: ItemId,
        price: i64,
        actor: User,
    ) -> ItemServiceResult<Item> {
        let mut item = self.active_item(id)?;
        item.price = price;
        let quantity = item.quantity;
        item.apply_completion(quantity, actor, self.now());
        self.repo.update_item(&item)?;
        info!(
            "event=item_complete_with_price module=service status=ok item_id={} actor={}",
            id, actor
        );
        self.read_back(id, "priced item not found in read-back")
    }

    /// Applies a partial edit.
    ///
    /// # Contract
    /// - Shrinking `quantity` clamps `completed_quantity`.
    /// - Growing `quantity` past a completed count re-opens the item and
    ///   clears completion metadata.
    /// - `completed_by` is only applied when the edited item is completed.
    pub fn edit_item(&self, id: ItemId, patch: ItemPatch) -> ItemServiceResult<Item> {
        let mut item = self.active_item(id)?;
        if patch.is_empty() {
            return Ok(item);
        }

        if let Some(name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(relevance) = patch.relevance {
            item.relevance = relevance;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(added_by) = patch.added_by {
            item.added_by = Some(added_by);
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity.max(1);
            item.completed_quantity = item.completed_quantity.min(item.quantity);
            if !item.is_completed() {
                item.completed_by = None;
                item.completed_at = None;
            } else if item.completed_at.is_none() {
                // Shrinking onto the purchased count completes the item.
                item.completed_at = Some(self.now());
            }
        }
        if let Some(completed_by) = patch.completed_by {
            if item.is_completed() {
                item.completed_by = Some(completed_by);
            }
        }

        self.repo.update_item(&item)?;
        info!("event=item_edit module=service status=ok item_id={}", id);
        self.read_back(id, "edited item not found in read-back")
    }

    /// Soft-deletes one item on behalf of `actor`.
    ///
    /// Deleting an already deleted item keeps the first tombstone.
    pub fn delete_item(&self, id: ItemId, actor: User) -> ItemServiceResult<()> {
        self.repo.soft_delete_item(id, actor, self.now())?;
        info!(
            "event=item_delete module=service status=ok item_id={} actor={}",
            id, actor
        );
        Ok(())
    }

    /// Soft-deletes a selection of items in one batch.
    pub fn delete_items(&self, ids: &[ItemId], actor: User) -> ItemServiceResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.repo.soft_delete_items(ids, actor, self.now())?;
        info!(
            "event=item_delete_batch module=service status=ok count={} actor={}",
            ids.len(),
            actor
        );
        Ok(())
    }

    /// Gets one item, including tombstoned ones when requested.
    pub fn get_item(&self, id: ItemId, include_deleted: bool) -> RepoResult<Option<Item>> {
        self.repo.get_item(id, include_deleted)
    }

    /// Every stored item, tombstones included, newest first.
    ///
    /// The activity feed needs deleted rows; list views filter them out.
    pub fn list_all(&self) -> RepoResult<Vec<Item>> {
        self.repo.list_items(&ItemListQuery {
            include_deleted: true,
            ..ItemListQuery::default()
        })
    }

    /// Active items, newest first.
    pub fn list_visible(&self) -> RepoResult<Vec<Item>> {
        self.repo.list_items(&ItemListQuery::default())
    }

    /// Lists items using repository query options.
    pub fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        self.repo.list_items(query)
    }

    /// Inserts the starter catalog the first time the checklist is opened.
    ///
    /// # Contract
    /// - Runs only while the `initial_seed` marker is absent.
    /// - Inserts nothing when any item (including tombstones) already exists.
    /// - Always leaves the marker set on success.
    /// - Returns the number of inserted items.
    pub fn seed_if_empty<M: MetadataRepository>(
        &self,
        metadata: &M,
        actor: User,
    ) -> ItemServiceResult<usize> {
        if metadata.has_marker(SEED_MARKER_KEY)? {
            return Ok(0);
        }

        let now = self.now();
        let inserted = if self.repo.count_items(true)? == 0 {
            let items = initial_catalog()
                .into_iter()
                .map(|new_item| self.build_item(new_item, actor, now))
                .collect::<Vec<_>>();
            self.repo
                .create_items_with_marker(
                    &items,
                    SEED_MARKER_KEY,
                    &format!("seeded={} at={now}", items.len()),
                )?
                .len()
        } else {
            warn!("event=seed module=service status=skipped reason=not_empty");
            metadata.set_marker(SEED_MARKER_KEY, &format!("seeded=0 at={now}"))?;
            0
        };

        info!(
            "event=seed module=service status=ok inserted={} actor={}",
            inserted, actor
        );
        Ok(inserted)
    }

    fn build_item(&self, new_item: NewItem, actor: User, now: i64) -> Item {
        let mut item = Item::new(
            new_item.name.trim(),
            new_item.category,
            new_item.relevance,
            new_item.price,
        );
        item.quantity = new_item.quantity.max(1);
        item.added_by = Some(actor);
        item.created_at = Some(now);
        item
    }

    fn active_item(&self, id: ItemId) -> ItemServiceResult<Item> {
        self.repo
            .get_item(id, false)?
            .ok_or(ItemServiceError::ItemNotFound(id))
    }

    fn read_back(&self, id: ItemId, details: &'static str) -> ItemServiceResult<Item> {
        self.repo
            .get_item(id, true)?
            .ok_or(ItemServiceError::InconsistentState(details))
    }
}
