//! Checklist item domain model.
//!
//! # Responsibility
//! - Define the canonical record for one purchasable household object.
//! - Provide completion and soft-delete lifecycle helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `quantity >= 1` and `completed_quantity <= quantity`.
//! - `completed_by`/`completed_at` are only set on fully completed items.
//! - `deleted_by`/`deleted_at` are only set on tombstoned items.

use crate::model::household::{Category, Relevance, User};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every checklist item.
pub type ItemId = Uuid;

/// Validation errors for item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    NilId,
    BlankName,
    NegativePrice(i64),
    ZeroQuantity,
    CompletedQuantityExceedsQuantity {
        completed_quantity: u32,
        quantity: u32,
    },
    CompletionMetadataOnPendingItem,
    DeletionMetadataOnActiveItem,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
            Self::BlankName => write!(f, "item name must not be blank"),
            Self::NegativePrice(price) => write!(f, "item price must be >= 0, got {price}"),
            Self::ZeroQuantity => write!(f, "item quantity must be >= 1"),
            Self::CompletedQuantityExceedsQuantity {
                completed_quantity,
                quantity,
            } => write!(
                f,
                "completedQuantity ({completed_quantity}) must be <= quantity ({quantity})"
            ),
            Self::CompletionMetadataOnPendingItem => write!(
                f,
                "completedBy/completedAt must be empty while the item is not fully completed"
            ),
            Self::DeletionMetadataOnActiveItem => {
                write!(f, "deletedBy/deletedAt must be empty on an active item")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Canonical checklist record.
///
/// Serialized with the field names used by exported item documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ItemDocument")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub relevance: Relevance,
    /// Unit price in whole CLP.
    pub price: i64,
    pub quantity: u32,
    /// Units already purchased.
    pub completed_quantity: u32,
    pub completed_by: Option<User>,
    /// Unix epoch milliseconds of the transition into full completion.
    pub completed_at: Option<i64>,
    pub added_by: Option<User>,
    /// Unix epoch milliseconds.
    pub created_at: Option<i64>,
    /// Soft delete tombstone.
    #[serde(rename = "deleted")]
    pub is_deleted: bool,
    pub deleted_by: Option<User>,
    pub deleted_at: Option<i64>,
}

/// Unvalidated serde shape; converted through `Item::validate`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDocument {
    id: ItemId,
    name: String,
    category: Category,
    relevance: Relevance,
    price: i64,
    quantity: u32,
    #[serde(default)]
    completed_quantity: u32,
    #[serde(default)]
    completed_by: Option<User>,
    #[serde(default)]
    completed_at: Option<i64>,
    #[serde(default)]
    added_by: Option<User>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    deleted_by: Option<User>,
    #[serde(default)]
    deleted_at: Option<i64>,
}

impl TryFrom<ItemDocument> for Item {
    type Error = ItemValidationError;

    fn try_from(doc: ItemDocument) -> Result<Self, Self::Error> {
        let item = Item {
            id: doc.id,
            name: doc.name,
            category: doc.category,
            relevance: doc.relevance,
            price: doc.price,
            quantity: doc.quantity,
            completed_quantity: doc.completed_quantity,
            completed_by: doc.completed_by,
            completed_at: doc.completed_at,
            added_by: doc.added_by,
            created_at: doc.created_at,
            is_deleted: doc.deleted,
            deleted_by: doc.deleted_by,
            deleted_at: doc.deleted_at,
        };
        item.validate()?;
        Ok(item)
    }
}

impl Item {
    /// Creates a pending single-unit item with a generated stable ID.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        relevance: Relevance,
        price: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            relevance,
            price,
            quantity: 1,
            completed_quantity: 0,
            completed_by: None,
            completed_at: None,
            added_by: None,
            created_at: None,
            is_deleted: false,
            deleted_by: None,
            deleted_at: None,
        }
    }

    /// Creates an item with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: ItemId,
        name: impl Into<String>,
        category: Category,
        relevance: Relevance,
        price: i64,
    ) -> Result<Self, ItemValidationError> {
        if id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        let mut item = Self::new(name, category, relevance, price);
        item.id = id;
        Ok(item)
    }

    /// Checks every item invariant.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::BlankName);
        }
        if self.price < 0 {
            return Err(ItemValidationError::NegativePrice(self.price));
        }
        if self.quantity == 0 {
            return Err(ItemValidationError::ZeroQuantity);
        }
        if self.completed_quantity > self.quantity {
            return Err(ItemValidationError::CompletedQuantityExceedsQuantity {
                completed_quantity: self.completed_quantity,
                quantity: self.quantity,
            });
        }
        if !self.is_completed() && (self.completed_by.is_some() || self.completed_at.is_some()) {
            return Err(ItemValidationError::CompletionMetadataOnPendingItem);
        }
        if !self.is_deleted && (self.deleted_by.is_some() || self.deleted_at.is_some()) {
            return Err(ItemValidationError::DeletionMetadataOnActiveItem);
        }
        Ok(())
    }

    /// Whether every unit has been purchased.
    pub fn is_completed(&self) -> bool {
        self.completed_quantity == self.quantity
    }

    /// Units still to buy.
    pub fn pending_quantity(&self) -> u32 {
        self.quantity.saturating_sub(self.completed_quantity)
    }

    /// Whether this item should be considered visible.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Marks this item as softly deleted by `actor`.
    ///
    /// An existing tombstone is kept as-is.
    pub fn soft_delete(&mut self, actor: User, at_ms: i64) {
        if self.is_deleted {
            return;
        }
        self.is_deleted = true;
        self.deleted_by = Some(actor);
        self.deleted_at = Some(at_ms);
    }

    /// Sets purchased units and maintains completion metadata.
    ///
    /// `completed_quantity` is clamped into `0..=quantity`. Entering full
    /// completion stamps `actor`/`at_ms`; leaving it clears both.
    pub fn apply_completion(&mut self, completed_quantity: u32, actor: User, at_ms: i64) {
        let was_complete = self.is_completed();
        self.completed_quantity = completed_quantity.min(self.quantity);
        let is_complete = self.is_completed();

        if is_complete && !was_complete {
            self.completed_by = Some(actor);
            self.completed_at = Some(at_ms);
        } else if !is_complete && was_complete {
            self.completed_by = None;
            self.completed_at = None;
        }
    }

    /// Cost of the units already bought.
    pub fn spent(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.completed_quantity))
    }
}
