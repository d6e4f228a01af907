//! Checklist domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the fixed household vocabularies (members, spaces, relevance) in
//!   one place so storage, FFI and CLI agree on wire values.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.
//! - Full completion is `completed_quantity == quantity`.

pub mod household;
pub mod item;
pub mod suggestion;
