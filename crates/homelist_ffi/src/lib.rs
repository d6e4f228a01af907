//! Flutter-facing bindings for the household checklist core.

pub mod api;
