//! Use-case services over repository contracts.

pub mod budget_service;
pub mod item_service;
pub mod suggestion_service;
