//! Core domain logic for the shared household checklist.
//! Storage, business invariants and read-side derivations live here;
//! FFI and CLI crates only translate inputs and outputs.

pub mod clock;
pub mod config;
pub mod db;
pub mod derive;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use clock::{fixed_clock, system_clock, Clock};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use migrate::{migrate_legacy_documents, LegacyMigrationReport, MigrationError};
pub use model::household::{Category, Relevance, User};
pub use model::item::{Item, ItemId, ItemValidationError};
pub use model::suggestion::SuggestedItem;
pub use repo::item_repo::{
    ItemListQuery, ItemRepository, RepoError, RepoResult, SqliteItemRepository,
};
pub use repo::metadata_repo::{MetadataRepository, SqliteMetadataRepository};
pub use service::budget_service::{BudgetError, BudgetService, DEFAULT_BUDGET};
pub use service::item_service::{
    ItemPatch, ItemService, ItemServiceError, ItemServiceResult, NewItem,
};
pub use service::suggestion_service::{
    accept_suggestion, accept_suggestions, parse_suggestions, suggestion_prompt,
    CatalogSuggestionProvider, DisabledSuggestionProvider, SuggestionError, SuggestionProvider,
    SuggestionService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
