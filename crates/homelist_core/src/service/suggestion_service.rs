//! Suggested-item flow.
//!
//! # Responsibility
//! - Define the provider seam for an external suggestion backend.
//! - Decode backend replies and turn accepted suggestions into items.
//!
//! # Invariants
//! - Returned suggestions always carry the requested category.
//! - Malformed reply entries are dropped, not surfaced as errors.
//! - A reply that is not a JSON array is an error.

use crate::model::household::{Category, Relevance, User};
use crate::model::item::Item;
use crate::model::suggestion::SuggestedItem;
use crate::repo::item_repo::ItemRepository;
use crate::seed::initial_catalog;
use crate::service::item_service::{ItemService, ItemServiceError, NewItem};
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CATALOG_SUGGESTION_LIMIT: usize = 3;

#[derive(Debug)]
pub enum SuggestionError {
    /// Backend call failed.
    Provider(String),
    /// Backend reply is not a JSON array.
    MalformedResponse(String),
    Item(ItemServiceError),
}

impl Display for SuggestionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(message) => write!(f, "suggestion provider failed: {message}"),
            Self::MalformedResponse(message) => {
                write!(f, "malformed suggestion response: {message}")
            }
            Self::Item(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SuggestionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemServiceError> for SuggestionError {
    fn from(value: ItemServiceError) -> Self {
        Self::Item(value)
    }
}

/// Source of suggested items for a household space.
pub trait SuggestionProvider {
    fn suggest(&self, category: Category) -> Result<Vec<SuggestedItem>, SuggestionError>;
}

/// Provider used while no suggestion backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSuggestionProvider;

impl SuggestionProvider for DisabledSuggestionProvider {
    fn suggest(&self, category: Category) -> Result<Vec<SuggestedItem>, SuggestionError> {
        warn!(
            "event=suggest module=service status=disabled category={}",
            category.key()
        );
        Ok(Vec::new())
    }
}

/// Offline provider drawing from the starter catalog.
///
/// Skips names the checklist already holds (case-insensitive).
#[derive(Debug, Default, Clone)]
pub struct CatalogSuggestionProvider {
    existing_names: HashSet<String>,
}

impl CatalogSuggestionProvider {
    pub fn new<I, S>(existing_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            existing_names: existing_names
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Builds a provider that skips every active item of the checklist.
    pub fn excluding_items(items: &[Item]) -> Self {
        Self::new(
            items
                .iter()
                .filter(|item| item.is_active())
                .map(|item| item.name.as_str()),
        )
    }
}

impl SuggestionProvider for CatalogSuggestionProvider {
    fn suggest(&self, category: Category) -> Result<Vec<SuggestedItem>, SuggestionError> {
        Ok(initial_catalog()
            .into_iter()
            .filter(|entry| entry.category == category)
            .filter(|entry| !self.existing_names.contains(&entry.name.to_lowercase()))
            .take(CATALOG_SUGGESTION_LIMIT)
            .map(|entry| SuggestedItem {
                name: entry.name,
                relevance: entry.relevance,
                price: entry.price,
                category,
            })
            .collect())
    }
}

/// Suggestion facade over one provider.
pub struct SuggestionService<P: SuggestionProvider> {
    provider: P,
}

impl<P: SuggestionProvider> SuggestionService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Asks the provider for suggestions in `category`.
    pub fn suggest(&self, category: Category) -> Result<Vec<SuggestedItem>, SuggestionError> {
        let suggestions = self
            .provider
            .suggest(category)?
            .into_iter()
            .map(|suggestion| SuggestedItem {
                category,
                ..suggestion
            })
            .collect::<Vec<_>>();
        info!(
            "event=suggest module=service status=ok category={} count={}",
            category.key(),
            suggestions.len()
        );
        Ok(suggestions)
    }
}

/// Adds one accepted suggestion as a single-unit item.
pub fn accept_suggestion<R: ItemRepository>(
    items: &ItemService<R>,
    suggestion: &SuggestedItem,
    actor: User,
) -> Result<Item, SuggestionError> {
    Ok(items.add_item(new_item_from(suggestion), actor)?)
}

/// Adds every selected suggestion in one batch.
pub fn accept_suggestions<R: ItemRepository>(
    items: &ItemService<R>,
    suggestions: &[SuggestedItem],
    actor: User,
) -> Result<usize, SuggestionError> {
    let new_items = suggestions.iter().map(new_item_from).collect();
    Ok(items.add_items(new_items, actor)?.len())
}

fn new_item_from(suggestion: &SuggestedItem) -> NewItem {
    NewItem::new(
        suggestion.name.clone(),
        suggestion.category,
        suggestion.relevance,
        suggestion.price,
    )
}

/// Prompt sent to a text-generation backend for `category`.
pub fn suggestion_prompt(category: Category) -> String {
    format!(
        "Sugiere 5 artículos esenciales para equipar el espacio \"{}\" de un departamento nuevo en Chile. \
         Responde solo con un arreglo JSON de objetos con las claves \"name\" (texto), \
         \"relevance\" (\"Alta\", \"Media\" o \"Baja\") y \"price\" (precio estimado en CLP, número entero).",
        category.as_str()
    )
}

#[derive(Deserialize)]
struct RawSuggestion {
    name: String,
    relevance: String,
    price: f64,
}

/// Decodes a backend reply for `category`.
///
/// Entries with a blank name, unknown relevance or negative/non-finite price
/// are dropped. Fractional prices are rounded.
pub fn parse_suggestions(
    json: &str,
    category: Category,
) -> Result<Vec<SuggestedItem>, SuggestionError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json.trim())
        .map_err(|err| SuggestionError::MalformedResponse(err.to_string()))?;

    let total = entries.len();
    let suggestions = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawSuggestion>(entry).ok())
        .filter_map(|raw| {
            let name = raw.name.trim();
            let relevance = Relevance::parse(&raw.relevance)?;
            if name.is_empty() || !raw.price.is_finite() || raw.price < 0.0 {
                return None;
            }
            Some(SuggestedItem {
                name: name.to_string(),
                relevance,
                price: raw.price.round() as i64,
                category,
            })
        })
        .collect::<Vec<_>>();

    if suggestions.len() < total {
        warn!(
            "event=suggest_parse module=service status=partial dropped={}",
            total - suggestions.len()
        );
    }
    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::{parse_suggestions, suggestion_prompt, SuggestionError};
    use crate::model::household::{Category, Relevance};

    #[test]
    fn parse_drops_malformed_entries() {
        let json = r#"[
            {"name": "Alfombra", "relevance": "Media", "price": 45000},
            {"name": "  ", "relevance": "Alta", "price": 1000},
            {"name": "Cojines", "relevance": "Urgente", "price": 1000},
            {"name": "Lámpara", "relevance": "Baja", "price": -5},
            {"name": "Pouf", "relevance": "Baja", "price": 19990.6},
            {"relevance": "Alta", "price": 10}
        ]"#;

        let parsed = parse_suggestions(json, Category::Living).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Alfombra");
        assert_eq!(parsed[0].relevance, Relevance::Medium);
        assert_eq!(parsed[1].price, 19_991);
        assert!(parsed.iter().all(|s| s.category == Category::Living));
    }

    #[test]
    fn parse_rejects_non_array_reply() {
        assert!(matches!(
            parse_suggestions("{\"items\": []}", Category::Kitchen),
            Err(SuggestionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn prompt_names_the_category() {
        let prompt = suggestion_prompt(Category::Terrace1);
        assert!(prompt.contains("Terraza 1"));
        assert!(prompt.contains("JSON"));
    }
}
