use crate::model::household::{Category, Relevance};
use serde::{Deserialize, Serialize};

/// Item proposed by a suggestion provider for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedItem {
    pub name: String,
    pub relevance: Relevance,
    /// Estimated unit price in whole CLP.
    pub price: i64,
    pub category: Category,
}
