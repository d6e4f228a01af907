//! Fixed household vocabularies: members, spaces and relevance levels.
//!
//! # Responsibility
//! - Own the stable storage/wire strings for each enumeration.
//! - Provide display order and sort rank used by derivations.
//!
//! # Invariants
//! - Storage strings never change; they match previously exported documents.
//! - `Category::ALL` is the canonical display order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error returned when a vocabulary value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl Display for UnknownValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for UnknownValue {}

/// Household member who adds, completes or deletes items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum User {
    Felipe,
    Valeria,
}

impl User {
    pub const ALL: [User; 2] = [User::Felipe, User::Valeria];

    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Felipe => "Felipe",
            Self::Valeria => "Valeria",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|user| user.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for User {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownValue {
            kind: "user",
            value: s.to_string(),
        })
    }
}

/// Household space used to group and filter items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Living,
    #[serde(rename = "Cocina")]
    Kitchen,
    #[serde(rename = "Comedor")]
    Dining,
    #[serde(rename = "Dormitorio Principal")]
    MainBedroom,
    #[serde(rename = "Dormitorio Pipe")]
    PipeBedroom,
    #[serde(rename = "Lavandería")]
    Laundry,
    #[serde(rename = "Baños")]
    Bathrooms,
    #[serde(rename = "Terraza 1")]
    Terrace1,
    #[serde(rename = "Terraza 2")]
    Terrace2,
    #[serde(rename = "Otro")]
    Other,
}

impl Category {
    /// Display order for progress cards and filter chips.
    pub const ALL: [Category; 10] = [
        Category::Living,
        Category::Kitchen,
        Category::Dining,
        Category::MainBedroom,
        Category::PipeBedroom,
        Category::Laundry,
        Category::Bathrooms,
        Category::Terrace1,
        Category::Terrace2,
        Category::Other,
    ];

    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Living => "Living",
            Self::Kitchen => "Cocina",
            Self::Dining => "Comedor",
            Self::MainBedroom => "Dormitorio Principal",
            Self::PipeBedroom => "Dormitorio Pipe",
            Self::Laundry => "Lavandería",
            Self::Bathrooms => "Baños",
            Self::Terrace1 => "Terraza 1",
            Self::Terrace2 => "Terraza 2",
            Self::Other => "Otro",
        }
    }

    /// Short label used where space is tight.
    pub fn label(self) -> &'static str {
        match self {
            Self::MainBedroom => "Dormitorio P.",
            other => other.as_str(),
        }
    }

    /// ASCII key accepted by command-line input.
    pub fn key(self) -> &'static str {
        match self {
            Self::Living => "living",
            Self::Kitchen => "kitchen",
            Self::Dining => "dining",
            Self::MainBedroom => "main_bedroom",
            Self::PipeBedroom => "pipe_bedroom",
            Self::Laundry => "laundry",
            Self::Bathrooms => "bathrooms",
            Self::Terrace1 => "terrace_1",
            Self::Terrace2 => "terrace_2",
            Self::Other => "other",
        }
    }

    /// Parses either the storage value or the ASCII key.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|category| {
            category.as_str().eq_ignore_ascii_case(trimmed)
                || category.key().eq_ignore_ascii_case(trimmed)
        })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownValue {
            kind: "category",
            value: s.to_string(),
        })
    }
}

/// Three-level purchase priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relevance {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Baja")]
    Low,
}

impl Relevance {
    pub const ALL: [Relevance; 3] = [Relevance::High, Relevance::Medium, Relevance::Low];

    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "Alta",
            Self::Medium => "Media",
            Self::Low => "Baja",
        }
    }

    /// Sort rank; lower ranks are bought first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Parses the storage value or the English level name.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|relevance| {
            relevance.as_str().eq_ignore_ascii_case(trimmed)
                || relevance.english().eq_ignore_ascii_case(trimmed)
        })
    }

    fn english(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for Relevance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relevance {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownValue {
            kind: "relevance",
            value: s.to_string(),
        })
    }
}
