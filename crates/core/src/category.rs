//! Inventory partitions.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the three inventory partitions.
///
/// The store tags are the canonical on-disk spelling (`sabores`, `envases`,
/// `toppings`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "sabores")]
    Flavor,
    #[serde(rename = "envases")]
    Container,
    #[serde(rename = "toppings")]
    Topping,
}

impl Category {
    /// Serialization order of the store.
    pub const ALL: [Category; 3] = [Category::Flavor, Category::Container, Category::Topping];

    pub fn tag(&self) -> &'static str {
        match self {
            Category::Flavor => "sabores",
            Category::Container => "envases",
            Category::Topping => "toppings",
        }
    }

    /// Exact, case-sensitive match against the canonical tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Case-insensitive match, used for external import sources.
    pub fn parse_lenient(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag().eq_ignore_ascii_case(tag))
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

impl core::str::FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| DomainError::unknown_category(s))
    }
}
