//! Product categories.

use serde::{Deserialize, Serialize};

/// Error returned when a string names no known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A catalog category.
///
/// Serialised as the lowercase slug the API uses in its category filter
/// (`/api/products/category/{slug}/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Phone,
    Laptop,
    Tablet,
    Accessory,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 4] = [Self::Phone, Self::Laptop, Self::Tablet, Self::Accessory];

    /// URL and API slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Laptop => "laptop",
            Self::Tablet => "tablet",
            Self::Accessory => "accessory",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phones",
            Self::Laptop => "Laptops",
            Self::Tablet => "Tablets",
            Self::Accessory => "Accessories",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "laptop" => Ok(Self::Laptop),
            "tablet" => Ok(Self::Tablet),
            // Older admin forms submitted the plural slug.
            "accessory" | "accessories" => Ok(Self::Accessory),
            _ => Err(CategoryError(s.to_string())),
        }
    }
}

/// Capitalise the first character of a category slug for headings.
///
/// Works on arbitrary slugs so category pages can render names the API knows
/// about but this crate does not.
#[must_use]
pub fn heading(slug: &str) -> String {
    let mut chars = slug.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
