use serde::{Deserialize, Serialize};

use crate::error::IngredientError;

/// A single tracked ingredient.
///
/// Field names follow the JSON layout written by earlier versions of the app,
/// so existing stores load without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub expiration: String,
    #[serde(default)]
    pub notes: String,
    /// Opaque image reference (usually a data URL). Never decoded.
    #[serde(default, rename = "imageDataUrl", alias = "imageBlobRef")]
    pub image: String,
    #[serde(default)]
    pub bought: bool,
}

impl IngredientRecord {
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.name, &self.category)
    }
}

/// A candidate submitted by the user, not yet reconciled into a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub expiration: String,
    pub notes: String,
    pub image: String,
}

impl NewIngredient {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            quantity: quantity.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_expiration(mut self, expiration: impl Into<String>) -> Self {
        self.expiration = expiration.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check the required fields: name, category, and quantity must be non-blank.
    pub fn validate(&self) -> Result<(), IngredientError> {
        validate_required(&self.name, &self.category, &self.quantity)
    }

    #[must_use]
    pub fn into_record(self) -> IngredientRecord {
        IngredientRecord {
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            expiration: self.expiration,
            notes: self.notes,
            image: self.image,
            bought: false,
        }
    }
}

pub(crate) fn validate_required(
    name: &str,
    category: &str,
    quantity: &str,
) -> Result<(), IngredientError> {
    for (field, value) in [("name", name), ("category", category), ("quantity", quantity)] {
        if value.trim().is_empty() {
            return Err(IngredientError::InvalidRecord { field });
        }
    }
    Ok(())
}

/// Identity of an ingredient: lowercased, trimmed name plus the exact category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub name: String,
    pub category: String,
}

impl IdentityKey {
    #[must_use]
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoughtFilter {
    #[default]
    All,
    Bought,
    NotBought,
}

impl BoughtFilter {
    #[must_use]
    pub fn matches(self, bought: bool) -> bool {
        match self {
            Self::All => true,
            Self::Bought => bought,
            Self::NotBought => !bought,
        }
    }
}

impl std::str::FromStr for BoughtFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "bought" => Ok(Self::Bought),
            "not-bought" | "notbought" | "unbought" => Ok(Self::NotBought),
            _ => anyhow::bail!(
                "Invalid bought filter '{s}'. Must be one of: all, bought, not-bought"
            ),
        }
    }
}

/// Display filter applied by the presentation layer. Never affects identity.
#[derive(Debug, Clone, Default)]
pub struct IngredientFilter {
    pub search: Option<String>,
    pub bought: BoughtFilter,
    pub category: Option<String>,
}

impl IngredientFilter {
    #[must_use]
    pub fn matches(&self, record: &IngredientRecord) -> bool {
        if let Some(query) = &self.search {
            let query = query.trim().to_lowercase();
            if !query.is_empty() && !record.name.to_lowercase().contains(&query) {
                return false;
            }
        }
        if !self.bought.matches(record.bought) {
            return false;
        }
        if let Some(category) = &self.category {
            if record.category != *category {
                return false;
            }
        }
        true
    }
}

/// Result of importing a JSON export into an existing collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub merged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: &str, bought: bool) -> IngredientRecord {
        IngredientRecord {
            name: name.to_string(),
            category: category.to_string(),
            quantity: "1".to_string(),
            expiration: String::new(),
            notes: String::new(),
            image: String::new(),
            bought,
        }
    }

    #[test]
    fn test_identity_key_case_and_whitespace_insensitive() {
        let a = IdentityKey::new("Egg", "Dairy");
        let b = IdentityKey::new(" egg ", "Dairy");
        let c = IdentityKey::new("EGG", "Dairy");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_identity_key_category_is_case_sensitive() {
        assert_ne!(
            IdentityKey::new("Egg", "Dairy"),
            IdentityKey::new("Egg", "dairy")
        );
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(NewIngredient::new("Milk", "Dairy", "1 l").validate().is_ok());

        let err = NewIngredient::new("  ", "Dairy", "1 l").validate().unwrap_err();
        assert!(matches!(err, IngredientError::InvalidRecord { field: "name" }));

        let err = NewIngredient::new("Milk", "", "1 l").validate().unwrap_err();
        assert!(matches!(err, IngredientError::InvalidRecord { field: "category" }));

        let err = NewIngredient::new("Milk", "Dairy", "").validate().unwrap_err();
        assert!(matches!(err, IngredientError::InvalidRecord { field: "quantity" }));
    }

    #[test]
    fn test_into_record_is_not_bought() {
        let rec = NewIngredient::new("Milk", "Dairy", "1 l")
            .with_notes("skimmed")
            .into_record();
        assert!(!rec.bought);
        assert_eq!(rec.notes, "skimmed");
    }

    #[test]
    fn test_deserialize_legacy_json() {
        let json = r#"{"name":"Egg","category":"Dairy","quantity":"6 pcs","imageDataUrl":"data:x"}"#;
        let rec: IngredientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.image, "data:x");
        assert_eq!(rec.expiration, "");
        assert!(!rec.bought);
    }

    #[test]
    fn test_deserialize_image_blob_ref_alias() {
        let json = r#"{"name":"Egg","category":"Dairy","quantity":"6","imageBlobRef":"blob:1"}"#;
        let rec: IngredientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.image, "blob:1");

        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out["imageDataUrl"], "blob:1");
    }

    #[test]
    fn test_filter_search_and_bought() {
        let filter = IngredientFilter {
            search: Some(" EG ".to_string()),
            bought: BoughtFilter::NotBought,
            category: None,
        };
        assert!(filter.matches(&record("Eggs", "Dairy", false)));
        assert!(!filter.matches(&record("Eggs", "Dairy", true)));
        assert!(!filter.matches(&record("Milk", "Dairy", false)));
    }

    #[test]
    fn test_filter_category_exact() {
        let filter = IngredientFilter {
            category: Some("Dairy".to_string()),
            ..IngredientFilter::default()
        };
        assert!(filter.matches(&record("Milk", "Dairy", true)));
        assert!(!filter.matches(&record("Milk", "dairy", true)));
    }

    #[test]
    fn test_bought_filter_from_str() {
        assert_eq!("all".parse::<BoughtFilter>().unwrap(), BoughtFilter::All);
        assert_eq!("Bought".parse::<BoughtFilter>().unwrap(), BoughtFilter::Bought);
        assert_eq!(
            "not-bought".parse::<BoughtFilter>().unwrap(),
            BoughtFilter::NotBought
        );
        assert!("maybe".parse::<BoughtFilter>().is_err());
    }
}
