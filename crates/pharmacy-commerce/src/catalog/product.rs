//! Item descriptors offered by the storefront.

use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Brand shown when a descriptor does not name one.
pub const DEFAULT_BRAND: &str = "Generic";
/// Dosage shown when a descriptor does not name one.
pub const DEFAULT_DOSAGE: &str = "\u{2014}";
/// Pack size shown when a descriptor does not name one.
pub const DEFAULT_PACK_SIZE: &str = "Standard Pack";

/// Everything the cart needs to know about a purchasable item.
///
/// Display metadata is optional here and gets defaulted when the item
/// enters the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDescriptor {
    /// Product slug; the cart's dedup key.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Strength, e.g. "500mg".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    /// Pack description, e.g. "24 tablets".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size: Option<String>,
    /// Category label used for browsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ItemDescriptor {
    /// Create a descriptor with only the required fields.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            brand: None,
            dosage: None,
            pack_size: None,
            category: None,
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the dosage.
    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = Some(dosage.into());
        self
    }

    /// Set the pack size.
    pub fn with_pack_size(mut self, pack_size: impl Into<String>) -> Self {
        self.pack_size = Some(pack_size.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Brand, falling back to the default.
    pub fn brand_or_default(&self) -> &str {
        self.brand.as_deref().unwrap_or(DEFAULT_BRAND)
    }

    /// Dosage, falling back to the default.
    pub fn dosage_or_default(&self) -> &str {
        self.dosage.as_deref().unwrap_or(DEFAULT_DOSAGE)
    }

    /// Pack size, falling back to the default.
    pub fn pack_size_or_default(&self) -> &str {
        self.pack_size.as_deref().unwrap_or(DEFAULT_PACK_SIZE)
    }

    /// Check whether the name, brand or category contains `query` (case-insensitive).
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let hit = |field: Option<&str>| {
            field
                .map(|value| value.to_lowercase().contains(&query))
                .unwrap_or(false)
        };
        hit(Some(self.name.as_str())) || hit(self.brand.as_deref()) || hit(self.category.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_defaults_apply_when_missing() {
        let item = ItemDescriptor::new("aspirin", "Aspirin", Money::from_major(10, Currency::USD));
        assert_eq!(item.brand_or_default(), "Generic");
        assert_eq!(item.dosage_or_default(), "\u{2014}");
        assert_eq!(item.pack_size_or_default(), "Standard Pack");
    }

    #[test]
    fn test_builder_sets_metadata() {
        let item = ItemDescriptor::new("aspirin", "Aspirin", Money::from_major(10, Currency::USD))
            .with_brand("Bayer")
            .with_dosage("300mg")
            .with_pack_size("32 tablets");
        assert_eq!(item.brand_or_default(), "Bayer");
        assert_eq!(item.dosage_or_default(), "300mg");
        assert_eq!(item.pack_size_or_default(), "32 tablets");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let item = ItemDescriptor::new("lor", "Loratadine", Money::from_major(8, Currency::USD))
            .with_brand("Claritin")
            .with_category("Allergy");
        assert!(item.matches("lora"));
        assert!(item.matches("CLARI"));
        assert!(item.matches("allergy"));
        assert!(!item.matches("vitamin"));
    }
}
