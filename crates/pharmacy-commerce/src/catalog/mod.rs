//! Product catalog module.
//!
//! Contains the item descriptors the cart accepts and a static catalog
//! the storefront browses.

mod product;

pub use product::{ItemDescriptor, DEFAULT_BRAND, DEFAULT_DOSAGE, DEFAULT_PACK_SIZE};

use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::{Currency, Money};

/// An ordered, read-only set of item descriptors.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ItemDescriptor>,
}

impl Catalog {
    /// Build a catalog from descriptors. Later duplicates of an id are dropped.
    pub fn new(items: impl IntoIterator<Item = ItemDescriptor>) -> Self {
        let mut catalog = Self::default();
        for item in items {
            if catalog.get(&item.id).is_none() {
                catalog.items.push(item);
            }
        }
        catalog
    }

    /// The sample pharmacy range.
    pub fn pharmacy() -> Self {
        let usd = |cents| Money::new(cents, Currency::USD);
        Self::new([
            ItemDescriptor::new("paracetamol-500", "Paracetamol", usd(499))
                .with_brand("Panadol")
                .with_dosage("500mg")
                .with_pack_size("24 tablets")
                .with_category("Pain Relief"),
            ItemDescriptor::new("ibuprofen-200", "Ibuprofen", usd(649))
                .with_brand("Advil")
                .with_dosage("200mg")
                .with_pack_size("32 tablets")
                .with_category("Pain Relief"),
            ItemDescriptor::new("aspirin-300", "Aspirin", usd(399))
                .with_dosage("300mg")
                .with_category("Pain Relief"),
            ItemDescriptor::new("loratadine-10", "Loratadine", usd(1199))
                .with_brand("Claritin")
                .with_dosage("10mg")
                .with_pack_size("30 tablets")
                .with_category("Allergy"),
            ItemDescriptor::new("cetirizine-10", "Cetirizine", usd(899))
                .with_brand("Zyrtec")
                .with_dosage("10mg")
                .with_pack_size("14 tablets")
                .with_category("Allergy"),
            ItemDescriptor::new("vitamin-d3-1000", "Vitamin D3", usd(1449))
                .with_brand("Nature Made")
                .with_dosage("1000 IU")
                .with_pack_size("90 softgels")
                .with_category("Vitamins"),
            ItemDescriptor::new("multivitamin-daily", "Daily Multivitamin", usd(1899))
                .with_brand("Centrum")
                .with_pack_size("60 tablets")
                .with_category("Vitamins"),
            ItemDescriptor::new("plasters-assorted", "Assorted Plasters", usd(349))
                .with_brand("Elastoplast")
                .with_pack_size("40 strips")
                .with_category("First Aid"),
            ItemDescriptor::new("antiseptic-cream", "Antiseptic Cream", usd(579))
                .with_brand("Savlon")
                .with_pack_size("60g tube")
                .with_category("First Aid"),
        ])
    }

    /// Look up a descriptor by id.
    pub fn get(&self, id: &ItemId) -> Option<&ItemDescriptor> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Like [`Catalog::get`], but a missing id is an error.
    pub fn lookup(&self, id: &ItemId) -> Result<&ItemDescriptor, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ItemNotFound(id.to_string()))
    }

    /// The currency every price is in, or `None` for an empty or mixed catalog.
    pub fn currency(&self) -> Option<Currency> {
        let first = self.items.first()?.price.currency;
        self.items
            .iter()
            .all(|item| item.price.currency == first)
            .then_some(first)
    }

    /// Iterate over all descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDescriptor> {
        self.items.iter()
    }

    /// Descriptors whose name, brand or category contains `query`.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a ItemDescriptor> + 'a {
        self.items.iter().filter(move |item| item.matches(query))
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
