use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::cart::{CartAction, CartEntry};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CartStoreError {
    #[error("Cart entry not found: {name}")]
    EntryNotFound { name: String },

    #[error("Invalid quantity {quantity} for '{name}': quantity must be at least 1")]
    InvalidQuantity { name: String, quantity: u32 },
}

/// Holder of the canonical cart entries. Views read through `entries`
/// and request changes through `dispatch`; they never mutate entries
/// directly.
pub trait CartStore {
    fn entries(&self) -> &[CartEntry];

    /// Token that changes on every committed mutation and is never shared
    /// between stores. Derived values cached against it stay valid until
    /// it moves.
    fn version(&self) -> u64;

    fn dispatch(&mut self, action: CartAction) -> Result<(), CartStoreError>;

    /// Number of units in the cart, as shown on the cart badge.
    fn total_quantity(&self) -> u32 {
        self.entries()
            .iter()
            .fold(0u32, |sum, entry| sum.saturating_add(entry.quantity_count()))
    }

    fn contains(&self, name: &str) -> bool {
        self.entries().iter().any(|entry| entry.name == name)
    }
}

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Draws a version no other store in the process has held.
fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
pub struct InMemoryCartStore {
    entries: Vec<CartEntry>,
    version: u64,
}

impl Default for InMemoryCartStore {
    fn default() -> Self {
        Self::with_entries(Vec::new())
    }
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, e.g. from a saved cart file. Entries are taken as
    /// given; duplicate names are reported but kept.
    pub fn with_entries(entries: Vec<CartEntry>) -> Self {
        let store = Self {
            entries,
            version: next_version(),
        };
        for name in store.duplicate_names() {
            warn!("Cart seeded with duplicate entry name '{}'", name);
        }
        store
    }

    /// Names carried by more than one entry. Intents keyed on these names
    /// are ambiguous.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let repeated = self.entries[..index]
                .iter()
                .any(|earlier| earlier.name == entry.name);
            if repeated && !duplicates.contains(&entry.name.as_str()) {
                duplicates.push(&entry.name);
            }
        }
        duplicates
    }

    fn matches(&self, name: &str) -> usize {
        self.entries.iter().filter(|entry| entry.name == name).count()
    }

    fn commit(&mut self) {
        self.version = next_version();
        debug!("Cart store committed version {}", self.version);
    }
}

impl CartStore for InMemoryCartStore {
    fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn dispatch(&mut self, action: CartAction) -> Result<(), CartStoreError> {
        let matches = self.matches(action.target());
        if matches > 1 {
            warn!(
                "Intent {:?} matches {} entries named '{}'",
                action,
                matches,
                action.target()
            );
        }

        match action {
            CartAction::AddItem(product) => {
                match self.entries.iter_mut().find(|entry| entry.name == product.name) {
                    Some(existing) => {
                        let quantity = existing.quantity_count().saturating_add(1);
                        existing.set_quantity(quantity);
                        info!("Added another '{}' to cart (quantity {})", product.name, quantity);
                    }
                    None => {
                        info!("Added '{}' to cart", product.name);
                        self.entries.push(CartEntry::from_product(&product));
                    }
                }
            }
            CartAction::RemoveItem { name } => {
                if matches == 0 {
                    return Err(CartStoreError::EntryNotFound { name });
                }
                self.entries.retain(|entry| entry.name != name);
                info!("Removed '{}' from cart", name);
            }
            CartAction::UpdateQuantity { name, quantity } => {
                if quantity == 0 {
                    return Err(CartStoreError::InvalidQuantity { name, quantity });
                }
                let entry = self
                    .entries
                    .iter_mut()
                    .find(|entry| entry.name == name)
                    .ok_or_else(|| CartStoreError::EntryNotFound { name: name.clone() })?;
                entry.set_quantity(quantity);
                info!("Set quantity of '{}' to {}", name, quantity);
            }
        }

        self.commit();
        Ok(())
    }
}
