use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    cart::CartEntry,
    product::{Catalog, CatalogError},
};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

fn read_json(path: &Path) -> Result<Value, LoaderError> {
    let raw = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoaderError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Turns cart JSON into entries. Accepts a bare list or an object with an
/// `items` list. Anything that is not a list yields an empty cart, and
/// list elements that are not objects are skipped.
pub fn parse_cart_entries(value: &Value) -> Vec<CartEntry> {
    let items = match value {
        Value::Object(map) => map.get("items"),
        other => Some(other),
    };

    let Some(items) = items.and_then(Value::as_array) else {
        warn!("Cart data is not a list, treating cart as empty");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!("Skipping cart item {}: not an object", index);
                return None;
            }
            match serde_json::from_value::<CartEntry>(item.clone()) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping cart item {}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

pub fn load_cart_file(path: &Path) -> Result<Vec<CartEntry>, LoaderError> {
    let value = read_json(path)?;
    let entries = parse_cart_entries(&value);
    debug!("Loaded {} cart entries from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn load_catalog_file(path: &Path) -> Result<Catalog, LoaderError> {
    let value = read_json(path)?;
    let products = serde_json::from_value(value).map_err(CatalogError::Malformed)?;
    let catalog = Catalog::from_products(products)?;
    debug!(
        "Loaded {} products from {}",
        catalog.products().len(),
        path.display()
    );
    Ok(catalog)
}
