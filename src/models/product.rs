use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "Type must be 1-100 characters"))]
    #[validate(custom = "validate_not_blank")]
    pub category: String,

    #[validate(custom = "validate_not_blank")]
    pub cost: String,

    #[validate(length(min = 1, message = "Image reference is required"))]
    pub image: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be less than 500 characters"))]
    pub description: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid product '{name}': {source}")]
    InvalidProduct {
        name: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Duplicate product name in catalog: {name}")]
    DuplicateProduct { name: String },

    #[error("Catalog is empty")]
    Empty,

    #[error("Malformed catalog data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Products on offer, kept in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        {
            let mut seen = HashSet::new();
            for product in &products {
                product
                    .validate()
                    .map_err(|source| CatalogError::InvalidProduct {
                        name: product.name.clone(),
                        source,
                    })?;

                if !seen.insert(product.name.as_str()) {
                    return Err(CatalogError::DuplicateProduct {
                        name: product.name.clone(),
                    });
                }
            }
        }

        Ok(Self { products })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// The plant catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.name == name)
    }

    /// Products grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&Product>)> {
        let mut groups: Vec<(&str, Vec<&Product>)> = Vec::new();
        for product in &self.products {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == product.category)
            {
                Some((_, items)) => items.push(product),
                None => groups.push((product.category.as_str(), vec![product])),
            }
        }
        groups
    }
}
