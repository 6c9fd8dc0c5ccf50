use serde::Serialize;
use tracing::info;

use crate::{
    models::{cart::CartAction, product::{Catalog, Product}},
    services::{
        cart_store::{CartStore, CartStoreError},
        navigation::{Navigator, CART_PATH},
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub name: String,
    pub cost: String,
    pub image: String,
    pub description: Option<String>,
    pub in_cart: bool,
}

impl ProductCard {
    pub fn button_label(&self) -> &'static str {
        if self.in_cart {
            "Added to Cart"
        } else {
            "Add to Cart"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSection {
    pub category: String,
    pub products: Vec<ProductCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListRender {
    pub sections: Vec<ProductSection>,
    pub cart_badge: u32,
}

/// The shop front: catalog by category plus the cart badge.
#[derive(Debug, Default)]
pub struct ProductListView;

impl ProductListView {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, catalog: &Catalog, store: &dyn CartStore) -> ProductListRender {
        let sections = catalog
            .by_category()
            .into_iter()
            .map(|(category, products)| ProductSection {
                category: category.to_string(),
                products: products
                    .into_iter()
                    .map(|product| ProductCard {
                        name: product.name.clone(),
                        cost: product.cost.clone(),
                        image: product.image.clone(),
                        description: product.description.clone(),
                        in_cart: store.contains(&product.name),
                    })
                    .collect(),
            })
            .collect();

        ProductListRender {
            sections,
            cart_badge: store.total_quantity(),
        }
    }

    pub fn add_to_cart(
        &self,
        store: &mut dyn CartStore,
        product: &Product,
    ) -> Result<(), CartStoreError> {
        store.dispatch(CartAction::AddItem(product.clone()))
    }

    pub fn view_cart(&self, navigator: &mut dyn Navigator) {
        info!("Opening cart");
        navigator.navigate_to(CART_PATH);
    }
}
