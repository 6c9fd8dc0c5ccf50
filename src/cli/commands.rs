use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Select};
use tracing::{error, info};

use crate::{
    cli::args::Commands,
    models::{cart::CartEntry, product::{Catalog, Product}},
    services::{
        cart_store::{CartStore, CartStoreError, InMemoryCartStore},
        cart_view::{grand_total, subtotals_by_type, CartView, Control, UiEvent},
        navigation::{Route, Router},
        product_list::ProductListView,
    },
    utils::{
        formatting::{format_cart_view, format_product_list, format_totals, format_totals_json},
        load_cart_file, load_catalog_file, Config,
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static LEAF: Emoji<'_, '_> = Emoji("🌿 ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

#[derive(Debug, Clone, Copy)]
enum CartChoice {
    Increment(usize),
    Decrement(usize),
    Remove(usize),
    ContinueShopping,
    Checkout,
    Quit,
}

pub struct CliApp {
    catalog: Catalog,
    store: InMemoryCartStore,
    router: Router,
    cart_view: CartView,
    product_list: ProductListView,
}

impl CliApp {
    pub fn new(config: &Config) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog_file(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => Catalog::builtin().context("Built-in catalog is invalid")?,
        };
        info!("Catalog ready with {} products", catalog.products().len());

        let store = match &config.seed_cart_path {
            Some(path) => {
                let entries = load_cart_file(path)
                    .with_context(|| format!("Failed to load cart from {}", path.display()))?;
                info!("Seeded cart with {} entries", entries.len());
                InMemoryCartStore::with_entries(entries)
            }
            None => InMemoryCartStore::new(),
        };

        let cart_view = CartView::with_continue_shopping(|| {
            println!("{} {}", LEAF, style("Back to the plants").green());
        });

        Ok(Self {
            catalog,
            store,
            router: Router::default(),
            cart_view,
            product_list: ProductListView::new(),
        })
    }

    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Shop { .. } => self.handle_shop(),
            Commands::Cart { .. } => self.handle_show_cart(),
            Commands::Catalog => self.handle_catalog(),
            Commands::Totals { json, .. } => self.handle_totals(json),
        }
    }

    fn handle_shop(&mut self) -> Result<()> {
        println!("{} {}", LEAF, style("Paradise Nursery").bold().cyan());

        loop {
            let keep_going = match self.router.current() {
                Route::ProductList => self.product_list_screen()?,
                Route::Cart => self.cart_screen()?,
            };
            if !keep_going {
                break;
            }
        }

        info!(
            "Shop session ended with {} items in cart",
            self.store.total_quantity()
        );
        Ok(())
    }

    fn product_list_screen(&mut self) -> Result<bool> {
        let render = self.product_list.render(&self.catalog, &self.store);
        println!("{}", format_product_list(&render));

        let products: Vec<Product> = self.catalog.products().to_vec();
        let mut labels: Vec<String> = products
            .iter()
            .map(|product| {
                if self.store.contains(&product.name) {
                    format!("{} (Added to Cart)", product.name)
                } else {
                    format!("Add {} - {}", product.name, product.cost)
                }
            })
            .collect();
        labels.push(format!("{}View cart ({})", CART, render.cart_badge));
        labels.push("Quit".to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose a plant")
            .items(&labels)
            .default(0)
            .interact()?;

        match products.get(selection) {
            Some(product) if self.store.contains(&product.name) => {
                println!("{} {} is already in your cart", INFO, style(&product.name).cyan());
                Ok(true)
            }
            Some(product) => {
                let result = self.product_list.add_to_cart(&mut self.store, product);
                report(result, &format!("{} added to cart", product.name), "add to cart");
                Ok(true)
            }
            None if selection == products.len() => {
                self.product_list.view_cart(&mut self.router);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn cart_screen(&mut self) -> Result<bool> {
        let render = self.cart_view.render(&self.store);
        println!("{} {}", CART, style("Shopping Cart").bold().cyan());
        println!("{}", format_cart_view(&render));

        let mut labels = Vec::new();
        let mut choices = Vec::new();
        for (index, row) in render.rows.iter().enumerate() {
            labels.push(format!("+ {}", row.name));
            choices.push(CartChoice::Increment(index));
            labels.push(format!("- {}", row.name));
            choices.push(CartChoice::Decrement(index));
            labels.push(format!("Delete {}", row.name));
            choices.push(CartChoice::Remove(index));
        }
        for control in &render.controls {
            labels.push(control.label().to_string());
            choices.push(match control {
                Control::ContinueShopping => CartChoice::ContinueShopping,
                Control::Checkout => CartChoice::Checkout,
            });
        }
        labels.push("Quit".to_string());
        choices.push(CartChoice::Quit);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Update your cart")
            .items(&labels)
            .default(0)
            .interact()?;

        match choices.get(selection).copied().unwrap_or(CartChoice::Quit) {
            CartChoice::Increment(index) => {
                let entry = self.entry_at(index)?;
                let result = self.cart_view.increment(&mut self.store, &entry);
                report(result, &format!("One more {}", entry.name), "update quantity");
            }
            CartChoice::Decrement(index) => {
                let entry = self.entry_at(index)?;
                match self.cart_view.decrement(&mut self.store, &entry) {
                    Ok(true) => println!("{} One less {}", CHECKMARK, style(&entry.name).green()),
                    Ok(false) => println!(
                        "{} Quantity of {} cannot go below 1",
                        INFO,
                        style(&entry.name).cyan()
                    ),
                    Err(e) => report(Err(e), "", "update quantity"),
                }
            }
            CartChoice::Remove(index) => {
                let entry = self.entry_at(index)?;
                let result = self.cart_view.remove(&mut self.store, &entry);
                report(result, &format!("{} removed from cart", entry.name), "remove item");
            }
            CartChoice::ContinueShopping => {
                let mut event = UiEvent::new();
                self.cart_view.continue_shopping(&mut event, &mut self.router);
            }
            CartChoice::Checkout => self.cart_view.checkout(),
            CartChoice::Quit => return Ok(false),
        }

        Ok(true)
    }

    fn entry_at(&self, index: usize) -> Result<CartEntry> {
        self.store
            .entries()
            .get(index)
            .cloned()
            .context("Cart changed while the menu was open")
    }

    fn handle_show_cart(&mut self) -> Result<()> {
        let render = self.cart_view.render(&self.store);
        println!("{} {}", CART, style("Shopping Cart").bold().cyan());
        println!("{}", format_cart_view(&render));
        Ok(())
    }

    fn handle_catalog(&self) -> Result<()> {
        let render = self.product_list.render(&self.catalog, &self.store);
        println!("{}", format_product_list(&render));
        Ok(())
    }

    fn handle_totals(&self, json: bool) -> Result<()> {
        let entries = self.store.entries();
        let total = grand_total(entries);
        let subtotals = subtotals_by_type(entries);

        if json {
            let output = format_totals_json(&total, &subtotals).context("Failed to serialize totals")?;
            println!("{}", output);
        } else {
            print!("{}", format_totals(&total, &subtotals));
        }
        Ok(())
    }
}

fn report(result: Result<(), CartStoreError>, success: &str, action: &str) {
    match result {
        Ok(()) => println!("{} {}", CHECKMARK, style(success).green()),
        Err(e) => {
            println!("{} Failed to {}: {}", CROSS, action, style(&e).red());
            error!("Failed to {}: {}", action, e);
        }
    }
}
