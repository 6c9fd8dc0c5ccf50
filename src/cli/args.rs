use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plant-cart")]
#[command(about = "Plant shop with an interactive shopping cart")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Product catalog file (JSON list of products)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the catalog and manage the cart interactively
    Shop {
        /// Start with the items from this cart file
        #[arg(long)]
        cart: Option<PathBuf>,
    },
    /// Show the cart view for a saved cart
    Cart {
        /// Cart file (a JSON list of items, or an object with an `items` list)
        #[arg(long)]
        cart: Option<PathBuf>,
    },
    /// List the product catalog by category
    Catalog,
    /// Print the grand total and per-type subtotals of a cart
    Totals {
        /// Cart file (a JSON list of items, or an object with an `items` list)
        #[arg(long)]
        cart: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn cart_path(&self) -> Option<PathBuf> {
        match self {
            Commands::Shop { cart } | Commands::Cart { cart } | Commands::Totals { cart, .. } => {
                cart.clone()
            }
            Commands::Catalog => None,
        }
    }
}
