use std::env;
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub seed_cart_path: Option<PathBuf>,
    pub log_level: String,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            seed_cart_path: None,
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config {
            catalog_path: env::var("CART_CATALOG_PATH").ok().map(PathBuf::from),
            seed_cart_path: env::var("CART_SEED_PATH").ok().map(PathBuf::from),
            log_level: env::var("LOG_LEVEL").unwrap_or("info".to_string()),
            environment: env::var("APP_ENV").unwrap_or("development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Applies command line overrides on top of the environment.
    pub fn with_overrides(mut self, catalog: Option<PathBuf>, seed_cart: Option<PathBuf>) -> anyhow::Result<Self> {
        if catalog.is_some() {
            self.catalog_path = catalog;
        }
        if seed_cart.is_some() {
            self.seed_cart_path = seed_cart;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!(
                "LOG_LEVEL must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if let Some(path) = &self.catalog_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!("Catalog file not found: {}", path.display()));
            }
        }

        if let Some(path) = &self.seed_cart_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!("Cart file not found: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Directive for the log filter: `debug` when verbose output was
    /// requested, the configured level otherwise.
    pub fn log_filter(&self, verbose: bool) -> String {
        if verbose {
            "debug".to_string()
        } else {
            self.log_level.to_lowercase()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
