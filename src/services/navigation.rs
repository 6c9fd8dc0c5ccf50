use tracing::{info, warn};

pub const PRODUCT_LIST_PATH: &str = "/ProductList";
pub const CART_PATH: &str = "/Cart";

/// Most recent routes kept by `Router::history`.
pub const HISTORY_LIMIT: usize = 32;

pub trait Navigator {
    fn navigate_to(&mut self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ProductList,
    Cart,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::ProductList => PRODUCT_LIST_PATH,
            Route::Cart => CART_PATH,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            PRODUCT_LIST_PATH => Some(Route::ProductList),
            CART_PATH => Some(Route::Cart),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Tracks which view is on screen. Unknown paths leave the route as is.
#[derive(Debug)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Visited routes, oldest first, capped at `HISTORY_LIMIT`.
    pub fn history(&self) -> &[Route] {
        &self.history
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::ProductList)
    }
}

impl Navigator for Router {
    fn navigate_to(&mut self, path: &str) {
        match Route::from_path(path) {
            Some(route) => {
                info!("Navigating from {} to {}", self.current, route);
                self.current = route;
                self.history.push(route);
                if self.history.len() > HISTORY_LIMIT {
                    let overflow = self.history.len() - HISTORY_LIMIT;
                    self.history.drain(..overflow);
                }
            }
            None => warn!("Ignoring navigation to unknown path '{}'", path),
        }
    }
}
