use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    models::cart::{CartAction, CartEntry},
    services::{
        cart_store::{CartStore, CartStoreError},
        navigation::{Navigator, PRODUCT_LIST_PATH},
    },
    utils::currency::{format_amount, format_price},
};

pub const TOTAL_LABEL: &str = "Total Amount";

/// Unit cost times quantity. Bad costs or quantities contribute zero.
pub fn line_total(entry: &CartEntry) -> f64 {
    entry.unit_cost() * entry.quantity_value()
}

/// Sum of all line totals with two decimals; `"0.00"` for an empty cart.
pub fn grand_total(entries: &[CartEntry]) -> String {
    if entries.is_empty() {
        return "0.00".to_string();
    }
    let total = entries
        .iter()
        .fold(0.0, |sum, entry| sum + line_total(entry));
    format_amount(total)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subtotal {
    pub category: String,
    pub amount: f64,
}

/// Line totals summed per category, categories in first-seen order.
pub fn subtotals_by_type(entries: &[CartEntry]) -> Vec<Subtotal> {
    let mut subtotals: Vec<Subtotal> = Vec::new();
    for entry in entries {
        let amount = line_total(entry);
        match subtotals
            .iter_mut()
            .find(|subtotal| subtotal.category == entry.category)
        {
            Some(subtotal) => subtotal.amount += amount,
            None => subtotals.push(Subtotal {
                category: entry.category.clone(),
                amount,
            }),
        }
    }
    subtotals
}

/// A UI event handed to a handler. Handlers may suppress its default action.
#[derive(Debug, Default)]
pub struct UiEvent {
    default_prevented: bool,
}

impl UiEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Control {
    ContinueShopping,
    Checkout,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::ContinueShopping => "Continue Shopping",
            Control::Checkout => "Checkout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtotalRow {
    pub category: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRow {
    pub image: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Everything the cart screen shows for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRender {
    pub total_label: &'static str,
    pub total_amount: String,
    pub subtotals: Vec<SubtotalRow>,
    pub rows: Vec<CartRow>,
    pub controls: Vec<Control>,
}

#[derive(Debug, Default)]
struct TotalCache {
    version: Option<u64>,
    amount: String,
    computations: usize,
}

pub struct CartView {
    on_continue_shopping: Option<Box<dyn FnMut()>>,
    total_cache: TotalCache,
}

impl fmt::Debug for CartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartView")
            .field("on_continue_shopping", &self.on_continue_shopping.is_some())
            .field("total_cache", &self.total_cache)
            .finish()
    }
}

impl Default for CartView {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CartView {
    pub fn new(on_continue_shopping: Option<Box<dyn FnMut()>>) -> Self {
        Self {
            on_continue_shopping,
            total_cache: TotalCache::default(),
        }
    }

    pub fn with_continue_shopping(callback: impl FnMut() + 'static) -> Self {
        Self::new(Some(Box::new(callback)))
    }

    /// Grand total, recomputed only when the store's entries change.
    pub fn total_amount(&mut self, store: &dyn CartStore) -> String {
        let version = store.version();
        if self.total_cache.version != Some(version) {
            self.total_cache.amount = grand_total(store.entries());
            self.total_cache.version = Some(version);
            self.total_cache.computations += 1;
            debug!(
                "Recomputed cart total {} at store version {}",
                self.total_cache.amount, version
            );
        }
        self.total_cache.amount.clone()
    }

    /// How many times the grand total has actually been computed.
    pub fn total_computations(&self) -> usize {
        self.total_cache.computations
    }

    pub fn render(&mut self, store: &dyn CartStore) -> CartRender {
        let total_amount = self.total_amount(store);
        let entries = store.entries();

        let subtotals = subtotals_by_type(entries)
            .into_iter()
            .map(|subtotal| SubtotalRow {
                category: subtotal.category,
                amount: format_price(subtotal.amount),
            })
            .collect();

        let rows = entries
            .iter()
            .map(|entry| CartRow {
                image: entry.image.clone(),
                name: entry.name.clone(),
                unit_price: entry.cost_label(),
                quantity: entry.quantity_count(),
                line_total: format_price(line_total(entry)),
            })
            .collect();

        CartRender {
            total_label: TOTAL_LABEL,
            total_amount,
            subtotals,
            rows,
            controls: vec![Control::ContinueShopping, Control::Checkout],
        }
    }

    /// Requests `quantity + 1`. No upper bound.
    /// Requests one more unit. Quantities step in whole units, so a
    /// fractional quantity is truncated first.
    pub fn increment(
        &self,
        store: &mut dyn CartStore,
        entry: &CartEntry,
    ) -> Result<(), CartStoreError> {
        let quantity = entry.quantity_count().saturating_add(1);
        store.dispatch(CartAction::set_quantity(entry.name.clone(), quantity))
    }

    /// Requests `quantity - 1` while the quantity is above 1. Returns whether
    /// an intent was dispatched.
    pub fn decrement(
        &self,
        store: &mut dyn CartStore,
        entry: &CartEntry,
    ) -> Result<bool, CartStoreError> {
        let quantity = entry.quantity_count();
        if quantity <= 1 {
            debug!("Quantity of '{}' already at floor, not decrementing", entry.name);
            return Ok(false);
        }
        store.dispatch(CartAction::set_quantity(entry.name.clone(), quantity - 1))?;
        Ok(true)
    }

    pub fn remove(
        &self,
        store: &mut dyn CartStore,
        entry: &CartEntry,
    ) -> Result<(), CartStoreError> {
        store.dispatch(CartAction::remove(entry.name.clone()))
    }

    /// Suppresses the event's default action, runs the caller's hook if
    /// one was supplied, then navigates to the product list.
    pub fn continue_shopping(&mut self, event: &mut UiEvent, navigator: &mut dyn Navigator) {
        event.prevent_default();
        if let Some(callback) = self.on_continue_shopping.as_mut() {
            callback();
        }
        info!("Continuing shopping");
        navigator.navigate_to(PRODUCT_LIST_PATH);
    }

    /// Checkout is not wired to anything yet.
    pub fn checkout(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cart::LooseNumber;
    use crate::services::cart_store::InMemoryCartStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    // Store double that records intents without applying them
    #[derive(Default)]
    struct RecordingStore {
        entries: Vec<CartEntry>,
        version: u64,
        dispatched: Vec<CartAction>,
    }

    impl CartStore for RecordingStore {
        fn entries(&self) -> &[CartEntry] {
            &self.entries
        }

        fn version(&self) -> u64 {
            self.version
        }

        fn dispatch(&mut self, action: CartAction) -> Result<(), CartStoreError> {
            self.dispatched.push(action);
            Ok(())
        }
    }

    struct RecordingNavigator {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to(&mut self, path: &str) {
            self.log.borrow_mut().push(format!("navigate:{}", path));
        }
    }

    fn sample_cart() -> Vec<CartEntry> {
        vec![
            CartEntry::new("Fern", "Foliage", "$5.00", 2),
            CartEntry::new("Rose", "Flower", "$3.50", 1),
        ]
    }

    #[test]
    fn test_line_totals_and_grand_total() {
        let cart = sample_cart();
        assert_eq!(line_total(&cart[0]), 10.0);
        assert_eq!(line_total(&cart[1]), 3.5);
        assert_eq!(grand_total(&cart), "13.50");
    }

    #[test]
    fn test_empty_cart_total() {
        assert_eq!(grand_total(&[]), "0.00");
        assert!(subtotals_by_type(&[]).is_empty());
    }

    #[test]
    fn test_subtotals_follow_first_seen_order() {
        let mut cart = sample_cart();
        cart.push(CartEntry::new("Ivy", "Foliage", "$2.25", 2));

        let subtotals = subtotals_by_type(&cart);
        assert_eq!(
            subtotals,
            vec![
                Subtotal {
                    category: "Foliage".to_string(),
                    amount: 14.5
                },
                Subtotal {
                    category: "Flower".to_string(),
                    amount: 3.5
                },
            ]
        );

        let sum: f64 = subtotals.iter().map(|s| s.amount).sum();
        assert_eq!(format_amount(sum), grand_total(&cart));
    }

    #[test]
    fn test_unparseable_cost_is_zero() {
        let entry = CartEntry::new("Mystery", "Other", "abc", 3);
        assert_eq!(line_total(&entry), 0.0);
        assert_eq!(grand_total(&[entry]), "0.00");
    }

    #[test]
    fn test_negative_cost_is_preserved() {
        let entry = CartEntry::new("Discount", "Promo", "-$2.00", 2);
        assert_eq!(line_total(&entry), -4.0);
    }

    #[test]
    fn test_render_surface() {
        let store = InMemoryCartStore::with_entries(vec![
            CartEntry::new("Fern", "Foliage", "$5.00", 2).with_image("fern.jpg"),
            CartEntry::new("Rose", "Flower", "$3.50", 1).with_image("rose.jpg"),
        ]);
        let mut view = CartView::default();
        let render = view.render(&store);

        assert_eq!(render.total_label, "Total Amount");
        assert_eq!(render.total_amount, "13.50");
        assert_eq!(render.subtotals.len(), 2);
        assert_eq!(render.subtotals[0].category, "Foliage");
        assert_eq!(render.subtotals[0].amount, "$10.00");
        assert_eq!(render.subtotals[1].amount, "$3.50");
        assert_eq!(
            render.rows[0],
            CartRow {
                image: "fern.jpg".to_string(),
                name: "Fern".to_string(),
                unit_price: "$5.00".to_string(),
                quantity: 2,
                line_total: "$10.00".to_string(),
            }
        );
        assert_eq!(
            render.controls,
            vec![Control::ContinueShopping, Control::Checkout]
        );
    }

    #[test]
    fn test_render_empty_cart() {
        let store = InMemoryCartStore::new();
        let mut view = CartView::default();
        let render = view.render(&store);
        assert_eq!(render.total_amount, "0.00");
        assert!(render.rows.is_empty());
        assert!(render.subtotals.is_empty());
    }

    #[test]
    fn test_total_is_memoized_on_store_version() {
        let mut store = InMemoryCartStore::with_entries(sample_cart());
        let mut view = CartView::default();

        assert_eq!(view.total_amount(&store), "13.50");
        view.render(&store);
        view.render(&store);
        assert_eq!(view.total_computations(), 1);

        let fern = store.entries()[0].clone();
        view.increment(&mut store, &fern).unwrap();
        assert_eq!(view.render(&store).total_amount, "18.50");
        assert_eq!(view.total_computations(), 2);
    }

    #[test]
    fn test_total_cache_is_not_shared_across_stores() {
        let first = InMemoryCartStore::with_entries(sample_cart());
        let second = InMemoryCartStore::new();
        let mut view = CartView::default();

        assert_eq!(view.total_amount(&first), "13.50");
        assert_eq!(view.total_amount(&second), "0.00");
    }

    #[test]
    fn test_total_follows_each_freshly_built_store() {
        let mut view = CartView::default();
        for price in 1..=50u32 {
            let cost = format!("${}", price);
            let store = InMemoryCartStore::with_entries(vec![CartEntry::new("Fern", "Foliage", cost.as_str(), 1)]);
            assert_eq!(view.total_amount(&store), format!("{}.00", price));
        }
        assert_eq!(view.total_computations(), 50);
    }

    #[test]
    fn test_increment_always_dispatches() {
        let mut store = RecordingStore::default();
        let view = CartView::default();

        for quantity in [1, 2, 99] {
            let entry = CartEntry::new("Fern", "Foliage", "$5.00", quantity);
            view.increment(&mut store, &entry).unwrap();
        }

        assert_eq!(
            store.dispatched,
            vec![
                CartAction::set_quantity("Fern", 2),
                CartAction::set_quantity("Fern", 3),
                CartAction::set_quantity("Fern", 100),
            ]
        );
    }

    #[test]
    fn test_decrement_respects_floor() {
        let mut store = RecordingStore::default();
        let view = CartView::default();

        let single = CartEntry::new("Rose", "Flower", "$3.50", 1);
        assert!(!view.decrement(&mut store, &single).unwrap());
        assert!(store.dispatched.is_empty());

        let pair = CartEntry::new("Rose", "Flower", "$3.50", 2);
        assert!(view.decrement(&mut store, &pair).unwrap());
        assert_eq!(store.dispatched, vec![CartAction::set_quantity("Rose", 1)]);
    }

    #[test]
    fn test_fractional_quantity_steps_from_whole_units() {
        let mut store = RecordingStore::default();
        let view = CartView::default();

        let mut tall = CartEntry::new("Fern", "Foliage", "$5.00", 1);
        tall.quantity = Some(LooseNumber::Float(2.7));
        view.increment(&mut store, &tall).unwrap();
        assert!(view.decrement(&mut store, &tall).unwrap());

        let mut short = CartEntry::new("Rose", "Flower", "$3.50", 1);
        short.quantity = Some(LooseNumber::Float(1.5));
        assert!(!view.decrement(&mut store, &short).unwrap());

        assert_eq!(
            store.dispatched,
            vec![
                CartAction::set_quantity("Fern", 3),
                CartAction::set_quantity("Fern", 1),
            ]
        );
    }

    #[test]
    fn test_remove_dispatches_by_name() {
        let mut store = RecordingStore::default();
        let view = CartView::default();
        let entry = CartEntry::new("Rose", "Flower", "$3.50", 4);

        view.remove(&mut store, &entry).unwrap();
        assert_eq!(store.dispatched, vec![CartAction::remove("Rose")]);
    }

    #[test]
    fn test_continue_shopping_runs_callback_before_navigation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let callback_log = Rc::clone(&log);
        let mut view = CartView::with_continue_shopping(move || {
            callback_log.borrow_mut().push("callback".to_string());
        });
        let mut navigator = RecordingNavigator {
            log: Rc::clone(&log),
        };
        let mut event = UiEvent::new();

        view.continue_shopping(&mut event, &mut navigator);

        assert!(event.is_default_prevented());
        assert_eq!(
            *log.borrow(),
            vec!["callback".to_string(), "navigate:/ProductList".to_string()]
        );
    }

    #[test]
    fn test_continue_shopping_without_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = CartView::default();
        let mut navigator = RecordingNavigator {
            log: Rc::clone(&log),
        };

        view.continue_shopping(&mut UiEvent::new(), &mut navigator);
        assert_eq!(*log.borrow(), vec!["navigate:/ProductList".to_string()]);
    }

    #[test]
    fn test_checkout_is_inert() {
        let store = InMemoryCartStore::with_entries(sample_cart());
        let version = store.version();
        let mut view = CartView::default();
        let before = view.render(&store);
        view.checkout();
        assert_eq!(view.render(&store), before);
        assert_eq!(store.version(), version);
    }
}
