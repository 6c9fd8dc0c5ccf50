use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::product::Product;
use crate::utils::currency::parse_cost_text;

/// A scalar as it arrives from cart or catalog data: a number, a string
/// such as `"$5.00"`, or something else entirely. Never fails to
/// deserialize, so one malformed field cannot take down a whole cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl LooseNumber {
    /// Numeric value of a cost: strips every character that is not a digit,
    /// `.` or `-` and parses the rest. Anything unparseable is `0.0`.
    pub fn cost_value(&self) -> f64 {
        match self {
            LooseNumber::Integer(value) => *value as f64,
            LooseNumber::Float(value) => finite_or_zero(*value),
            LooseNumber::Text(text) => parse_cost_text(text),
            LooseNumber::Other(Value::Array(items)) => parse_cost_text(&join_array(items)),
            LooseNumber::Other(_) => 0.0,
        }
    }

    /// Plain numeric conversion used for quantities. Strings are trimmed
    /// and parsed as-is (no stripping), an empty string is zero and
    /// booleans count as 1/0. Arrays read as their comma-joined text, so
    /// `[3]` is 3 and `[1, 2]` is 0.
    pub fn number_or_zero(&self) -> f64 {
        match self {
            LooseNumber::Integer(value) => *value as f64,
            LooseNumber::Float(value) => finite_or_zero(*value),
            LooseNumber::Text(text) => parse_plain_number(text),
            LooseNumber::Other(Value::Bool(true)) => 1.0,
            LooseNumber::Other(Value::Array(items)) => parse_plain_number(&join_array(items)),
            LooseNumber::Other(_) => 0.0,
        }
    }

    /// The value exactly as the data provided it, for display.
    pub fn label(&self) -> String {
        match self {
            LooseNumber::Integer(value) => value.to_string(),
            LooseNumber::Float(value) => value.to_string(),
            LooseNumber::Text(text) => text.clone(),
            LooseNumber::Other(Value::Null) => String::new(),
            LooseNumber::Other(value) => value.to_string(),
        }
    }
}

impl From<u32> for LooseNumber {
    fn from(value: u32) -> Self {
        LooseNumber::Integer(i64::from(value))
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        LooseNumber::Text(value.to_string())
    }
}

fn parse_plain_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Text of a JSON array the way a script runtime stringifies it: elements
/// joined by `,`, nulls as empty, nested arrays flattened.
fn join_array(items: &[Value]) -> String {
    items.iter().map(value_text).collect::<Vec<_>>().join(",")
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => join_array(items),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Accepts any JSON value for a text field; null becomes empty and other
/// non-strings use their JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// One line of the shopping cart. `name` doubles as the identity key for
/// every store intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(default)]
    pub cost: Option<LooseNumber>,

    #[serde(default)]
    pub quantity: Option<LooseNumber>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
}

impl CartEntry {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        cost: impl Into<LooseNumber>,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            cost: Some(cost.into()),
            quantity: Some(LooseNumber::from(quantity)),
            image: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// A fresh cart line for a catalog product, starting at quantity 1.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            cost: Some(LooseNumber::Text(product.cost.clone())),
            quantity: Some(LooseNumber::from(1)),
            image: product.image.clone(),
        }
    }

    pub fn unit_cost(&self) -> f64 {
        self.cost.as_ref().map(LooseNumber::cost_value).unwrap_or(0.0)
    }

    pub fn quantity_value(&self) -> f64 {
        self.quantity
            .as_ref()
            .map(LooseNumber::number_or_zero)
            .unwrap_or(0.0)
    }

    /// Whole-unit quantity used by the quantity controls. Negative and
    /// non-numeric quantities count as zero.
    pub fn quantity_count(&self) -> u32 {
        let value = self.quantity_value().trunc();
        if value <= 0.0 {
            0
        } else if value >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            value as u32
        }
    }

    pub fn cost_label(&self) -> String {
        self.cost.as_ref().map(LooseNumber::label).unwrap_or_default()
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = Some(LooseNumber::from(quantity));
    }
}

/// The closed set of mutations a cart store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    AddItem(Product),
    RemoveItem { name: String },
    UpdateQuantity { name: String, quantity: u32 },
}

impl CartAction {
    pub fn remove(name: impl Into<String>) -> Self {
        CartAction::RemoveItem { name: name.into() }
    }

    pub fn set_quantity(name: impl Into<String>, quantity: u32) -> Self {
        CartAction::UpdateQuantity {
            name: name.into(),
            quantity,
        }
    }

    /// Name of the entry the action targets.
    pub fn target(&self) -> &str {
        match self {
            CartAction::AddItem(product) => &product.name,
            CartAction::RemoveItem { name } | CartAction::UpdateQuantity { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_from_json(json: &str) -> CartEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_cost_with_currency_symbol() {
        let entry = entry_from_json(r#"{"name":"Fern","type":"Foliage","cost":"$5.00","quantity":2}"#);
        assert_eq!(entry.unit_cost(), 5.0);
        assert_eq!(entry.quantity_count(), 2);
        assert_eq!(entry.cost_label(), "$5.00");
    }

    #[test]
    fn test_malformed_fields_never_fail_to_deserialize() {
        let entry = entry_from_json(r#"{"name":"Odd","cost":{"amount":3},"quantity":{"n":2}}"#);
        assert_eq!(entry.unit_cost(), 0.0);
        assert_eq!(entry.quantity_value(), 0.0);
        assert_eq!(entry.category, "");
    }

    #[test]
    fn test_array_values_read_as_joined_text() {
        let single = entry_from_json(r#"{"name":"Moss","cost":["$4"],"quantity":[3]}"#);
        assert_eq!(single.unit_cost(), 4.0);
        assert_eq!(single.quantity_value(), 3.0);

        let pair = entry_from_json(r#"{"name":"Moss","cost":[1,2],"quantity":[1,2]}"#);
        assert_eq!(pair.unit_cost(), 12.0);
        assert_eq!(pair.quantity_value(), 0.0);

        let one = entry_from_json(r#"{"name":"Moss","cost":"$4","quantity":[1]}"#);
        assert_eq!(one.quantity_count(), 1);

        let empty = entry_from_json(r#"{"name":"Moss","cost":"$4","quantity":[]}"#);
        assert_eq!(empty.quantity_value(), 0.0);
    }

    #[test]
    fn test_null_and_non_string_text_fields_are_kept() {
        let entry = entry_from_json(r#"{"name":7,"type":null,"cost":"$5.00","quantity":2,"image":null}"#);
        assert_eq!(entry.name, "7");
        assert_eq!(entry.category, "");
        assert_eq!(entry.image, "");
        assert_eq!(entry.unit_cost(), 5.0);
        assert_eq!(entry.quantity_count(), 2);

        let flagged = entry_from_json(r#"{"name":"Ivy","type":true,"image":{"src":"x"}}"#);
        assert_eq!(flagged.category, "true");
        assert_eq!(flagged.image, "[object Object]");
    }

    #[test]
    fn test_missing_cost_and_quantity_are_zero() {
        let entry = entry_from_json(r#"{"name":"Bare"}"#);
        assert_eq!(entry.unit_cost(), 0.0);
        assert_eq!(entry.quantity_value(), 0.0);
        assert_eq!(entry.quantity_count(), 0);
        assert_eq!(entry.cost_label(), "");
    }

    #[test]
    fn test_numeric_cost_and_string_quantity() {
        let entry = entry_from_json(r#"{"name":"Aloe","cost":12.5,"quantity":" 3 "}"#);
        assert_eq!(entry.unit_cost(), 12.5);
        assert_eq!(entry.quantity_value(), 3.0);
    }

    #[test]
    fn test_quantity_string_is_not_stripped() {
        // Unlike costs, quantities are parsed without stripping.
        let entry = entry_from_json(r#"{"name":"Aloe","cost":"1","quantity":"3 pcs"}"#);
        assert_eq!(entry.quantity_value(), 0.0);
    }

    #[test]
    fn test_negative_and_fractional_quantity_count() {
        let mut entry = CartEntry::new("Ivy", "Vine", "$1", 1);
        entry.quantity = Some(LooseNumber::Integer(-4));
        assert_eq!(entry.quantity_count(), 0);
        entry.quantity = Some(LooseNumber::Float(2.7));
        assert_eq!(entry.quantity_count(), 2);
    }

    #[test]
    fn test_boolean_quantity() {
        let entry = entry_from_json(r#"{"name":"Moss","cost":"2","quantity":true}"#);
        assert_eq!(entry.quantity_value(), 1.0);
    }

    #[test]
    fn test_action_target() {
        assert_eq!(CartAction::remove("Fern").target(), "Fern");
        assert_eq!(CartAction::set_quantity("Rose", 3).target(), "Rose");
    }
}
