use console::style;
use serde::Serialize;
use tabled::{Table, Tabled, settings::{Style, Alignment}};

use crate::services::{
    cart_view::{CartRender, Control, Subtotal},
    product_list::ProductListRender,
};
use crate::utils::currency::{format_amount, format_price};

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Price")]
    unit_price: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Total")]
    line_total: String,
    #[tabled(rename = "Image")]
    image: String,
}

#[derive(Tabled)]
struct ProductTableRow {
    #[tabled(rename = "Plant")]
    name: String,
    #[tabled(rename = "Price")]
    cost: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_cart_table(render: &CartRender) -> String {
    if render.rows.is_empty() {
        return String::new();
    }

    let rows: Vec<CartTableRow> = render
        .rows
        .iter()
        .map(|row| CartTableRow {
            name: row.name.clone(),
            unit_price: row.unit_price.clone(),
            quantity: format!("- {} +", row.quantity),
            line_total: row.line_total.clone(),
            image: truncate(&row.image, 40),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left());

    table.to_string()
}

pub fn format_cart_view(render: &CartRender) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}: {}\n",
        style(render.total_label).bold(),
        style(format!("${}", render.total_amount)).green().bold()
    ));

    for subtotal in &render.subtotals {
        output.push_str(&format!(
            "  {} {}\n",
            style(&subtotal.category).dim(),
            style(&subtotal.amount).yellow()
        ));
    }

    if render.rows.is_empty() {
        output.push_str(&format!("{}\n", style("Your cart is empty").dim()));
    } else {
        output.push_str(&format_cart_table(render));
        output.push('\n');
    }

    let controls: Vec<String> = render
        .controls
        .iter()
        .map(|control| match control {
            Control::ContinueShopping => style(control.label()).cyan().to_string(),
            Control::Checkout => style(control.label()).dim().to_string(),
        })
        .collect();
    output.push_str(&format!("[{}]\n", controls.join("] [")));

    output
}

pub fn format_product_list(render: &ProductListRender) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        style("Cart").bold(),
        style(format!("({})", render.cart_badge)).cyan()
    ));

    for section in &render.sections {
        output.push_str(&format!("\n{}\n", style(&section.category).bold().green()));

        let rows: Vec<ProductTableRow> = section
            .products
            .iter()
            .map(|card| ProductTableRow {
                name: card.name.clone(),
                cost: card.cost.clone(),
                description: card
                    .description
                    .as_deref()
                    .map(|d| truncate(d, 50))
                    .unwrap_or_else(|| "-".to_string()),
                status: if card.in_cart {
                    style(card.button_label()).dim().to_string()
                } else {
                    card.button_label().to_string()
                },
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Alignment::left());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output
}

#[derive(Serialize)]
struct TotalsReport<'a> {
    total: &'a str,
    subtotals: Vec<SubtotalReport<'a>>,
}

#[derive(Serialize)]
struct SubtotalReport<'a> {
    #[serde(rename = "type")]
    category: &'a str,
    amount: String,
}

pub fn format_totals_json(total: &str, subtotals: &[Subtotal]) -> Result<String, serde_json::Error> {
    let report = TotalsReport {
        total,
        subtotals: subtotals
            .iter()
            .map(|subtotal| SubtotalReport {
                category: &subtotal.category,
                amount: format_amount(subtotal.amount),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

pub fn format_totals(total: &str, subtotals: &[Subtotal]) -> String {
    let mut output = format!("{}: ${}\n", style("Total Amount").bold(), total);
    for subtotal in subtotals {
        output.push_str(&format!("  {}: {}\n", subtotal.category, format_price(subtotal.amount)));
    }
    output
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
