//! Money arithmetic for the totals block.

use crate::invoice::models::LineItem;

pub const TAX_RATE: f64 = 0.05;

/// Parses a line total as typed into the form, tolerating `$` and
/// thousands separators. Anything unparsable or non-finite is `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Line total with separators and currency symbols removed, as printed in
/// the order table.
pub fn clean_amount(raw: &str) -> String {
    raw.replace(['$', ','], "").trim().to_string()
}

/// Rounds to whole units and groups thousands: `1234567.5` -> `1,234,568`.
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if grouped == "0" {
        return grouped;
    }
    format!("{}{}", sign, grouped)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    pub fn from_items(items: &[LineItem]) -> Self {
        let subtotal: f64 = items.iter().filter_map(|item| parse_amount(&item.total)).sum();
        Self::from_subtotal(subtotal)
    }

    pub fn from_subtotal(subtotal: f64) -> Self {
        Self {
            subtotal,
            tax: subtotal * TAX_RATE,
            total: subtotal * (1.0 + TAX_RATE),
        }
    }
}
