use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_COMPANY_NAME: &str = "Lancers Tech";
pub const DEFAULT_CONTACT_PERSON: &str = "CH.Shahrukh Farooq";
pub const DEFAULT_CONTACT_TITLE: &str = "C.E.O";
pub const DEFAULT_DELIVERY_METHOD: &str = "ON-CAMPUS TRAINING";

/// Multipart body accepted by `POST /generate-invoice`.
///
/// Line items are sent as indexed fields (`product_name_0`,
/// `product_quantity_0`, ...). Only used for the OpenAPI document; the
/// handler reads the multipart stream directly.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateInvoiceRequest {
    #[schema(example = "Lancers Tech")]
    pub company_name: Option<String>,
    #[schema(example = "Plot 12, Blue Area, Islamabad")]
    pub company_address: Option<String>,
    #[schema(example = "info@lancerstech.com")]
    pub company_email: Option<String>,
    #[schema(example = "Acme Corp")]
    pub client_name: Option<String>,
    #[schema(example = "+92 300 1234567")]
    pub client_phone: Option<String>,
    #[schema(example = "billing@acme.test")]
    pub client_email: Option<String>,
    #[schema(example = "2025-11-05")]
    pub invoice_date: Option<String>,
    #[schema(example = "CH.Shahrukh Farooq")]
    pub contact_person: Option<String>,
    #[schema(example = "C.E.O")]
    pub contact_title: Option<String>,
    #[schema(example = "ON-CAMPUS TRAINING")]
    pub delivery_method: Option<String>,
    #[schema(example = "#f7a80a")]
    pub primary_color: Option<String>,
    #[schema(example = "#2d2d2d")]
    pub secondary_color: Option<String>,
    #[schema(example = "Web Development Course")]
    pub product_name_0: Option<String>,
    #[schema(example = "2")]
    pub product_quantity_0: Option<String>,
    #[schema(example = "25,000")]
    pub product_price_0: Option<String>,
    #[schema(example = "50,000")]
    pub product_total_0: Option<String>,
    /// PNG, JPEG, GIF or SVG logo.
    #[schema(value_type = Option<String>, format = Binary)]
    pub logo: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Printed row number; follows the field index, so skipped blank rows
    /// leave gaps.
    pub number: usize,
    pub name: String,
    pub quantity: String,
    pub price: String,
    /// Raw total as typed, possibly with `$` and thousands separators.
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceForm {
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub invoice_date: String,
    pub contact_person: String,
    pub contact_title: String,
    pub delivery_method: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub items: Vec<LineItem>,
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::from_fields(&HashMap::new())
    }
}

impl InvoiceForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
        let text_or = |key: &str, default: &str| {
            fields
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            company_name: text_or("company_name", DEFAULT_COMPANY_NAME).trim().to_string(),
            company_address: text("company_address"),
            company_email: text("company_email"),
            client_name: text("client_name"),
            client_phone: text("client_phone"),
            client_email: text("client_email"),
            invoice_date: text("invoice_date"),
            contact_person: text_or("contact_person", DEFAULT_CONTACT_PERSON),
            contact_title: text_or("contact_title", DEFAULT_CONTACT_TITLE),
            delivery_method: text_or("delivery_method", DEFAULT_DELIVERY_METHOD),
            primary_color: fields.get("primary_color").cloned(),
            secondary_color: fields.get("secondary_color").cloned(),
            items: collect_line_items(fields),
        }
    }

    /// Splits the company name at its first space into the highlighted
    /// leading word and the remainder.
    pub fn name_parts(&self) -> (&str, &str) {
        self.company_name
            .split_once(' ')
            .unwrap_or((self.company_name.as_str(), ""))
    }
}

/// Reads `product_*_{i}` fields for consecutive indices until the first
/// missing `product_name_{i}`.
fn collect_line_items(fields: &HashMap<String, String>) -> Vec<LineItem> {
    let field_or_zero = |key: String| fields.get(&key).cloned().unwrap_or_else(|| "0".to_string());

    (0..)
        .map_while(|idx| {
            fields
                .get(&format!("product_name_{}", idx))
                .map(|name| (idx, name))
        })
        .filter_map(|(idx, name)| {
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(LineItem {
                number: idx + 1,
                name: name.to_string(),
                quantity: field_or_zero(format!("product_quantity_{}", idx)),
                price: field_or_zero(format!("product_price_{}", idx)),
                total: field_or_zero(format!("product_total_{}", idx)),
            })
        })
        .collect()
}
