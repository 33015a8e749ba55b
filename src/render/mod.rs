//! Invoice document rendering.
//!
//! - `layout` turns an [`InvoiceForm`] into a display list with fixed
//!   coordinates
//! - `pdf` draws that display list with printpdf's builtin Helvetica fonts
//! - `theme`, `fonts` and `amounts` hold the colors, text metrics and money
//!   arithmetic the layout depends on

pub mod amounts;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod theme;

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::config::Branding;
use crate::invoice::models::InvoiceForm;
use crate::logo::load_logo;

pub use amounts::Totals;
pub use layout::{layout, Page};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to build PDF: {0}")]
    Pdf(String),
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a finished render.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub path: PathBuf,
    pub totals: Totals,
    pub logo_embedded: bool,
}

/// Renders the invoice to `output`. A logo that cannot be decoded is
/// skipped with a warning.
pub fn render_invoice(
    form: &InvoiceForm,
    logo_path: Option<&Path>,
    output: &Path,
    branding: &Branding,
) -> Result<RenderedInvoice, RenderError> {
    let logo = logo_path.and_then(|path| match load_logo(path) {
        Ok(logo) => Some(logo),
        Err(e) => {
            warn!("Skipping logo {}: {}", path.display(), e);
            None
        }
    });

    let page = layout(
        form,
        logo.as_ref().map(|l| (l.width(), l.height())),
        branding,
    );
    if page.overflows() {
        warn!(
            "Invoice content for {} items runs past the footer",
            form.items.len()
        );
    }

    let title = format!("Invoice - {}", form.company_name);
    pdf::write_pdf(&page, logo.as_ref(), &title, output)?;
    info!(
        "Rendered invoice {} ({} items, total {})",
        output.display(),
        form.items.len(),
        amounts::format_amount(page.totals.total)
    );

    Ok(RenderedInvoice {
        path: output.to_path_buf(),
        totals: page.totals,
        logo_embedded: logo.is_some(),
    })
}
