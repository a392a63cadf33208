//! # Invoice Rendering
//!
//! Pure functions from an [`OrderRecord`] to its printable invoice text,
//! plus the capability traits for optional richer outputs (PDF, barcode
//! images) that a build may or may not provide.
//!
//! ## Layout
//! ```text
//! INVOICE - Order #1000
//! Customer: Asha
//! Date: 2026-08-29T10:00:00
//!
//! Item                                       Qty     Disc         Line
//! ----------------------------------------------------------------...
//! Basmati Rice (5kg)                           2    10.00      2160.00
//! ----------------------------------------------------------------...
//! ORDER DISC %: 5.00
//! TOTAL (Rs.): 2052.00
//! Payment: Cash
//! ```
//!
//! Line order on the invoice follows cart insertion order. Names longer
//! than the 40-column item field are truncated for display only; the
//! underlying record keeps the full name.

use crate::types::{OrderLine, OrderRecord};

const RULE_WIDTH: usize = 80;
const NAME_WIDTH: usize = 40;

// =============================================================================
// Text Invoice
// =============================================================================

/// Renders the canonical plain-text invoice for a finalized order.
pub fn render_text(order: &OrderRecord) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("INVOICE - Order #{}\n", order.order_id));
    out.push_str(&format!("Customer: {}\n", order.customer));
    out.push_str(&format!(
        "Date: {}\n",
        order.created_at.format("%Y-%m-%dT%H:%M:%S")
    ));
    out.push('\n');

    out.push_str(&format!(
        "{:<width$} {:>5} {:>8} {:>12}\n",
        "Item",
        "Qty",
        "Disc",
        "Line",
        width = NAME_WIDTH
    ));
    out.push_str(&rule);
    out.push('\n');

    for line in &order.items {
        out.push_str(&render_line(line));
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "ORDER DISC %: {:.2}\n",
        order.discount().percentage()
    ));
    out.push_str(&format!(
        "TOTAL (Rs.): {}\n",
        order.total().to_decimal_string()
    ));
    out.push_str(&render_payment(order));
    out.push('\n');

    out
}

fn render_line(line: &OrderLine) -> String {
    let name: String = line.name.chars().take(NAME_WIDTH).collect();
    format!(
        "{:<width$} {:>5} {:>8} {:>12}",
        name,
        line.quantity,
        format!("{:.2}", line.discount().percentage()),
        line.line_total().to_decimal_string(),
        width = NAME_WIDTH
    )
}

fn render_payment(order: &OrderRecord) -> String {
    let details = order.payment.details.to_string();
    if details.is_empty() {
        format!("Payment: {}", order.payment.method)
    } else {
        format!("Payment: {} {}", order.payment.method, details)
    }
}

/// File name an invoice is saved under: `invoice_<order_id>.txt`.
pub fn invoice_file_name(order_id: u64) -> String {
    format!("invoice_{order_id}.txt")
}

// =============================================================================
// Optional Output Capabilities
// =============================================================================

/// Renders an invoice into some richer byte format (PDF, HTML, ...).
///
/// Implementations that lack the capability return `None` and callers
/// fall back to [`render_text`]; nothing in the finalize path depends on
/// a renderer being present.
pub trait InvoiceRenderer {
    /// Short capability name for logs ("pdf", "none", ...).
    fn name(&self) -> &'static str;

    /// Renders the order, or `None` when the capability is unavailable.
    fn render(&self, order: &OrderRecord) -> Option<Vec<u8>>;
}

/// Encodes a barcode string into an image.
pub trait BarcodeEncoder {
    fn name(&self) -> &'static str;

    /// Encodes the barcode, or `None` when the capability is unavailable.
    fn encode(&self, barcode: &str) -> Option<Vec<u8>>;
}

/// The always-available no-op renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRenderer;

impl InvoiceRenderer for UnavailableRenderer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn render(&self, _order: &OrderRecord) -> Option<Vec<u8>> {
        None
    }
}

/// The always-available no-op barcode encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEncoder;

impl BarcodeEncoder for UnavailableEncoder {
    fn name(&self) -> &'static str {
        "none"
    }

    fn encode(&self, _barcode: &str) -> Option<Vec<u8>> {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
