//! Quotation, invoice and voucher figures.
//!
//! Documents price each selected carton with [`selling_price`] and convert
//! with the same fixed rate as the on-screen figures. Amounts are rounded to
//! the currency's minor units here and nowhere earlier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::calculators::{money_from_f64, selling_price, validate_tax_rate};
use super::errors::CostError;
use super::models::{BuyerType, ContainerItem, Currency, SelectedProduct};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quotation,
    Invoice,
    Voucher,
}

/// A priced document line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLine {
    pub item_id: Uuid,
    pub product_name: String,
    pub type_of_packaging: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    pub tax_percentage: f64,
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
}

/// Line-itemized document totals in the document currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentTotals {
    pub kind: DocumentKind,
    pub currency: Currency,
    pub buyer_type: BuyerType,
    pub lines: Vec<DocumentLine>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub sales_tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Price the selected products for a document.
///
/// Sums are taken on full-precision USD values; only the converted results
/// are rounded. Rows with a zero quantity are left off the document.
pub fn build_document(
    kind: DocumentKind,
    items: &[ContainerItem],
    selected: &[SelectedProduct],
    buyer_type: &BuyerType,
    currency: Currency,
    tax_percentage: f64,
) -> Result<DocumentTotals, CostError> {
    validate_tax_rate(tax_percentage)?;

    let mut lines = Vec::with_capacity(selected.len());
    let mut subtotal = 0.0;
    let mut sales_tax = 0.0;

    for sp in selected.iter().filter(|sp| sp.quantity > 0) {
        let item = items
            .iter()
            .find(|item| item.id == sp.id)
            .ok_or(CostError::UnknownItem { id: sp.id })?;
        let results = item
            .results
            .as_ref()
            .ok_or(CostError::NotCalculated { id: item.id })?;

        let unit_price = selling_price(results.total_cost_per_carton, buyer_type);
        let line_total = unit_price * f64::from(sp.quantity);

        subtotal += line_total;
        sales_tax += line_total * (tax_percentage / 100.0);

        lines.push(DocumentLine {
            item_id: item.id,
            product_name: item.product.product_name.clone(),
            type_of_packaging: item.product.type_of_packaging.clone(),
            quantity: sp.quantity,
            unit_price: money(currency, unit_price)?,
            tax_percentage,
            line_total: money(currency, line_total)?,
        });
    }

    Ok(DocumentTotals {
        kind,
        currency,
        buyer_type: buyer_type.clone(),
        lines,
        subtotal: money(currency, subtotal)?,
        sales_tax: money(currency, sales_tax)?,
        total: money(currency, subtotal + sales_tax)?,
    })
}

/// A USD figure converted to `currency` and rounded to its minor units.
fn money(currency: Currency, usd: f64) -> Result<Decimal, CostError> {
    let amount = currency.from_usd(usd);
    money_from_f64(amount, currency.minor_units()).ok_or_else(|| {
        warn!(amount, currency = currency.code(), "Document figure out of range");
        CostError::UnrepresentableAmount { amount }
    })
}

/// Reference printed on a document.
///
/// Quotations get the next sequential quote reference. Invoices carry the
/// caller's invoice number and vouchers derive theirs from it.
pub fn document_reference(
    kind: DocumentKind,
    company: &str,
    year: i32,
    last_number: u32,
    invoice_number: Option<&str>,
) -> Result<String, CostError> {
    match kind {
        DocumentKind::Quotation => Ok(quote_reference(company, year, last_number)),
        DocumentKind::Invoice | DocumentKind::Voucher => {
            let invoice_number = invoice_number
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(CostError::MissingField {
                    field: "invoice_number",
                })?;
            Ok(match kind {
                DocumentKind::Voucher => voucher_number(invoice_number),
                _ => invoice_number.to_string(),
            })
        }
    }
}

/// Next quotation reference, e.g. `Rabsin2026/007`.
pub fn quote_reference(prefix: &str, year: i32, last_number: u32) -> String {
    format!("{}{}/{:03}", prefix, year, last_number.saturating_add(1))
}

/// Voucher number derived from the invoice it settles.
///
/// Only the segment after the first dash is kept: `INV-0042` becomes
/// `VCH-0042` and `INV-2026-7` becomes `VCH-2026`. A number without a dash
/// is used whole.
pub fn voucher_number(invoice_number: &str) -> String {
    let segment = invoice_number.split('-').nth(1).unwrap_or(invoice_number);
    format!("VCH-{}", segment)
}
