//! HTTP routes for the costing engine.
//!
//! Every endpoint is stateless: the caller sends the whole container with
//! each request and receives freshly computed figures.

use askama::Template;
use axum::{extract::State, response::Html, routing::post, Json, Router};
use chrono::{Datelike, Utc};

use crate::error::Result;
use crate::extract::AppJson;
use crate::AppState;

use super::calculators::{apportion, compute_unit_costs, profit, selling_price};
use super::documents::{build_document, document_reference};
use super::import::{import_products, ImportedProduct};
use super::models::{CalculationResults, ShippingDetails};
use super::rates::to_jod;
use super::requests::{
    ApportionRequest, ContainerRequest, DocumentRequest, SellingPriceRequest, UnitCostsRequest,
};
use super::responses::{ContainerResponse, DocumentResponse, SellingPriceResponse};
use super::services::{
    container_totals, product_positions, recalculate_container, summarize, ContainerTotals,
    SummaryRow, SummaryTotals,
};

/// Create the costing router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/unit-costs", post(unit_costs))
        .route("/apportion", post(apportion_shipment))
        .route("/selling-price", post(selling_price_for_tier))
        .route("/container", post(container))
        .route("/documents", post(document))
        .route("/import", post(import))
        .route("/print/summary", post(print_summary))
}

/// Cost a single product
async fn unit_costs(AppJson(req): AppJson<UnitCostsRequest>) -> Result<Json<CalculationResults>> {
    let results = compute_unit_costs(&req.product, &req.shipping)?;
    Ok(Json(results))
}

/// Split a shipment's shared costs across products
async fn apportion_shipment(
    AppJson(req): AppJson<ApportionRequest>,
) -> Result<Json<Vec<ShippingDetails>>> {
    let shares = apportion(&req.products, &req.shipping)?;
    Ok(Json(shares))
}

/// Price a carton for a buyer tier
async fn selling_price_for_tier(
    AppJson(req): AppJson<SellingPriceRequest>,
) -> Json<SellingPriceResponse> {
    let price = selling_price(req.cost_per_carton, &req.buyer_type);

    Json(SellingPriceResponse {
        cost_per_carton: req.cost_per_carton,
        selling_price: price,
        selling_price_jod: to_jod(price),
        profit: req
            .cartons_for_sale
            .map(|cartons| profit(req.cost_per_carton, &req.buyer_type, cartons)),
        buyer_type: req.buyer_type,
    })
}

/// Recalculate a container and everything derived from it
async fn container(AppJson(req): AppJson<ContainerRequest>) -> Result<Json<ContainerResponse>> {
    let items = recalculate_container(&req.items, &req.shipping)?;
    let positions = product_positions(&items, &req.cartons_to_sell);
    let totals = container_totals(&items, &req.cartons_to_sell);
    let summary = summarize(&items);

    Ok(Json(ContainerResponse {
        items,
        positions,
        totals,
        summary,
    }))
}

/// Produce quotation, invoice or voucher figures
async fn document(
    State(state): State<AppState>,
    AppJson(req): AppJson<DocumentRequest>,
) -> Result<Json<DocumentResponse>> {
    let today = Utc::now().date_naive();
    let reference = document_reference(
        req.kind,
        &state.config.company,
        today.year(),
        req.last_reference_number,
        req.invoice_number.as_deref(),
    )?;

    let items = recalculate_container(&req.items, &req.shipping)?;
    let totals = build_document(
        req.kind,
        &items,
        &req.selected_products,
        &req.buyer_type,
        req.currency,
        req.tax_percentage
            .unwrap_or(state.config.document_tax_percentage),
    )?;

    tracing::debug!(
        reference = %reference,
        lines = totals.lines.len(),
        "Document figures produced"
    );

    Ok(Json(DocumentResponse {
        reference,
        date: today,
        issuer: state.config.company.clone(),
        buyer_name: req.buyer_name,
        bill_to: req.bill_to,
        terms_and_conditions: req.terms_and_conditions,
        totals,
    }))
}

/// Read product rows from CSV text
async fn import(body: String) -> Result<Json<Vec<ImportedProduct>>> {
    let products = import_products(&body)?;
    Ok(Json(products))
}

/// Printable row of the product summary
struct PrintRow {
    serial: usize,
    product_name: String,
    total_items: i64,
    total_cartons: i32,
    packages_per_carton: i32,
    total_weight: String,
    price_per_carton: String,
    price_per_carton_jod: String,
    cost_per_item: String,
    cost_per_item_jod: String,
    cost_per_package: String,
    cost_per_package_jod: String,
    total_cost: String,
    total_cost_jod: String,
    share: String,
}

impl PrintRow {
    fn new(serial: usize, row: &SummaryRow) -> Self {
        Self {
            serial,
            product_name: row.product_name.clone(),
            total_items: row.total_items,
            total_cartons: row.total_cartons,
            packages_per_carton: row.packages_per_carton,
            total_weight: format!("{:.2}", row.total_weight),
            price_per_carton: format!("{:.2}", row.price_per_carton),
            price_per_carton_jod: format!("{:.3}", row.price_per_carton_jod),
            cost_per_item: format!("{:.4}", row.cost_per_item),
            cost_per_item_jod: format!("{:.5}", row.cost_per_item_jod),
            cost_per_package: format!("{:.2}", row.cost_per_package),
            cost_per_package_jod: format!("{:.3}", row.cost_per_package_jod),
            total_cost: format!("{:.2}", row.total_cost),
            total_cost_jod: format!("{:.2}", row.total_cost_jod),
            share: format!("{:.2}", row.percentage_of_container_cost),
        }
    }
}

/// Container summary print view
#[derive(Template)]
#[template(path = "costing/summary.html")]
struct SummaryPrintTemplate {
    company: String,
    rows: Vec<PrintRow>,
    grand_items: i64,
    grand_cartons: i64,
    grand_packages: i64,
    grand_weight: String,
    grand_cost: String,
    grand_cost_jod: String,
    total_products: usize,
    shipping_cost: String,
    customs_fees: String,
    sales_tax: String,
    total_profit: String,
    total_profit_jod: String,
}

impl SummaryPrintTemplate {
    fn new(
        company: String,
        rows: &[SummaryRow],
        grand: &SummaryTotals,
        totals: &ContainerTotals,
    ) -> Self {
        Self {
            company,
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, row)| PrintRow::new(i + 1, row))
                .collect(),
            grand_items: grand.total_items,
            grand_cartons: grand.total_cartons,
            grand_packages: grand.total_packages,
            grand_weight: format!("{:.2}", grand.total_weight),
            grand_cost: format!("{:.2}", grand.total_cost),
            grand_cost_jod: format!("{:.2}", grand.total_cost_jod),
            total_products: totals.total_products,
            shipping_cost: format!("{:.2}", totals.shipping_cost),
            customs_fees: format!("{:.2}", totals.customs_fees),
            sales_tax: format!("{:.2}", totals.sales_tax),
            total_profit: format!("{:.2}", totals.total_profit),
            total_profit_jod: format!("{:.2}", totals.total_profit_jod),
        }
    }
}

/// Render the container summary for printing
async fn print_summary(
    State(state): State<AppState>,
    AppJson(req): AppJson<ContainerRequest>,
) -> Result<Html<String>> {
    let items = recalculate_container(&req.items, &req.shipping)?;
    let summary = summarize(&items);
    let totals = container_totals(&items, &req.cartons_to_sell);

    let template = SummaryPrintTemplate::new(
        state.config.company.clone(),
        &summary.rows,
        &summary.totals,
        &totals,
    );

    Ok(Html(template.render()?))
}
