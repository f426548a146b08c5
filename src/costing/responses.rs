//! Response DTOs for costing API endpoints.

use chrono::NaiveDate;
use serde::Serialize;

use super::documents::DocumentTotals;
use super::models::{BuyerType, ContainerItem};
use super::services::{ContainerSummary, ContainerTotals, ProductPosition};

/// Response for selling price lookup
#[derive(Debug, Serialize)]
pub struct SellingPriceResponse {
    pub cost_per_carton: f64,
    pub buyer_type: BuyerType,
    pub selling_price: f64,
    pub selling_price_jod: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
}

/// Response for container recalculation
#[derive(Debug, Serialize)]
pub struct ContainerResponse {
    pub items: Vec<ContainerItem>,
    pub positions: Vec<ProductPosition>,
    pub totals: ContainerTotals,
    pub summary: ContainerSummary,
}

/// Response for document figures
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub reference: String,
    pub date: NaiveDate,
    pub issuer: String,
    pub buyer_name: String,
    pub bill_to: String,
    pub terms_and_conditions: String,
    #[serde(flatten)]
    pub totals: DocumentTotals,
}

/// Generic costing error response
#[derive(Debug, Serialize)]
pub struct CostingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
