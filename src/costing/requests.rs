//! Request DTOs for costing API endpoints.

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use super::documents::DocumentKind;
use super::models::{
    BuyerType, ContainerItem, Currency, ProductDetails, SelectedProduct, ShippingDetails,
};

/// Request to cost a single product against its own shipping share
#[derive(Debug, Deserialize)]
pub struct UnitCostsRequest {
    pub product: ProductDetails,
    #[serde(default)]
    pub shipping: ShippingDetails,
}

/// Request to split a shipment's shared costs
#[derive(Debug, Deserialize)]
pub struct ApportionRequest {
    pub products: Vec<ProductDetails>,
    pub shipping: ShippingDetails,
}

/// Request to price a carton for a buyer tier
#[derive(Debug, Deserialize)]
pub struct SellingPriceRequest {
    pub cost_per_carton: f64,
    #[serde(default)]
    pub buyer_type: BuyerType,
    #[serde(default)]
    pub cartons_for_sale: Option<u32>,
}

/// Request to recalculate a whole container
#[derive(Debug, Deserialize)]
pub struct ContainerRequest {
    pub items: Vec<ContainerItem>,
    pub shipping: ShippingDetails,
    /// Cartons designated for sale, keyed by item id
    #[serde(default)]
    pub cartons_to_sell: HashMap<Uuid, u32>,
}

/// Request to produce quotation, invoice or voucher figures
#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub kind: DocumentKind,
    pub items: Vec<ContainerItem>,
    pub shipping: ShippingDetails,
    pub selected_products: Vec<SelectedProduct>,
    #[serde(default)]
    pub buyer_type: BuyerType,
    #[serde(default)]
    pub currency: Currency,
    /// Defaults to the configured document tax rate
    #[serde(default)]
    pub tax_percentage: Option<f64>,
    #[serde(default)]
    pub last_reference_number: u32,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub bill_to: String,
    #[serde(default)]
    pub terms_and_conditions: String,
}
