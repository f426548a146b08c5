//! Costing domain models.
//!
//! Plain value types. A `CalculationResults` is never patched; any input
//! change produces a fresh one.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rates::to_jod;

/// One packaging and pricing configuration for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    #[serde(default)]
    pub type_of_packaging: String,
    pub product_name: String,
    /// Kilograms per carton.
    #[serde(default)]
    pub weight_per_carton: f64,
    pub quantity_per_package: i32,
    pub packages_per_carton: i32,
    pub cartons_per_container: i32,
    /// USD per carton.
    pub price_per_carton: f64,
}

impl ProductDetails {
    /// Items in one carton, or `None` if the product overflows 64 bits.
    pub fn items_per_carton(&self) -> Option<i64> {
        i64::from(self.quantity_per_package).checked_mul(i64::from(self.packages_per_carton))
    }

    /// Items in the product's full container allotment.
    pub fn items_per_container(&self) -> Option<i64> {
        self.items_per_carton()?
            .checked_mul(i64::from(self.cartons_per_container))
    }

    pub fn packages_per_container(&self) -> i64 {
        i64::from(self.packages_per_carton) * i64::from(self.cartons_per_container)
    }

    /// Total kilograms across the product's cartons.
    pub fn total_weight(&self) -> f64 {
        self.weight_per_carton * f64::from(self.cartons_per_container)
    }
}

impl AsRef<ProductDetails> for ProductDetails {
    fn as_ref(&self) -> &ProductDetails {
        self
    }
}

/// Shipment-level costs, or one product's apportioned share of them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub shipping_cost_per_shipment: f64,
    pub customs_fees_per_shipment: f64,
    /// Applied to the product's own cost only, never to shipping or customs.
    #[serde(default)]
    pub sales_tax_percentage: f64,
}

/// Per-unit cost breakdown for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    pub items_per_carton: i64,
    pub items_per_container: i64,
    pub base_cost_per_item: f64,
    pub shipping_cost_per_item: f64,
    pub customs_cost_per_item: f64,
    pub sales_tax_per_item: f64,
    pub total_cost_per_item: f64,
    pub total_cost_per_carton: f64,
    pub total_cost_per_container: f64,
    pub total_cost_per_item_jod: f64,
    pub total_cost_per_carton_jod: f64,
    pub total_cost_per_container_jod: f64,
}

impl CalculationResults {
    /// Shipping share carried by all of this product's items.
    pub fn shipping_cost_total(&self) -> f64 {
        self.shipping_cost_per_item * self.items_per_container as f64
    }

    pub fn customs_cost_total(&self) -> f64 {
        self.customs_cost_per_item * self.items_per_container as f64
    }

    pub fn sales_tax_total(&self) -> f64 {
        self.sales_tax_per_item * self.items_per_container as f64
    }
}

/// Pricing tier of a buyer.
///
/// Unrecognized tiers are kept verbatim so they round-trip through the API;
/// they carry no markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuyerType {
    #[default]
    Bulk,
    Distributor,
    Retail,
    Other(String),
}

impl BuyerType {
    pub fn as_str(&self) -> &str {
        match self {
            BuyerType::Bulk => "bulk",
            BuyerType::Distributor => "distributor",
            BuyerType::Retail => "retail",
            BuyerType::Other(other) => other,
        }
    }
}

impl From<String> for BuyerType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "bulk" => BuyerType::Bulk,
            "distributor" => BuyerType::Distributor,
            "retail" => BuyerType::Retail,
            _ => BuyerType::Other(value),
        }
    }
}

impl From<&str> for BuyerType {
    fn from(value: &str) -> Self {
        BuyerType::from(value.to_string())
    }
}

impl From<BuyerType> for String {
    fn from(value: BuyerType) -> Self {
        match value {
            BuyerType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BuyerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency a document is issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[default]
    #[serde(rename = "JOD")]
    Jod,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Jod => "JOD",
        }
    }

    /// Decimal places shown on documents.
    pub fn minor_units(self) -> u32 {
        match self {
            Currency::Usd => 2,
            Currency::Jod => 3,
        }
    }

    /// Convert a USD amount into this currency.
    pub fn from_usd(self, usd: f64) -> f64 {
        match self {
            Currency::Usd => usd,
            Currency::Jod => to_jod(usd),
        }
    }
}

/// A product position inside a container working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(flatten)]
    pub product: ProductDetails,
    /// Overrides the shipment's sales tax rate for this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_tax_percentage: Option<f64>,
    #[serde(default)]
    pub buyer_type: BuyerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<CalculationResults>,
}

impl ContainerItem {
    pub fn new(product: ProductDetails, buyer_type: BuyerType) -> Self {
        Self {
            id: Uuid::new_v4(),
            product,
            sales_tax_percentage: None,
            buyer_type,
            results: None,
        }
    }
}

impl AsRef<ProductDetails> for ContainerItem {
    fn as_ref(&self) -> &ProductDetails {
        &self.product
    }
}

/// A container item requested on a quotation, invoice or voucher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedProduct {
    pub id: Uuid,
    pub quantity: u32,
}
