//! Tabular product import.
//!
//! Rows are read from CSV with the spreadsheet's column headers. Numeric cells
//! that are missing, blank or unreadable stay unset; they are never read as
//! zero.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::errors::CostError;
use super::models::{BuyerType, ProductDetails};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A product as read from a sheet, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub type_of_packaging: String,
    pub product_name: String,
    pub weight_per_carton: Option<f64>,
    pub quantity_per_package: Option<i32>,
    pub packages_per_carton: Option<i32>,
    pub cartons_per_container: Option<i32>,
    pub price_per_carton: Option<f64>,
    pub sales_tax_percentage: Option<f64>,
}

impl ProductDraft {
    /// Convert into a product, failing on the first unset required field.
    ///
    /// Weight is informational and defaults to zero when unset. Range checks
    /// are left to the calculators.
    pub fn into_product(self) -> Result<ProductDetails, CostError> {
        Ok(ProductDetails {
            quantity_per_package: self.quantity_per_package.ok_or(CostError::MissingField {
                field: "quantity_per_package",
            })?,
            packages_per_carton: self.packages_per_carton.ok_or(CostError::MissingField {
                field: "packages_per_carton",
            })?,
            cartons_per_container: self.cartons_per_container.ok_or(CostError::MissingField {
                field: "cartons_per_container",
            })?,
            price_per_carton: self.price_per_carton.ok_or(CostError::MissingField {
                field: "price_per_carton",
            })?,
            weight_per_carton: self.weight_per_carton.unwrap_or_default(),
            type_of_packaging: self.type_of_packaging,
            product_name: self.product_name,
        })
    }
}

/// An imported row with its new working-set identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedProduct {
    pub id: Uuid,
    #[serde(flatten)]
    pub draft: ProductDraft,
    pub buyer_type: BuyerType,
}

/// Raw sheet row, keyed by the spreadsheet's headers.
#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(rename = "Type of Packaging", default)]
    type_of_packaging: Option<String>,
    #[serde(rename = "Product Name", default)]
    product_name: Option<String>,
    #[serde(rename = "Weight per Carton (kg)", default)]
    weight_per_carton: Option<String>,
    #[serde(rename = "Quantity of Sticks", default)]
    quantity_per_package: Option<String>,
    #[serde(rename = "Packages per Carton", default)]
    packages_per_carton: Option<String>,
    #[serde(rename = "Cartons per Container", default)]
    cartons_per_container: Option<String>,
    #[serde(rename = "Price per Carton ($)", default)]
    price_per_carton: Option<String>,
    #[serde(rename = "Sales Tax (%)", default)]
    sales_tax_percentage: Option<String>,
}

impl From<SheetRow> for ProductDraft {
    fn from(row: SheetRow) -> Self {
        Self {
            type_of_packaging: text_cell(row.type_of_packaging),
            product_name: text_cell(row.product_name),
            weight_per_carton: decimal_cell(row.weight_per_carton.as_deref()),
            quantity_per_package: whole_cell(row.quantity_per_package.as_deref()),
            packages_per_carton: whole_cell(row.packages_per_carton.as_deref()),
            cartons_per_container: whole_cell(row.cartons_per_container.as_deref()),
            price_per_carton: decimal_cell(row.price_per_carton.as_deref()),
            sales_tax_percentage: decimal_cell(row.sales_tax_percentage.as_deref()),
        }
    }
}

/// Parse CSV text into products ready to join a container.
///
/// Every row gets a fresh id and the bulk buyer tier. Blank lines are skipped.
pub fn import_products(csv_text: &str) -> Result<Vec<ImportedProduct>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut products = Vec::new();
    for result in reader.deserialize::<SheetRow>() {
        let draft = ProductDraft::from(result?);
        if draft == ProductDraft::default() {
            continue;
        }
        products.push(ImportedProduct {
            id: Uuid::new_v4(),
            draft,
            buyer_type: BuyerType::Bulk,
        });
    }

    debug!(rows = products.len(), "Imported product rows");
    Ok(products)
}

fn text_cell(cell: Option<String>) -> String {
    cell.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn decimal_cell(cell: Option<&str>) -> Option<f64> {
    let value = cell?.trim().trim_start_matches('$').replace(',', "");
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whole-number cell; accepts integral decimals such as `"10.0"`.
fn whole_cell(cell: Option<&str>) -> Option<i32> {
    let value = cell?.trim().replace(',', "");
    if let Ok(n) = value.parse::<i32>() {
        return Some(n);
    }
    let f = value.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}
