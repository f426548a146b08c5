//! Working-set operations built on the pure calculators.
//!
//! A container is the ordered list of its items plus the shipment's shared
//! costs. Recalculation always runs over the whole list.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::calculators::{apportion, compute_unit_costs, profit, selling_price};
use super::errors::CostError;
use super::models::{BuyerType, CalculationResults, ContainerItem, ShippingDetails};
use super::rates::to_jod;

/// Recalculate every item of a container against its shared shipment costs.
///
/// Apportionment runs once over the full list before any item is computed.
/// On error nothing is returned, so callers never hold a mix of stale and
/// fresh shares.
pub fn recalculate_container(
    items: &[ContainerItem],
    shipping: &ShippingDetails,
) -> Result<Vec<ContainerItem>, CostError> {
    let shares = apportion(items, shipping)?;

    let recalculated = items
        .iter()
        .zip(shares)
        .map(|(item, share)| {
            let share = match item.sales_tax_percentage {
                Some(rate) => ShippingDetails {
                    sales_tax_percentage: rate,
                    ..share
                },
                None => share,
            };
            let results = compute_unit_costs(&item.product, &share)?;
            debug!(
                item_id = %item.id,
                total_cost_per_item = results.total_cost_per_item,
                "Calculated item costs"
            );
            Ok(ContainerItem {
                results: Some(results),
                ..item.clone()
            })
        })
        .collect::<Result<Vec<_>, CostError>>()?;

    info!(
        items = recalculated.len(),
        shipping_cost = shipping.shipping_cost_per_shipment,
        customs_fees = shipping.customs_fees_per_shipment,
        "Container recalculated"
    );

    Ok(recalculated)
}

/// Selling view of one computed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPosition {
    pub id: Uuid,
    pub product_name: String,
    pub buyer_type: BuyerType,
    pub total_cartons: i32,
    pub cartons_to_sell: u32,
    pub available_cartons: i64,
    pub cost_per_carton: f64,
    pub cost_per_carton_jod: f64,
    pub selling_price_per_carton: f64,
    pub selling_price_per_carton_jod: f64,
    pub cost_of_cartons_to_sell: f64,
    pub cost_of_cartons_to_sell_jod: f64,
    pub total_selling_price: f64,
    pub total_selling_price_jod: f64,
    pub profit: f64,
    pub profit_jod: f64,
}

/// Build the selling view for a computed item.
///
/// `cartons_to_sell` is clamped to the item's cartons per container.
pub fn product_position(
    item: &ContainerItem,
    cartons_to_sell: u32,
) -> Result<ProductPosition, CostError> {
    let results = calculated(item)?;
    let cartons = clamp_cartons(item, cartons_to_sell);

    let cost_per_carton = results.total_cost_per_carton;
    let selling_price_per_carton = selling_price(cost_per_carton, &item.buyer_type);
    let cost_of_cartons_to_sell = cost_per_carton * f64::from(cartons);
    let total_selling_price = selling_price_per_carton * f64::from(cartons);
    let profit = profit(cost_per_carton, &item.buyer_type, cartons);

    Ok(ProductPosition {
        id: item.id,
        product_name: item.product.product_name.clone(),
        buyer_type: item.buyer_type.clone(),
        total_cartons: item.product.cartons_per_container,
        cartons_to_sell: cartons,
        available_cartons: i64::from(item.product.cartons_per_container) - i64::from(cartons),
        cost_per_carton,
        cost_per_carton_jod: results.total_cost_per_carton_jod,
        selling_price_per_carton,
        selling_price_per_carton_jod: to_jod(selling_price_per_carton),
        cost_of_cartons_to_sell,
        cost_of_cartons_to_sell_jod: to_jod(cost_of_cartons_to_sell),
        total_selling_price,
        total_selling_price_jod: to_jod(total_selling_price),
        profit,
        profit_jod: to_jod(profit),
    })
}

/// Selling views for every computed item, in container order.
pub fn product_positions(
    items: &[ContainerItem],
    cartons_to_sell: &HashMap<Uuid, u32>,
) -> Vec<ProductPosition> {
    items
        .iter()
        .filter(|item| item.results.is_some())
        .filter_map(|item| {
            let requested = cartons_to_sell.get(&item.id).copied().unwrap_or(0);
            product_position(item, requested).ok()
        })
        .collect()
}

/// Container-wide totals across computed items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerTotals {
    pub total_products: usize,
    pub total_items: i64,
    pub total_cartons: i64,
    pub total_packages: i64,
    pub total_weight: f64,
    pub total_cost: f64,
    pub total_cost_jod: f64,
    pub shipping_cost: f64,
    pub customs_fees: f64,
    pub sales_tax: f64,
    pub total_profit: f64,
    pub total_profit_jod: f64,
}

/// Aggregate container totals.
///
/// Items without results are skipped. Profit uses each item's buyer tier and
/// its (clamped) cartons-to-sell entry, defaulting to none sold.
pub fn container_totals(
    items: &[ContainerItem],
    cartons_to_sell: &HashMap<Uuid, u32>,
) -> ContainerTotals {
    let totals = items
        .iter()
        .filter_map(|item| item.results.as_ref().map(|results| (item, results)))
        .fold(ContainerTotals::default(), |mut totals, (item, results)| {
            let requested = cartons_to_sell.get(&item.id).copied().unwrap_or(0);
            let cartons = clamp_cartons(item, requested);

            totals.total_products += 1;
            totals.total_items += results.items_per_container;
            totals.total_cartons += i64::from(item.product.cartons_per_container);
            totals.total_packages += item.product.packages_per_container();
            totals.total_weight += item.product.total_weight();
            totals.total_cost += results.total_cost_per_container;
            totals.total_cost_jod += results.total_cost_per_container_jod;
            totals.shipping_cost += results.shipping_cost_total();
            totals.customs_fees += results.customs_cost_total();
            totals.sales_tax += results.sales_tax_total();
            totals.total_profit += profit(results.total_cost_per_carton, &item.buyer_type, cartons);
            totals
        });

    ContainerTotals {
        total_profit_jod: to_jod(totals.total_profit),
        ..totals
    }
}

/// One line of the product summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub id: Uuid,
    pub product_name: String,
    pub total_items: i64,
    pub total_cartons: i32,
    pub packages_per_carton: i32,
    pub total_weight: f64,
    /// Landed cost of one carton, not the supplier's price.
    pub price_per_carton: f64,
    pub price_per_carton_jod: f64,
    pub cost_per_item: f64,
    pub cost_per_item_jod: f64,
    pub cost_per_package: f64,
    pub cost_per_package_jod: f64,
    pub total_cost: f64,
    pub total_cost_jod: f64,
    pub percentage_of_container_cost: f64,
}

/// Grand totals row of the product summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub total_items: i64,
    pub total_cartons: i64,
    pub total_packages: i64,
    pub total_weight: f64,
    pub total_cost: f64,
    pub total_cost_jod: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerSummary {
    pub rows: Vec<SummaryRow>,
    pub totals: SummaryTotals,
}

/// Product summary with each item's share of the container cost.
///
/// When the container cost is zero every share is reported as zero.
pub fn summarize(items: &[ContainerItem]) -> ContainerSummary {
    let computed: Vec<(&ContainerItem, &CalculationResults)> = items
        .iter()
        .filter_map(|item| item.results.as_ref().map(|results| (item, results)))
        .collect();

    let container_cost: f64 = computed
        .iter()
        .map(|(_, results)| results.total_cost_per_container)
        .sum();

    let rows: Vec<SummaryRow> = computed
        .iter()
        .map(|(item, results)| {
            let total_cost = results.total_cost_per_container;
            let cost_per_item = per_unit(total_cost, results.items_per_container);
            let cost_per_package = per_unit(total_cost, item.product.packages_per_container());

            SummaryRow {
                id: item.id,
                product_name: item.product.product_name.clone(),
                total_items: results.items_per_container,
                total_cartons: item.product.cartons_per_container,
                packages_per_carton: item.product.packages_per_carton,
                total_weight: item.product.total_weight(),
                price_per_carton: results.total_cost_per_carton,
                price_per_carton_jod: results.total_cost_per_carton_jod,
                cost_per_item,
                cost_per_item_jod: to_jod(cost_per_item),
                cost_per_package,
                cost_per_package_jod: to_jod(cost_per_package),
                total_cost,
                total_cost_jod: results.total_cost_per_container_jod,
                percentage_of_container_cost: if container_cost > 0.0 {
                    total_cost / container_cost * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    let totals = computed.iter().fold(
        SummaryTotals::default(),
        |mut totals, (item, results)| {
            totals.total_items += results.items_per_container;
            totals.total_cartons += i64::from(item.product.cartons_per_container);
            totals.total_packages += item.product.packages_per_container();
            totals.total_weight += item.product.total_weight();
            totals.total_cost += results.total_cost_per_container;
            totals.total_cost_jod += results.total_cost_per_container_jod;
            totals
        },
    );

    ContainerSummary { rows, totals }
}

fn per_unit(total: f64, units: i64) -> f64 {
    if units > 0 {
        total / units as f64
    } else {
        0.0
    }
}

fn calculated(item: &ContainerItem) -> Result<&CalculationResults, CostError> {
    item.results
        .as_ref()
        .ok_or(CostError::NotCalculated { id: item.id })
}

fn clamp_cartons(item: &ContainerItem, requested: u32) -> u32 {
    let limit = u32::try_from(item.product.cartons_per_container).unwrap_or(0);
    if requested > limit {
        warn!(
            item_id = %item.id,
            requested,
            limit,
            "Cartons to sell exceeds cartons per container, clamping"
        );
        return limit;
    }
    requested
}
