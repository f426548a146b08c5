//! Core costing calculation functions.
//!
//! Pure functions for landed-cost math - no I/O, no shared state.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::errors::CostError;
use super::models::{BuyerType, CalculationResults, ProductDetails, ShippingDetails};
use super::rates::{to_jod, BULK_MARKUP, DISTRIBUTOR_MARKUP, RETAIL_MARKUP};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias
/// when many document lines are summed.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use landed_cost::costing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Convert a full-precision float amount to a money value with exactly
/// `places` decimal places.
///
/// Returns `None` for non-finite amounts and ones outside `Decimal`'s range.
pub fn money_from_f64(amount: f64, places: u32) -> Option<Decimal> {
    let mut money = round_money(Decimal::from_f64(amount)?, places);
    money.rescale(places);
    Some(money)
}

/// Compute the per-item, per-carton and per-container landed cost of one product.
///
/// `shipping` must already be this product's share of the shipment (see
/// [`apportion`]). Sales tax is levied on the product's own cost only.
///
/// # Errors
/// * `InvalidQuantity` - a packaging count is not a positive integer
/// * `InvalidPrice` - the carton price is negative or not finite
/// * `InvalidShippingCost` - a shipping/customs amount is negative or not finite
/// * `InvalidTaxRate` - sales tax outside 0..=100
pub fn compute_unit_costs(
    product: &ProductDetails,
    shipping: &ShippingDetails,
) -> Result<CalculationResults, CostError> {
    let (items_per_carton, items_per_container) = checked_item_counts(product)?;
    validate_price(product.price_per_carton)?;
    validate_shipping(shipping)?;

    let per_carton = items_per_carton as f64;
    let per_container = items_per_container as f64;

    let base_cost_per_item = product.price_per_carton / per_carton;
    let shipping_cost_per_item = shipping.shipping_cost_per_shipment / per_container;
    let customs_cost_per_item = shipping.customs_fees_per_shipment / per_container;
    let sales_tax_per_item = base_cost_per_item * (shipping.sales_tax_percentage / 100.0);

    let total_cost_per_item =
        base_cost_per_item + shipping_cost_per_item + customs_cost_per_item + sales_tax_per_item;
    let total_cost_per_carton = total_cost_per_item * per_carton;
    let total_cost_per_container = total_cost_per_item * per_container;

    Ok(CalculationResults {
        items_per_carton,
        items_per_container,
        base_cost_per_item,
        shipping_cost_per_item,
        customs_cost_per_item,
        sales_tax_per_item,
        total_cost_per_item,
        total_cost_per_carton,
        total_cost_per_container,
        total_cost_per_item_jod: to_jod(total_cost_per_item),
        total_cost_per_carton_jod: to_jod(total_cost_per_carton),
        total_cost_per_container_jod: to_jod(total_cost_per_container),
    })
}

/// Split a shipment's shared shipping and customs costs across products.
///
/// Each product receives a share proportional to its item count over the
/// shipment's total item count. The sales tax rate passes through untouched.
/// Shares depend on every product in the set, so the whole set must be
/// apportioned again whenever any count or the shared costs change.
///
/// Products with a zero count are allowed and receive a zero share; they will
/// still fail in [`compute_unit_costs`].
///
/// # Errors
/// * `EmptyShipment` - the shipment's total item count is zero
/// * `InvalidQuantity` - a packaging count is negative, or the counts overflow
/// * `InvalidShippingCost` - a shared amount is negative or not finite
pub fn apportion<P: AsRef<ProductDetails>>(
    products: &[P],
    shipment: &ShippingDetails,
) -> Result<Vec<ShippingDetails>, CostError> {
    validate_amount(shipment.shipping_cost_per_shipment, "shipping_cost_per_shipment")?;
    validate_amount(shipment.customs_fees_per_shipment, "customs_fees_per_shipment")?;

    let counts = products
        .iter()
        .map(|p| raw_item_count(p.as_ref()))
        .collect::<Result<Vec<i64>, CostError>>()?;

    let total_items = counts.iter().try_fold(0_i64, |acc, &count| {
        acc.checked_add(count).ok_or(CostError::InvalidQuantity {
            field: "cartons_per_container",
        })
    })?;

    if total_items == 0 {
        return Err(CostError::EmptyShipment);
    }

    let shares = counts
        .iter()
        .map(|&count| {
            let share = if counts.len() == 1 {
                1.0
            } else {
                count as f64 / total_items as f64
            };
            ShippingDetails {
                shipping_cost_per_shipment: shipment.shipping_cost_per_shipment * share,
                customs_fees_per_shipment: shipment.customs_fees_per_shipment * share,
                sales_tax_percentage: shipment.sales_tax_percentage,
            }
        })
        .collect();

    Ok(shares)
}

/// Selling price per carton for a buyer tier.
///
/// bulk x2.0, distributor x2.5, retail x3.0. Any other tier has no markup
/// configured and sells at cost. Every selling, total-selling and profit
/// figure in the crate goes through this function.
pub fn selling_price(cost_per_carton: f64, buyer_type: &BuyerType) -> f64 {
    match buyer_type {
        BuyerType::Bulk => cost_per_carton * BULK_MARKUP,
        BuyerType::Distributor => cost_per_carton * DISTRIBUTOR_MARKUP,
        BuyerType::Retail => cost_per_carton * RETAIL_MARKUP,
        BuyerType::Other(_) => cost_per_carton,
    }
}

/// Profit from selling `cartons_for_sale` cartons at the tier's price.
///
/// The caller keeps `cartons_for_sale` within `0..=cartons_per_container`;
/// the figure is meaningless otherwise.
pub fn profit(cost_per_carton: f64, buyer_type: &BuyerType, cartons_for_sale: u32) -> f64 {
    (selling_price(cost_per_carton, buyer_type) - cost_per_carton) * f64::from(cartons_for_sale)
}

fn checked_item_counts(product: &ProductDetails) -> Result<(i64, i64), CostError> {
    require_positive(product.quantity_per_package, "quantity_per_package")?;
    require_positive(product.packages_per_carton, "packages_per_carton")?;
    require_positive(product.cartons_per_container, "cartons_per_container")?;

    let items_per_carton = product.items_per_carton().ok_or(CostError::InvalidQuantity {
        field: "packages_per_carton",
    })?;
    let items_per_container = product
        .items_per_container()
        .ok_or(CostError::InvalidQuantity {
            field: "cartons_per_container",
        })?;

    Ok((items_per_carton, items_per_container))
}

/// Item count used for apportionment; zero is allowed, negatives are not.
fn raw_item_count(product: &ProductDetails) -> Result<i64, CostError> {
    for (value, field) in [
        (product.quantity_per_package, "quantity_per_package"),
        (product.packages_per_carton, "packages_per_carton"),
        (product.cartons_per_container, "cartons_per_container"),
    ] {
        if value < 0 {
            return Err(CostError::InvalidQuantity { field });
        }
    }

    product.items_per_container().ok_or(CostError::InvalidQuantity {
        field: "cartons_per_container",
    })
}

fn require_positive(value: i32, field: &'static str) -> Result<(), CostError> {
    if value <= 0 {
        return Err(CostError::InvalidQuantity { field });
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), CostError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CostError::InvalidPrice);
    }
    Ok(())
}

fn validate_amount(amount: f64, field: &'static str) -> Result<(), CostError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CostError::InvalidShippingCost { field });
    }
    Ok(())
}

/// Check a sales tax percentage is within 0..=100.
pub fn validate_tax_rate(percentage: f64) -> Result<(), CostError> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(CostError::InvalidTaxRate);
    }
    Ok(())
}

fn validate_shipping(shipping: &ShippingDetails) -> Result<(), CostError> {
    validate_amount(shipping.shipping_cost_per_shipment, "shipping_cost_per_shipment")?;
    validate_amount(shipping.customs_fees_per_shipment, "customs_fees_per_shipment")?;
    validate_tax_rate(shipping.sales_tax_percentage)
}
