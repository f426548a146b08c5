//! Landed cost engine.
//!
//! Apportions a container's shared shipping and customs costs across its
//! products, computes per-item/carton/container costs in USD and JOD, and
//! derives buyer-tier selling prices and profit from them.

pub mod calculators;
pub mod documents;
pub mod errors;
pub mod import;
pub mod models;
pub mod rates;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{apportion, compute_unit_costs, profit, round_money, selling_price};
pub use errors::CostError;
pub use models::{
    BuyerType, CalculationResults, ContainerItem, Currency, ProductDetails, SelectedProduct,
    ShippingDetails,
};
pub use routes::router;
pub use services::recalculate_container;
