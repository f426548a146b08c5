//! Validation failures raised by the costing engine.

use uuid::Uuid;

/// Costing error types.
///
/// Every variant is a local input problem detected before any arithmetic
/// runs, so none of them is retryable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CostError {
    #[error("{field} must be a positive whole number")]
    InvalidQuantity { field: &'static str },

    #[error("price_per_carton must be a non-negative amount")]
    InvalidPrice,

    #[error("shipment has no items to apportion shared costs across")]
    EmptyShipment,

    #[error("{field} must be a non-negative amount")]
    InvalidShippingCost { field: &'static str },

    #[error("sales tax percentage must be between 0 and 100")]
    InvalidTaxRate,

    #[error("{field} is not set")]
    MissingField { field: &'static str },

    #[error("no container item with id {id}")]
    UnknownItem { id: Uuid },

    #[error("container item {id} has not been calculated")]
    NotCalculated { id: Uuid },

    #[error("amount {amount} cannot be represented as money")]
    UnrepresentableAmount { amount: f64 },
}

impl CostError {
    /// Stable machine-readable tag for API consumers.
    pub fn error_type(&self) -> &'static str {
        match self {
            CostError::InvalidQuantity { .. } => "invalid_quantity",
            CostError::InvalidPrice => "invalid_price",
            CostError::EmptyShipment => "empty_shipment",
            CostError::InvalidShippingCost { .. } => "invalid_shipping_cost",
            CostError::InvalidTaxRate => "invalid_tax_rate",
            CostError::MissingField { .. } => "missing_field",
            CostError::UnknownItem { .. } => "unknown_item",
            CostError::NotCalculated { .. } => "not_calculated",
            CostError::UnrepresentableAmount { .. } => "unrepresentable_amount",
        }
    }

    /// The input field a form should highlight, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CostError::InvalidQuantity { field }
            | CostError::InvalidShippingCost { field }
            | CostError::MissingField { field } => Some(field),
            CostError::InvalidPrice => Some("price_per_carton"),
            CostError::InvalidTaxRate => Some("sales_tax_percentage"),
            CostError::EmptyShipment
            | CostError::UnknownItem { .. }
            | CostError::NotCalculated { .. }
            | CostError::UnrepresentableAmount { .. } => None,
        }
    }
}
