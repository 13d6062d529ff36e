// src/error.rs
use thiserror::Error;

/// Errors raised at the boundary of the engine when parsing external
/// records or configuration. Calculation functions themselves are total:
/// missing optional data degrades to a documented fallback plus an audit
/// message instead of an error.
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Unknown sale/rent type: {0}")]
    UnknownSaleRentType(String),

    #[error("Unknown billing frequency: {0}")]
    UnknownFrequency(String),

    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),

    #[error("Unknown order item status: {0}")]
    UnknownOrderItemStatus(String),

    #[error("Unknown invoice modifier type: {0}")]
    UnknownModifierType(String),
}
