// src/lib.rs
//! Billing-period and amount calculation engine for DME rental/sale invoicing.
//!
//! Three stateless service modules:
//! - `services::date_service` - billing-period date arithmetic
//! - `services::billing_calculator` - Medicare/insurance amount policy
//! - `services::order_service` - quantity conversion and order eligibility
//!
//! All monetary values are `rust_decimal::Decimal`; final amounts are
//! quantized to 2 decimal places, intermediate multipliers to 4. The crate
//! holds no state and performs no I/O - callers own persistence and
//! orchestration.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::BillingConfig;
pub use error::BillingError;
pub use models::{
    BillingFrequency, InvoiceModifier, InvoiceModifierType, Order, OrderItem, OrderItemStatus,
    OrderStatus, QuantityRule, RoundingMethod, SaleRentType,
};
pub use services::order_service::{
    DeliveryConstraints, DeliverySchedule, PerUseParams, QuantityBillingType, ScheduleParams,
    TierRate,
};
pub use services::{billing_calculator, date_service, order_service};

/// Initialize the tracing subscriber for binaries or test harnesses that
/// embed this crate. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .try_init();
}
