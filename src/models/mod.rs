// src/models/mod.rs
pub mod enums;
pub mod modifier;
pub mod order;
pub mod quantity_rule;

pub use enums::{BillingFrequency, RoundingMethod, SaleRentType};
pub use modifier::{InvoiceModifier, InvoiceModifierType};
pub use order::{Order, OrderItem, OrderItemStatus, OrderStatus};
pub use quantity_rule::QuantityRule;
