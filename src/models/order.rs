// src/models/order.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BillingError;

/// Read-only order aggregate supplied by the external order-management
/// subsystem. The engine never mutates these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_date: NaiveDate,
    pub ship_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub status: OrderItemStatus,
    pub ship_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Closed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(OrderStatus::Draft),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "closed" => Ok(OrderStatus::Closed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(BillingError::UnknownOrderStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemStatus {
    Draft,
    Pending,
    Shipped,
    Delivered,
    Closed,
    Cancelled,
}

impl OrderItemStatus {
    /// Terminal items carry no remaining fulfilment work. Both the
    /// order-close and billing-skip decisions use this definition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderItemStatus::Delivered | OrderItemStatus::Closed | OrderItemStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderItemStatus::Draft => "draft",
            OrderItemStatus::Pending => "pending",
            OrderItemStatus::Shipped => "shipped",
            OrderItemStatus::Delivered => "delivered",
            OrderItemStatus::Closed => "closed",
            OrderItemStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderItemStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(OrderItemStatus::Draft),
            "pending" => Ok(OrderItemStatus::Pending),
            "shipped" => Ok(OrderItemStatus::Shipped),
            "delivered" => Ok(OrderItemStatus::Delivered),
            "closed" => Ok(OrderItemStatus::Closed),
            "cancelled" => Ok(OrderItemStatus::Cancelled),
            _ => Err(BillingError::UnknownOrderItemStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_item_statuses() {
        assert!(OrderItemStatus::Delivered.is_terminal());
        assert!(OrderItemStatus::Closed.is_terminal());
        assert!(OrderItemStatus::Cancelled.is_terminal());
        assert!(!OrderItemStatus::Shipped.is_terminal());
        assert!(!OrderItemStatus::Pending.is_terminal());
        assert!(!OrderItemStatus::Draft.is_terminal());
    }

    #[test]
    fn order_status_parses_case_insensitively() {
        assert_eq!(
            "DELIVERED".parse::<OrderStatus>().unwrap(),
            OrderStatus::Delivered
        );
        assert!("unknown".parse::<OrderStatus>().is_err());
    }
}
