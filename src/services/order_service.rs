// src/services/order_service.rs
//! Quantity-conversion rules and order-eligibility decisions for billing
//! runs.
//!
//! Every function is total for well-formed input: missing optional data
//! degrades to a documented fallback and the returned message records the
//! adjustment (or the fallback) for the caller's audit log. The
//! orchestrator decides whether a fallback escalates to a hard failure.

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::round_money;
use crate::config;
use crate::models::{Order, OrderStatus, RoundingMethod};

/// How an ordered quantity translates into a billed quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuantityBillingType {
    FlatRate,
    PerUse,
    Tiered,
    Custom,
}

/// How an ordered quantity translates into a delivered quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliverySchedule {
    Immediate,
    Scheduled,
    Recurring,
    Custom,
}

/// Parameters for per-use billing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerUseParams {
    pub min_usage: Option<Decimal>,
    pub multiplier: Option<Decimal>,
}

/// One tier of a tiered billing schedule: the highest `threshold` at or
/// below the ordered quantity selects the `rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRate {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Parameters for scheduled and recurring delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub prorate: bool,
    pub total_deliveries: Option<u32>,
}

/// Bounds applied to a computed delivery quantity, in order: minimum,
/// maximum, increment round-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryConstraints {
    pub min_delivery: Option<Decimal>,
    pub max_delivery: Option<Decimal>,
    pub increment: Option<Decimal>,
}

/// Clamp and round an ordered quantity into a billable one.
///
/// Adjustments apply in order: raise to `min_qty`, else lower to
/// `max_qty`, then round to the nearest multiple of `increment` per
/// `rounding_method` (the increment applies even after a clamp). The
/// message reflects the last adjustment actually applied.
pub fn ordered_qty_to_billed_qty(
    ordered_qty: Decimal,
    min_qty: Option<Decimal>,
    max_qty: Option<Decimal>,
    increment: Option<Decimal>,
    rounding_method: RoundingMethod,
) -> (Decimal, String) {
    let mut qty = ordered_qty;
    let mut message = String::from("No adjustments needed");

    match (min_qty, max_qty) {
        (Some(min), _) if ordered_qty < min => {
            qty = min;
            message = format!("Quantity {ordered_qty} increased to minimum {min}");
        }
        (_, Some(max)) if ordered_qty > max => {
            qty = max;
            message = format!("Quantity {ordered_qty} reduced to maximum {max}");
        }
        _ => {}
    }

    if let Some(increment) = increment {
        if increment > Decimal::ZERO {
            let rounded = round_to_increment(qty, increment, rounding_method);
            if rounded != qty {
                message = format!("Quantity {qty} rounded to nearest increment {increment}");
                qty = rounded;
            }
        }
    }

    (qty, message)
}

/// Resolve the quantity to bill for under the item's billing type.
///
/// Missing strategy data (usage, tier rates, custom calculation) degrades
/// to the ordered quantity with an explanatory message rather than
/// raising.
pub fn get_ordered_qty(
    base_qty: Decimal,
    billing_type: QuantityBillingType,
    billing_params: Option<&PerUseParams>,
    usage_qty: Option<Decimal>,
    tier_rates: Option<&[TierRate]>,
    custom_calc: Option<&dyn Fn(Decimal) -> Decimal>,
) -> (Decimal, String) {
    match billing_type {
        QuantityBillingType::FlatRate => {
            (base_qty, "Flat rate billing: quantity unchanged".to_string())
        }
        QuantityBillingType::PerUse => match usage_qty {
            Some(usage) => {
                let min_usage = billing_params.and_then(|p| p.min_usage);
                let effective = min_usage.map_or(usage, |min| usage.max(min));
                let multiplier = billing_params
                    .and_then(|p| p.multiplier)
                    .unwrap_or(Decimal::ONE);
                let qty = effective * multiplier;
                (
                    qty,
                    format!("Per-use billing: usage {usage} billed as {qty}"),
                )
            }
            None => {
                warn!(%base_qty, "per-use billing without usage data");
                (
                    base_qty,
                    "No usage data available; using ordered quantity".to_string(),
                )
            }
        },
        QuantityBillingType::Tiered => match tier_rates {
            Some(rates) if !rates.is_empty() => {
                let tier = rates
                    .iter()
                    .filter(|tier| tier.threshold <= base_qty)
                    .max_by(|a, b| a.threshold.cmp(&b.threshold));
                match tier {
                    Some(tier) => (
                        base_qty * tier.rate,
                        format!(
                            "Tiered billing: rate {} applied at threshold {}",
                            tier.rate, tier.threshold
                        ),
                    ),
                    None => (
                        base_qty,
                        "No tier threshold reached; using ordered quantity".to_string(),
                    ),
                }
            }
            _ => {
                warn!(%base_qty, "tiered billing without tier rates");
                (
                    base_qty,
                    "No tier rates configured; using ordered quantity".to_string(),
                )
            }
        },
        QuantityBillingType::Custom => match custom_calc {
            Some(calc) => (calc(base_qty), "Custom calculation applied".to_string()),
            None => {
                warn!(%base_qty, "custom billing without a calculation");
                (
                    base_qty,
                    "No custom calculation provided; using ordered quantity".to_string(),
                )
            }
        },
    }
}

/// Resolve the quantity to deliver under the item's delivery schedule,
/// then apply delivery constraints (min, max, increment round-up), each
/// appending to the audit message.
pub fn ordered_qty_to_delivery_qty(
    ordered_qty: Decimal,
    delivery_schedule: DeliverySchedule,
    schedule_params: Option<&ScheduleParams>,
    delivery_constraints: Option<&DeliveryConstraints>,
    custom_schedule: Option<&dyn Fn(Decimal) -> Decimal>,
) -> (Decimal, String) {
    let (mut qty, mut message) = match delivery_schedule {
        DeliverySchedule::Immediate => (
            ordered_qty,
            "Immediate delivery: full quantity".to_string(),
        ),
        DeliverySchedule::Scheduled => match scheduled_window(schedule_params) {
            Some((start, end, delivery, prorate)) => {
                if delivery < start || delivery > end {
                    (
                        Decimal::ZERO,
                        format!("Delivery date {delivery} outside window {start} to {end}"),
                    )
                } else if prorate {
                    let remaining = (end - delivery).num_days() + 1;
                    let total = (end - start).num_days() + 1;
                    let prorated =
                        round_money(ordered_qty * Decimal::from(remaining) / Decimal::from(total));
                    (
                        prorated,
                        format!("Prorated delivery: {remaining} of {total} window days remaining"),
                    )
                } else {
                    (
                        ordered_qty,
                        "Scheduled delivery within window".to_string(),
                    )
                }
            }
            None => {
                warn!(%ordered_qty, "scheduled delivery without a complete window");
                (
                    ordered_qty,
                    "No delivery window configured; delivering full quantity".to_string(),
                )
            }
        },
        DeliverySchedule::Recurring => {
            match schedule_params
                .and_then(|p| p.total_deliveries)
                .filter(|n| *n > 0)
            {
                Some(count) => (
                    round_money(ordered_qty / Decimal::from(count)),
                    format!("Recurring delivery: quantity split across {count} deliveries"),
                ),
                None => {
                    warn!(%ordered_qty, "recurring delivery without a delivery count");
                    (
                        ordered_qty,
                        "No delivery count configured; delivering full quantity".to_string(),
                    )
                }
            }
        }
        DeliverySchedule::Custom => match custom_schedule {
            Some(schedule) => (schedule(ordered_qty), "Custom schedule applied".to_string()),
            None => {
                warn!(%ordered_qty, "custom delivery without a schedule");
                (
                    ordered_qty,
                    "No custom schedule provided; delivering full quantity".to_string(),
                )
            }
        },
    };

    if let Some(constraints) = delivery_constraints {
        if let Some(min) = constraints.min_delivery {
            if qty < min {
                qty = min;
                message.push_str(&format!(" (min={min})"));
            }
        }
        if let Some(max) = constraints.max_delivery {
            if qty > max {
                qty = max;
                message.push_str(&format!(" (max={max})"));
            }
        }
        if let Some(increment) = constraints.increment {
            if increment > Decimal::ZERO {
                let rounded = round_to_increment(qty, increment, RoundingMethod::Up);
                if rounded != qty {
                    qty = rounded;
                    message.push_str(&format!(" (increment={increment})"));
                }
            }
        }
    }

    (qty, message)
}

/// Whether an order is ready to close, with the reason.
///
/// Cancelled orders always close regardless of item status. Delivered
/// orders close once every item is terminal and the configured grace
/// period has elapsed since delivery.
pub fn should_close_order(order: &Order) -> (bool, String) {
    should_close_order_as_of(
        order,
        Utc::now().date_naive(),
        config::get().auto_close_grace_days,
    )
}

/// [`should_close_order`] against an explicit evaluation date and grace
/// period.
pub fn should_close_order_as_of(
    order: &Order,
    as_of: NaiveDate,
    grace_days: i64,
) -> (bool, String) {
    match order.status {
        OrderStatus::Closed => (false, format!("Order {} is already closed", order.id)),
        OrderStatus::Cancelled => (
            true,
            format!(
                "Order {} is cancelled; closing regardless of item status",
                order.id
            ),
        ),
        OrderStatus::Delivered => {
            let open_items = order
                .items
                .iter()
                .filter(|item| !item.status.is_terminal())
                .count();
            if open_items > 0 {
                return (
                    false,
                    format!("Order {} has {} non-closeable items", order.id, open_items),
                );
            }
            match order.delivery_date {
                Some(delivered) => {
                    let elapsed = (as_of - delivered).num_days();
                    if elapsed >= grace_days {
                        (
                            true,
                            format!(
                                "Order {} delivered {elapsed} days ago; auto-closing after {grace_days}-day grace period",
                                order.id
                            ),
                        )
                    } else {
                        (
                            false,
                            format!(
                                "Order {} is within the {grace_days}-day grace period",
                                order.id
                            ),
                        )
                    }
                }
                None => (
                    false,
                    format!("Order {} has no delivery date recorded", order.id),
                ),
            }
        }
        _ => (
            false,
            format!(
                "Order {} status {} is not closeable",
                order.id,
                order.status.as_str()
            ),
        ),
    }
}

/// Whether a billing run should skip this order, with the reason.
pub fn should_skip_order(order: &Order) -> (bool, Option<String>) {
    should_skip_order_as_of(order, Utc::now().date_naive(), true)
}

/// [`should_skip_order`] against an explicit evaluation date.
/// `check_dates=false` suppresses date-based skip reasons only.
pub fn should_skip_order_as_of(
    order: &Order,
    as_of: NaiveDate,
    check_dates: bool,
) -> (bool, Option<String>) {
    if matches!(order.status, OrderStatus::Closed | OrderStatus::Cancelled) {
        return (
            true,
            Some(format!(
                "Order {} status {} is not billable",
                order.id,
                order.status.as_str()
            )),
        );
    }

    if check_dates {
        if order.order_date > as_of {
            return (
                true,
                Some(format!(
                    "Order {} has a future order date {}",
                    order.id, order.order_date
                )),
            );
        }
        if let Some(delivery) = order.delivery_date {
            if delivery > as_of {
                return (
                    true,
                    Some(format!(
                        "Order {} has a future delivery date {delivery}",
                        order.id
                    )),
                );
            }
        }
    }

    if order.items.iter().all(|item| item.status.is_terminal()) {
        return (
            true,
            Some(format!("Order {} has no active items", order.id)),
        );
    }

    (false, None)
}

/// Partition orders selected for a billing run into processable and
/// skipped (with reasons). Every order lands in exactly one partition.
pub fn filter_processable_orders(
    orders: Vec<Order>,
    check_dates: bool,
) -> (Vec<Order>, Vec<(Order, String)>) {
    filter_processable_orders_as_of(orders, check_dates, Utc::now().date_naive())
}

/// [`filter_processable_orders`] against an explicit evaluation date.
pub fn filter_processable_orders_as_of(
    orders: Vec<Order>,
    check_dates: bool,
    as_of: NaiveDate,
) -> (Vec<Order>, Vec<(Order, String)>) {
    let mut processable = Vec::new();
    let mut skipped = Vec::new();

    for order in orders {
        match should_skip_order_as_of(&order, as_of, check_dates) {
            (true, Some(reason)) => {
                debug!(order_id = %order.id, %reason, "skipping order");
                skipped.push((order, reason));
            }
            (true, None) => {
                skipped.push((order, "Order is not billable".to_string()));
            }
            (false, _) => processable.push(order),
        }
    }

    (processable, skipped)
}

fn scheduled_window(
    params: Option<&ScheduleParams>,
) -> Option<(NaiveDate, NaiveDate, NaiveDate, bool)> {
    let params = params?;
    match (params.window_start, params.window_end, params.delivery_date) {
        (Some(start), Some(end), Some(delivery)) => Some((start, end, delivery, params.prorate)),
        _ => None,
    }
}

fn round_to_increment(qty: Decimal, increment: Decimal, method: RoundingMethod) -> Decimal {
    let steps = qty / increment;
    let steps = match method {
        RoundingMethod::Down => steps.floor(),
        RoundingMethod::Up => steps.ceil(),
        RoundingMethod::Nearest => {
            steps.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        }
    };
    steps * increment
}
