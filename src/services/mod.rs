// src/services/mod.rs
pub mod billing_calculator;
pub mod date_service;
pub mod order_service;

use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amounts are quantized to 2 decimal places, half-up.
pub(crate) const MONEY_DECIMAL_PLACES: u32 = 2;

/// Intermediate multipliers are quantized to 4 decimal places, half-up.
pub(crate) const MULTIPLIER_DECIMAL_PLACES: u32 = 4;

pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round_multiplier(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        MULTIPLIER_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}
