// src/models/enums.rs
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BillingError;

/// Sale/rent category of an order item. Selects the amount policy applied
/// for each billing month in `billing_calculator::get_allowable_amount`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleRentType {
    OneTimeSale,
    ReoccurringSale,
    OneTimeRental,
    MedicareOxygenRental,
    MonthlyRental,
    RentToPurchase,
    CappedRental,
    ParentalCappedRental,
}

impl SaleRentType {
    /// One-time types bill a single period and never prorate across
    /// frequencies.
    pub fn is_one_time(&self) -> bool {
        matches!(self, SaleRentType::OneTimeSale | SaleRentType::OneTimeRental)
    }

    pub fn as_str(&self) -> &str {
        match self {
            SaleRentType::OneTimeSale => "one_time_sale",
            SaleRentType::ReoccurringSale => "reoccurring_sale",
            SaleRentType::OneTimeRental => "one_time_rental",
            SaleRentType::MedicareOxygenRental => "medicare_oxygen_rental",
            SaleRentType::MonthlyRental => "monthly_rental",
            SaleRentType::RentToPurchase => "rent_to_purchase",
            SaleRentType::CappedRental => "capped_rental",
            SaleRentType::ParentalCappedRental => "parental_capped_rental",
        }
    }
}

impl FromStr for SaleRentType {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one_time_sale" => Ok(SaleRentType::OneTimeSale),
            "reoccurring_sale" => Ok(SaleRentType::ReoccurringSale),
            "one_time_rental" => Ok(SaleRentType::OneTimeRental),
            "medicare_oxygen_rental" => Ok(SaleRentType::MedicareOxygenRental),
            "monthly_rental" => Ok(SaleRentType::MonthlyRental),
            "rent_to_purchase" => Ok(SaleRentType::RentToPurchase),
            "capped_rental" => Ok(SaleRentType::CappedRental),
            "parental_capped_rental" => Ok(SaleRentType::ParentalCappedRental),
            _ => Err(BillingError::UnknownSaleRentType(s.to_string())),
        }
    }
}

/// Billing frequency governing period length and cross-frequency
/// multipliers.
///
/// The upstream system carried two frequency enums with differing string
/// literals; they are unified here. The canonical wire strings are the
/// snake_case variant names; the legacy short literals are accepted as
/// deserialization aliases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    #[serde(alias = "once", alias = "ONE_TIME")]
    OneTime,
    #[serde(alias = "day", alias = "DAILY")]
    Daily,
    #[serde(alias = "week", alias = "WEEKLY")]
    Weekly,
    #[serde(alias = "month", alias = "MONTHLY")]
    Monthly,
}

impl BillingFrequency {
    pub fn as_str(&self) -> &str {
        match self {
            BillingFrequency::OneTime => "one_time",
            BillingFrequency::Daily => "daily",
            BillingFrequency::Weekly => "weekly",
            BillingFrequency::Monthly => "monthly",
        }
    }
}

impl FromStr for BillingFrequency {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one_time" | "once" => Ok(BillingFrequency::OneTime),
            "daily" | "day" => Ok(BillingFrequency::Daily),
            "weekly" | "week" => Ok(BillingFrequency::Weekly),
            "monthly" | "month" => Ok(BillingFrequency::Monthly),
            _ => Err(BillingError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Rounding applied when converting fractional spans to whole billing
/// units or snapping quantities to an increment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMethod {
    /// Floor.
    Down,
    /// Ceiling.
    Up,
    /// Half away from zero.
    Nearest,
}
