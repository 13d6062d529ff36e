// src/models/modifier.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BillingError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceModifierType {
    Discount,
    Surcharge,
    InsuranceAdjustment,
}

impl InvoiceModifierType {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceModifierType::Discount => "discount",
            InvoiceModifierType::Surcharge => "surcharge",
            InvoiceModifierType::InsuranceAdjustment => "insurance_adjustment",
        }
    }
}

impl FromStr for InvoiceModifierType {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discount" => Ok(InvoiceModifierType::Discount),
            "surcharge" => Ok(InvoiceModifierType::Surcharge),
            "insurance_adjustment" => Ok(InvoiceModifierType::InsuranceAdjustment),
            _ => Err(BillingError::UnknownModifierType(s.to_string())),
        }
    }
}

/// Qualifying, date-bounded multiplier applied to a computed base amount.
/// Sourced from the external pricing-configuration store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceModifier {
    pub modifier_type: InvoiceModifierType,
    pub multiplier: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer_type: Option<String>,
    pub insurance_type: Option<String>,
    pub state: Option<String>,
}

impl InvoiceModifier {
    /// Validity window containment; open-ended when a bound is absent.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        true
    }

    /// Number of qualifying attributes this modifier specifies. Used to
    /// order candidates most-specific-first.
    pub fn rule_count(&self) -> usize {
        [
            self.customer_type.is_some(),
            self.insurance_type.is_some(),
            self.state.is_some(),
        ]
        .iter()
        .filter(|specified| **specified)
        .count()
    }
}
