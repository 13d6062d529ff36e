// src/models/quantity_rule.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity band from the external pricing-configuration store. Bands are
/// evaluated highest `min_quantity` first; the first band containing the
/// quantity wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityRule {
    pub min_quantity: Decimal,
    pub max_quantity: Option<Decimal>,
    pub multiplier: Decimal,
    /// Fixed charge overriding the multiplier. A flat rate bills a
    /// quantity-independent amount by forcing the effective quantity to 1.
    pub flat_rate: Option<Decimal>,
}

impl QuantityRule {
    pub fn applies_to(&self, quantity: Decimal) -> bool {
        if quantity < self.min_quantity {
            return false;
        }
        match self.max_quantity {
            Some(max) => quantity <= max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn band_bounds_are_inclusive() {
        let rule = QuantityRule {
            min_quantity: dec!(5),
            max_quantity: Some(dec!(10)),
            multiplier: dec!(1.5),
            flat_rate: None,
        };

        assert!(rule.applies_to(dec!(5)));
        assert!(rule.applies_to(dec!(10)));
        assert!(!rule.applies_to(dec!(4.99)));
        assert!(!rule.applies_to(dec!(10.01)));
    }

    #[test]
    fn open_ended_band() {
        let rule = QuantityRule {
            min_quantity: dec!(20),
            max_quantity: None,
            multiplier: dec!(2),
            flat_rate: None,
        };

        assert!(rule.applies_to(dec!(1000)));
        assert!(!rule.applies_to(dec!(19)));
    }
}
