// src/services/billing_calculator.rs
//! Medicare/insurance amount-calculation policy.
//!
//! Pure functions over exact decimals; binary floats never enter a
//! calculation. Policy encoded here:
//! - capped-rental decay (100% months 1-3, 75% months 4-15, none 16-21,
//!   then month 22 and every 6th month after)
//! - rent-to-purchase conversion at month 10, crediting nine months of
//!   rent against the sale price
//! - parental capped rental (full rate through month 15)
//! - cross-frequency proration and whole-period counting
//! - qualifying invoice modifiers and quantity-band multipliers

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::date_service::{add_months_clamped, month_diff};
use super::{round_money, round_multiplier};
use crate::models::{
    BillingFrequency, InvoiceModifier, InvoiceModifierType, QuantityRule, RoundingMethod,
    SaleRentType,
};

/// Capped rentals reimburse at 75% of the rental price for months 4-15.
const CAPPED_RENTAL_REDUCED_NUM: i64 = 75;

/// Months of rent credited against the sale price at the month-10
/// rent-to-purchase conversion.
const RENT_TO_PURCHASE_CREDIT_MONTHS: i64 = 9;

/// First month of the periodic maintenance charge after a capped rental
/// reaches its cap, recurring every `CAP_RECURRENCE_MONTHS` after.
const CAP_RECURRENCE_START_MONTH: i32 = 22;
const CAP_RECURRENCE_MONTHS: i32 = 6;

/// Allowable amount for one billing month of an order item.
///
/// `billing_month` is normalized to >= 1. `flat_rate` forces the effective
/// quantity to 1 for this calculation only. Result is quantized to 2
/// decimal places.
pub fn get_allowable_amount(
    sale_rent_type: SaleRentType,
    billing_month: i32,
    price: Decimal,
    quantity: Decimal,
    sale_price: Option<Decimal>,
    flat_rate: bool,
) -> Decimal {
    let month = billing_month.max(1);
    let qty = if flat_rate { Decimal::ONE } else { quantity };

    let amount = match sale_rent_type {
        SaleRentType::OneTimeSale | SaleRentType::ReoccurringSale | SaleRentType::OneTimeRental => {
            if month == 1 {
                price * qty
            } else {
                Decimal::ZERO
            }
        }
        SaleRentType::MedicareOxygenRental | SaleRentType::MonthlyRental => price * qty,
        SaleRentType::RentToPurchase => match month {
            1..=9 => price * qty,
            10 => sale_price
                .map(|sp| (sp - price * Decimal::from(RENT_TO_PURCHASE_CREDIT_MONTHS)) * qty)
                .unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        },
        SaleRentType::CappedRental => match month {
            1..=3 => price * qty,
            4..=15 => Decimal::new(CAPPED_RENTAL_REDUCED_NUM, 2) * price * qty,
            16..=21 => Decimal::ZERO,
            m if is_cap_recurrence_month(m) => price * qty,
            _ => Decimal::ZERO,
        },
        SaleRentType::ParentalCappedRental => match month {
            1..=15 => price * qty,
            16..=21 => Decimal::ZERO,
            m if is_cap_recurrence_month(m) => price * qty,
            _ => Decimal::ZERO,
        },
    };

    round_money(amount)
}

/// Multiplier converting an amount between the frequency it was ordered at
/// and the frequency it is billed at, over the inclusive span
/// `[dos_from, dos_to]` (truncated at `end_date`). Quantized to 4 decimal
/// places.
pub fn get_amount_multiplier(
    dos_from: NaiveDate,
    dos_to: NaiveDate,
    end_date: Option<NaiveDate>,
    sale_rent_type: SaleRentType,
    ordered_when: BillingFrequency,
    billed_when: BillingFrequency,
) -> Decimal {
    if sale_rent_type.is_one_time() {
        return Decimal::ONE;
    }

    let to = match end_date {
        Some(end) if end < dos_to => end,
        _ => dos_to,
    };
    if ordered_when == billed_when {
        return Decimal::ONE;
    }

    let days = (to - dos_from).num_days() + 1;
    if days <= 0 {
        return Decimal::ZERO;
    }
    let days_dec = Decimal::from(days);

    let multiplier = match (ordered_when, billed_when) {
        (BillingFrequency::Daily, BillingFrequency::Monthly) => days_dec,
        (BillingFrequency::Weekly, BillingFrequency::Monthly) => days_dec / Decimal::from(7),
        (BillingFrequency::Daily, BillingFrequency::Weekly) => days_dec,
        (BillingFrequency::Weekly, BillingFrequency::Daily)
        | (BillingFrequency::Monthly, BillingFrequency::Daily) => Decimal::ONE / days_dec,
        _ => Decimal::ONE,
    };

    round_multiplier(multiplier)
}

/// Billable amount: the allowable amount with discount applied before tax.
///
/// Discount is `x (100 - discount_percent) / 100` when positive; tax is
/// `x (1 + tax_rate)` when set and the amount is positive. The order is
/// fixed: discount, then tax. With neither set this equals
/// [`get_allowable_amount`] exactly. Quantized to 2 decimal places.
#[allow(clippy::too_many_arguments)]
pub fn get_billable_amount(
    sale_rent_type: SaleRentType,
    billing_month: i32,
    price: Decimal,
    quantity: Decimal,
    sale_price: Option<Decimal>,
    flat_rate: bool,
    tax_rate: Option<Decimal>,
    discount_percent: Option<Decimal>,
) -> Decimal {
    let mut amount = get_allowable_amount(
        sale_rent_type,
        billing_month,
        price,
        quantity,
        sale_price,
        flat_rate,
    );

    if let Some(discount) = discount_percent {
        if discount > Decimal::ZERO {
            amount = amount * (Decimal::ONE_HUNDRED - discount) / Decimal::ONE_HUNDRED;
        }
    }
    if let Some(tax) = tax_rate {
        if amount > Decimal::ZERO {
            amount *= Decimal::ONE + tax;
        }
    }

    round_money(amount)
}

/// Apply the most specific qualifying invoice modifier to `base_amount`.
///
/// Candidates are filtered by type and validity-window containment, then
/// ordered by qualifying-rule count descending. The first candidate whose
/// rules all match is applied (an attribute is checked only when both the
/// rule and the input specify it); the result is clamped to the modifier's
/// `[min_amount, max_amount]` and quantized to 2 decimal places. When no
/// candidate fully matches, `base_amount` is returned unchanged.
pub fn get_invoice_modifier(
    base_amount: Decimal,
    modifier_type: InvoiceModifierType,
    service_date: NaiveDate,
    modifiers: &[InvoiceModifier],
    customer_type: Option<&str>,
    insurance_type: Option<&str>,
    state: Option<&str>,
) -> Decimal {
    let mut candidates: Vec<&InvoiceModifier> = modifiers
        .iter()
        .filter(|m| m.modifier_type == modifier_type && m.is_active_on(service_date))
        .collect();

    // Most specific first; sort is stable so configuration order breaks
    // ties.
    candidates.sort_by(|a, b| b.rule_count().cmp(&a.rule_count()));

    for candidate in candidates {
        if rule_matches(candidate.customer_type.as_deref(), customer_type)
            && rule_matches(candidate.insurance_type.as_deref(), insurance_type)
            && rule_matches(candidate.state.as_deref(), state)
        {
            let mut amount = base_amount * candidate.multiplier;
            if let Some(min) = candidate.min_amount {
                amount = amount.max(min);
            }
            if let Some(max) = candidate.max_amount {
                amount = amount.min(max);
            }
            return round_money(amount);
        }
    }

    debug!(
        modifier_type = modifier_type.as_str(),
        %service_date,
        "no qualifying invoice modifier; base amount unchanged"
    );
    base_amount
}

/// A qualifying attribute is checked only when both the rule and the input
/// specify it.
fn rule_matches(rule: Option<&str>, input: Option<&str>) -> bool {
    match (rule, input) {
        (Some(rule), Some(input)) => rule == input,
        _ => true,
    }
}

/// Number of billing periods covered by the inclusive span
/// `[from_date, to_date]` (truncated at `end_date`), prorated or counted
/// in whole units. Quantized to 4 decimal places.
///
/// Monthly proration divides the span days by the days covered by the
/// whole months elapsed; when no whole month has elapsed the span counts
/// as a single period. Un-prorated counting uses `round_method`: `Up` adds
/// one more period, `Nearest` adds one when the final day-of-month is 15
/// or later.
pub fn get_multiplier(
    frequency: BillingFrequency,
    from_date: NaiveDate,
    to_date: NaiveDate,
    end_date: Option<NaiveDate>,
    prorate: bool,
    round_method: RoundingMethod,
) -> Decimal {
    if frequency == BillingFrequency::OneTime {
        return Decimal::ONE;
    }

    let to = match end_date {
        Some(end) if end < to_date => end,
        _ => to_date,
    };
    if from_date > to {
        return Decimal::ZERO;
    }

    let days = (to - from_date).num_days() + 1;
    let days_dec = Decimal::from(days);

    match frequency {
        BillingFrequency::Daily => round_multiplier(days_dec),
        BillingFrequency::Weekly => {
            if prorate {
                round_multiplier(days_dec / Decimal::from(7))
            } else {
                let weeks = match round_method {
                    RoundingMethod::Down => Decimal::from(days / 7),
                    RoundingMethod::Up => Decimal::from((days + 6) / 7),
                    RoundingMethod::Nearest => (days_dec / Decimal::from(7))
                        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                };
                round_multiplier(weeks)
            }
        }
        BillingFrequency::Monthly => {
            if prorate {
                let elapsed_months = elapsed_whole_months(from_date, to);
                let month_span_days = if elapsed_months <= 0 {
                    0
                } else {
                    (add_months_clamped(from_date, elapsed_months as u32) - from_date).num_days()
                };
                if month_span_days == 0 {
                    Decimal::ONE
                } else {
                    round_multiplier(days_dec / Decimal::from(month_span_days))
                }
            } else {
                let base = month_diff(from_date, to)
                    + if to.day() >= from_date.day() { 1 } else { 0 };
                let count = match round_method {
                    RoundingMethod::Down => base,
                    RoundingMethod::Up => base + 1,
                    RoundingMethod::Nearest => base + if to.day() >= 15 { 1 } else { 0 },
                };
                round_multiplier(Decimal::from(count))
            }
        }
        _ => Decimal::ONE,
    }
}

/// Multiplier for an ordered quantity under the configured quantity bands.
///
/// Bands are evaluated highest `min_quantity` first; the first band
/// containing the quantity wins. A flat-rate band (when `allow_flat_rate`)
/// converts the fixed charge into a multiplier against `base_amount`, or 0
/// when no positive base amount is available. Quantized to 4 decimal
/// places.
///
/// NOTE: when no band matches, the historical behavior of returning the
/// raw quantity as the "multiplier" is preserved, even though a quantity
/// and a multiplier are different units. Callers relying on the fallback
/// should multiply by a per-unit price.
pub fn get_quantity_multiplier(
    quantity: Decimal,
    rules: &[QuantityRule],
    base_amount: Option<Decimal>,
    allow_flat_rate: bool,
) -> Decimal {
    if quantity <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut sorted: Vec<&QuantityRule> = rules.iter().collect();
    sorted.sort_by(|a, b| b.min_quantity.cmp(&a.min_quantity));

    for rule in sorted {
        if !rule.applies_to(quantity) {
            continue;
        }
        if let Some(flat) = rule.flat_rate {
            if allow_flat_rate {
                return match base_amount {
                    Some(base) if base > Decimal::ZERO => round_multiplier(flat / base),
                    _ => Decimal::ZERO,
                };
            }
        }
        return round_multiplier(rule.multiplier);
    }

    debug!(%quantity, "no quantity band matched; billing raw quantity as multiplier");
    round_multiplier(quantity)
}

fn is_cap_recurrence_month(month: i32) -> bool {
    month >= CAP_RECURRENCE_START_MONTH
        && (month - CAP_RECURRENCE_START_MONTH) % CAP_RECURRENCE_MONTHS == 0
}

/// Whole months fully elapsed between `from` and `to`, by day-of-month
/// comparison.
fn elapsed_whole_months(from: NaiveDate, to: NaiveDate) -> i64 {
    let diff = month_diff(from, to);
    if to.day() < from.day() {
        diff - 1
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn one_time_types_bill_first_month_only() {
        for sale_rent_type in [
            SaleRentType::OneTimeSale,
            SaleRentType::ReoccurringSale,
            SaleRentType::OneTimeRental,
        ] {
            assert_eq!(
                get_allowable_amount(sale_rent_type, 1, dec!(250), dec!(2), None, false),
                dec!(500.00)
            );
            assert_eq!(
                get_allowable_amount(sale_rent_type, 2, dec!(250), dec!(2), None, false),
                dec!(0)
            );
        }
    }

    #[test]
    fn monthly_rentals_bill_every_month() {
        for month in [1, 6, 13, 40] {
            assert_eq!(
                get_allowable_amount(
                    SaleRentType::MedicareOxygenRental,
                    month,
                    dec!(85.50),
                    dec!(1),
                    None,
                    false
                ),
                dec!(85.50)
            );
            assert_eq!(
                get_allowable_amount(
                    SaleRentType::MonthlyRental,
                    month,
                    dec!(85.50),
                    dec!(1),
                    None,
                    false
                ),
                dec!(85.50)
            );
        }
    }

    #[test]
    fn rent_to_purchase_converts_at_month_ten() {
        let price = dec!(100);
        for month in 1..=9 {
            assert_eq!(
                get_allowable_amount(
                    SaleRentType::RentToPurchase,
                    month,
                    price,
                    dec!(1),
                    Some(dec!(1200)),
                    false
                ),
                dec!(100.00)
            );
        }
        // Month 10 credits nine months of rent against the sale price.
        assert_eq!(
            get_allowable_amount(
                SaleRentType::RentToPurchase,
                10,
                price,
                dec!(1),
                Some(dec!(1200)),
                false
            ),
            dec!(300.00)
        );
        // Without a sale price the conversion month bills nothing.
        assert_eq!(
            get_allowable_amount(SaleRentType::RentToPurchase, 10, price, dec!(1), None, false),
            dec!(0)
        );
        assert_eq!(
            get_allowable_amount(
                SaleRentType::RentToPurchase,
                11,
                price,
                dec!(1),
                Some(dec!(1200)),
                false
            ),
            dec!(0)
        );
    }

    #[test]
    fn capped_rental_schedule() {
        let expected = [
            (1, dec!(100.00)),
            (2, dec!(100.00)),
            (3, dec!(100.00)),
            (4, dec!(75.00)),
            (15, dec!(75.00)),
            (16, dec!(0)),
            (21, dec!(0)),
            (22, dec!(100.00)),
            (28, dec!(100.00)),
        ];
        for (month, amount) in expected {
            assert_eq!(
                get_allowable_amount(
                    SaleRentType::CappedRental,
                    month,
                    dec!(100),
                    dec!(1),
                    None,
                    false
                ),
                amount,
                "month {month}"
            );
        }
        // Off-cycle months past the cap bill nothing.
        assert_eq!(
            get_allowable_amount(SaleRentType::CappedRental, 23, dec!(100), dec!(1), None, false),
            dec!(0)
        );
        assert_eq!(
            get_allowable_amount(SaleRentType::CappedRental, 27, dec!(100), dec!(1), None, false),
            dec!(0)
        );
    }

    #[test]
    fn parental_capped_rental_schedule() {
        for month in 1..=15 {
            assert_eq!(
                get_allowable_amount(
                    SaleRentType::ParentalCappedRental,
                    month,
                    dec!(100),
                    dec!(1),
                    None,
                    false
                ),
                dec!(100.00)
            );
        }
        for month in 16..=21 {
            assert_eq!(
                get_allowable_amount(
                    SaleRentType::ParentalCappedRental,
                    month,
                    dec!(100),
                    dec!(1),
                    None,
                    false
                ),
                dec!(0)
            );
        }
        assert_eq!(
            get_allowable_amount(
                SaleRentType::ParentalCappedRental,
                22,
                dec!(100),
                dec!(1),
                None,
                false
            ),
            dec!(100.00)
        );
        assert_eq!(
            get_allowable_amount(
                SaleRentType::ParentalCappedRental,
                34,
                dec!(100),
                dec!(1),
                None,
                false
            ),
            dec!(100.00)
        );
    }

    #[test]
    fn billing_month_is_normalized_to_one() {
        assert_eq!(
            get_allowable_amount(SaleRentType::OneTimeSale, 0, dec!(50), dec!(1), None, false),
            dec!(50.00)
        );
        assert_eq!(
            get_allowable_amount(SaleRentType::OneTimeSale, -3, dec!(50), dec!(1), None, false),
            dec!(50.00)
        );
    }

    #[test]
    fn flat_rate_forces_quantity_to_one() {
        assert_eq!(
            get_allowable_amount(SaleRentType::MonthlyRental, 1, dec!(100), dec!(5), None, true),
            dec!(100.00)
        );
    }

    #[test]
    fn amount_multiplier_is_one_for_matching_frequencies() {
        let from = d(2025, 1, 1);
        let to = d(2025, 1, 31);
        for frequency in [
            BillingFrequency::OneTime,
            BillingFrequency::Daily,
            BillingFrequency::Weekly,
            BillingFrequency::Monthly,
        ] {
            assert_eq!(
                get_amount_multiplier(
                    from,
                    to,
                    None,
                    SaleRentType::MonthlyRental,
                    frequency,
                    frequency
                ),
                Decimal::ONE
            );
        }
    }

    #[test]
    fn amount_multiplier_is_one_for_one_time_types() {
        assert_eq!(
            get_amount_multiplier(
                d(2025, 1, 1),
                d(2025, 1, 31),
                None,
                SaleRentType::OneTimeRental,
                BillingFrequency::Daily,
                BillingFrequency::Monthly
            ),
            Decimal::ONE
        );
    }

    #[test]
    fn amount_multiplier_converts_day_spans() {
        let from = d(2025, 1, 1);
        let to = d(2025, 1, 31);

        assert_eq!(
            get_amount_multiplier(
                from,
                to,
                None,
                SaleRentType::MonthlyRental,
                BillingFrequency::Daily,
                BillingFrequency::Monthly
            ),
            dec!(31.0000)
        );
        assert_eq!(
            get_amount_multiplier(
                from,
                to,
                None,
                SaleRentType::MonthlyRental,
                BillingFrequency::Weekly,
                BillingFrequency::Monthly
            ),
            dec!(4.4286)
        );
        assert_eq!(
            get_amount_multiplier(
                from,
                to,
                None,
                SaleRentType::MonthlyRental,
                BillingFrequency::Monthly,
                BillingFrequency::Daily
            ),
            dec!(0.0323)
        );
    }

    #[test]
    fn amount_multiplier_truncates_at_end_date() {
        // Truncated to [Jan 1, Jan 7]: 7 days.
        assert_eq!(
            get_amount_multiplier(
                d(2025, 1, 1),
                d(2025, 1, 31),
                Some(d(2025, 1, 7)),
                SaleRentType::MonthlyRental,
                BillingFrequency::Daily,
                BillingFrequency::Monthly
            ),
            dec!(7.0000)
        );
    }

    #[test]
    fn billable_equals_allowable_without_tax_or_discount() {
        for month in [1, 4, 10, 16, 22, 40] {
            for sale_rent_type in [
                SaleRentType::CappedRental,
                SaleRentType::RentToPurchase,
                SaleRentType::MonthlyRental,
            ] {
                assert_eq!(
                    get_billable_amount(
                        sale_rent_type,
                        month,
                        dec!(123.45),
                        dec!(2),
                        Some(dec!(1500)),
                        false,
                        None,
                        None
                    ),
                    get_allowable_amount(
                        sale_rent_type,
                        month,
                        dec!(123.45),
                        dec!(2),
                        Some(dec!(1500)),
                        false
                    )
                );
            }
        }
    }

    #[test]
    fn billable_applies_discount_before_tax() {
        // 100 -> 10% discount -> 90 -> 8% tax -> 97.20
        assert_eq!(
            get_billable_amount(
                SaleRentType::MonthlyRental,
                1,
                dec!(100),
                dec!(1),
                None,
                false,
                Some(dec!(0.08)),
                Some(dec!(10))
            ),
            dec!(97.20)
        );
    }

    #[test]
    fn billable_skips_tax_on_zero_amount() {
        assert_eq!(
            get_billable_amount(
                SaleRentType::OneTimeSale,
                2,
                dec!(100),
                dec!(1),
                None,
                false,
                Some(dec!(0.08)),
                None
            ),
            dec!(0)
        );
    }

    fn sample_modifiers() -> Vec<InvoiceModifier> {
        vec![
            InvoiceModifier {
                modifier_type: InvoiceModifierType::Discount,
                multiplier: dec!(0.9),
                min_amount: None,
                max_amount: None,
                start_date: None,
                end_date: None,
                customer_type: None,
                insurance_type: None,
                state: None,
            },
            InvoiceModifier {
                modifier_type: InvoiceModifierType::Discount,
                multiplier: dec!(0.8),
                min_amount: Some(dec!(50)),
                max_amount: None,
                start_date: None,
                end_date: None,
                customer_type: Some("facility".to_string()),
                insurance_type: None,
                state: Some("TX".to_string()),
            },
        ]
    }

    #[test]
    fn invoice_modifier_prefers_most_specific_match() {
        // Both modifiers qualify; the two-rule Texas facility modifier
        // wins over the unconditional one.
        let amount = get_invoice_modifier(
            dec!(100),
            InvoiceModifierType::Discount,
            d(2025, 6, 1),
            &sample_modifiers(),
            Some("facility"),
            None,
            Some("TX"),
        );
        assert_eq!(amount, dec!(80.00));
    }

    #[test]
    fn invoice_modifier_falls_back_to_general_rule() {
        // State mismatch rules out the specific modifier.
        let amount = get_invoice_modifier(
            dec!(100),
            InvoiceModifierType::Discount,
            d(2025, 6, 1),
            &sample_modifiers(),
            Some("facility"),
            None,
            Some("CA"),
        );
        assert_eq!(amount, dec!(90.00));
    }

    #[test]
    fn invoice_modifier_clamps_to_min_amount() {
        let modifiers = vec![InvoiceModifier {
            modifier_type: InvoiceModifierType::Discount,
            multiplier: dec!(0.5),
            min_amount: Some(dec!(80)),
            max_amount: None,
            start_date: None,
            end_date: None,
            customer_type: None,
            insurance_type: None,
            state: None,
        }];
        assert_eq!(
            get_invoice_modifier(
                dec!(100),
                InvoiceModifierType::Discount,
                d(2025, 6, 1),
                &modifiers,
                None,
                None,
                None
            ),
            dec!(80.00)
        );
    }

    #[test]
    fn invoice_modifier_returns_base_when_none_match() {
        assert_eq!(
            get_invoice_modifier(
                dec!(100),
                InvoiceModifierType::Surcharge,
                d(2025, 6, 1),
                &sample_modifiers(),
                None,
                None,
                None
            ),
            dec!(100)
        );
        assert_eq!(
            get_invoice_modifier(
                dec!(100),
                InvoiceModifierType::Discount,
                d(2025, 6, 1),
                &[],
                None,
                None,
                None
            ),
            dec!(100)
        );
    }

    #[test]
    fn invoice_modifier_respects_date_window() {
        let mut modifiers = sample_modifiers();
        modifiers[0].start_date = Some(d(2025, 1, 1));
        modifiers[0].end_date = Some(d(2025, 3, 31));
        modifiers.truncate(1);

        assert_eq!(
            get_invoice_modifier(
                dec!(100),
                InvoiceModifierType::Discount,
                d(2025, 6, 1),
                &modifiers,
                None,
                None,
                None
            ),
            dec!(100)
        );
        assert_eq!(
            get_invoice_modifier(
                dec!(100),
                InvoiceModifierType::Discount,
                d(2025, 2, 1),
                &modifiers,
                None,
                None,
                None
            ),
            dec!(90.00)
        );
    }

    #[test]
    fn multiplier_one_time_and_inverted_dates() {
        assert_eq!(
            get_multiplier(
                BillingFrequency::OneTime,
                d(2025, 1, 10),
                d(2025, 1, 1),
                None,
                true,
                RoundingMethod::Down
            ),
            Decimal::ONE
        );
        assert_eq!(
            get_multiplier(
                BillingFrequency::Daily,
                d(2025, 1, 10),
                d(2025, 1, 1),
                None,
                true,
                RoundingMethod::Down
            ),
            Decimal::ZERO
        );
    }

    #[test]
    fn multiplier_daily_counts_inclusive_days() {
        assert_eq!(
            get_multiplier(
                BillingFrequency::Daily,
                d(2025, 1, 1),
                d(2025, 1, 31),
                None,
                true,
                RoundingMethod::Down
            ),
            dec!(31.0000)
        );
    }

    #[test]
    fn multiplier_weekly_prorates_and_counts() {
        let from = d(2025, 1, 1);
        let to = d(2025, 1, 10); // 10 days

        assert_eq!(
            get_multiplier(BillingFrequency::Weekly, from, to, None, true, RoundingMethod::Down),
            dec!(1.4286)
        );
        assert_eq!(
            get_multiplier(BillingFrequency::Weekly, from, to, None, false, RoundingMethod::Down),
            dec!(1.0000)
        );
        assert_eq!(
            get_multiplier(BillingFrequency::Weekly, from, to, None, false, RoundingMethod::Up),
            dec!(2.0000)
        );
        assert_eq!(
            get_multiplier(
                BillingFrequency::Weekly,
                from,
                to,
                None,
                false,
                RoundingMethod::Nearest
            ),
            dec!(1.0000)
        );
    }

    #[test]
    fn multiplier_monthly_prorates_against_whole_month_span() {
        // [Jan 15, Feb 20]: one whole month elapsed (31 days), 37 span
        // days.
        assert_eq!(
            get_multiplier(
                BillingFrequency::Monthly,
                d(2025, 1, 15),
                d(2025, 2, 20),
                None,
                true,
                RoundingMethod::Down
            ),
            dec!(1.1935)
        );
        // Less than one whole month elapsed counts as a single period.
        assert_eq!(
            get_multiplier(
                BillingFrequency::Monthly,
                d(2025, 1, 5),
                d(2025, 1, 20),
                None,
                true,
                RoundingMethod::Down
            ),
            Decimal::ONE
        );
    }

    #[test]
    fn multiplier_monthly_whole_counts() {
        let from = d(2025, 1, 15);
        let to = d(2025, 3, 20); // two month boundaries, day 20 >= 15

        assert_eq!(
            get_multiplier(BillingFrequency::Monthly, from, to, None, false, RoundingMethod::Down),
            dec!(3.0000)
        );
        assert_eq!(
            get_multiplier(BillingFrequency::Monthly, from, to, None, false, RoundingMethod::Up),
            dec!(4.0000)
        );
        assert_eq!(
            get_multiplier(
                BillingFrequency::Monthly,
                from,
                to,
                None,
                false,
                RoundingMethod::Nearest
            ),
            dec!(4.0000)
        );
        // Final day before the 15th does not earn the extra period.
        assert_eq!(
            get_multiplier(
                BillingFrequency::Monthly,
                from,
                d(2025, 3, 10),
                None,
                false,
                RoundingMethod::Nearest
            ),
            dec!(2.0000)
        );
    }

    #[test]
    fn multiplier_truncates_at_end_date() {
        assert_eq!(
            get_multiplier(
                BillingFrequency::Daily,
                d(2025, 1, 1),
                d(2025, 1, 31),
                Some(d(2025, 1, 10)),
                true,
                RoundingMethod::Down
            ),
            dec!(10.0000)
        );
    }

    fn sample_rules() -> Vec<QuantityRule> {
        vec![
            QuantityRule {
                min_quantity: dec!(1),
                max_quantity: Some(dec!(9)),
                multiplier: dec!(1),
                flat_rate: None,
            },
            QuantityRule {
                min_quantity: dec!(10),
                max_quantity: Some(dec!(49)),
                multiplier: dec!(0.9),
                flat_rate: None,
            },
            QuantityRule {
                min_quantity: dec!(50),
                max_quantity: None,
                multiplier: dec!(0.8),
                flat_rate: None,
            },
        ]
    }

    #[test]
    fn quantity_multiplier_zero_or_negative_quantity() {
        assert_eq!(get_quantity_multiplier(dec!(0), &sample_rules(), None, true), dec!(0));
        assert_eq!(get_quantity_multiplier(dec!(-5), &sample_rules(), None, true), dec!(0));
        assert_eq!(get_quantity_multiplier(dec!(0), &[], None, true), dec!(0));
    }

    #[test]
    fn quantity_multiplier_picks_highest_matching_band() {
        assert_eq!(
            get_quantity_multiplier(dec!(5), &sample_rules(), None, true),
            dec!(1.0000)
        );
        assert_eq!(
            get_quantity_multiplier(dec!(25), &sample_rules(), None, true),
            dec!(0.9000)
        );
        assert_eq!(
            get_quantity_multiplier(dec!(500), &sample_rules(), None, true),
            dec!(0.8000)
        );
    }

    #[test]
    fn quantity_multiplier_flat_rate_band() {
        let rules = vec![QuantityRule {
            min_quantity: dec!(1),
            max_quantity: None,
            multiplier: dec!(1),
            flat_rate: Some(dec!(25)),
        }];

        assert_eq!(
            get_quantity_multiplier(dec!(8), &rules, Some(dec!(200)), true),
            dec!(0.1250)
        );
        // No positive base amount to spread the flat rate over.
        assert_eq!(get_quantity_multiplier(dec!(8), &rules, Some(dec!(0)), true), dec!(0));
        assert_eq!(get_quantity_multiplier(dec!(8), &rules, None, true), dec!(0));
        // Flat rate disabled falls back to the band multiplier.
        assert_eq!(
            get_quantity_multiplier(dec!(8), &rules, Some(dec!(200)), false),
            dec!(1.0000)
        );
    }

    #[test]
    fn quantity_multiplier_no_match_returns_quantity() {
        let rules = vec![QuantityRule {
            min_quantity: dec!(100),
            max_quantity: None,
            multiplier: dec!(0.5),
            flat_rate: None,
        }];
        assert_eq!(get_quantity_multiplier(dec!(7), &rules, None, true), dec!(7.0000));
        assert_eq!(get_quantity_multiplier(dec!(3), &[], None, true), dec!(3.0000));
    }
}
