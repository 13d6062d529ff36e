// src/services/date_service.rs
//! Billing-period date arithmetic.
//!
//! Pure functions of (date, frequency, counts). DOS periods are inclusive
//! on both ends: a one-month period starting 2025-01-15 ends 2025-02-14.
//! Month arithmetic clamps the day-of-month across 28/29/30/31-day months
//! and leap years.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::models::BillingFrequency;

/// Monthly billing anchors are clamped to day 28 so every cycle lands on a
/// day that exists in every month.
const MAX_MONTHLY_ANCHOR_DAY: u32 = 28;

/// End of the "To" date of a billing period starting at `from_date`.
///
/// Monthly periods end the day before the same calendar day of the target
/// month; when the day-of-month does not survive the month advance it is
/// clamped to the last valid day instead (2025-01-31 + 1 month ends
/// 2025-02-28). The result never exceeds `end_date`.
pub fn get_new_dos_to(
    from_date: NaiveDate,
    frequency: BillingFrequency,
    periods: u32,
    end_date: Option<NaiveDate>,
) -> NaiveDate {
    let result = match frequency {
        BillingFrequency::OneTime => from_date,
        BillingFrequency::Daily => from_date + Duration::days(periods as i64),
        BillingFrequency::Weekly => from_date + Duration::days(periods as i64 * 7),
        BillingFrequency::Monthly => {
            let advanced = add_months_clamped(from_date, periods);
            if advanced.day() == from_date.day() {
                advanced.pred_opt().unwrap_or(advanced)
            } else {
                advanced
            }
        }
    };

    clamp_to(result, end_date)
}

/// Start of the period following one that ended at `current_to`.
///
/// The candidate is `current_to + gap_days`, then adjusted back onto the
/// billing grid: weekly cycles preserve the day-of-week of the natural next
/// start (`current_to + 1 day`), monthly cycles preserve its day-of-month
/// clamped to 28. One-time and daily cycles take the candidate unadjusted.
pub fn get_next_dos_from(
    current_to: NaiveDate,
    frequency: BillingFrequency,
    gap_days: i64,
) -> NaiveDate {
    let candidate = current_to + Duration::days(gap_days);

    match frequency {
        BillingFrequency::OneTime | BillingFrequency::Daily => candidate,
        BillingFrequency::Weekly => {
            let natural = current_to + Duration::days(1);
            let target = natural.weekday().num_days_from_monday() as i64;
            let have = candidate.weekday().num_days_from_monday() as i64;
            candidate + Duration::days((target - have).rem_euclid(7))
        }
        BillingFrequency::Monthly => {
            let natural = current_to + Duration::days(1);
            let target_day = natural.day().min(MAX_MONTHLY_ANCHOR_DAY);
            match candidate.with_day(target_day) {
                Some(adjusted) if adjusted >= candidate => adjusted,
                _ => {
                    // Candidate already passed the anchor day; roll to the
                    // anchor in the following month.
                    let first = candidate.with_day(1).unwrap_or(candidate);
                    let next_month = add_months_clamped(first, 1);
                    next_month.with_day(target_day).unwrap_or(next_month)
                }
            }
        }
    }
}

/// [`get_next_dos_from`] using the configured default gap between
/// periods.
pub fn get_next_dos_from_default(current_to: NaiveDate, frequency: BillingFrequency) -> NaiveDate {
    get_next_dos_from(current_to, frequency, crate::config::get().billing_gap_days)
}

/// "To" date of the period following `[current_from, current_to]`.
///
/// Infers the period length actually used (exact day count for daily,
/// whole weeks for weekly, whole-month count via day-of-month comparison
/// for monthly) and projects an equal-length period forward from
/// `current_to`, clamped to `end_date`.
pub fn get_next_dos_to(
    current_from: NaiveDate,
    current_to: NaiveDate,
    frequency: BillingFrequency,
    end_date: Option<NaiveDate>,
) -> NaiveDate {
    let span_days = ((current_to - current_from).num_days() + 1).max(1);

    let result = match frequency {
        BillingFrequency::OneTime | BillingFrequency::Daily => {
            current_to + Duration::days(span_days)
        }
        BillingFrequency::Weekly => {
            let weeks = (span_days / 7).max(1);
            current_to + Duration::days(weeks * 7)
        }
        BillingFrequency::Monthly => {
            let months = whole_month_count(current_from, current_to);
            add_months_clamped(current_to, months as u32)
        }
    };

    clamp_to(result, end_date)
}

/// End of `periods` billing periods starting at `start`.
///
/// One-time periods end at `start` itself for any period count. Otherwise
/// the date advances `periods - 1` whole units beyond the first period;
/// `align_to_calendar` then snaps to the natural unit boundary (end of day,
/// end of week on Sunday, end of month) at 23:59:59.999999, while the
/// non-aligned form preserves the clock time of `start`. The result never
/// exceeds `end_date` (end-of-day aligned when `align_to_calendar`).
pub fn get_period_end(
    start: NaiveDateTime,
    frequency: BillingFrequency,
    periods: u32,
    end_date: Option<NaiveDateTime>,
    align_to_calendar: bool,
) -> NaiveDateTime {
    let result = match frequency {
        BillingFrequency::OneTime => start,
        _ => {
            let extra = periods.max(1) - 1;
            let anchor = advance_units(start.date(), frequency, extra);
            if align_to_calendar {
                unit_end(anchor, frequency)
            } else {
                anchor.and_time(start.time())
            }
        }
    };

    match end_date {
        Some(end) => {
            let cap = if align_to_calendar {
                end_of_day(end.date())
            } else {
                end
            };
            result.min(cap)
        }
        None => result,
    }
}

/// [`get_period_end`] with minimum-span and partial-period extension rules.
///
/// `min_days` keeps adding periods until the inclusive day span of
/// `[start, end]` meets it. When `end_date` truncates mid-period and
/// `extend_for_partial` is set, weekly and monthly periods extend to the
/// end of the truncated unit instead of cutting exactly at `end_date`, but
/// only when at least half of that unit has elapsed and the extension stays
/// within the un-truncated period end. The result always lies within
/// `[start, un-truncated period end]`.
#[allow(clippy::too_many_arguments)]
pub fn get_period_end2(
    start: NaiveDateTime,
    frequency: BillingFrequency,
    periods: u32,
    end_date: Option<NaiveDateTime>,
    align_to_calendar: bool,
    min_days: Option<i64>,
    extend_for_partial: bool,
) -> NaiveDateTime {
    if frequency == BillingFrequency::OneTime {
        return get_period_end(start, frequency, periods, end_date, align_to_calendar);
    }

    let mut periods = periods.max(1);
    if let Some(min_days) = min_days {
        loop {
            let end = get_period_end(start, frequency, periods, None, align_to_calendar);
            let span = (end.date() - start.date()).num_days() + 1;
            if span >= min_days {
                break;
            }
            periods += 1;
        }
    }

    let untruncated = get_period_end(start, frequency, periods, None, align_to_calendar);
    let truncated = get_period_end(start, frequency, periods, end_date, align_to_calendar);

    if truncated >= untruncated || !extend_for_partial {
        return truncated.max(start);
    }

    let extended = match frequency {
        BillingFrequency::Weekly | BillingFrequency::Monthly => {
            let unit_start = start_of_unit(truncated.date(), frequency);
            let unit_end = unit_end(truncated.date(), frequency);
            let total_days = (unit_end.date() - unit_start).num_days() + 1;
            let elapsed_days = (truncated.date() - unit_start).num_days() + 1;
            // Extend only once at least half of the unit has elapsed.
            if elapsed_days * 2 >= total_days {
                unit_end.min(untruncated)
            } else {
                truncated
            }
        }
        _ => truncated,
    };

    extended.max(start)
}

/// Advance by whole months, clamping the day-of-month to the target
/// month's length (2025-01-31 + 1 month = 2025-02-28).
pub(crate) fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Signed calendar-month distance ignoring the day-of-month.
pub(crate) fn month_diff(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 * 12 + to.month() as i64) - (from.year() as i64 * 12 + from.month() as i64)
}

/// Whole-month count of an inclusive period, by day-of-month comparison:
/// [2025-01-15, 2025-02-14] is one month, [2025-01-01, 2025-01-31] is one
/// month.
fn whole_month_count(from: NaiveDate, to: NaiveDate) -> i64 {
    let diff = month_diff(from, to);
    let count = if to.day() >= from.day() { diff + 1 } else { diff };
    count.max(1)
}

fn advance_units(date: NaiveDate, frequency: BillingFrequency, units: u32) -> NaiveDate {
    match frequency {
        BillingFrequency::OneTime => date,
        BillingFrequency::Daily => date + Duration::days(units as i64),
        BillingFrequency::Weekly => date + Duration::days(units as i64 * 7),
        BillingFrequency::Monthly => add_months_clamped(date, units),
    }
}

fn start_of_unit(date: NaiveDate, frequency: BillingFrequency) -> NaiveDate {
    match frequency {
        BillingFrequency::Weekly => {
            date - Duration::days(date.weekday().num_days_from_monday() as i64)
        }
        BillingFrequency::Monthly => date.with_day(1).unwrap_or(date),
        _ => date,
    }
}

fn unit_end(date: NaiveDate, frequency: BillingFrequency) -> NaiveDateTime {
    match frequency {
        BillingFrequency::Weekly => {
            let to_sunday = Weekday::Sun.num_days_from_monday() as i64
                - date.weekday().num_days_from_monday() as i64;
            end_of_day(date + Duration::days(to_sunday))
        }
        BillingFrequency::Monthly => end_of_day(end_of_month(date)),
        _ => end_of_day(date),
    }
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    add_months_clamped(first, 1).pred_opt().unwrap_or(date)
}

pub(crate) fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_instant =
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_instant)
}

fn clamp_to(date: NaiveDate, end_date: Option<NaiveDate>) -> NaiveDate {
    match end_date {
        Some(end) if date > end => end,
        _ => date,
    }
}
