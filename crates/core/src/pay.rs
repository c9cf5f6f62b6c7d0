//! Fixed-rate pay arithmetic. All figures are exact decimals; hours are
//! derived from minute counts so the division below always terminates.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

/// Flat pay for any reported day, in GBP.
pub fn daily_rate() -> Decimal {
    Decimal::new(32_011, 2)
}

/// Hourly rate applied to time past the overtime boundary.
pub fn overtime_rate() -> Decimal {
    Decimal::new(6_156, 2)
}

/// Nominal end of the working day. Overtime is anchored here by end time
/// alone, independent of when the shift started.
const OVERTIME_BOUNDARY_MINUTES: i64 = 16 * 60;

/// Shifts longer than this carry one unpaid lunch hour.
const LUNCH_THRESHOLD_HOURS: i64 = 6;

const MINUTES_PER_DAY: i64 = 24 * 60;

pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("in-range literal time")
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Elapsed hours between two wall-clock times, wrapping past midnight when
/// the end precedes the start (overnight shifts).
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> Decimal {
    let start_minutes = minute_of_day(start);
    let mut end_minutes = minute_of_day(end);
    if end_minutes < start_minutes {
        end_minutes += MINUTES_PER_DAY;
    }
    minutes_to_hours(end_minutes - start_minutes)
}

pub fn paid_hours(total_hours: Decimal) -> Decimal {
    if total_hours > Decimal::from(LUNCH_THRESHOLD_HOURS) {
        total_hours - Decimal::ONE
    } else {
        total_hours
    }
}

pub fn overtime_hours(end: NaiveTime) -> Decimal {
    let past_boundary = minute_of_day(end) - OVERTIME_BOUNDARY_MINUTES;
    if past_boundary > 0 {
        minutes_to_hours(past_boundary)
    } else {
        Decimal::ZERO
    }
}

pub fn weekday_pay(overtime_hours: Decimal) -> Decimal {
    daily_rate() + overtime_hours * overtime_rate()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        daily_rate, hm, hours_between, overtime_hours, overtime_rate, paid_hours, weekday_pay,
    };

    #[test]
    fn hours_between_is_exact_for_same_day_ranges() {
        assert_eq!(hours_between(hm(7, 30), hm(16, 0)), Decimal::new(85, 1));
        assert_eq!(hours_between(hm(9, 0), hm(9, 0)), Decimal::ZERO);
        assert_eq!(hours_between(hm(8, 15), hm(12, 45)), Decimal::new(45, 1));
    }

    #[test]
    fn hours_between_wraps_past_midnight() {
        assert_eq!(hours_between(hm(22, 0), hm(6, 0)), Decimal::from(8));
        assert_eq!(hours_between(hm(23, 30), hm(0, 30)), Decimal::ONE);
    }

    #[test]
    fn lunch_is_deducted_only_past_six_hours() {
        assert_eq!(paid_hours(Decimal::from(6)), Decimal::from(6));
        assert_eq!(paid_hours(Decimal::new(65, 1)), Decimal::new(55, 1));
        assert_eq!(paid_hours(Decimal::new(45, 1)), Decimal::new(45, 1));
    }

    #[test]
    fn overtime_is_anchored_to_the_four_pm_boundary() {
        assert_eq!(overtime_hours(hm(16, 0)), Decimal::ZERO);
        assert_eq!(overtime_hours(hm(17, 0)), Decimal::ONE);
        assert_eq!(overtime_hours(hm(16, 30)), Decimal::new(5, 1));
        assert_eq!(overtime_hours(hm(13, 0)), Decimal::ZERO);
    }

    #[test]
    fn late_start_still_accrues_overtime_past_the_boundary() {
        // A 10:00-17:00 day is only seven hours worked, yet the hour past
        // 16:00 is still billed as overtime.
        assert_eq!(overtime_hours(hm(17, 0)), Decimal::ONE);
        assert_eq!(hours_between(hm(10, 0), hm(17, 0)), Decimal::from(7));
    }

    #[test]
    fn weekday_pay_scales_exactly_with_overtime() {
        assert_eq!(weekday_pay(Decimal::ZERO), Decimal::new(32_011, 2));
        assert_eq!(weekday_pay(Decimal::ONE), Decimal::new(38_167, 2));
        assert_eq!(
            weekday_pay(Decimal::new(15, 1)),
            daily_rate() + Decimal::new(15, 1) * overtime_rate()
        );
    }
}
