use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pay;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    Weekday,
    Weekend,
    WeekdayStandard,
}

/// One reported block of worked time for a single day, with the pay figures
/// already computed from the fixed rate constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub category: ShiftCategory,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_hours: Decimal,
    pub paid_hours: Decimal,
    pub overtime_hours: Decimal,
    pub total_pay: Decimal,
}

impl ShiftRecord {
    /// The fixed 07:30-16:00 day: 8.5 hours on the clock, 7.5 paid after the
    /// lunch deduction, no overtime.
    pub fn standard_day(date: NaiveDate) -> Self {
        Self {
            category: ShiftCategory::WeekdayStandard,
            date,
            start_time: pay::hm(7, 30),
            end_time: pay::hm(16, 0),
            total_hours: Decimal::new(85, 1),
            paid_hours: Decimal::new(75, 1),
            overtime_hours: Decimal::ZERO,
            total_pay: pay::daily_rate(),
        }
    }

    /// The fixed 08:00-13:00 weekend shift, paid the flat daily rate.
    pub fn weekend(date: NaiveDate) -> Self {
        let hours = Decimal::new(50, 1);
        Self {
            category: ShiftCategory::Weekend,
            date,
            start_time: pay::hm(8, 0),
            end_time: pay::hm(13, 0),
            total_hours: hours,
            paid_hours: hours,
            overtime_hours: Decimal::ZERO,
            total_pay: pay::daily_rate(),
        }
    }

    /// A weekday shift computed from an explicit time range.
    pub fn weekday(start_time: NaiveTime, end_time: NaiveTime, date: NaiveDate) -> Self {
        let total_hours = pay::hours_between(start_time, end_time);
        let overtime_hours = pay::overtime_hours(end_time);
        Self {
            category: ShiftCategory::Weekday,
            date,
            start_time,
            end_time,
            total_hours,
            paid_hours: pay::paid_hours(total_hours),
            overtime_hours,
            total_pay: pay::weekday_pay(overtime_hours),
        }
    }

    pub fn overtime_pay(&self) -> Decimal {
        self.overtime_hours * pay::overtime_rate()
    }

    pub fn has_lunch_deduction(&self) -> bool {
        self.paid_hours < self.total_hours
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::pay;

    use super::{ShiftCategory, ShiftRecord};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
    }

    #[test]
    fn standard_day_matches_fixed_figures() {
        let record = ShiftRecord::standard_day(date());

        assert_eq!(record.category, ShiftCategory::WeekdayStandard);
        assert_eq!(record.total_hours, Decimal::new(85, 1));
        assert_eq!(record.paid_hours, Decimal::new(75, 1));
        assert_eq!(record.overtime_hours, Decimal::ZERO);
        assert_eq!(record.total_pay, pay::daily_rate());
        assert!(record.has_lunch_deduction());
    }

    #[test]
    fn weekend_is_flat_rate_with_no_deduction() {
        let record = ShiftRecord::weekend(date());

        assert_eq!(record.category, ShiftCategory::Weekend);
        assert_eq!(record.total_hours, record.paid_hours);
        assert_eq!(record.total_pay, pay::daily_rate());
        assert!(!record.has_lunch_deduction());
    }

    #[test]
    fn weekday_invariants_hold_for_overtime_shift() {
        let record = ShiftRecord::weekday(pay::hm(7, 30), pay::hm(17, 0), date());

        assert!(record.overtime_hours >= Decimal::ZERO);
        assert!(record.total_hours > Decimal::ZERO);
        assert!(record.paid_hours <= record.total_hours);
        assert_eq!(
            record.total_pay,
            pay::daily_rate() + record.overtime_hours * pay::overtime_rate()
        );
    }
}
