//! Calendar arithmetic primitives
//!
//! Local-calendar arithmetic for the date blocks: month addition with
//! end-of-month clamping, year addition with native rollover, direct field
//! increments, and a normalizing absolute-date constructor.
//!
//! Every function is total: inputs that would land outside chrono's
//! representable range return the base date unchanged instead of panicking.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Apply a time delta, saturating to the input at the representable-range
/// edge.
fn shift(date: NaiveDateTime, delta: Option<TimeDelta>) -> NaiveDateTime {
    delta
        .and_then(|d| date.checked_add_signed(d))
        .unwrap_or(date)
}

/// Number of days in the given month.
///
/// Derived from the calendar itself: the day before the first of the
/// following month is the last day of this one. Leap-year February needs no
/// special case.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1), 1)
    } else {
        (Some(year), month + 1)
    };
    next_year
        .and_then(|y| NaiveDate::from_ymd_opt(y, next_month, 1))
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Advance a date by a signed number of months with end-of-month clamping.
///
/// The target year/month are the input's advanced by `amount`, modulo 12
/// with year carry (negative amounts borrow across year boundaries). The
/// day-of-month becomes `min(day, days_in_month(target))`; time of day is
/// preserved unchanged.
///
/// # Examples
/// ```
/// use automation_blocks::categories::date::calendar::add_months;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap().and_hms_opt(8, 30, 0).unwrap();
/// let shifted = add_months(d, -2);
/// assert_eq!(shifted.to_string(), "2024-11-30 08:30:00");
/// ```
pub fn add_months(date: NaiveDateTime, amount: i32) -> NaiveDateTime {
    let months = date.month0() as i64 + amount as i64;
    let year = date.year() as i64 + months.div_euclid(12);
    let month = (months.rem_euclid(12) + 1) as u32;

    let Ok(year) = i32::try_from(year) else {
        return date;
    };
    let day = date.day().min(days_in_month(year, month));
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(target) => NaiveDateTime::new(target, date.time()),
        None => date,
    }
}

/// Advance a date by a signed number of years as a direct field increment.
///
/// No clamping: Feb 29 plus one year rolls over to Mar 1 on non-leap years,
/// matching native date-field-increment behavior.
pub fn add_years(date: NaiveDateTime, amount: i32) -> NaiveDateTime {
    let Some(year) = date.year().checked_add(amount) else {
        return date;
    };
    let Some(first) = NaiveDate::from_ymd_opt(year, date.month(), 1) else {
        return date;
    };
    shift(
        NaiveDateTime::new(first, date.time()),
        TimeDelta::try_days(date.day() as i64 - 1),
    )
}

/// Advance a date by a signed number of days with calendar rollover
pub fn add_days(date: NaiveDateTime, amount: i64) -> NaiveDateTime {
    shift(date, TimeDelta::try_days(amount))
}

/// Advance a date by a signed number of hours
pub fn add_hours(date: NaiveDateTime, amount: i64) -> NaiveDateTime {
    shift(date, TimeDelta::try_hours(amount))
}

/// Advance a date by a signed number of minutes
pub fn add_minutes(date: NaiveDateTime, amount: i64) -> NaiveDateTime {
    shift(date, TimeDelta::try_minutes(amount))
}

/// Advance a date by a signed number of seconds
pub fn add_seconds(date: NaiveDateTime, amount: i64) -> NaiveDateTime {
    shift(date, TimeDelta::try_seconds(amount))
}

/// Advance a date by a signed number of milliseconds
pub fn add_milliseconds(date: NaiveDateTime, amount: i64) -> NaiveDateTime {
    shift(date, TimeDelta::try_milliseconds(amount))
}

/// Construct an absolute date from components, normalizing out-of-range
/// values with full carry.
///
/// `month0` is 0-indexed and carries into the year (`12` → January of the
/// following year, `-1` → December of the previous). The remaining
/// components apply as offsets from the first of that month, so day `0` is
/// the last day of the previous month, day `32` rolls into the next month,
/// and hour `25` rolls into the next day, per native date-construction rules.
pub fn build_date(
    year: i64,
    month0: i64,
    day: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
) -> NaiveDateTime {
    let year = year.checked_add(month0.div_euclid(12)).unwrap_or(year);
    let month = (month0.rem_euclid(12) + 1) as u32;
    let first = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
        .unwrap_or(if year >= 0 { NaiveDate::MAX } else { NaiveDate::MIN });

    let mut date = first.and_time(NaiveTime::MIN);
    date = shift(date, TimeDelta::try_days(day - 1));
    date = shift(date, TimeDelta::try_hours(hours));
    date = shift(date, TimeDelta::try_minutes(minutes));
    date = shift(date, TimeDelta::try_seconds(seconds));
    shift(date, TimeDelta::try_milliseconds(milliseconds))
}
