//! Calendar arithmetic for the Jalali and Gregorian calendars.
//!
//! Both calendars are bridged through the Julian day number (JDN). The Jalali
//! leap rule follows the astronomical break table in [`JALALI_BREAKS`], so leap
//! years fall in irregular 29/33/37-year cycles rather than a fixed pattern.

use crate::consts::{
    CENTURY_CYCLE, ESFAND, ESFAND_DAYS_LEAP, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    GREGORIAN_DAYS_IN_MONTH, JALALI_BREAKS, JALALI_DAYS_IN_MONTH, JALALI_YEAR_OFFSET,
    LEAP_YEAR_CYCLE, MAX_GREGORIAN_YEAR, MAX_JALALI_YEAR, MAX_MONTH, MIN_DAY, MIN_GREGORIAN_YEAR,
    MIN_JALALI_YEAR, UNIX_EPOCH_JDN,
};
use crate::types::{CalendarSystem, Weekday};
use crate::ConversionError;

/// Where a Jalali year sits in its intercalation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JalaliYearInfo {
    /// Years since the last leap year; 0 means this year is leap.
    leap: i64,
    /// Gregorian year in which this Jalali year begins
    gregorian_year: i64,
    /// March day of that Gregorian year on which Farvardin 1 falls
    march: i64,
}

fn jalali_year_info(year: i64) -> Option<JalaliYearInfo> {
    let first = JALALI_BREAKS[0];
    let last = JALALI_BREAKS[JALALI_BREAKS.len() - 1];
    if year < first || year >= last {
        return None;
    }

    let gregorian_year = year + JALALI_YEAR_OFFSET;
    let mut leap_j = -14;
    let mut jp = first;
    let mut jump = 0;
    for &jm in &JALALI_BREAKS[1..] {
        jump = jm - jp;
        if year < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = year - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(JalaliYearInfo {
        leap,
        gregorian_year,
        march,
    })
}

/// True iff `year` is a 366-day Jalali year (Esfand has 30 days).
/// Years outside `MIN_JALALI_YEAR..=MAX_JALALI_YEAR` are reported as common.
pub fn is_leap_jalali(year: i32) -> bool {
    (MIN_JALALI_YEAR..=MAX_JALALI_YEAR).contains(&year)
        && jalali_year_info(i64::from(year)).is_some_and(|info| info.leap == 0)
}

pub fn jalali_month_length(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == ESFAND && is_leap_jalali(year) {
        ESFAND_DAYS_LEAP
    } else {
        JALALI_DAYS_IN_MONTH[month as usize]
    }
}

pub fn is_valid_jalali_date(year: i64, month: i64, day: i64) -> bool {
    let Ok(year) = i32::try_from(year) else {
        return false;
    };
    let Ok(month) = u8::try_from(month) else {
        return false;
    };
    (MIN_JALALI_YEAR..=MAX_JALALI_YEAR).contains(&year)
        && (1..=MAX_MONTH).contains(&month)
        && (i64::from(MIN_DAY)..=i64::from(jalali_month_length(year, month))).contains(&day)
}

pub const fn is_leap_gregorian(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn gregorian_month_length(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_gregorian(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        GREGORIAN_DAYS_IN_MONTH[month as usize]
    }
}

pub fn is_valid_gregorian_date(year: i64, month: i64, day: i64) -> bool {
    let Ok(year) = i32::try_from(year) else {
        return false;
    };
    let Ok(month) = u8::try_from(month) else {
        return false;
    };
    (MIN_GREGORIAN_YEAR..=MAX_GREGORIAN_YEAR).contains(&year)
        && (1..=MAX_MONTH).contains(&month)
        && (i64::from(MIN_DAY)..=i64::from(gregorian_month_length(year, month))).contains(&day)
}

/// Validity check dispatched on the calendar system
pub fn is_valid_date(calendar: CalendarSystem, year: i64, month: i64, day: i64) -> bool {
    match calendar {
        CalendarSystem::Jalali => is_valid_jalali_date(year, month, day),
        CalendarSystem::Gregorian => is_valid_gregorian_date(year, month, day),
    }
}

/// Julian day number of a proleptic Gregorian date.
pub(crate) fn gregorian_to_jdn(year: i32, month: u8, day: u8) -> i64 {
    let (gy, gm, gd) = (i64::from(year), i64::from(month), i64::from(day));
    let shift = (gm - 8) / 6;
    let d = (gy + shift + 100_100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd - 34_840_408;
    d - (gy + 100_100 + shift) / 100 * 3 / 4 + 752
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn jdn_to_gregorian(jdn: i64) -> (i32, u8, u8) {
    let mut j = 4 * jdn + 139_361_631;
    j += (4 * jdn + 183_187_720) / 146_097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let day = (i % 153) / 5 + 1;
    let month = (i / 153) % 12 + 1;
    let year = j / 1461 - 100_100 + (8 - month) / 6;
    (year as i32, month as u8, day as u8)
}

/// Julian day number of Farvardin 1 of `year`.
#[allow(clippy::cast_possible_truncation)]
fn nowruz_jdn(year: i64) -> Option<i64> {
    let info = jalali_year_info(year)?;
    Some(gregorian_to_jdn(info.gregorian_year as i32, 3, info.march as u8))
}

/// Julian day number of a Jalali date inside the supported range.
pub(crate) fn jalali_to_jdn(year: i32, month: u8, day: u8) -> Option<i64> {
    let (jm, jd) = (i64::from(month), i64::from(day));
    Some(nowruz_jdn(i64::from(year))? + (jm - 1) * 31 - jm / 7 * (jm - 7) + jd - 1)
}

/// Jalali date of a Julian day number. The Jalali year is `gregorian - 621`
/// from Nowruz on and one less before it.
pub(crate) fn jdn_to_jalali(jdn: i64) -> Option<(i32, u8, u8)> {
    let (gregorian_year, _, _) = jdn_to_gregorian(jdn);
    let year = i64::from(gregorian_year) - JALALI_YEAR_OFFSET;
    let (year, nowruz) = match nowruz_jdn(year) {
        Some(nowruz) if jdn >= nowruz => (year, nowruz),
        _ => (year - 1, nowruz_jdn(year - 1)?),
    };

    let k = jdn - nowruz;
    if k <= 185 {
        checked_jalali(year, 1 + k / 31, k % 31 + 1)
    } else {
        let k = k - 186;
        checked_jalali(year, 7 + k / 30, k % 30 + 1)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn checked_jalali(year: i64, month: i64, day: i64) -> Option<(i32, u8, u8)> {
    is_valid_jalali_date(year, month, day).then_some((year as i32, month as u8, day as u8))
}

/// Converts a Jalali date to its Gregorian counterpart.
///
/// # Errors
/// Returns `ConversionError::InvalidCalendarDate` if the input is not a valid Jalali date.
pub fn jalali_to_gregorian(
    year: i32,
    month: u8,
    day: u8,
) -> Result<(i32, u8, u8), ConversionError> {
    let invalid = || ConversionError::InvalidCalendarDate {
        calendar: CalendarSystem::Jalali,
        year: year.into(),
        month: month.into(),
        day: day.into(),
    };
    if !is_valid_jalali_date(year.into(), month.into(), day.into()) {
        return Err(invalid());
    }
    jalali_to_jdn(year, month, day)
        .map(jdn_to_gregorian)
        .ok_or_else(invalid)
}

/// Converts a Gregorian date to its Jalali counterpart.
///
/// # Errors
/// Returns `ConversionError::InvalidCalendarDate` if the input is not a valid Gregorian date
/// or falls outside the supported Jalali years.
pub fn gregorian_to_jalali(
    year: i32,
    month: u8,
    day: u8,
) -> Result<(i32, u8, u8), ConversionError> {
    let invalid = || ConversionError::InvalidCalendarDate {
        calendar: CalendarSystem::Gregorian,
        year: year.into(),
        month: month.into(),
        day: day.into(),
    };
    if !is_valid_gregorian_date(year.into(), month.into(), day.into()) {
        return Err(invalid());
    }
    jdn_to_jalali(gregorian_to_jdn(year, month, day)).ok_or_else(invalid)
}

pub fn weekday_from_jdn(jdn: i64) -> Weekday {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (jdn + 1).rem_euclid(7) as usize;
    Weekday::from_sunday_index(index)
}

/// Days since 1970-01-01 for a JDN
pub const fn jdn_to_unix_days(jdn: i64) -> i64 {
    jdn - UNIX_EPOCH_JDN
}

pub const fn unix_days_to_jdn(days: i64) -> i64 {
    days + UNIX_EPOCH_JDN
}
