pub mod calendar;
mod config;
mod consts;
mod convert;
mod error;
pub mod format;
pub mod lexicon;
pub mod parse;
mod prelude;
mod types;

pub use config::{AdditionalOptions, FieldValue, FromJalaliParams, InputType, ToJalaliParams};
pub use consts::*;
pub use convert::{
    ConversionRequest, ConversionResult, DateInput, Direction, EnrichmentOptions, FailurePolicy,
    OutputSpec, Record, SeparateFields, convert, run_batch,
};
pub use error::{BatchError, ConversionError};
pub use format::{FormatSpec, GregorianPreset, JalaliPreset};
pub use types::{CalendarSystem, TimeOfDay, Weekday};

use crate::prelude::*;
use calendar::{
    gregorian_to_jdn, is_valid_date, jalali_to_jdn, jdn_to_gregorian, jdn_to_jalali,
    jdn_to_unix_days, unix_days_to_jdn, weekday_from_jdn,
};
use serde::Serialize;

/// A validated calendar date plus wall-clock time.
/// Conversions produce a new value; a `CivilDate` is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[display(fmt = "{:04}/{:02}/{:02} {}", year, month, day, time)]
pub struct CivilDate {
    calendar: CalendarSystem,
    year: i32,
    month: u8,
    day: u8,
    time: TimeOfDay,
}

impl CivilDate {
    /// Creates a date at midnight, validating the day against the month length
    /// of the given calendar.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidCalendarDate` if the triple is not a day of `calendar`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(
        calendar: CalendarSystem,
        year: i64,
        month: i64,
        day: i64,
    ) -> Result<Self, ConversionError> {
        if !is_valid_date(calendar, year, month, day) {
            return Err(ConversionError::InvalidCalendarDate {
                calendar,
                year,
                month,
                day,
            });
        }
        // In range after validation
        Ok(Self {
            calendar,
            year: year as i32,
            month: month as u8,
            day: day as u8,
            time: TimeOfDay::MIDNIGHT,
        })
    }

    /// Creates a Jalali date at midnight
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidCalendarDate` for an invalid Jalali date.
    pub fn jalali(year: i64, month: i64, day: i64) -> Result<Self, ConversionError> {
        Self::new(CalendarSystem::Jalali, year, month, day)
    }

    /// Creates a Gregorian date at midnight
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidCalendarDate` for an invalid Gregorian date.
    pub fn gregorian(year: i64, month: i64, day: i64) -> Result<Self, ConversionError> {
        Self::new(CalendarSystem::Gregorian, year, month, day)
    }

    /// Returns the same date at `time`
    #[must_use]
    pub const fn with_time(self, time: TimeOfDay) -> Self {
        Self { time, ..self }
    }

    pub const fn calendar(&self) -> CalendarSystem {
        self.calendar
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns the date as a `(year, month, day)` tuple
    pub const fn ymd(&self) -> (i32, u8, u8) {
        (self.year, self.month, self.day)
    }

    /// Julian day number of the date
    pub fn jdn(&self) -> i64 {
        match self.calendar {
            CalendarSystem::Gregorian => gregorian_to_jdn(self.year, self.month, self.day),
            // Validated on construction, so the year is inside the break table
            CalendarSystem::Jalali => {
                jalali_to_jdn(self.year, self.month, self.day).unwrap_or_default()
            }
        }
    }

    pub fn weekday(&self) -> Weekday {
        weekday_from_jdn(self.jdn())
    }

    /// Re-expresses the same day and time in `target`.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidCalendarDate` when the day falls outside
    /// the range the target calendar supports.
    pub fn to_calendar(&self, target: CalendarSystem) -> Result<Self, ConversionError> {
        if target == self.calendar {
            return Ok(*self);
        }
        let invalid = || ConversionError::InvalidCalendarDate {
            calendar: self.calendar,
            year: self.year.into(),
            month: self.month.into(),
            day: self.day.into(),
        };
        let jdn = self.jdn();
        let (year, month, day) = match target {
            CalendarSystem::Gregorian => Some(jdn_to_gregorian(jdn)),
            CalendarSystem::Jalali => jdn_to_jalali(jdn),
        }
        .ok_or_else(invalid)?;
        Self::new(target, year.into(), month.into(), day.into())
            .map(|date| date.with_time(self.time))
            .map_err(|_| invalid())
    }

    /// Same day in the Jalali calendar
    ///
    /// # Errors
    /// See [`CivilDate::to_calendar`].
    pub fn to_jalali(&self) -> Result<Self, ConversionError> {
        self.to_calendar(CalendarSystem::Jalali)
    }

    /// Same day in the Gregorian calendar
    ///
    /// # Errors
    /// See [`CivilDate::to_calendar`].
    pub fn to_gregorian(&self) -> Result<Self, ConversionError> {
        self.to_calendar(CalendarSystem::Gregorian)
    }

    /// Gregorian date and time for a Unix timestamp in seconds, read as UTC wall-clock time.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidCalendarDate` if the timestamp lands outside
    /// the supported Gregorian years.
    pub fn from_unix_seconds(seconds: i64) -> Result<Self, ConversionError> {
        let days = seconds.div_euclid(SECONDS_PER_DAY);
        let secs = seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = jdn_to_gregorian(unix_days_to_jdn(days));
        let time = TimeOfDay::new(secs / 3_600, secs % 3_600 / 60, secs % 60)?;
        Ok(Self::gregorian(year.into(), month.into(), day.into())?.with_time(time))
    }

    /// Seconds since the Unix epoch, reading the wall-clock time as UTC
    pub fn unix_seconds(&self) -> i64 {
        jdn_to_unix_days(self.jdn()) * SECONDS_PER_DAY + self.time.seconds_from_midnight()
    }

    /// Milliseconds since the Unix epoch, reading the wall-clock time as UTC
    pub fn unix_millis(&self) -> i64 {
        self.unix_seconds() * MILLIS_PER_SECOND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_per_calendar() {
        assert!(CivilDate::jalali(1403, 12, 30).is_ok());
        assert!(matches!(
            CivilDate::jalali(1402, 12, 30),
            Err(ConversionError::InvalidCalendarDate { day: 30, .. })
        ));
        assert!(matches!(
            CivilDate::jalali(1402, 13, 1),
            Err(ConversionError::InvalidCalendarDate { month: 13, .. })
        ));
        // Jalali month 2 has 31 days, Gregorian February never does
        assert!(CivilDate::jalali(1402, 2, 31).is_ok());
        assert!(CivilDate::gregorian(2024, 2, 31).is_err());
        assert!(CivilDate::gregorian(2024, 0, 1).is_err());
    }

    #[test]
    fn test_display() {
        let date = CivilDate::jalali(1402, 1, 5)
            .unwrap()
            .with_time(TimeOfDay::new(9, 5, 0).unwrap());
        assert_eq!(date.to_string(), "1402/01/05 09:05:00");
    }

    #[test]
    fn test_to_calendar_keeps_time() {
        let time = TimeOfDay::new(14, 30, 0).unwrap();
        let jalali = CivilDate::jalali(1402, 12, 25).unwrap().with_time(time);
        let gregorian = jalali.to_gregorian().unwrap();
        assert_eq!(gregorian.calendar(), CalendarSystem::Gregorian);
        assert_eq!(gregorian.ymd(), (2024, 3, 15));
        assert_eq!(gregorian.time(), time);
        assert_eq!(gregorian.to_jalali().unwrap(), jalali);
        assert_eq!(jalali.to_jalali().unwrap(), jalali);
    }

    #[test]
    fn test_to_jalali_out_of_range() {
        let early = CivilDate::gregorian(500, 1, 1).unwrap();
        assert!(matches!(
            early.to_jalali(),
            Err(ConversionError::InvalidCalendarDate {
                calendar: CalendarSystem::Gregorian,
                year: 500,
                ..
            })
        ));
    }

    #[test]
    fn test_weekday_is_calendar_independent() {
        let jalali = CivilDate::jalali(1402, 12, 25).unwrap();
        assert_eq!(jalali.weekday(), Weekday::Friday);
        assert_eq!(jalali.to_gregorian().unwrap().weekday(), Weekday::Friday);
    }

    #[test]
    fn test_unix_timestamps() {
        let date = CivilDate::gregorian(2024, 3, 15).unwrap();
        assert_eq!(date.unix_seconds(), 1_710_460_800);
        assert_eq!(date.unix_millis(), 1_710_460_800_000);

        let parsed = CivilDate::from_unix_seconds(1_710_513_000).unwrap();
        assert_eq!(parsed.ymd(), (2024, 3, 15));
        assert_eq!(parsed.time(), TimeOfDay::new(14, 30, 0).unwrap());
        assert_eq!(parsed.unix_seconds(), 1_710_513_000);
    }

    #[test]
    fn test_from_unix_seconds_epoch_and_negative() {
        let epoch = CivilDate::from_unix_seconds(0).unwrap();
        assert_eq!(epoch.ymd(), (1970, 1, 1));
        let before = CivilDate::from_unix_seconds(-1).unwrap();
        assert_eq!(before.ymd(), (1969, 12, 31));
        assert_eq!(before.time().to_string(), "23:59:59");
    }

    #[test]
    fn test_serialize() {
        let date = CivilDate::jalali(1402, 12, 25).unwrap();
        let json = serde_json::to_value(date).unwrap();
        assert_eq!(json["calendar"], "jalali");
        assert_eq!(json["year"], 1402);
        assert_eq!(json["time"]["hour"], 0);
    }
}
