use crate::ConversionError;
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// The calendar a `CivilDate` is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    #[display(fmt = "Jalali")]
    Jalali,
    #[display(fmt = "Gregorian")]
    Gregorian,
}

/// Day of the week, Sunday first (index 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Weekday for a Sunday-based index; wraps modulo 7.
    pub const fn from_sunday_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    /// 0 for Sunday through 6 for Saturday
    pub const fn sunday_index(self) -> usize {
        self as usize
    }
}

/// Wall-clock time without a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[display(fmt = "{:02}:{:02}:{:02}", hour, minute, second)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Creates a time of day, validating each component's range
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` naming the first component out of range.
    pub fn new(hour: i64, minute: i64, second: i64) -> Result<Self, ConversionError> {
        let hour = component("hour", hour, 23)?;
        let minute = component("minute", minute, 59)?;
        let second = component("second", second, 59)?;
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Converts a 12-hour clock reading (`h` in 1..=12) to 24-hour time.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` if `hour` is not in 1..=12
    /// or the rest is out of range.
    pub fn from_twelve_hour(
        hour: i64,
        minute: i64,
        second: i64,
        pm: bool,
    ) -> Result<Self, ConversionError> {
        if !(1..=12).contains(&hour) {
            return Err(ConversionError::invalid_field("hour", hour));
        }
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Self::new(hour, minute, second)
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn second(self) -> u8 {
        self.second
    }

    /// Seconds elapsed since midnight
    pub fn seconds_from_midnight(self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

fn component(field: &str, value: i64, max: u8) -> Result<u8, ConversionError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| ConversionError::invalid_field(field, value))
}
