/// Earliest supported Jalali year (inclusive)
pub const MIN_JALALI_YEAR: i32 = 1;
/// Latest supported Jalali year (inclusive), bounded by the break table
pub const MAX_JALALI_YEAR: i32 = 3177;

/// Earliest Gregorian year a `CivilDate` may carry
pub const MIN_GREGORIAN_YEAR: i32 = 1;
/// Latest Gregorian year a `CivilDate` may carry
pub const MAX_GREGORIAN_YEAR: i32 = 9999;

/// Months per year in both calendars
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for Esfand
pub const ESFAND: u8 = 12;
/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in Esfand for Jalali leap years
pub const ESFAND_DAYS_LEAP: u8 = 30;
/// Days in February for Gregorian leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Jalali month lengths (index 0 unused). Esfand shows the common-year length.
pub const JALALI_DAYS_IN_MONTH: [u8; 13] = [0, 31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

/// Gregorian month lengths (index 0 unused). February shows the common-year length.
pub const GREGORIAN_DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Jalali years at which the 33-year intercalation pattern restarts
/// (Borkowski's table of astronomical breaks).
pub(crate) const JALALI_BREAKS: [i64; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Gregorian year in which Jalali year 0 starts, minus one
pub(crate) const JALALI_YEAR_OFFSET: i64 = 621;

/// Julian day number of 1970-01-01
pub const UNIX_EPOCH_JDN: i64 = 2_440_588;

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const MILLIS_PER_SECOND: i64 = 1_000;

/// Separator in `YYYY/MM/DD` renderings
pub const SLASH_SEPARATOR: char = '/';
/// Separator in ISO 8601 dates
pub const DATE_SEPARATOR: char = '-';
