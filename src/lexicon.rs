//! Read-only lookup tables for Persian rendering and English name parsing.

use std::borrow::Cow;

use crate::types::Weekday;

/// Persian digit glyphs, indexed by value
pub const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Arabic-Indic digit glyphs, indexed by value
pub const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

pub const PERSIAN_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Jalali month names in Latin script
pub const JALALI_MONTHS_LATIN: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

/// Persian weekday names, Sunday first
pub const PERSIAN_WEEKDAYS: [&str; 7] = [
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنج‌شنبه",
    "جمعه",
    "شنبه",
];

/// Persian number words for 1..=31 (index 0 unused)
pub const PERSIAN_NUMBER_WORDS: [&str; 32] = [
    "",
    "یک",
    "دو",
    "سه",
    "چهار",
    "پنج",
    "شش",
    "هفت",
    "هشت",
    "نه",
    "ده",
    "یازده",
    "دوازده",
    "سیزده",
    "چهارده",
    "پانزده",
    "شانزده",
    "هفده",
    "هجده",
    "نوزده",
    "بیست",
    "بیست و یک",
    "بیست و دو",
    "بیست و سه",
    "بیست و چهار",
    "بیست و پنج",
    "بیست و شش",
    "بیست و هفت",
    "بیست و هشت",
    "بیست و نه",
    "سی",
    "سی و یک",
];

pub const GREGORIAN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names, Sunday first
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Replaces every ASCII digit with its Persian glyph; all other characters pass through.
pub fn to_persian_numerals(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => PERSIAN_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// Replaces Persian and Arabic-Indic digits with ASCII digits.
/// Borrows the input when there is nothing to replace.
pub fn to_ascii_digits(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| native_digit_value(c).is_some()) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .map(|c| match native_digit_value(c) {
                Some(d) => char::from(b'0' + d),
                None => c,
            })
            .collect(),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn native_digit_value(c: char) -> Option<u8> {
    PERSIAN_DIGITS
        .iter()
        .position(|&d| d == c)
        .or_else(|| ARABIC_INDIC_DIGITS.iter().position(|&d| d == c))
        .map(|i| i as u8)
}

pub fn persian_month_name(month: u8) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| PERSIAN_MONTHS.get(usize::from(i)))
        .copied()
}

pub fn latin_month_name(month: u8) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| JALALI_MONTHS_LATIN.get(usize::from(i)))
        .copied()
}

pub fn gregorian_month_name(month: u8) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| GREGORIAN_MONTHS.get(usize::from(i)))
        .copied()
}

pub const fn persian_weekday(weekday: Weekday) -> &'static str {
    PERSIAN_WEEKDAYS[weekday.sunday_index()]
}

pub const fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS[weekday.sunday_index()]
}

/// Three-letter English weekday, e.g. `Fri`
pub fn short_weekday_name(weekday: Weekday) -> &'static str {
    &weekday_name(weekday)[..3]
}

/// Persian words for 1..=31; anything else falls back to its digit string.
pub fn number_to_persian_text(n: u32) -> Cow<'static, str> {
    match usize::try_from(n) {
        Ok(i @ 1..=31) => Cow::Borrowed(PERSIAN_NUMBER_WORDS[i]),
        _ => Cow::Owned(n.to_string()),
    }
}

/// Gregorian month number for an English name or its three-letter abbreviation,
/// case-insensitive.
#[allow(clippy::cast_possible_truncation)]
pub fn gregorian_month_from_name(name: &str) -> Option<u8> {
    let name = name.to_ascii_lowercase();
    GREGORIAN_MONTHS
        .iter()
        .position(|m| {
            let m = m.to_ascii_lowercase();
            m == name || (name.len() == 3 && m.starts_with(&name))
        })
        .map(|i| i as u8 + 1)
}
