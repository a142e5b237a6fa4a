//! Renders [`CivilDate`]s as text or numbers.
//!
//! Custom formats use moment-style tokens. Tokens prefixed with `j` read the
//! Jalali view of the date, bare tokens read the Gregorian view, and text in
//! `[brackets]` is copied literally. Any other character passes through.

use serde_json::Value;

use crate::lexicon::{
    gregorian_month_name, latin_month_name, number_to_persian_text, persian_month_name,
    persian_weekday, short_weekday_name, to_persian_numerals,
};
use crate::prelude::*;
use crate::{CivilDate, ConversionError, DATE_SEPARATOR, SLASH_SEPARATOR};

/// Named Jalali output shapes offered to the host, each a fixed token pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum JalaliPreset {
    #[display(fmt = "jDD jMMMM")]
    DayMonth,
    #[display(fmt = "jDD jMMMM jYYYY")]
    DayMonthYear,
    #[display(fmt = "jDD jMMMM jYYYY HH:mm:ss")]
    FullDateTime,
    #[display(fmt = "jMMMM jYYYY")]
    MonthYear,
    #[display(fmt = "jYY/jMM/jDD")]
    ShortDate,
    #[display(fmt = "jMM/jYY")]
    ShortMonthYear,
    #[display(fmt = "dddd jDD jMMMM")]
    WeekdayDate,
    #[display(fmt = "jYYYY jMMMM jD")]
    YearMonthDay,
    #[display(fmt = "jYYYY/jMM/jDD")]
    YearMonthDaySlash,
}

impl JalaliPreset {
    pub const ALL: [Self; 9] = [
        Self::DayMonth,
        Self::DayMonthYear,
        Self::FullDateTime,
        Self::MonthYear,
        Self::ShortDate,
        Self::ShortMonthYear,
        Self::WeekdayDate,
        Self::YearMonthDay,
        Self::YearMonthDaySlash,
    ];

    /// Token pattern this preset expands to
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::DayMonth => "jDD jMMMM",
            Self::DayMonthYear => "jDD jMMMM jYYYY",
            Self::FullDateTime => "jDD jMMMM jYYYY HH:mm:ss",
            Self::MonthYear => "jMMMM jYYYY",
            Self::ShortDate => "jYY/jMM/jDD",
            Self::ShortMonthYear => "jMM/jYY",
            Self::WeekdayDate => "dddd jDD jMMMM",
            Self::YearMonthDay => "jYYYY jMMMM jD",
            Self::YearMonthDaySlash => "jYYYY/jMM/jDD",
        }
    }

    /// Looks a preset up by its token pattern
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.pattern() == pattern)
    }
}

/// Named Gregorian output shapes, keyed by their output field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum GregorianPreset {
    #[display(fmt = "isoString")]
    IsoString,
    #[display(fmt = "timestamp")]
    Timestamp,
    #[display(fmt = "timestampSeconds")]
    TimestampSeconds,
    #[display(fmt = "dateString")]
    DateString,
    #[display(fmt = "localizedString")]
    LocalizedString,
    #[display(fmt = "standardString")]
    StandardString,
    #[display(fmt = "utc")]
    Utc,
    #[display(fmt = "time")]
    Time,
}

impl GregorianPreset {
    /// Every preset, in the order the "all formats" bundle emits them
    pub const ALL: [Self; 8] = [
        Self::IsoString,
        Self::Timestamp,
        Self::TimestampSeconds,
        Self::DateString,
        Self::LocalizedString,
        Self::StandardString,
        Self::Utc,
        Self::Time,
    ];

    /// Output field name used in the "all formats" bundle
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::IsoString => "isoString",
            Self::Timestamp => "timestamp",
            Self::TimestampSeconds => "timestampSeconds",
            Self::DateString => "dateString",
            Self::LocalizedString => "localizedString",
            Self::StandardString => "standardString",
            Self::Utc => "utc",
            Self::Time => "time",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.field_name() == name)
    }
}

/// One requested output shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatSpec {
    Jalali(JalaliPreset),
    /// A user-supplied token pattern
    Custom(String),
    /// Weekday, day in words, month name and year, all in Persian
    PersianText,
    Gregorian(GregorianPreset),
}

/// Renders `date` according to `spec`. With `persian_numerals`, every ASCII
/// digit of a textual result becomes a Persian digit; numeric results stay numbers.
///
/// # Errors
/// Returns `ConversionError::InvalidCalendarDate` if a calendar view the format
/// needs lies outside the supported range.
pub fn render(
    date: &CivilDate,
    spec: &FormatSpec,
    persian_numerals: bool,
) -> Result<Value, ConversionError> {
    let text = match spec {
        FormatSpec::Jalali(preset) => format_tokens(date, preset.pattern())?,
        FormatSpec::Custom(pattern) => format_tokens(date, pattern)?,
        FormatSpec::PersianText => persian_text(date)?,
        FormatSpec::Gregorian(preset) => match render_gregorian(date, *preset)? {
            Value::String(s) => s,
            number => return Ok(number),
        },
    };
    Ok(Value::String(numerals(text, persian_numerals)))
}

pub(crate) fn numerals(text: String, persian: bool) -> String {
    if persian { to_persian_numerals(&text) } else { text }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    JalaliYear,
    JalaliYearShort,
    JalaliMonthName,
    JalaliMonthLatin,
    JalaliMonthPadded,
    JalaliMonth,
    JalaliDayPadded,
    JalaliDay,
    Year,
    YearShort,
    MonthName,
    MonthNameShort,
    MonthPadded,
    Month,
    DayPadded,
    Day,
    WeekdayPersian,
    WeekdayShort,
    HourPadded,
    Hour,
    Hour12Padded,
    Hour12,
    MinutePadded,
    Minute,
    SecondPadded,
    Second,
    MeridiemUpper,
    MeridiemLower,
}

/// Longest tokens first so `jMMMM` is never read as `jMM` + `MM`.
const TOKENS: [(&str, Token); 28] = [
    ("jYYYY", Token::JalaliYear),
    ("jYY", Token::JalaliYearShort),
    ("jMMMM", Token::JalaliMonthName),
    ("jMMM", Token::JalaliMonthLatin),
    ("jMM", Token::JalaliMonthPadded),
    ("jM", Token::JalaliMonth),
    ("jDD", Token::JalaliDayPadded),
    ("jD", Token::JalaliDay),
    ("YYYY", Token::Year),
    ("YY", Token::YearShort),
    ("MMMM", Token::MonthName),
    ("MMM", Token::MonthNameShort),
    ("MM", Token::MonthPadded),
    ("M", Token::Month),
    ("DD", Token::DayPadded),
    ("D", Token::Day),
    ("dddd", Token::WeekdayPersian),
    ("ddd", Token::WeekdayShort),
    ("HH", Token::HourPadded),
    ("H", Token::Hour),
    ("hh", Token::Hour12Padded),
    ("h", Token::Hour12),
    ("mm", Token::MinutePadded),
    ("m", Token::Minute),
    ("ss", Token::SecondPadded),
    ("s", Token::Second),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
];

/// Expands a token pattern left to right.
///
/// # Errors
/// Returns `ConversionError::InvalidCalendarDate` if a token needs a calendar
/// view that `date` cannot be converted to.
pub fn format_tokens(date: &CivilDate, pattern: &str) -> Result<String, ConversionError> {
    let jalali = date.to_jalali();
    let gregorian = date.to_gregorian();
    let time = date.time();
    let hour12 = match time.hour() % 12 {
        0 => 12,
        h => h,
    };
    let pm = time.hour() >= 12;

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        let Some((text, token)) = TOKENS.iter().find(|(text, _)| rest.starts_with(text)) else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        };
        rest = &rest[text.len()..];

        let rendered = match token {
            Token::JalaliYear
            | Token::JalaliYearShort
            | Token::JalaliMonthName
            | Token::JalaliMonthLatin
            | Token::JalaliMonthPadded
            | Token::JalaliMonth
            | Token::JalaliDayPadded
            | Token::JalaliDay => {
                let view = jalali.as_ref().map_err(Clone::clone)?;
                date_token(view, *token)
            }
            Token::Year
            | Token::YearShort
            | Token::MonthName
            | Token::MonthNameShort
            | Token::MonthPadded
            | Token::Month
            | Token::DayPadded
            | Token::Day => {
                let view = gregorian.as_ref().map_err(Clone::clone)?;
                date_token(view, *token)
            }
            Token::WeekdayPersian => persian_weekday(date.weekday()).to_owned(),
            Token::WeekdayShort => short_weekday_name(date.weekday()).to_owned(),
            Token::HourPadded => format!("{:02}", time.hour()),
            Token::Hour => time.hour().to_string(),
            Token::Hour12Padded => format!("{hour12:02}"),
            Token::Hour12 => hour12.to_string(),
            Token::MinutePadded => format!("{:02}", time.minute()),
            Token::Minute => time.minute().to_string(),
            Token::SecondPadded => format!("{:02}", time.second()),
            Token::Second => time.second().to_string(),
            Token::MeridiemUpper => (if pm { "PM" } else { "AM" }).to_owned(),
            Token::MeridiemLower => (if pm { "pm" } else { "am" }).to_owned(),
        };
        out.push_str(&rendered);
    }
    Ok(out)
}

fn date_token(view: &CivilDate, token: Token) -> String {
    let (year, month, day) = view.ymd();
    match token {
        Token::JalaliYear | Token::Year => format!("{year:04}"),
        Token::JalaliYearShort | Token::YearShort => format!("{:02}", year.rem_euclid(100)),
        Token::JalaliMonthName => persian_month_name(month).unwrap_or_default().to_owned(),
        Token::JalaliMonthLatin => latin_month_name(month).unwrap_or_default().to_owned(),
        Token::MonthName => gregorian_month_name(month).unwrap_or_default().to_owned(),
        Token::MonthNameShort => gregorian_month_name(month)
            .map(|name| name[..3].to_owned())
            .unwrap_or_default(),
        Token::JalaliMonthPadded | Token::MonthPadded => format!("{month:02}"),
        Token::JalaliDayPadded | Token::DayPadded => format!("{day:02}"),
        Token::JalaliDay | Token::Day => day.to_string(),
        _ => month.to_string(),
    }
}

/// `<weekday> <day in words> <month> <year>` in Persian, e.g. `جمعه بیست و پنج اسفند 1402`.
/// The year keeps ASCII digits; [`render`] converts it when Persian numerals are requested.
///
/// # Errors
/// Returns `ConversionError::InvalidCalendarDate` if the date has no Jalali view.
pub fn persian_text(date: &CivilDate) -> Result<String, ConversionError> {
    let jalali = date.to_jalali()?;
    Ok(format!(
        "{} {} {} {}",
        persian_weekday(jalali.weekday()),
        number_to_persian_text(jalali.day().into()),
        persian_month_name(jalali.month()).unwrap_or_default(),
        jalali.year()
    ))
}

/// Renders one Gregorian preset. Timestamps are numbers, everything else a string.
/// Wall-clock time is read as UTC.
///
/// # Errors
/// Returns `ConversionError::InvalidCalendarDate` if the date has no Gregorian view.
pub fn render_gregorian(
    date: &CivilDate,
    preset: GregorianPreset,
) -> Result<Value, ConversionError> {
    let g = date.to_gregorian()?;
    let (year, month, day) = g.ymd();
    let time = g.time();
    let weekday = short_weekday_name(g.weekday());
    let month_short = gregorian_month_name(month).map_or("", |name| &name[..3]);

    let value = match preset {
        GregorianPreset::IsoString => {
            let sep = DATE_SEPARATOR;
            Value::from(format!("{year:04}{sep}{month:02}{sep}{day:02}T{time}.000Z"))
        }
        GregorianPreset::Timestamp => Value::from(g.unix_millis()),
        GregorianPreset::TimestampSeconds => Value::from(g.unix_seconds()),
        GregorianPreset::DateString => {
            Value::from(format!("{weekday} {month_short} {day:02} {year:04}"))
        }
        GregorianPreset::LocalizedString => {
            let hour12 = match time.hour() % 12 {
                0 => 12,
                h => h,
            };
            let meridiem = if time.hour() >= 12 { "PM" } else { "AM" };
            Value::from(format!(
                "{month}/{day}/{year}, {hour12}:{:02}:{:02} {meridiem}",
                time.minute(),
                time.second()
            ))
        }
        GregorianPreset::StandardString => {
            let sep = SLASH_SEPARATOR;
            Value::from(format!("{year:04}{sep}{month:02}{sep}{day:02}"))
        }
        GregorianPreset::Utc => Value::from(format!(
            "{weekday}, {day:02} {month_short} {year:04} {time} GMT"
        )),
        GregorianPreset::Time => {
            Value::from(format!("{time} GMT+0000 (Coordinated Universal Time)"))
        }
    };
    Ok(value)
}

/// Every Gregorian preset as `(field name, value)` pairs.
///
/// # Errors
/// See [`render_gregorian`].
pub fn render_all_gregorian(
    date: &CivilDate,
) -> Result<Vec<(&'static str, Value)>, ConversionError> {
    GregorianPreset::ALL
        .into_iter()
        .map(|preset| Ok((preset.field_name(), render_gregorian(date, preset)?)))
        .collect()
}
