//! Turns raw strings and separate fields into validated [`CivilDate`]s.
//!
//! Gregorian strings are tried against [`gregorian_patterns`] in order. The first
//! matcher whose regex matches and whose builder yields a real calendar day wins,
//! so ambiguous inputs like `03/04/2024` resolve day-first.

use std::sync::LazyLock;

use log::{debug, trace};
use regex::{Captures, Regex};

use crate::lexicon::{gregorian_month_from_name, to_ascii_digits};
use crate::prelude::*;
use crate::{CivilDate, ConversionError, TimeOfDay};

/// Which accepted input shape a string was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PatternKind {
    #[display(fmt = "YYYY-MM-DD")]
    IsoDate,
    #[display(fmt = "YYYY/MM/DD")]
    YearFirstSlash,
    #[display(fmt = "DD-MM-YYYY")]
    DayFirstDash,
    #[display(fmt = "DD/MM/YYYY")]
    DayFirstSlash,
    #[display(fmt = "MM-DD-YYYY")]
    MonthFirstDash,
    #[display(fmt = "MM/DD/YYYY")]
    MonthFirstSlash,
    #[display(fmt = "Unix timestamp")]
    UnixTimestamp,
    #[display(fmt = "Month Day Year")]
    FreeText,
}

type Builder = fn(&Captures<'_>) -> Result<CivilDate, ConversionError>;

/// One entry of the ordered pattern list.
pub struct Matcher {
    pub kind: PatternKind,
    regex: Regex,
    build: Builder,
}

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern literals are valid regexes")
}

impl Matcher {
    fn new(kind: PatternKind, pattern: &str, build: Builder) -> Self {
        Self {
            kind,
            regex: compile(pattern),
            build,
        }
    }

    /// Builds a date if the input matches this pattern syntactically.
    /// `None` means no syntactic match; `Some(Err(..))` means it matched but
    /// did not name a real day.
    pub fn try_match(&self, input: &str) -> Option<Result<CivilDate, ConversionError>> {
        self.regex.captures(input).map(|caps| (self.build)(&caps))
    }
}

/// Optional ` HH:mm[:ss]` suffix; ISO also allows `T`, fractions and `Z`.
const TIME_SUFFIX: &str = r"(?:\s+(?P<H>\d{1,2}):(?P<M>\d{2})(?::(?P<S>\d{2}))?)?$";
const ISO_TIME_SUFFIX: &str =
    r"(?:[T ](?P<H>\d{1,2}):(?P<M>\d{2})(?::(?P<S>\d{2})(?:\.\d{1,9})?)?)?Z?$";

static GREGORIAN_PATTERNS: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    let numeric = |kind, date: &str, time: &str| {
        Matcher::new(kind, &format!("^{date}{time}"), numeric_date as Builder)
    };
    vec![
        numeric(
            PatternKind::IsoDate,
            r"(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})",
            ISO_TIME_SUFFIX,
        ),
        numeric(
            PatternKind::YearFirstSlash,
            r"(?P<y>\d{4})/(?P<m>\d{1,2})/(?P<d>\d{1,2})",
            TIME_SUFFIX,
        ),
        numeric(
            PatternKind::DayFirstDash,
            r"(?P<d>\d{1,2})-(?P<m>\d{1,2})-(?P<y>\d{4})",
            TIME_SUFFIX,
        ),
        numeric(
            PatternKind::DayFirstSlash,
            r"(?P<d>\d{1,2})/(?P<m>\d{1,2})/(?P<y>\d{4})",
            TIME_SUFFIX,
        ),
        numeric(
            PatternKind::MonthFirstDash,
            r"(?P<m>\d{1,2})-(?P<d>\d{1,2})-(?P<y>\d{4})",
            TIME_SUFFIX,
        ),
        numeric(
            PatternKind::MonthFirstSlash,
            r"(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{4})",
            TIME_SUFFIX,
        ),
        Matcher::new(PatternKind::UnixTimestamp, r"^(?P<ts>-?\d{1,12})$", unix_timestamp),
        Matcher::new(
            PatternKind::FreeText,
            r"(?i)^(?P<mon>[a-z]+)\.?\s+(?P<d>\d{1,2})(?:st|nd|rd|th)?,?\s+(?P<y>\d{4})(?:,?\s+(?P<H>\d{1,2}):(?P<M>\d{2})(?::(?P<S>\d{2}))?\s*(?P<ampm>am|pm))?$",
            free_text,
        ),
    ]
});

static JALALI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^(?P<y>\d{1,4})\s*[/-]\s*(?P<m>\d{1,2})\s*[/-]\s*(?P<d>\d{1,2})(?:\s+(?P<H>\d{1,2}):(?P<M>\d{2})(?::(?P<S>\d{2}))?)?$",
    )
});

/// The Gregorian input patterns, in the order they are tried
pub fn gregorian_patterns() -> &'static [Matcher] {
    &GREGORIAN_PATTERNS
}

fn number(caps: &Captures<'_>, name: &str) -> Result<Option<i64>, ConversionError> {
    caps.name(name)
        .map(|m| {
            m.as_str()
                .parse::<i64>()
                .map_err(|_| ConversionError::invalid_field(name, m.as_str()))
        })
        .transpose()
}

fn required(caps: &Captures<'_>, name: &str) -> Result<i64, ConversionError> {
    number(caps, name)?.ok_or_else(|| ConversionError::invalid_field(name, ""))
}

fn time_of_day(caps: &Captures<'_>) -> Result<TimeOfDay, ConversionError> {
    let hour = number(caps, "H")?.unwrap_or(0);
    let minute = number(caps, "M")?.unwrap_or(0);
    let second = number(caps, "S")?.unwrap_or(0);
    TimeOfDay::new(hour, minute, second)
}

fn numeric_date(caps: &Captures<'_>) -> Result<CivilDate, ConversionError> {
    let date = CivilDate::gregorian(
        required(caps, "y")?,
        required(caps, "m")?,
        required(caps, "d")?,
    )?;
    Ok(date.with_time(time_of_day(caps)?))
}

fn unix_timestamp(caps: &Captures<'_>) -> Result<CivilDate, ConversionError> {
    CivilDate::from_unix_seconds(required(caps, "ts")?)
}

fn free_text(caps: &Captures<'_>) -> Result<CivilDate, ConversionError> {
    let name = caps.name("mon").map_or("", |m| m.as_str());
    let month = gregorian_month_from_name(name)
        .ok_or_else(|| ConversionError::invalid_field("month", name))?;
    let date = CivilDate::gregorian(required(caps, "y")?, month.into(), required(caps, "d")?)?;

    let time = match caps.name("ampm") {
        Some(marker) => TimeOfDay::from_twelve_hour(
            required(caps, "H")?,
            required(caps, "M")?,
            number(caps, "S")?.unwrap_or(0),
            marker.as_str().eq_ignore_ascii_case("pm"),
        )?,
        None => TimeOfDay::MIDNIGHT,
    };
    Ok(date.with_time(time))
}

/// Parses a Gregorian date string and reports which pattern accepted it.
///
/// Persian and Arabic-Indic digits are read as ASCII digits first.
///
/// # Errors
/// - `ConversionError::EmptyInput` for a blank string.
/// - The first pattern's validation error (typically `InvalidCalendarDate`) when
///   some pattern matched syntactically but none produced a real day.
/// - `ConversionError::UnparseableDate` when no pattern matched at all.
pub fn parse_gregorian_with_kind(input: &str) -> Result<(CivilDate, PatternKind), ConversionError> {
    let normalized = to_ascii_digits(input.trim());
    if normalized.is_empty() {
        return Err(ConversionError::EmptyInput { field: "date" });
    }

    let mut first_rejection = None;
    for matcher in gregorian_patterns() {
        match matcher.try_match(&normalized) {
            None => trace!("`{normalized}` does not match {}", matcher.kind),
            Some(Ok(date)) => {
                debug!("parsed `{normalized}` as {} via {}", date, matcher.kind);
                return Ok((date, matcher.kind));
            }
            Some(Err(err)) => {
                trace!("`{normalized}` matched {} but was rejected: {err}", matcher.kind);
                first_rejection.get_or_insert(err);
            }
        }
    }

    Err(first_rejection.unwrap_or_else(|| ConversionError::UnparseableDate {
        input: input.to_owned(),
    }))
}

/// Parses a Gregorian date string.
///
/// # Errors
/// See [`parse_gregorian_with_kind`].
pub fn parse_gregorian(input: &str) -> Result<CivilDate, ConversionError> {
    parse_gregorian_with_kind(input).map(|(date, _)| date)
}

/// Parses a Jalali `YYYY/MM/DD` string (also `-`-separated, with optional
/// `HH:mm[:ss]`), in any mix of ASCII, Persian or Arabic-Indic digits.
///
/// # Errors
/// - `ConversionError::EmptyInput` for a blank string.
/// - `ConversionError::UnparseableDate` if the shape does not match.
/// - `ConversionError::InvalidCalendarDate` if the fields are not a Jalali day.
pub fn parse_jalali(input: &str) -> Result<CivilDate, ConversionError> {
    let normalized = to_ascii_digits(input.trim());
    if normalized.is_empty() {
        return Err(ConversionError::EmptyInput { field: "date" });
    }

    let caps = JALALI_PATTERN
        .captures(&normalized)
        .ok_or_else(|| ConversionError::UnparseableDate {
            input: input.to_owned(),
        })?;
    let date = CivilDate::jalali(
        required(&caps, "y")?,
        required(&caps, "m")?,
        required(&caps, "d")?,
    )?;
    Ok(date.with_time(time_of_day(&caps)?))
}

/// Year, month and day supplied as separate fields. Zero counts as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SeparateFields {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

impl SeparateFields {
    pub const fn new(year: Option<i64>, month: Option<i64>, day: Option<i64>) -> Self {
        Self { year, month, day }
    }

    fn present(value: Option<i64>) -> Option<i64> {
        value.filter(|v| *v != 0)
    }

    pub fn year(&self) -> Option<i64> {
        Self::present(self.year)
    }

    pub fn month(&self) -> Option<i64> {
        Self::present(self.month)
    }

    pub fn day(&self) -> Option<i64> {
        Self::present(self.day)
    }

    pub fn is_empty(&self) -> bool {
        self.year().is_none() && self.month().is_none() && self.day().is_none()
    }

    /// Names of the fields that are absent or zero
    pub fn missing(&self) -> Vec<&'static str> {
        [("year", self.year()), ("month", self.month()), ("day", self.day())]
            .into_iter()
            .filter_map(|(name, value)| value.is_none().then_some(name))
            .collect()
    }

    /// Rejects negative values, which are never a field of either calendar.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` naming the first negative field.
    pub fn check_not_negative(&self) -> Result<(), ConversionError> {
        for (name, value) in [("year", self.year), ("month", self.month), ("day", self.day)] {
            if let Some(v) = value.filter(|v| *v < 0) {
                return Err(ConversionError::invalid_field(name, v));
            }
        }
        Ok(())
    }

    /// All three fields, or `IncompleteFields` naming the missing ones.
    ///
    /// # Errors
    /// `InvalidFieldValue` for a negative field, `IncompleteFields` when any is absent or zero.
    pub fn complete(&self) -> Result<(i64, i64, i64), ConversionError> {
        self.check_not_negative()?;
        match (self.year(), self.month(), self.day()) {
            (Some(y), Some(m), Some(d)) => Ok((y, m, d)),
            _ => Err(ConversionError::IncompleteFields {
                missing: self.missing(),
            }),
        }
    }
}

/// Builds a Jalali date from separate fields; all three are required and non-zero.
///
/// # Errors
/// See [`SeparateFields::complete`]; `InvalidCalendarDate` when the triple is not a Jalali day.
pub fn jalali_from_fields(fields: &SeparateFields) -> Result<CivilDate, ConversionError> {
    let (year, month, day) = fields.complete()?;
    CivilDate::jalali(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalendarSystem;

    fn kind_of(input: &str) -> PatternKind {
        parse_gregorian_with_kind(input).unwrap().1
    }

    #[test]
    fn test_pattern_order() {
        let kinds: Vec<PatternKind> = gregorian_patterns().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PatternKind::IsoDate,
                PatternKind::YearFirstSlash,
                PatternKind::DayFirstDash,
                PatternKind::DayFirstSlash,
                PatternKind::MonthFirstDash,
                PatternKind::MonthFirstSlash,
                PatternKind::UnixTimestamp,
                PatternKind::FreeText,
            ]
        );
    }

    #[test]
    fn test_each_matcher_in_isolation() {
        let free_text = &gregorian_patterns()[7];
        assert!(free_text.try_match("2024-03-15").is_none());
        assert!(matches!(free_text.try_match("Mar 15 2024"), Some(Ok(_))));

        let iso = &gregorian_patterns()[0];
        assert!(matches!(
            iso.try_match("2024-02-30"),
            Some(Err(ConversionError::InvalidCalendarDate { .. }))
        ));
    }

    #[test]
    fn test_iso_wins_over_free_text() {
        let (date, kind) = parse_gregorian_with_kind("2024-03-15").unwrap();
        assert_eq!(kind, PatternKind::IsoDate);
        assert_eq!(date, CivilDate::gregorian(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_iso_with_time_variants() {
        let expected = CivilDate::gregorian(2024, 3, 15)
            .unwrap()
            .with_time(TimeOfDay::new(14, 30, 0).unwrap());
        for input in [
            "2024-03-15 14:30:00",
            "2024-03-15T14:30:00",
            "2024-03-15T14:30:00.000Z",
            "2024-03-15T14:30",
        ] {
            assert_eq!(parse_gregorian(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_free_text_with_time() {
        let (date, kind) = parse_gregorian_with_kind("March 15th 2024, 2:30:00 pm").unwrap();
        assert_eq!(kind, PatternKind::FreeText);
        let iso = parse_gregorian("2024-03-15 14:30:00").unwrap();
        assert_eq!(date, iso);
    }

    #[test]
    fn test_free_text_variants() {
        let midnight = CivilDate::gregorian(2025, 5, 29).unwrap();
        assert_eq!(parse_gregorian("May 29th 2025").unwrap(), midnight);
        assert_eq!(parse_gregorian("may 29 2025").unwrap(), midnight);
        assert_eq!(parse_gregorian("MAY 29, 2025").unwrap(), midnight);

        let noon = parse_gregorian("May 29th 2025, 12:05:09 PM").unwrap();
        assert_eq!(noon.time().to_string(), "12:05:09");
        let after_midnight = parse_gregorian("May 29th 2025, 12:20:37 am").unwrap();
        assert_eq!(after_midnight.time().hour(), 0);
    }

    #[test]
    fn test_free_text_unknown_month() {
        assert!(matches!(
            parse_gregorian("Smarch 15 2024"),
            Err(ConversionError::InvalidFieldValue { ref field, .. }) if field == "month"
        ));
    }

    #[test]
    fn test_numeric_variants() {
        struct TestCase {
            input: &'static str,
            kind: PatternKind,
        }

        let cases = [
            TestCase {
                input: "2024/03/15",
                kind: PatternKind::YearFirstSlash,
            },
            TestCase {
                input: "15-03-2024",
                kind: PatternKind::DayFirstDash,
            },
            TestCase {
                input: "15/03/2024",
                kind: PatternKind::DayFirstSlash,
            },
            TestCase {
                input: "03-15-2024",
                kind: PatternKind::MonthFirstDash,
            },
            TestCase {
                input: "03/15/2024",
                kind: PatternKind::MonthFirstSlash,
            },
            TestCase {
                input: "3/15/2024 00:00:00",
                kind: PatternKind::MonthFirstSlash,
            },
        ];

        let expected = CivilDate::gregorian(2024, 3, 15).unwrap();
        for case in &cases {
            let (date, kind) = parse_gregorian_with_kind(case.input).unwrap();
            assert_eq!(date, expected, "{} should be 2024-03-15", case.input);
            assert_eq!(kind, case.kind, "{} matched the wrong pattern", case.input);
        }
    }

    #[test]
    fn test_ambiguous_numeric_is_day_first() {
        let date = parse_gregorian("03/04/2024").unwrap();
        assert_eq!(date.ymd(), (2024, 4, 3));
        assert_eq!(kind_of("03/04/2024"), PatternKind::DayFirstSlash);
    }

    #[test]
    fn test_unix_timestamp() {
        let (date, kind) = parse_gregorian_with_kind("1710513000").unwrap();
        assert_eq!(kind, PatternKind::UnixTimestamp);
        assert_eq!(date.ymd(), (2024, 3, 15));
        assert_eq!(date.time().to_string(), "14:30:00");
    }

    #[test]
    fn test_persian_digits_in_gregorian_input() {
        assert_eq!(
            parse_gregorian("۲۰۲۴-۰۳-۱۵").unwrap(),
            parse_gregorian("2024-03-15").unwrap()
        );
    }

    #[test]
    fn test_gregorian_errors() {
        assert!(matches!(
            parse_gregorian("   "),
            Err(ConversionError::EmptyInput { .. })
        ));
        assert!(matches!(
            parse_gregorian("next tuesday"),
            Err(ConversionError::UnparseableDate { ref input }) if input == "next tuesday"
        ));
        assert!(matches!(
            parse_gregorian("2023-02-29"),
            Err(ConversionError::InvalidCalendarDate { .. })
        ));
        assert!(matches!(
            parse_gregorian("2024-03-15 25:00:00"),
            Err(ConversionError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_parse_jalali_mixed_scripts() {
        let persian = parse_jalali("۱۴۰۲/۱۲/۲۵").unwrap();
        let ascii = parse_jalali("1402/12/25").unwrap();
        assert_eq!(persian, ascii);
        assert_eq!(ascii.calendar(), CalendarSystem::Jalali);
        assert_eq!(ascii.ymd(), (1402, 12, 25));
        assert_eq!(parse_jalali(" 1402-12-25 ").unwrap(), ascii);
        assert_eq!(parse_jalali("1402/1/5").unwrap().ymd(), (1402, 1, 5));
    }

    #[test]
    fn test_parse_jalali_with_time() {
        let date = parse_jalali("1402/12/25 08:15").unwrap();
        assert_eq!(date.time().to_string(), "08:15:00");
    }

    #[test]
    fn test_parse_jalali_errors() {
        assert!(matches!(parse_jalali(""), Err(ConversionError::EmptyInput { .. })));
        assert!(matches!(
            parse_jalali("25 Esfand 1402"),
            Err(ConversionError::UnparseableDate { .. })
        ));
        assert!(matches!(
            parse_jalali("1402/12/30"),
            Err(ConversionError::InvalidCalendarDate { .. })
        ));
        assert!(parse_jalali("1403/12/30").is_ok());
    }

    #[test]
    fn test_separate_fields_strict() {
        let full = SeparateFields::new(Some(1402), Some(12), Some(25));
        assert_eq!(jalali_from_fields(&full).unwrap().ymd(), (1402, 12, 25));

        let zero_day = SeparateFields::new(Some(1402), Some(12), Some(0));
        assert_eq!(
            jalali_from_fields(&zero_day),
            Err(ConversionError::IncompleteFields { missing: vec!["day"] })
        );

        let month_day = SeparateFields::new(None, Some(12), Some(25));
        assert_eq!(
            jalali_from_fields(&month_day),
            Err(ConversionError::IncompleteFields { missing: vec!["year"] })
        );

        let negative = SeparateFields::new(Some(1402), Some(-1), Some(1));
        assert!(matches!(
            jalali_from_fields(&negative),
            Err(ConversionError::InvalidFieldValue { ref field, .. }) if field == "month"
        ));
    }

    #[test]
    fn test_separate_fields_boundaries() {
        let month_13 = SeparateFields::new(Some(1402), Some(13), Some(1));
        assert!(matches!(
            jalali_from_fields(&month_13),
            Err(ConversionError::InvalidCalendarDate { .. })
        ));
        let esfand_30 = SeparateFields::new(Some(1402), Some(12), Some(30));
        assert!(matches!(
            jalali_from_fields(&esfand_30),
            Err(ConversionError::InvalidCalendarDate { .. })
        ));
        let leap_esfand_30 = SeparateFields::new(Some(1403), Some(12), Some(30));
        assert!(jalali_from_fields(&leap_esfand_30).is_ok());
    }

    #[test]
    fn test_separate_fields_presence() {
        let fields = SeparateFields::new(Some(0), None, Some(7));
        assert_eq!(fields.missing(), vec!["year", "month"]);
        assert!(!fields.is_empty());
        assert!(SeparateFields::default().is_empty());
    }
}
