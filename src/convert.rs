//! Per-record conversion pipeline shared by both directions.
//!
//! A request moves through read-input, validate, convert, format and assemble.
//! The direction only selects the parser, the target calendar and the field
//! names. Gregorian separate fields that are not all present leave the pipeline
//! after validation with whatever partial fields they determine.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::gregorian_month_length;
use crate::format::{FormatSpec, format_tokens, numerals, render, render_all_gregorian};
use crate::lexicon::{number_to_persian_text, persian_month_name, persian_weekday};
use crate::parse::{jalali_from_fields, parse_gregorian, parse_jalali};
use crate::prelude::*;
use crate::{BatchError, CalendarSystem, CivilDate, ConversionError, JalaliPreset};

pub use crate::parse::SeparateFields;

/// A host record: field name to JSON value.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[display(fmt = "Gregorian to Jalali")]
    GregorianToJalali,
    #[display(fmt = "Jalali to Gregorian")]
    JalaliToGregorian,
}

impl Direction {
    pub const fn source(self) -> CalendarSystem {
        match self {
            Self::GregorianToJalali => CalendarSystem::Gregorian,
            Self::JalaliToGregorian => CalendarSystem::Jalali,
        }
    }

    pub const fn target(self) -> CalendarSystem {
        match self {
            Self::GregorianToJalali => CalendarSystem::Jalali,
            Self::JalaliToGregorian => CalendarSystem::Gregorian,
        }
    }

    /// Host parameter holding the complete date string
    const fn complete_field(self) -> &'static str {
        match self {
            Self::GregorianToJalali => "dateValue",
            Self::JalaliToGregorian => "date",
        }
    }

    /// Output field for a single rendered format
    const fn single_field(self) -> &'static str {
        match self {
            Self::GregorianToJalali => "jalaliDate",
            Self::JalaliToGregorian => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// One string holding the whole date
    Complete(String),
    Separate(SeparateFields),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpec {
    Single(FormatSpec),
    /// Every Gregorian preset under its own field name
    AllGregorian,
}

/// Additive extras, each written to its own field when enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrichmentOptions {
    pub persian_numerals: bool,
    pub numeric_fields: bool,
    pub month_name: bool,
    pub weekday: bool,
}

/// Everything needed to convert one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub direction: Direction,
    pub input: DateInput,
    pub output: OutputSpec,
    pub options: EnrichmentOptions,
    /// Gregorian date that stands in for "now" when separate fields leave
    /// the year, month or day open. `None` reads the system clock.
    pub reference: Option<CivilDate>,
}

impl ConversionRequest {
    pub const fn new(direction: Direction, input: DateInput, output: OutputSpec) -> Self {
        Self {
            direction,
            input,
            output,
            options: EnrichmentOptions {
                persian_numerals: false,
                numeric_fields: false,
                month_name: false,
                weekday: false,
            },
            reference: None,
        }
    }

    /// Gregorian to Jalali, rendered as `jYYYY/jMM/jDD`
    pub const fn to_jalali(input: DateInput) -> Self {
        Self::new(
            Direction::GregorianToJalali,
            input,
            OutputSpec::Single(FormatSpec::Jalali(JalaliPreset::YearMonthDaySlash)),
        )
    }

    /// Jalali to Gregorian, rendered in every Gregorian format
    pub const fn from_jalali(input: DateInput) -> Self {
        Self::new(Direction::JalaliToGregorian, input, OutputSpec::AllGregorian)
    }

    #[must_use]
    pub fn with_output(self, output: OutputSpec) -> Self {
        Self { output, ..self }
    }

    #[must_use]
    pub fn with_options(self, options: EnrichmentOptions) -> Self {
        Self { options, ..self }
    }

    #[must_use]
    pub fn with_reference(self, reference: CivilDate) -> Self {
        Self {
            reference: Some(reference),
            ..self
        }
    }
}

/// Fields produced for one record, to be merged into the host's record.
#[derive(Debug, Clone, Default, PartialEq, Deref, From, Into, Serialize)]
#[serde(transparent)]
pub struct ConversionResult(Record);

impl ConversionResult {
    fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    fn extend(&mut self, fields: impl IntoIterator<Item = (&'static str, Value)>) {
        for (key, value) in fields {
            self.insert(key, value);
        }
    }
}

enum Validated {
    Full(CivilDate),
    Partial(ConversionResult),
}

/// Runs one request through the pipeline.
///
/// # Errors
/// Returns the first `ConversionError` raised while reading, validating or
/// converting the input. Formatting only fails if a requested calendar view
/// is out of range.
pub fn convert(request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
    let date = match validate(request)? {
        Validated::Full(date) => date,
        Validated::Partial(result) => {
            debug!("partial fields, returning {} fields without a full date", result.len());
            return Ok(result);
        }
    };

    let target = date.to_calendar(request.direction.target())?;
    debug!("{}: {date} -> {target}", request.direction);

    let mut result = ConversionResult::default();
    let persian = request.options.persian_numerals;
    match &request.output {
        OutputSpec::Single(spec) => {
            result.insert(request.direction.single_field(), render(&target, spec, persian)?);
        }
        OutputSpec::AllGregorian => result.extend(render_all_gregorian(&target)?),
    }

    for enrich in ENRICHMENTS {
        match enrich(&target, &request.options) {
            Ok(fields) => result.extend(fields),
            Err(err) => warn!("skipping enrichment for {target}: {err}"),
        }
    }
    Ok(result)
}

fn validate(request: &ConversionRequest) -> Result<Validated, ConversionError> {
    let direction = request.direction;
    match &request.input {
        DateInput::Complete(raw) => {
            if raw.trim().is_empty() {
                return Err(ConversionError::EmptyInput {
                    field: direction.complete_field(),
                });
            }
            let date = match direction.source() {
                CalendarSystem::Gregorian => parse_gregorian(raw)?,
                CalendarSystem::Jalali => parse_jalali(raw)?,
            };
            Ok(Validated::Full(date))
        }
        DateInput::Separate(fields) => match direction.source() {
            CalendarSystem::Jalali => Ok(Validated::Full(jalali_from_fields(fields)?)),
            CalendarSystem::Gregorian => {
                fields.check_not_negative()?;
                if fields.is_empty() {
                    return Err(ConversionError::EmptyInput {
                        field: "year, month or day",
                    });
                }
                match (fields.year(), fields.month(), fields.day()) {
                    (Some(y), Some(m), Some(d)) => {
                        Ok(Validated::Full(CivilDate::gregorian(y, m, d)?))
                    }
                    _ => {
                        let reference = match request.reference {
                            Some(date) => date.to_gregorian()?,
                            None => today_utc()?,
                        };
                        partial_jalali(fields, reference, request.options.persian_numerals)
                            .map(Validated::Partial)
                    }
                }
            }
        },
    }
}

/// Jalali fields derivable from an incomplete set of Gregorian fields.
///
/// A year alone is read as January 1 of that year. A month or day alone borrows
/// the missing parts from `reference`, so its answer depends on that date. A
/// borrowed or given day past the end of the month is clamped to its last day.
fn partial_jalali(
    fields: &SeparateFields,
    reference: CivilDate,
    persian: bool,
) -> Result<ConversionResult, ConversionError> {
    let number = |n: i64| -> Value {
        if persian {
            Value::from(numerals(n.to_string(), true))
        } else {
            Value::from(n)
        }
    };
    let jalali = |y: i64, m: i64, d: i64| -> Result<CivilDate, ConversionError> {
        CivilDate::gregorian(y, m, d)?.to_jalali()
    };
    let ref_year = i64::from(reference.year());

    let mut result = ConversionResult::default();

    if let Some(year) = fields.year() {
        let date = jalali(year, 1, 1)?;
        result.insert("jalaliYear", number(date.year().into()));
    }

    if let Some(month) = fields.month() {
        let day = u8::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .map(|m| reference.day().min(gregorian_month_length(reference.year(), m)))
            .unwrap_or(reference.day());
        let date = jalali(ref_year, month, day.into())?;
        result.insert("jalaliMonth", number(date.month().into()));
        result.insert("jalaliMonthName", persian_month_name(date.month()).unwrap_or_default());
    }

    if let Some(day) = fields.day() {
        let day = day.min(gregorian_month_length(reference.year(), reference.month()).into());
        let date = jalali(ref_year, reference.month().into(), day)?;
        result.insert("jalaliDay", number(date.day().into()));
    }

    match (fields.year(), fields.month(), fields.day()) {
        (Some(year), Some(month), None) => {
            let date = jalali(year, month, 1)?;
            let text = format!(
                "{} {}",
                date.year(),
                persian_month_name(date.month()).unwrap_or_default()
            );
            result.insert("jalaliYearMonth", numerals(format_tokens(&date, "jYYYY/jMM")?, persian));
            result.insert("jalaliYearMonthText", numerals(text, persian));
        }
        (None, Some(month), Some(day)) => {
            let date = jalali(ref_year, month, day)?;
            let text = format!(
                "{} {}",
                number_to_persian_text(date.day().into()),
                persian_month_name(date.month()).unwrap_or_default()
            );
            result.insert("jalaliMonthDay", numerals(format_tokens(&date, "jMM/jDD")?, persian));
            result.insert("jalaliMonthDayText", text);
        }
        _ => {}
    }

    Ok(result)
}

type Enrichment =
    fn(&CivilDate, &EnrichmentOptions) -> Result<Vec<(&'static str, Value)>, ConversionError>;

/// Independent extras; a failure in one does not stop the others.
const ENRICHMENTS: [Enrichment; 3] = [numeric_fields, month_name_field, weekday_field];

fn numeric_fields(
    date: &CivilDate,
    options: &EnrichmentOptions,
) -> Result<Vec<(&'static str, Value)>, ConversionError> {
    if !options.numeric_fields {
        return Ok(Vec::new());
    }
    let jalali = date.to_jalali()?;
    let number = |n: i64| {
        if options.persian_numerals {
            Value::from(numerals(n.to_string(), true))
        } else {
            Value::from(n)
        }
    };
    Ok(vec![
        ("jalaliYear", number(jalali.year().into())),
        ("jalaliMonth", number(jalali.month().into())),
        ("jalaliDay", number(jalali.day().into())),
    ])
}

fn month_name_field(
    date: &CivilDate,
    options: &EnrichmentOptions,
) -> Result<Vec<(&'static str, Value)>, ConversionError> {
    if !options.month_name {
        return Ok(Vec::new());
    }
    let jalali = date.to_jalali()?;
    let name = persian_month_name(jalali.month()).unwrap_or_default();
    Ok(vec![("jalaliMonthName", Value::from(name))])
}

fn weekday_field(
    date: &CivilDate,
    options: &EnrichmentOptions,
) -> Result<Vec<(&'static str, Value)>, ConversionError> {
    if !options.weekday {
        return Ok(Vec::new());
    }
    Ok(vec![("jalaliWeekday", Value::from(persian_weekday(date.weekday())))])
}

/// Today's Gregorian date in UTC, from the system clock.
fn today_utc() -> Result<CivilDate, ConversionError> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX));
    debug!("no reference date supplied, using the system clock");
    let now = CivilDate::from_unix_seconds(seconds)?;
    CivilDate::gregorian(now.year().into(), now.month().into(), now.day().into())
}

/// What to do with a record that fails to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Keep going and tag the failed record with an `error` field
    ContinueOnFail,
    /// Stop at the first failure
    #[default]
    Abort,
}

/// Converts records in order, one output record per input record.
///
/// `resolve` builds the request for record `i` from the host's parameters.
/// Produced fields are merged over the record's own fields.
///
/// # Errors
/// Under `FailurePolicy::Abort`, returns `BatchError` with the index of the
/// first record that failed to resolve or convert.
pub fn run_batch<R, F>(
    records: R,
    policy: FailurePolicy,
    mut resolve: F,
) -> Result<Vec<Record>, BatchError>
where
    R: IntoIterator<Item = Record>,
    F: FnMut(usize, &Record) -> Result<ConversionRequest, ConversionError>,
{
    let mut output = Vec::new();
    for (index, mut record) in records.into_iter().enumerate() {
        match resolve(index, &record).and_then(|request| convert(&request)) {
            Ok(result) => {
                record.extend(Record::from(result));
                output.push(record);
            }
            Err(source) => match policy {
                FailurePolicy::ContinueOnFail => {
                    warn!("record {index} failed, continuing: {source}");
                    record.insert("error".to_owned(), Value::from(source.to_string()));
                    output.push(record);
                }
                FailurePolicy::Abort => return Err(BatchError { index, source }),
            },
        }
    }
    Ok(output)
}
