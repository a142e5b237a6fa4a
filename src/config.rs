//! Host parameters as they arrive in JSON, and their translation to requests.

use serde::{Deserialize, Serialize};

use crate::convert::{ConversionRequest, DateInput, Direction, EnrichmentOptions, OutputSpec};
use crate::format::{FormatSpec, GregorianPreset, JalaliPreset};
use crate::lexicon::to_ascii_digits;
use crate::parse::{SeparateFields, parse_gregorian};
use crate::ConversionError;

const DEFAULT_JALALI_FORMAT: &str = "jYYYY/jMM/jDD";
const ALL_FORMATS: &str = "all";

/// Gregorian presets a host may pick one at a time; the rest only come in the bundle.
const SINGLE_GREGORIAN: [GregorianPreset; 6] = [
    GregorianPreset::IsoString,
    GregorianPreset::Timestamp,
    GregorianPreset::TimestampSeconds,
    GregorianPreset::DateString,
    GregorianPreset::LocalizedString,
    GregorianPreset::StandardString,
];

/// A numeric host field, sent either as a JSON number or as text in any digit script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Integer value of the field, `None` for blank text.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` for text that is not an integer
    /// or a number with a fractional part.
    #[allow(clippy::cast_possible_truncation)]
    pub fn resolve(&self, field: &str) -> Result<Option<i64>, ConversionError> {
        match self {
            Self::Integer(n) => Ok(Some(*n)),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Some(*f as i64)),
            Self::Float(f) => Err(ConversionError::invalid_field(field, f)),
            Self::Text(text) => {
                let digits = to_ascii_digits(text.trim());
                if digits.is_empty() {
                    return Ok(None);
                }
                digits
                    .parse()
                    .map(Some)
                    .map_err(|_| ConversionError::invalid_field(field, text))
            }
        }
    }
}

fn resolve_field(field: &str, value: Option<&FieldValue>) -> Result<Option<i64>, ConversionError> {
    value.map_or(Ok(None), |v| v.resolve(field))
}

fn separate_fields(
    year: Option<&FieldValue>,
    month: Option<&FieldValue>,
    day: Option<&FieldValue>,
) -> Result<SeparateFields, ConversionError> {
    Ok(SeparateFields::new(
        resolve_field("year", year)?,
        resolve_field("month", month)?,
        resolve_field("day", day)?,
    ))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    #[default]
    #[serde(alias = "completeDate")]
    Complete,
    #[serde(alias = "separateValues")]
    Separate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalOptions {
    pub persian_numbers: bool,
    pub add_numeric_values: bool,
    pub add_month_name: bool,
    pub add_weekday: bool,
}

impl From<AdditionalOptions> for EnrichmentOptions {
    fn from(options: AdditionalOptions) -> Self {
        Self {
            persian_numerals: options.persian_numbers,
            numeric_fields: options.add_numeric_values,
            month_name: options.add_month_name,
            weekday: options.add_weekday,
        }
    }
}

/// Parameters of the Gregorian to Jalali operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToJalaliParams {
    pub input_type: InputType,
    pub date_value: String,
    pub year: Option<FieldValue>,
    pub month: Option<FieldValue>,
    pub day: Option<FieldValue>,
    /// A preset pattern, `custom` or `persian_text`
    pub output_format: String,
    pub custom_format: String,
    pub additional_options: AdditionalOptions,
    /// Gregorian date standing in for today when separate fields are partial
    pub reference_date: Option<String>,
}

impl Default for ToJalaliParams {
    fn default() -> Self {
        Self {
            input_type: InputType::Complete,
            date_value: String::new(),
            year: None,
            month: None,
            day: None,
            output_format: DEFAULT_JALALI_FORMAT.to_owned(),
            custom_format: DEFAULT_JALALI_FORMAT.to_owned(),
            additional_options: AdditionalOptions::default(),
            reference_date: None,
        }
    }
}

impl ToJalaliParams {
    /// Output format the parameters select.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` for an unknown `outputFormat`.
    pub fn format_spec(&self) -> Result<FormatSpec, ConversionError> {
        match self.output_format.as_str() {
            "custom" => Ok(FormatSpec::Custom(self.custom_format.clone())),
            "persian_text" => Ok(FormatSpec::PersianText),
            other => JalaliPreset::from_pattern(other)
                .map(FormatSpec::Jalali)
                .ok_or_else(|| ConversionError::invalid_field("outputFormat", other)),
        }
    }

    /// Builds the request for one record.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` for an unusable field or option,
    /// or the parse error of an unreadable `referenceDate`.
    pub fn to_request(&self) -> Result<ConversionRequest, ConversionError> {
        let input = match self.input_type {
            InputType::Complete => DateInput::Complete(self.date_value.clone()),
            InputType::Separate => DateInput::Separate(separate_fields(
                self.year.as_ref(),
                self.month.as_ref(),
                self.day.as_ref(),
            )?),
        };
        let request = ConversionRequest::new(
            Direction::GregorianToJalali,
            input,
            OutputSpec::Single(self.format_spec()?),
        )
        .with_options(self.additional_options.into());

        match self.reference_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(request.with_reference(parse_gregorian(raw)?)),
            _ => Ok(request),
        }
    }
}

/// Parameters of the Jalali to Gregorian operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FromJalaliParams {
    pub input_type: InputType,
    pub date: String,
    pub year: Option<FieldValue>,
    pub month: Option<FieldValue>,
    pub day: Option<FieldValue>,
    /// `all` or one Gregorian field name such as `isoString`
    pub output_format: String,
}

impl Default for FromJalaliParams {
    fn default() -> Self {
        Self {
            input_type: InputType::Complete,
            date: String::new(),
            year: None,
            month: None,
            day: None,
            output_format: ALL_FORMATS.to_owned(),
        }
    }
}

impl FromJalaliParams {
    /// Output the parameters select.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` for an unknown `outputFormat`.
    pub fn output_spec(&self) -> Result<OutputSpec, ConversionError> {
        if self.output_format == ALL_FORMATS {
            return Ok(OutputSpec::AllGregorian);
        }
        GregorianPreset::from_field_name(&self.output_format)
            .filter(|preset| SINGLE_GREGORIAN.contains(preset))
            .map(|preset| OutputSpec::Single(FormatSpec::Gregorian(preset)))
            .ok_or_else(|| ConversionError::invalid_field("outputFormat", &self.output_format))
    }

    /// Builds the request for one record.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidFieldValue` for an unusable field or option.
    pub fn to_request(&self) -> Result<ConversionRequest, ConversionError> {
        let input = match self.input_type {
            InputType::Complete => DateInput::Complete(self.date.clone()),
            InputType::Separate => DateInput::Separate(separate_fields(
                self.year.as_ref(),
                self.month.as_ref(),
                self.day.as_ref(),
            )?),
        };
        Ok(ConversionRequest::new(
            Direction::JalaliToGregorian,
            input,
            self.output_spec()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_jalali(value: serde_json::Value) -> ToJalaliParams {
        serde_json::from_value(value).unwrap()
    }

    fn from_jalali(value: serde_json::Value) -> FromJalaliParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_field_value_forms() {
        struct TestCase {
            value: serde_json::Value,
            expected: Result<Option<i64>, ()>,
        }

        let cases = [
            TestCase {
                value: json!(1402),
                expected: Ok(Some(1402)),
            },
            TestCase {
                value: json!(12.0),
                expected: Ok(Some(12)),
            },
            TestCase {
                value: json!(" 25 "),
                expected: Ok(Some(25)),
            },
            TestCase {
                value: json!("۱۴۰۲"),
                expected: Ok(Some(1402)),
            },
            TestCase {
                value: json!("١٢"),
                expected: Ok(Some(12)),
            },
            TestCase {
                value: json!(""),
                expected: Ok(None),
            },
            TestCase {
                value: json!("twelve"),
                expected: Err(()),
            },
            TestCase {
                value: json!(2.5),
                expected: Err(()),
            },
        ];

        for case in cases {
            let field: FieldValue = serde_json::from_value(case.value.clone()).unwrap();
            let resolved = field.resolve("month").map_err(|_| ());
            assert_eq!(resolved, case.expected, "value {}", case.value);
        }
    }

    #[test]
    fn test_to_jalali_defaults() {
        let params = to_jalali(json!({}));
        assert_eq!(params, ToJalaliParams::default());
        let request = params.to_request().unwrap();
        assert_eq!(request.direction, Direction::GregorianToJalali);
        assert_eq!(
            request.output,
            OutputSpec::Single(FormatSpec::Jalali(JalaliPreset::YearMonthDaySlash))
        );
        assert_eq!(request.options, EnrichmentOptions::default());
        assert_eq!(request.reference, None);
    }

    #[test]
    fn test_to_jalali_full_params() {
        let params = to_jalali(json!({
            "inputType": "separate",
            "year": "2024",
            "month": 3,
            "day": "۱۵",
            "outputFormat": "custom",
            "customFormat": "jYYYY [year]",
            "additionalOptions": {"persianNumbers": true, "addWeekday": true},
            "referenceDate": "2024-01-01"
        }));
        let request = params.to_request().unwrap();
        assert_eq!(
            request.input,
            DateInput::Separate(SeparateFields::new(Some(2024), Some(3), Some(15)))
        );
        assert_eq!(
            request.output,
            OutputSpec::Single(FormatSpec::Custom("jYYYY [year]".to_owned()))
        );
        assert!(request.options.persian_numerals);
        assert!(request.options.weekday);
        assert!(!request.options.month_name);
        assert_eq!(request.reference.map(|d| d.ymd()), Some((2024, 1, 1)));
    }

    #[test]
    fn test_to_jalali_output_formats() {
        let spec = |format: &str| {
            to_jalali(json!({ "outputFormat": format })).format_spec()
        };
        assert_eq!(spec("persian_text"), Ok(FormatSpec::PersianText));
        assert_eq!(spec("jDD jMMMM jYYYY"), Ok(FormatSpec::Jalali(JalaliPreset::DayMonthYear)));
        assert_eq!(
            spec("YYYY"),
            Err(ConversionError::invalid_field("outputFormat", "YYYY"))
        );
    }

    #[test]
    fn test_to_jalali_bad_field() {
        let params = to_jalali(json!({"inputType": "separate", "year": "abc"}));
        assert_eq!(
            params.to_request(),
            Err(ConversionError::invalid_field("year", "abc"))
        );
    }

    #[test]
    fn test_unknown_input_type_is_rejected() {
        let parsed: Result<ToJalaliParams, _> =
            serde_json::from_value(json!({"inputType": "both"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_from_jalali_params() {
        let params = from_jalali(json!({
            "inputType": "separateValues",
            "year": 1402,
            "month": "12",
            "day": "۲۵",
            "outputFormat": "isoString"
        }));
        let request = params.to_request().unwrap();
        assert_eq!(request.direction, Direction::JalaliToGregorian);
        assert_eq!(
            request.input,
            DateInput::Separate(SeparateFields::new(Some(1402), Some(12), Some(25)))
        );
        assert_eq!(
            request.output,
            OutputSpec::Single(FormatSpec::Gregorian(GregorianPreset::IsoString))
        );
    }

    #[test]
    fn test_from_jalali_output_formats() {
        let output = |format: &str| from_jalali(json!({ "outputFormat": format })).output_spec();
        assert_eq!(from_jalali(json!({})).output_spec(), Ok(OutputSpec::AllGregorian));
        assert!(output("timestampSeconds").is_ok());
        // Only available inside the bundle
        assert!(output("utc").is_err());
        assert!(output("jYYYY").is_err());
    }

    #[test]
    fn test_from_jalali_complete_date() {
        let params = from_jalali(json!({"inputType": "completeDate", "date": "1402/12/25"}));
        assert_eq!(
            params.to_request().unwrap().input,
            DateInput::Complete("1402/12/25".to_owned())
        );
    }
}
