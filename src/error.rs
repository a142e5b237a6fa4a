use crate::types::CalendarSystem;

/// Why a single record could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// A required field was missing or blank.
    #[error("No date value provided for `{field}`")]
    EmptyInput { field: &'static str },

    /// Some, but not all, of the separate year/month/day fields were given.
    #[error("Year, month and day cannot be empty or zero (missing: {})", .missing.join(", "))]
    IncompleteFields { missing: Vec<&'static str> },

    /// No accepted format matched the input.
    #[error(
        "Invalid date format `{input}`. Please use a standard date format like YYYY-MM-DD, \
         YYYY/MM/DD, DD/MM/YYYY, MM/DD/YYYY (optionally with HH:mm:ss), a Unix timestamp, \
         or a readable format like \"May 29th 2025, 2:20:37 pm\""
    )]
    UnparseableDate { input: String },

    /// The fields parsed but do not name a day on the calendar.
    #[error("Invalid {calendar} date: {year}/{month}/{day}")]
    InvalidCalendarDate {
        calendar: CalendarSystem,
        year: i64,
        month: i64,
        day: i64,
    },

    /// A field held something other than the positive integer or option it requires.
    #[error("Invalid value `{value}` for `{field}`")]
    InvalidFieldValue { field: String, value: String },
}

impl ConversionError {
    pub(crate) fn invalid_field(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// A record failed while the batch was running under the abort policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Record {index} failed: {source}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: ConversionError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_field_and_value() {
        let err = ConversionError::invalid_field("month", "abc");
        assert_eq!(err.to_string(), "Invalid value `abc` for `month`");

        let err = ConversionError::EmptyInput { field: "dateValue" };
        assert_eq!(err.to_string(), "No date value provided for `dateValue`");

        let err = ConversionError::IncompleteFields {
            missing: vec!["month", "day"],
        };
        assert!(err.to_string().ends_with("(missing: month, day)"));
    }

    #[test]
    fn test_invalid_calendar_date_message() {
        let err = ConversionError::InvalidCalendarDate {
            calendar: CalendarSystem::Jalali,
            year: 1402,
            month: 13,
            day: 1,
        };
        assert_eq!(err.to_string(), "Invalid Jalali date: 1402/13/1");
    }

    #[test]
    fn test_batch_error_keeps_source() {
        use std::error::Error;

        let err = BatchError {
            index: 3,
            source: ConversionError::UnparseableDate {
                input: "soon".to_owned(),
            },
        };
        assert!(err.to_string().starts_with("Record 3 failed: Invalid date format `soon`"));
        assert!(err.source().is_some());
    }
}
