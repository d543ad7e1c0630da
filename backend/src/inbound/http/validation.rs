//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query strings arrive as raw text so malformed numbers can be reported
//! with the offending field instead of a generic deserialisation failure.
//! Upload rows get the same treatment, with the row index added.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    InvalidInteger,
    InvalidTimestamp,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidNumber => "invalid_number",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidTimestamp => "invalid_timestamp",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

/// Treat absent and blank parameters alike; forms submit empty inputs.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}

/// Parse an optional finite decimal parameter.
pub(crate) fn parse_optional_f64(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<f64>, Error> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(field_error(
            field,
            format!("{} must be a finite number", field.as_str()),
            ErrorCode::InvalidNumber,
            Some(raw),
        )),
    }
}

/// Parse a required finite decimal parameter.
pub(crate) fn parse_required_f64(value: Option<&str>, field: FieldName) -> Result<f64, Error> {
    parse_optional_f64(value, field)?.ok_or_else(|| missing_field_error(field))
}

/// Parse an optional integer identifier parameter.
pub(crate) fn parse_optional_i64(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<i64>, Error> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    raw.parse::<i64>().map(Some).map_err(|_| {
        field_error(
            field,
            format!("{} must be an integer", field.as_str()),
            ErrorCode::InvalidInteger,
            Some(raw),
        )
    })
}

/// Numeric body field sent either as a JSON number or as text, as CSV
/// parsers commonly emit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Tag a field error with the index of the body row it came from.
fn at_row(error: Error, row: usize) -> Error {
    let mut details = error.details().cloned().unwrap_or_else(|| json!({}));
    if let Some(fields) = details.as_object_mut() {
        fields.insert("row".to_owned(), json!(row));
    }
    Error::invalid_request(format!("row {row}: {}", error.message())).with_details(details)
}

/// Coerce a required numeric field of body row `row`.
pub(crate) fn coerce_row_f64(
    value: Option<&NumberOrText>,
    field: FieldName,
    row: usize,
) -> Result<f64, Error> {
    let parsed = match value {
        Some(NumberOrText::Number(number)) => Ok(*number),
        Some(NumberOrText::Text(raw)) => parse_required_f64(Some(raw), field),
        None => Err(missing_field_error(field)),
    };
    parsed.map_err(|error| at_row(error, row))
}

/// Coerce an optional RFC 3339 timestamp of body row `row`.
pub(crate) fn coerce_row_timestamp(
    value: Option<&str>,
    field: FieldName,
    row: usize,
) -> Result<Option<DateTime<Utc>>, Error> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
        .map_err(|_| {
            let error = field_error(
                field,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                ErrorCode::InvalidTimestamp,
                Some(raw),
            );
            at_row(error, row)
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    const LAT_MIN: FieldName = FieldName::new("latMin");

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some("12.5"), Some(12.5))]
    #[case(Some(" -3 "), Some(-3.0))]
    fn optional_numbers_accept_blank_and_decimal(
        #[case] raw: Option<&str>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(parse_optional_f64(raw, LAT_MIN).expect("parses"), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("NaN")]
    #[case("inf")]
    #[case("1.2.3")]
    fn malformed_numbers_name_the_field(#[case] raw: &str) {
        let error = parse_optional_f64(Some(raw), LAT_MIN).expect_err("rejected");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "latMin", "value": raw, "code": "invalid_number" }))
        );
    }

    #[rstest]
    fn required_number_reports_missing_field() {
        let error =
            parse_required_f64(None, FieldName::new("latitude")).expect_err("missing value");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "latitude", "code": "missing_field" }))
        );
    }

    #[rstest]
    #[case(Some("7"), Some(7))]
    #[case(Some(""), None)]
    fn integers_parse(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        let parsed = parse_optional_i64(raw, FieldName::new("elementId")).expect("parses");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(NumberOrText::Number(4.5), 4.5)]
    #[case(NumberOrText::Text("4.5".to_owned()), 4.5)]
    #[case(NumberOrText::Text(" -12 ".to_owned()), -12.0)]
    fn row_numbers_accept_numbers_and_text(#[case] raw: NumberOrText, #[case] expected: f64) {
        let value = coerce_row_f64(Some(&raw), FieldName::new("value"), 0).expect("coerces");
        assert!((value - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(Some(NumberOrText::Text("north".to_owned())), "invalid_number")]
    #[case(Some(NumberOrText::Text(String::new())), "missing_field")]
    #[case(None, "missing_field")]
    fn row_number_errors_carry_row_and_field(
        #[case] raw: Option<NumberOrText>,
        #[case] code: &str,
    ) {
        let error = coerce_row_f64(raw.as_ref(), FieldName::new("latitude"), 3)
            .expect_err("rejected");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert!(error.message().starts_with("row 3: "), "{}", error.message());
        let details = error.details().expect("details");
        assert_eq!(details["row"], 3);
        assert_eq!(details["field"], "latitude");
        assert_eq!(details["code"], code);
    }

    #[rstest]
    fn row_timestamps_parse_or_report() {
        let field = FieldName::new("timestamp");
        assert_eq!(coerce_row_timestamp(Some(" "), field, 0).expect("blank"), None);
        let parsed = coerce_row_timestamp(Some("2024-04-01T02:00:00+02:00"), field, 0)
            .expect("parses")
            .expect("present");
        assert_eq!(parsed.to_rfc3339(), "2024-04-01T00:00:00+00:00");

        let error = coerce_row_timestamp(Some("yesterday"), field, 1).expect_err("rejected");
        let details = error.details().expect("details");
        assert_eq!(details["row"], 1);
        assert_eq!(details["code"], "invalid_timestamp");
    }

    #[rstest]
    fn fractional_integer_is_rejected() {
        let error =
            parse_optional_i64(Some("2.5"), FieldName::new("elementId")).expect_err("rejected");
        assert_eq!(
            error.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_integer"))
        );
    }
}
