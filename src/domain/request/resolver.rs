//! Date/month request resolution

use chrono::{Months, NaiveDate};
use thiserror::Error;

use super::{DateQuery, PredictionRequest};
use crate::domain::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Message returned when neither field is supplied
pub const MISSING_DATE_OR_MONTH: &str = "Please specify a date or month";

/// Request-level validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please specify a date or month")]
    MissingDateOrMonth,

    #[error("Invalid date '{0}': expected format YYYY-MM-DD")]
    MalformedDate(String),

    #[error("Invalid month '{0}': expected format YYYY-MM")]
    MalformedMonth(String),
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Translates a [`PredictionRequest`] into a [`DateQuery`].
///
/// `date` wins over `month` when both are supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver;

impl DateResolver {
    pub fn resolve(request: &PredictionRequest) -> Result<DateQuery, ValidationError> {
        if let Some(raw) = request.date_field() {
            return parse_date(raw).map(DateQuery::Day);
        }

        if let Some(raw) = request.month_field() {
            let (start, end) = parse_month(raw)?;
            return Ok(DateQuery::Range { start, end });
        }

        Err(ValidationError::MissingDateOrMonth)
    }
}

/// Zero-padded, unsigned `YYYY-MM-DD` or `YYYY-MM`; chrono alone also
/// accepts signed years and unpadded fields
fn has_shape(raw: &str, shape: &str) -> bool {
    raw.len() == shape.len()
        && raw.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'9' => c.is_ascii_digit(),
            _ => c == s,
        })
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let malformed = || ValidationError::MalformedDate(raw.to_string());

    if !has_shape(raw, "9999-99-99") {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| malformed())
}

/// First and last calendar day of a `YYYY-MM` month
fn parse_month(raw: &str) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let malformed = || ValidationError::MalformedMonth(raw.to_string());

    if !has_shape(raw, "9999-99") {
        return Err(malformed());
    }

    let start = NaiveDate::parse_from_str(&format!("{}-01", raw), DATE_FORMAT)
        .map_err(|_| malformed())?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(malformed)?;

    Ok((start, end))
}
