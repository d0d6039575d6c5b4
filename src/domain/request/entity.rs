//! Prediction request and resolved lookup query

use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Body of a prediction request: a single date or a whole month.
///
/// Empty strings are treated the same as absent fields. Only a JSON object
/// deserializes; arrays are not matched to fields by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl PredictionRequest {
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            month: None,
        }
    }

    pub fn for_month(month: impl Into<String>) -> Self {
        Self {
            date: None,
            month: Some(month.into()),
        }
    }

    /// The `date` field, if present and non-blank
    pub fn date_field(&self) -> Option<&str> {
        non_blank(self.date.as_deref())
    }

    /// The `month` field, if present and non-blank
    pub fn month_field(&self) -> Option<&str> {
        non_blank(self.month.as_deref())
    }
}

/// Blank is decided on the trimmed value; the raw value is what gets parsed
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl<'de> Deserialize<'de> for PredictionRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RequestVisitor)
    }
}

struct RequestVisitor;

impl<'de> Visitor<'de> for RequestVisitor {
    type Value = PredictionRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object with a `date` or `month` field")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut date: Option<Option<String>> = None;
        let mut month: Option<Option<String>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "date" => {
                    if date.is_some() {
                        return Err(de::Error::duplicate_field("date"));
                    }
                    date = Some(map.next_value()?);
                }
                "month" => {
                    if month.is_some() {
                        return Err(de::Error::duplicate_field("month"));
                    }
                    month = Some(map.next_value()?);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(PredictionRequest {
            date: date.flatten(),
            month: month.flatten(),
        })
    }
}

/// Concrete lookup key for the dataset index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQuery {
    Day(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for DateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date),
            Self::Range { start, end } => write!(f, "{}..={}", start, end),
        }
    }
}
