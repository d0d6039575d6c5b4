//! Prediction response body

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::domain::{PredictionEntry, PredictionResult};

/// `{"<ISO date>": {"actual_UD": .., "predicted_UD": ..}, ...}` in date order
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResponse(PredictionResult);

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self(result)
    }
}

impl Serialize for PredictionResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.0.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for entry in entries {
            map.serialize_entry(&entry.date.format("%Y-%m-%d").to_string(), &EntryBody(entry))?;
        }
        map.end()
    }
}

struct EntryBody<'a>(&'a PredictionEntry);

impl Serialize for EntryBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("PredictionEntry", 2)?;
        body.serialize_field("actual_UD", &self.0.actual)?;
        body.serialize_field("predicted_UD", &self.0.predicted)?;
        body.end()
    }
}
