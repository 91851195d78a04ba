//! Score inputs and the averaging rule.
//!
//! The six fields are kept in the order the classifier was trained on.
//! Changing [`SCORE_FIELDS`] means retraining the model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FeedbackError, Result};

/// Feature order expected by the classifier.
pub const SCORE_FIELDS: [&str; 6] = [
    "content_quality",
    "presentation_skills",
    "slide_design",
    "engagement",
    "time_management",
    "year",
];

/// The assessed criteria, i.e. every field except `year`.
pub const CRITERIA: [&str; 5] = [
    "content_quality",
    "presentation_skills",
    "slide_design",
    "engagement",
    "time_management",
];

/// One student's scores as submitted for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub content_quality: f64,
    pub presentation_skills: f64,
    pub slide_design: f64,
    pub engagement: f64,
    pub time_management: f64,
    pub year: f64,
}

/// Mean of the five criteria.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AverageScore(pub f64);

impl ScoreVector {
    /// Decodes a request body. Every field is required and must be a JSON
    /// number; strings, even numeric ones, are a validation error.
    pub fn from_json(body: &Value) -> Result<Self> {
        let map = as_object(body)?;
        Self::from_map(map)
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            content_quality: numeric_field(map, "content_quality", Strings::Reject)?,
            presentation_skills: numeric_field(map, "presentation_skills", Strings::Reject)?,
            slide_design: numeric_field(map, "slide_design", Strings::Reject)?,
            engagement: numeric_field(map, "engagement", Strings::Reject)?,
            time_management: numeric_field(map, "time_management", Strings::Reject)?,
            year: numeric_field(map, "year", Strings::Reject)?,
        })
    }

    /// All six values in [`SCORE_FIELDS`] order.
    pub fn features(&self) -> [f64; 6] {
        [
            self.content_quality,
            self.presentation_skills,
            self.slide_design,
            self.engagement,
            self.time_management,
            self.year,
        ]
    }

    pub fn criteria(&self) -> [f64; 5] {
        [
            self.content_quality,
            self.presentation_skills,
            self.slide_design,
            self.engagement,
            self.time_management,
        ]
    }

    /// Arithmetic mean of the criteria. `year` never takes part.
    pub fn average(&self) -> AverageScore {
        let criteria = self.criteria();
        AverageScore(criteria.iter().sum::<f64>() / criteria.len() as f64)
    }
}

impl AverageScore {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Decodes the `average` key of the overall-only request body. A numeric
    /// string such as `"7.5"` is accepted here.
    pub fn from_json(body: &Value) -> Result<Self> {
        let map = as_object(body)?;
        Ok(Self(numeric_field(map, "average", Strings::Parse)?))
    }
}

impl From<f64> for AverageScore {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| FeedbackError::Validation("request body must be a JSON object".to_string()))
}

#[derive(Clone, Copy)]
enum Strings {
    Reject,
    Parse,
}

fn numeric_field(map: &Map<String, Value>, field: &str, strings: Strings) -> Result<f64> {
    let value = match map.get(field) {
        None | Some(Value::Null) => return Err(FeedbackError::missing_field(field)),
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if matches!(strings, Strings::Parse) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeedbackError::not_numeric(field))
}
