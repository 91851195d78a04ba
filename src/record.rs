use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;
use crate::scores::ScoreVector;
use crate::service::FeedbackResponse;

/// One evaluated student, flattened for CSV.
///
/// Error rows keep whatever inputs were readable and carry `error_type` and
/// `error_message` instead of a label and feedback.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub timestamp: DateTime<Utc>,
    pub student_id: Option<String>,

    // inputs
    pub content_quality: Option<f64>,
    pub presentation_skills: Option<f64>,
    pub slide_design: Option<f64>,
    pub engagement: Option<f64>,
    pub time_management: Option<f64>,
    pub year: Option<f64>,

    // outputs
    pub average: Option<f64>,
    pub label: Option<String>,
    pub yearly_feedback: Option<String>,
    pub overall_feedback: Option<String>,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl FeedbackRecord {
    pub fn from_response(scores: &ScoreVector, response: &FeedbackResponse) -> Self {
        FeedbackRecord {
            timestamp: Utc::now(),
            content_quality: Some(scores.content_quality),
            presentation_skills: Some(scores.presentation_skills),
            slide_design: Some(scores.slide_design),
            engagement: Some(scores.engagement),
            time_management: Some(scores.time_management),
            year: Some(scores.year),
            average: Some(scores.average().value()),
            label: Some(response.classifier_label.clone()),
            yearly_feedback: Some(response.year_specific_feedback.clone()),
            overall_feedback: Some(response.overall_feedback.clone()),
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        FeedbackRecord {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    pub fn from_feedback_error(err: &FeedbackError) -> Self {
        Self::from_error(err.kind(), &err.to_string())
    }

    pub fn with_student_id(mut self, student_id: Option<&str>) -> Self {
        self.student_id = student_id.map(str::to_string);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error_type.is_some()
    }

    /// The inputs of a successful record, if all six are present.
    pub fn scores(&self) -> Option<ScoreVector> {
        if self.is_error() {
            return None;
        }
        Some(ScoreVector {
            content_quality: self.content_quality?,
            presentation_skills: self.presentation_skills?,
            slide_design: self.slide_design?,
            engagement: self.engagement?,
            time_management: self.time_management?,
            year: self.year?,
        })
    }
}
