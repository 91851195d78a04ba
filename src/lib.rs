pub mod artifacts;
pub mod batch;
pub mod classifier;
pub mod cohort;
pub mod config;
pub mod error;
pub mod feedback;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod scores;
pub mod service;

pub mod artifact {
    include!(concat!(env!("OUT_DIR"), "/student_feedback.artifact.rs"));
}

pub use classifier::{Classifier, LabelPredictor};
pub use error::{FeedbackError, Result};
pub use feedback::{Band, Tier, overall_feedback, select_tier, tier_feedback};
pub use scores::{AverageScore, ScoreVector};
pub use service::{FeedbackResponse, FeedbackService, OverallFeedbackResponse};

/// Classifies six raw values given in [`scores::SCORE_FIELDS`] order.
pub fn classify(classifier: &Classifier, scores: &[f64]) -> Result<String> {
    classifier.classify(scores)
}
