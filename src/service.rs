//! Request orchestration.
//!
//! Two entry points share the feedback tables:
//!
//! - the scores entry ([`FeedbackService::respond`]) averages the five
//!   criteria, asks the classifier for a label and attaches both the
//!   year-specific and the overall text;
//! - the average entry ([`overall_response`]) takes a caller-supplied average
//!   as-is and returns only the overall text. It skips the averaging step on
//!   purpose.
//!
//! [`FeedbackService::handle_predict`] and [`handle_overall`] are the error
//! boundary: every per-request failure becomes a structured [`Reply`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::classifier::{Classifier, LabelPredictor};
use crate::error::{ErrorResponse, FeedbackError, Result};
use crate::feedback::{overall_feedback, select_tier, tier_feedback};
use crate::scores::{AverageScore, ScoreVector};

/// Label plus both feedback texts. Always complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    #[serde(rename = "feedback")]
    pub classifier_label: String,
    #[serde(rename = "yearly_feedback")]
    pub year_specific_feedback: String,
    pub overall_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallFeedbackResponse {
    pub overall_feedback: String,
}

/// Transport-neutral reply: an HTTP-style status and a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(body: &impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(&FeedbackError::Configuration(format!(
                "response serialization failed: {e}"
            ))),
        }
    }

    fn error(err: &FeedbackError) -> Self {
        let body = serde_json::to_value(ErrorResponse::from(err))
            .unwrap_or_else(|_| Value::String(err.to_string()));
        Self {
            status: err.status_code(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

pub struct FeedbackService<P = Classifier> {
    predictor: Arc<P>,
}

impl<P> Clone for FeedbackService<P> {
    fn clone(&self) -> Self {
        Self {
            predictor: Arc::clone(&self.predictor),
        }
    }
}

impl<P: LabelPredictor> FeedbackService<P> {
    pub fn new(predictor: Arc<P>) -> Self {
        Self { predictor }
    }

    /// Builds the full response for already decoded scores.
    pub fn respond(&self, scores: &ScoreVector) -> Result<FeedbackResponse> {
        let average = scores.average();
        let label = self.predictor.predict(scores)?;
        let tier = select_tier(Some(scores.year));

        debug!(
            average = average.value(),
            tier = %tier,
            label = %label,
            "Feedback assembled"
        );

        Ok(FeedbackResponse {
            classifier_label: label,
            year_specific_feedback: tier_feedback(tier, average).to_string(),
            overall_feedback: overall_feedback(average).to_string(),
        })
    }

    /// Decodes a scores request body and answers it.
    pub fn predict(&self, body: &Value) -> Result<FeedbackResponse> {
        let scores = ScoreVector::from_json(body)?;
        self.respond(&scores)
    }

    /// Error boundary for the scores entry; `body` is raw JSON text.
    pub fn handle_predict(&self, body: &str) -> Reply {
        match parse_body(body).and_then(|v| self.predict(&v)) {
            Ok(resp) => Reply::ok(&resp),
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "Predict request rejected");
                Reply::error(&err)
            }
        }
    }
}

/// Answers the average entry. No classifier involved.
pub fn overall_response(body: &Value) -> Result<OverallFeedbackResponse> {
    let average = AverageScore::from_json(body)?;
    Ok(OverallFeedbackResponse {
        overall_feedback: overall_feedback(average).to_string(),
    })
}

/// Error boundary for the average entry; `body` is raw JSON text.
pub fn handle_overall(body: &str) -> Reply {
    match parse_body(body).and_then(|v| overall_response(&v)) {
        Ok(resp) => Reply::ok(&resp),
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "Overall feedback request rejected");
            Reply::error(&err)
        }
    }
}

fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| FeedbackError::Validation(format!("malformed JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::fixtures::{encoder, stump_model};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and always answers with the same label.
    struct CountingPredictor {
        calls: AtomicUsize,
    }

    impl LabelPredictor for CountingPredictor {
        fn predict(&self, _scores: &ScoreVector) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Good".to_string())
        }
    }

    struct BrokenPredictor;

    impl LabelPredictor for BrokenPredictor {
        fn predict(&self, _scores: &ScoreVector) -> Result<String> {
            Err(FeedbackError::Inference("shape mismatch".to_string()))
        }
    }

    fn counting() -> (FeedbackService<CountingPredictor>, Arc<CountingPredictor>) {
        let predictor = Arc::new(CountingPredictor {
            calls: AtomicUsize::new(0),
        });
        (FeedbackService::new(Arc::clone(&predictor)), predictor)
    }

    fn body(score: f64, year: Value) -> Value {
        json!({
            "content_quality": score,
            "presentation_skills": score,
            "slide_design": score,
            "engagement": score,
            "time_management": score,
            "year": year,
        })
    }

    #[test]
    fn test_year_two_high_scores() {
        let (svc, _) = counting();
        let resp = svc.predict(&body(9.0, json!(2))).unwrap();

        assert_eq!(resp.classifier_label, "Good");
        assert!(resp.year_specific_feedback.starts_with("Year 2: Great improvement"));
        assert!(resp.overall_feedback.starts_with("Your overall performance is truly exceptional"));
    }

    #[test]
    fn test_unknown_year_repeats_overall_text() {
        let (svc, _) = counting();
        let resp = svc.predict(&body(4.0, json!(99))).unwrap();

        assert_eq!(resp.year_specific_feedback, resp.overall_feedback);
        assert!(resp.overall_feedback.starts_with("Your academic performance indicates a need"));
    }

    #[test]
    fn test_overall_feedback_always_present() {
        let (svc, _) = counting();
        for year in [json!(0), json!(1), json!(4), json!(5), json!(-2), json!(2.5)] {
            let resp = svc.predict(&body(6.0, year)).unwrap();
            assert!(!resp.overall_feedback.is_empty());
            assert!(!resp.year_specific_feedback.is_empty());
        }
    }

    #[test]
    fn test_missing_field_skips_classifier() {
        let (svc, predictor) = counting();
        let mut req = body(8.0, json!(1));
        req.as_object_mut().unwrap().remove("content_quality");

        let err = svc.predict(&req).unwrap_err();
        assert!(matches!(err, FeedbackError::Validation(_)));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wire_keys_match_public_contract() {
        let (svc, _) = counting();
        let reply = svc.handle_predict(&body(7.0, json!(3)).to_string());

        assert!(reply.is_success());
        let obj = reply.body.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["feedback", "overall_feedback", "yearly_feedback"]);
        assert_eq!(
            obj["yearly_feedback"],
            "Year 3: Solid results. Aim for excellence next year."
        );
    }

    #[test]
    fn test_handle_predict_reports_validation_error() {
        let (svc, predictor) = counting();
        let reply = svc.handle_predict(r#"{"year": 2}"#);

        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["kind"], "validation_error");
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_string_score_is_rejected_before_classifier() {
        let (svc, predictor) = counting();
        let mut req = body(9.0, json!(2));
        req["content_quality"] = json!("9");

        let reply = svc.handle_predict(&req.to_string());
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["kind"], "validation_error");
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handle_predict_reports_malformed_json() {
        let (svc, _) = counting();
        let reply = svc.handle_predict("{not json");
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["kind"], "validation_error");
    }

    #[test]
    fn test_inference_failure_is_contained() {
        let svc = FeedbackService::new(Arc::new(BrokenPredictor));
        let reply = svc.handle_predict(&body(8.0, json!(1)).to_string());
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["kind"], "inference_error");

        // the service keeps answering
        let again = svc.handle_predict(&body(8.0, json!(1)).to_string());
        assert_eq!(again, reply);
    }

    #[test]
    fn test_with_real_classifier() {
        let clf = Classifier::new(stump_model(), encoder()).unwrap();
        let svc = FeedbackService::new(Arc::new(clf));

        let resp = svc.predict(&body(9.0, json!(4))).unwrap();
        assert_eq!(resp.classifier_label, "Excellent");
        assert_eq!(
            resp.year_specific_feedback,
            "Year 4: Excellent finish to the academic journey!"
        );
    }

    #[test]
    fn test_overall_entry_uses_average_as_given() {
        let resp = overall_response(&json!({ "average": 7.0 })).unwrap();
        assert!(resp.overall_feedback.starts_with("You have established yourself"));

        let reply = handle_overall(r#"{"average": "abc"}"#);
        assert_eq!(reply.status, 400);

        let reply = handle_overall(r#"{"average": 12}"#);
        assert!(reply.is_success());
        assert!(
            reply.body["overall_feedback"]
                .as_str()
                .unwrap()
                .starts_with("Your overall performance is truly exceptional")
        );
    }
}
