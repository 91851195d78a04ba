//! Adapter around the externally trained classifier and its label encoder.
//!
//! Both artifacts are decoded once at startup into a [`Classifier`], which is
//! immutable afterwards and shared between requests behind an `Arc`.

mod encoder;
mod forest;

pub use encoder::LabelEncoder;
pub use forest::Forest;

use tracing::debug;

use crate::artifact;
use crate::error::{FeedbackError, Result};
use crate::scores::{SCORE_FIELDS, ScoreVector};

/// Anything that can turn a score vector into a feedback label.
pub trait LabelPredictor: Send + Sync {
    fn predict(&self, scores: &ScoreVector) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct Classifier {
    forest: Forest,
    encoder: LabelEncoder,
    version: String,
}

impl Classifier {
    /// Validates the model against the score layout and checks that every
    /// code the model can emit decodes through `encoder`.
    ///
    /// # Errors
    ///
    /// [`FeedbackError::Configuration`] for a malformed model or encoder,
    /// [`FeedbackError::Decode`] for a model/encoder pair that disagree.
    pub fn new(model: artifact::ClassifierModel, encoder: artifact::LabelEncoder) -> Result<Self> {
        let version = model.version.clone();
        let forest = Forest::from_artifact(model)?;
        let encoder = LabelEncoder::from_artifact(encoder)?;

        if forest.n_features() != SCORE_FIELDS.len() {
            return Err(FeedbackError::Configuration(format!(
                "model expects {} features, scores provide {}",
                forest.n_features(),
                SCORE_FIELDS.len()
            )));
        }
        if !forest.feature_names().is_empty()
            && forest.feature_names().iter().map(String::as_str).ne(SCORE_FIELDS)
        {
            return Err(FeedbackError::Configuration(format!(
                "model feature order {:?} does not match {:?}",
                forest.feature_names(),
                SCORE_FIELDS
            )));
        }
        for code in forest.classes() {
            encoder.inverse_transform(*code)?;
        }

        debug!(
            trees = forest.n_trees(),
            classes = forest.classes().len(),
            labels = encoder.len(),
            version = %version,
            "Classifier ready"
        );

        Ok(Self {
            forest,
            encoder,
            version,
        })
    }

    /// Classifies a raw feature vector given in [`SCORE_FIELDS`] order.
    pub fn classify(&self, features: &[f64]) -> Result<String> {
        let code = self.forest.predict_code(features)?;
        Ok(self.encoder.inverse_transform(code)?.to_string())
    }

    pub fn labels(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl LabelPredictor for Classifier {
    fn predict(&self, scores: &ScoreVector) -> Result<String> {
        self.classify(&scores.features())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::artifact::{ClassifierModel, DecisionTree, LabelEncoder, TreeNode};
    use crate::scores::SCORE_FIELDS;

    /// Single stump: content_quality <= 6 is "Needs Improvement", else
    /// "Excellent".
    pub fn stump_model() -> ClassifierModel {
        ClassifierModel {
            n_features: 6,
            feature_names: SCORE_FIELDS.iter().map(|s| s.to_string()).collect(),
            classes: vec![0, 1],
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode {
                        feature: 0,
                        threshold: 6.0,
                        left: 1,
                        right: 2,
                        value: vec![],
                    },
                    TreeNode {
                        feature: -1,
                        value: vec![0.0, 4.0],
                        ..Default::default()
                    },
                    TreeNode {
                        feature: -1,
                        value: vec![3.0, 1.0],
                        ..Default::default()
                    },
                ],
            }],
            version: "stump-1".to_string(),
        }
    }

    pub fn encoder() -> LabelEncoder {
        LabelEncoder {
            classes: vec!["Excellent".to_string(), "Needs Improvement".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{encoder, stump_model};
    use super::*;

    fn scores(content_quality: f64) -> ScoreVector {
        ScoreVector {
            content_quality,
            presentation_skills: 7.0,
            slide_design: 7.0,
            engagement: 7.0,
            time_management: 7.0,
            year: 2.0,
        }
    }

    #[test]
    fn test_predict_decodes_label() {
        let clf = Classifier::new(stump_model(), encoder()).unwrap();
        assert_eq!(clf.predict(&scores(9.0)).unwrap(), "Excellent");
        assert_eq!(clf.predict(&scores(3.0)).unwrap(), "Needs Improvement");
        assert_eq!(clf.version(), "stump-1");
    }

    #[test]
    fn test_predict_is_deterministic() {
        let clf = Classifier::new(stump_model(), encoder()).unwrap();
        let first = clf.predict(&scores(6.5)).unwrap();
        for _ in 0..10 {
            assert_eq!(clf.predict(&scores(6.5)).unwrap(), first);
        }
    }

    #[test]
    fn test_classify_rejects_short_vector() {
        let clf = Classifier::new(stump_model(), encoder()).unwrap();
        assert!(matches!(
            clf.classify(&[8.0, 8.0, 8.0, 8.0, 8.0]),
            Err(FeedbackError::Inference(_))
        ));
    }

    #[test]
    fn test_unpaired_encoder_fails_at_construction() {
        let mut model = stump_model();
        model.classes = vec![0, 5];
        assert!(matches!(
            Classifier::new(model, encoder()),
            Err(FeedbackError::Decode { code: 5, known: 2 })
        ));
    }

    #[test]
    fn test_feature_order_must_match_scores() {
        let mut model = stump_model();
        model.feature_names.swap(0, 1);
        assert!(matches!(
            Classifier::new(model, encoder()),
            Err(FeedbackError::Configuration(_))
        ));
    }

    #[test]
    fn test_feature_count_must_match_scores() {
        let mut model = stump_model();
        model.n_features = 5;
        model.feature_names.pop();
        assert!(matches!(
            Classifier::new(model, encoder()),
            Err(FeedbackError::Configuration(_))
        ));
    }

    #[test]
    fn test_unnamed_features_are_accepted() {
        let mut model = stump_model();
        model.feature_names.clear();
        assert!(Classifier::new(model, encoder()).is_ok());
    }
}
