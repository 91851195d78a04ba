use crate::artifact;
use crate::error::{FeedbackError, Result};

/// Inverse of the label encoding applied at training time: raw code `i`
/// decodes to `classes[i]`.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(FeedbackError::Configuration(
                "label encoder has no classes".to_string(),
            ));
        }
        if let Some(pos) = classes.iter().position(|c| c.trim().is_empty()) {
            return Err(FeedbackError::Configuration(format!(
                "label encoder class {pos} is blank"
            )));
        }
        Ok(Self { classes })
    }

    pub fn from_artifact(encoder: artifact::LabelEncoder) -> Result<Self> {
        Self::new(encoder.classes)
    }

    pub fn inverse_transform(&self, code: i64) -> Result<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or(FeedbackError::Decode {
                code,
                known: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::new(vec!["Average".into(), "Excellent".into(), "Poor".into()]).unwrap()
    }

    #[test]
    fn test_inverse_transform_known_codes() {
        let enc = encoder();
        assert_eq!(enc.inverse_transform(0).unwrap(), "Average");
        assert_eq!(enc.inverse_transform(2).unwrap(), "Poor");
    }

    #[test]
    fn test_inverse_transform_unknown_code() {
        let enc = encoder();
        assert!(matches!(
            enc.inverse_transform(3),
            Err(FeedbackError::Decode { code: 3, known: 3 })
        ));
        assert!(matches!(
            enc.inverse_transform(-1),
            Err(FeedbackError::Decode { code: -1, .. })
        ));
    }

    #[test]
    fn test_empty_encoder_is_a_configuration_error() {
        assert!(matches!(
            LabelEncoder::new(vec![]),
            Err(FeedbackError::Configuration(_))
        ));
        assert!(LabelEncoder::new(vec!["Good".into(), " ".into()]).is_err());
    }
}
