//! Runtime configuration: where the artifacts live.
//!
//! Command-line values win over environment variables, which win over the
//! defaults. `.env` files are loaded by the binary before this runs.

use anyhow::{Context, Result};

use crate::artifacts::ArtifactLocation;

pub const MODEL_ENV: &str = "STUDENT_FEEDBACK_MODEL";
pub const ENCODER_ENV: &str = "STUDENT_FEEDBACK_ENCODER";

pub const DEFAULT_MODEL: &str = "student_feedback_model.pb";
pub const DEFAULT_ENCODER: &str = "feedback_encoder.pb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub model: ArtifactLocation,
    pub encoder: ArtifactLocation,
}

impl ArtifactConfig {
    pub fn resolve(model: Option<String>, encoder: Option<String>) -> Result<Self> {
        Self::resolve_with(model, encoder, |key| std::env::var(key).ok())
    }

    /// Same as [`Self::resolve`] with an explicit environment lookup.
    pub fn resolve_with(
        model: Option<String>,
        encoder: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let model = model
            .or_else(|| env(MODEL_ENV))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let encoder = encoder
            .or_else(|| env(ENCODER_ENV))
            .unwrap_or_else(|| DEFAULT_ENCODER.to_string());

        Ok(Self {
            model: model
                .parse()
                .with_context(|| format!("invalid model location '{model}'"))?,
            encoder: encoder
                .parse()
                .with_context(|| format!("invalid encoder location '{encoder}'"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let cfg = ArtifactConfig::resolve_with(None, None, |_| None).unwrap();
        assert_eq!(cfg.model, ArtifactLocation::File(PathBuf::from(DEFAULT_MODEL)));
        assert_eq!(
            cfg.encoder,
            ArtifactLocation::File(PathBuf::from(DEFAULT_ENCODER))
        );
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env: HashMap<&str, &str> = [(MODEL_ENV, "s3://models/clf.pb")].into();
        let cfg =
            ArtifactConfig::resolve_with(None, None, |k| env.get(k).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(
            cfg.model,
            ArtifactLocation::S3 {
                bucket: "models".to_string(),
                key: "clf.pb".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_overrides_env() {
        let cfg = ArtifactConfig::resolve_with(
            Some("local.pb".to_string()),
            None,
            |_| Some("https://example.org/other.pb".to_string()),
        )
        .unwrap();
        assert_eq!(cfg.model, ArtifactLocation::File(PathBuf::from("local.pb")));
        assert_eq!(
            cfg.encoder,
            ArtifactLocation::Http("https://example.org/other.pb".to_string())
        );
    }

    #[test]
    fn test_invalid_location_is_reported() {
        let err = ArtifactConfig::resolve_with(Some("s3://nokey".to_string()), None, |_| None)
            .unwrap_err();
        assert!(err.to_string().contains("invalid model location"));
    }
}
