//! Locating and loading the model and encoder artifacts.
//!
//! An artifact lives on local disk, behind an HTTP(S) URL or in S3. Loading
//! happens once, before any request is handled.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::error::FeedbackError;
use crate::fetch::{BasicClient, fetch_bytes};
use crate::parser::{parse_encoder, parse_model};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    File(PathBuf),
    Http(String),
    S3 { bucket: String, key: String },
}

impl FromStr for ArtifactLocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("artifact location is empty");
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(ArtifactLocation::Http(s.to_string()));
        }
        if let Some(rest) = s.strip_prefix("s3://") {
            let (bucket, key) = rest
                .split_once('/')
                .filter(|(b, k)| !b.is_empty() && !k.is_empty())
                .with_context(|| format!("S3 location '{s}' must look like s3://bucket/key"))?;
            return Ok(ArtifactLocation::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        Ok(ArtifactLocation::File(PathBuf::from(s)))
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactLocation::File(path) => write!(f, "{}", path.display()),
            ArtifactLocation::Http(url) => f.write_str(url),
            ArtifactLocation::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
        }
    }
}

/// Reads the raw bytes behind `location`.
#[tracing::instrument(skip_all, fields(location = %location))]
pub async fn read_artifact(location: &ArtifactLocation) -> Result<Bytes> {
    let bytes = match location {
        ArtifactLocation::File(path) => Bytes::from(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        ArtifactLocation::Http(url) => {
            let client = BasicClient::new()?;
            fetch_bytes(&client, url)
                .await
                .with_context(|| format!("failed to download {url}"))?
        }
        ArtifactLocation::S3 { bucket, key } => {
            let config = aws_config::load_from_env().await;
            let s3 = aws_sdk_s3::Client::new(&config);
            let object = s3
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .with_context(|| format!("S3 GetObject failed for s3://{bucket}/{key}"))?;
            object.body.collect().await?.into_bytes()
        }
    };
    debug!(bytes = bytes.len(), "Artifact read");
    Ok(bytes)
}

/// Loads, decodes and pairs both artifacts.
///
/// Any failure here is a [`FeedbackError::Configuration`] (or
/// [`FeedbackError::Decode`] for a mismatched pair) and must stop startup.
#[tracing::instrument(skip_all, fields(model = %model, encoder = %encoder))]
pub async fn load_classifier(
    model: &ArtifactLocation,
    encoder: &ArtifactLocation,
) -> std::result::Result<Classifier, FeedbackError> {
    let model_bytes = read_artifact(model)
        .await
        .map_err(|e| FeedbackError::Configuration(format!("{e:#}")))?;
    let encoder_bytes = read_artifact(encoder)
        .await
        .map_err(|e| FeedbackError::Configuration(format!("{e:#}")))?;

    let classifier = Classifier::new(parse_model(&model_bytes)?, parse_encoder(&encoder_bytes)?)?;

    info!(
        trees = classifier.n_trees(),
        labels = ?classifier.labels(),
        version = classifier.version(),
        "Classifier loaded"
    );
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::fixtures::{encoder, stump_model};
    use prost::Message;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            "models/clf.pb".parse::<ArtifactLocation>().unwrap(),
            ArtifactLocation::File(PathBuf::from("models/clf.pb"))
        );
        assert_eq!(
            "https://example.org/clf.pb".parse::<ArtifactLocation>().unwrap(),
            ArtifactLocation::Http("https://example.org/clf.pb".to_string())
        );
        assert_eq!(
            "s3://models/feedback/clf.pb.gz"
                .parse::<ArtifactLocation>()
                .unwrap(),
            ArtifactLocation::S3 {
                bucket: "models".to_string(),
                key: "feedback/clf.pb.gz".to_string(),
            }
        );
    }

    #[test]
    fn test_reject_bad_locations() {
        assert!("".parse::<ArtifactLocation>().is_err());
        assert!("s3://bucket-only".parse::<ArtifactLocation>().is_err());
        assert!("s3:///key".parse::<ArtifactLocation>().is_err());
    }

    #[test]
    fn test_display_round_trips_s3() {
        let loc: ArtifactLocation = "s3://b/k.pb".parse().unwrap();
        assert_eq!(loc.to_string(), "s3://b/k.pb");
    }

    #[tokio::test]
    async fn test_load_classifier_from_files() {
        let model_path = temp_path("student_feedback_test_model.pb");
        let encoder_path = temp_path("student_feedback_test_encoder.pb");
        fs::write(&model_path, stump_model().encode_to_vec()).unwrap();
        fs::write(&encoder_path, encoder().encode_to_vec()).unwrap();

        let clf = load_classifier(
            &ArtifactLocation::File(model_path.clone()),
            &ArtifactLocation::File(encoder_path.clone()),
        )
        .await
        .unwrap();
        assert_eq!(clf.labels(), ["Excellent", "Needs Improvement"]);

        fs::remove_file(model_path).unwrap();
        fs::remove_file(encoder_path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_artifact_is_configuration_error() {
        let missing = ArtifactLocation::File(temp_path("student_feedback_does_not_exist.pb"));
        let err = load_classifier(&missing, &missing).await.unwrap_err();
        assert!(matches!(err, FeedbackError::Configuration(_)));
    }
}
