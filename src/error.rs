//! Error taxonomy for the scoring and feedback core.

use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong between a raw request and a
/// [`FeedbackResponse`](crate::service::FeedbackResponse).
///
/// Validation and inference failures are per-request and client-facing.
/// Decode and configuration failures point at a broken model/encoder pair
/// and are meant to stop the process before it handles any request.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("predicted code {code} is outside the encoder's {known} known labels")]
    Decode { code: i64, known: usize },

    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;

impl FeedbackError {
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("missing required field '{field}'"))
    }

    pub fn not_numeric(field: &str) -> Self {
        Self::Validation(format!("field '{field}' must be a finite number"))
    }

    /// Stable machine-readable name, used in error responses and error records.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedbackError::Validation(_) => "validation_error",
            FeedbackError::Inference(_) => "inference_error",
            FeedbackError::Decode { .. } => "decode_error",
            FeedbackError::Configuration(_) => "configuration_error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FeedbackError::Validation(_) | FeedbackError::Inference(_)
        )
    }

    /// HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

/// Structured body returned in place of a response when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

impl From<&FeedbackError> for ErrorResponse {
    fn from(err: &FeedbackError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}
