//! Protobuf decoding for the classifier and label encoder artifacts.

use std::borrow::Cow;
use std::io::Read;

use flate2::read::GzDecoder;
use prost::Message;

use crate::artifact::{ClassifierModel, LabelEncoder};
use crate::error::{FeedbackError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decodes a protobuf-encoded [`ClassifierModel`], gunzipping it first when
/// the bytes carry a gzip header.
///
/// # Errors
///
/// Returns [`FeedbackError::Configuration`] if the bytes are not a valid
/// (optionally gzipped) `ClassifierModel`.
pub fn parse_model(bytes: &[u8]) -> Result<ClassifierModel> {
    let raw = decompress(bytes)?;
    ClassifierModel::decode(raw.as_ref())
        .map_err(|e| FeedbackError::Configuration(format!("corrupt classifier artifact: {e}")))
}

/// Decodes a protobuf-encoded [`LabelEncoder`], gunzipping it when needed.
pub fn parse_encoder(bytes: &[u8]) -> Result<LabelEncoder> {
    let raw = decompress(bytes)?;
    LabelEncoder::decode(raw.as_ref())
        .map_err(|e| FeedbackError::Configuration(format!("corrupt label encoder artifact: {e}")))
}

fn decompress(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| FeedbackError::Configuration(format!("corrupt gzip artifact: {e}")))?;
    Ok(Cow::Owned(out))
}
