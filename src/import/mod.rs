//! Shape-detecting dataset import.
//!
//! Two JSON layouts are accepted: the raw corner-format array and the
//! internal `{"images": [...]}` object. Decoding tries each schema in order
//! and reports which one matched, so callers never guess from field
//! presence.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::conversion::raw_to_internal_with_palette;
use crate::error::BboxError;
use crate::model::{Dataset, LabelPalette, RawAnnotationDataset};

/// Which layout an imported document used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetShape {
    /// Array of raw corner-format items.
    Raw,
    /// Object with an `images` array.
    Internal,
}

impl fmt::Display for DatasetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetShape::Raw => write!(f, "raw"),
            DatasetShape::Internal => write!(f, "internal"),
        }
    }
}

/// A decoded document plus the layout it was decoded from.
#[derive(Clone, Debug)]
pub struct DecodedDataset {
    pub shape: DatasetShape,
    pub dataset: Dataset,
    /// The raw items, kept when the input was raw (for conversion reports).
    pub raw: Option<RawAnnotationDataset>,
}

/// Reads and decodes a dataset file of either layout.
pub fn read_dataset(path: &Path, palette: &LabelPalette) -> Result<DecodedDataset, BboxError> {
    let text = fs::read_to_string(path).map_err(BboxError::Io)?;
    decode_at(&text, path, palette)
}

/// Decodes a dataset from JSON text using the built-in palette.
pub fn decode_dataset(text: &str) -> Result<DecodedDataset, BboxError> {
    decode_at(text, Path::new("<string>"), &LabelPalette::builtin())
}

/// Decodes a dataset from JSON text.
pub fn decode_dataset_with_palette(
    text: &str,
    palette: &LabelPalette,
) -> Result<DecodedDataset, BboxError> {
    decode_at(text, Path::new("<string>"), palette)
}

/// Decodes a dataset from JSON bytes.
pub fn decode_dataset_slice(bytes: &[u8]) -> Result<DecodedDataset, BboxError> {
    let path = Path::new("<bytes>");
    let value: Value = serde_json::from_slice(bytes).map_err(|source| BboxError::JsonParse {
        path: path.to_path_buf(),
        source,
    })?;
    decode_value(value, path, &LabelPalette::builtin())
}

fn decode_at(text: &str, path: &Path, palette: &LabelPalette) -> Result<DecodedDataset, BboxError> {
    let value: Value = serde_json::from_str(text).map_err(|source| BboxError::JsonParse {
        path: path.to_path_buf(),
        source,
    })?;
    decode_value(value, path, palette)
}

fn decode_value(
    value: Value,
    path: &Path,
    palette: &LabelPalette,
) -> Result<DecodedDataset, BboxError> {
    // Both attempts need the value; the raw attempt works on a clone.
    let raw_error = match serde_json::from_value::<RawAnnotationDataset>(value.clone()) {
        Ok(raw) => {
            let dataset = raw_to_internal_with_palette(&raw, palette)?;
            log::info!(
                "decoded {} as raw dataset ({} image(s))",
                path.display(),
                dataset.images.len()
            );
            return Ok(DecodedDataset {
                shape: DatasetShape::Raw,
                dataset,
                raw: Some(raw),
            });
        }
        Err(e) => e,
    };

    // serde accepts structs encoded as sequences; the internal layout is object-only.
    let internal = if value.is_object() {
        serde_json::from_value::<Dataset>(value).map_err(|e| e.to_string())
    } else {
        Err("expected a JSON object".to_string())
    };

    match internal {
        Ok(dataset) => {
            log::info!(
                "decoded {} as internal dataset ({} image(s))",
                path.display(),
                dataset.images.len()
            );
            Ok(DecodedDataset {
                shape: DatasetShape::Internal,
                dataset,
                raw: None,
            })
        }
        Err(internal_error) => {
            log::warn!("{} matches neither dataset layout", path.display());
            Err(BboxError::InvalidStructure {
                path: path.to_path_buf(),
                raw_error: raw_error.to_string(),
                internal_error,
            })
        }
    }
}
