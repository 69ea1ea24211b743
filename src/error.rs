use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for bbox-buddy operations.
#[derive(Debug, Error)]
pub enum BboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Invalid dataset structure in {path}: expected an array of raw annotation items \
         ({raw_error}) or an object with an 'images' array ({internal_error})"
    )]
    InvalidStructure {
        path: PathBuf,
        raw_error: String,
        internal_error: String,
    },

    #[error("Malformed bbox {bbox_index} in item {item_index}: expected 4 corner values, found {len}")]
    MalformedBBox {
        item_index: usize,
        bbox_index: usize,
        len: usize,
    },

    #[error("Image index {index} out of range (dataset has {len} image(s))")]
    ImageIndexOutOfRange { index: usize, len: usize },

    #[error("No bounding box with id '{0}'")]
    UnknownBox(String),

    #[error("Invalid resize direction '{0}' (expected a combination of n/s and e/w, e.g. 'ne')")]
    InvalidResizeDirection(String),

    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("Failed to parse config from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid color '{0}' (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}
