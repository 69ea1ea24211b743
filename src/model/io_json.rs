//! JSON reading and writing for both dataset schemas.
//!
//! These functions read one fixed schema each. Use
//! [`crate::import::read_dataset`] when the schema of an input is not known
//! up front.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::dataset::Dataset;
use super::raw::RawAnnotationDataset;
use crate::error::BboxError;

/// Reads a raw (corner-format) dataset from a JSON file.
pub fn read_raw_json(path: &Path) -> Result<RawAnnotationDataset, BboxError> {
    let file = File::open(path).map_err(BboxError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| BboxError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a raw dataset as 2-space pretty-printed JSON.
pub fn write_raw_json(path: &Path, raw: &RawAnnotationDataset) -> Result<(), BboxError> {
    let file = File::create(path).map_err(BboxError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, raw).map_err(|source| BboxError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(BboxError::Io)
}

/// Reads an internal (`{"images": [...]}`) dataset from a JSON file.
pub fn read_internal_json(path: &Path) -> Result<Dataset, BboxError> {
    let file = File::open(path).map_err(BboxError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| BboxError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes an internal dataset as 2-space pretty-printed JSON.
pub fn write_internal_json(path: &Path, dataset: &Dataset) -> Result<(), BboxError> {
    let file = File::create(path).map_err(BboxError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, dataset).map_err(|source| BboxError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(BboxError::Io)
}

/// Parses a raw dataset from a JSON string.
pub fn raw_from_json_str(json: &str) -> Result<RawAnnotationDataset, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serializes a raw dataset to a pretty JSON string.
pub fn raw_to_json_string(raw: &RawAnnotationDataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(raw)
}

/// Parses an internal dataset from a JSON string.
pub fn from_json_str(json: &str) -> Result<Dataset, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serializes an internal dataset to a pretty JSON string.
pub fn to_json_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dataset)
}
