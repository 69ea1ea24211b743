//! Conversion between the raw corner-format schema and the internal dataset.
//!
//! The conversion is lossy in both directions in well-defined ways, which
//! [`build_import_report`] and [`build_export_report`] describe:
//!
//! - raw → internal strips directory components from `file`, pads missing
//!   labels with `"unlabeled"`, and assigns fresh ids.
//! - internal → raw rounds coordinates to whole pixels and drops ids and
//!   colors. The directory prefix is only restored when asked for.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use serde::Serialize;

use crate::error::BboxError;
use crate::model::{
    BoundingBox, Dataset, ImageAnnotation, LabelPalette, RawAnnotationDataset, RawAnnotationItem,
    DEFAULT_LABEL,
};

/// Schema identifier for conversion reporting.
///
/// This mirrors the CLI's schema argument but is decoupled from clap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    Raw,
    Internal,
}

impl Schema {
    /// Human-readable name for the schema.
    pub fn name(&self) -> &'static str {
        match self {
            Schema::Raw => "raw",
            Schema::Internal => "internal",
        }
    }
}

/// Options for internal → raw conversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawExportOptions {
    /// Write `file` from the image's stored source path when one exists.
    pub preserve_source_paths: bool,
}

/// Returns the last `/`- or `\`-delimited segment of `file`.
///
/// Falls back to `file` itself when there is no separator or the path ends
/// in one.
pub fn file_basename(file: &str) -> &str {
    match file.rsplit(['/', '\\']).next() {
        Some(last) if !last.is_empty() => last,
        _ => file,
    }
}

/// Converts a raw dataset using the built-in palette.
pub fn raw_to_internal(raw: &RawAnnotationDataset) -> Result<Dataset, BboxError> {
    raw_to_internal_with_palette(raw, &LabelPalette::builtin())
}

/// Converts a raw dataset, resolving box colors from `palette`.
///
/// # Errors
/// Returns [`BboxError::MalformedBBox`] for a corner array that does not
/// have exactly four values.
pub fn raw_to_internal_with_palette(
    raw: &RawAnnotationDataset,
    palette: &LabelPalette,
) -> Result<Dataset, BboxError> {
    let mut images = Vec::with_capacity(raw.len());

    for (item_index, item) in raw.iter().enumerate() {
        let filename = file_basename(&item.file);
        let mut boxes = Vec::with_capacity(item.annotation.bboxes.len());

        for (bbox_index, corners) in item.annotation.bboxes.iter().enumerate() {
            let [x1, y1, x2, y2] = <[f64; 4]>::try_from(corners.as_slice()).map_err(|_| {
                BboxError::MalformedBBox {
                    item_index,
                    bbox_index,
                    len: corners.len(),
                }
            })?;

            let label = item
                .annotation
                .labels
                .get(bbox_index)
                .map(String::as_str)
                .unwrap_or(DEFAULT_LABEL);

            boxes.push(
                BoundingBox::from_corners(x1, y1, x2, y2, label).with_color(palette.resolve(label)),
            );
        }

        let mut image = ImageAnnotation::new(filename).with_boxes(boxes);
        if filename != item.file {
            image = image.with_source_file(item.file.clone());
        }
        images.push(image);
    }

    log::debug!(
        "converted {} raw item(s) into {} box(es)",
        raw.len(),
        images.iter().map(|i| i.bounding_boxes.len()).sum::<usize>()
    );
    Ok(Dataset::new(images))
}

/// Converts a dataset to the raw schema, writing `file` from `filename`.
pub fn internal_to_raw(dataset: &Dataset) -> RawAnnotationDataset {
    internal_to_raw_with(dataset, &RawExportOptions::default())
}

/// Converts a dataset to the raw schema.
///
/// Corners are rounded half away from zero.
pub fn internal_to_raw_with(dataset: &Dataset, opts: &RawExportOptions) -> RawAnnotationDataset {
    dataset
        .images
        .iter()
        .map(|image| {
            let file = match (&image.source_file, opts.preserve_source_paths) {
                (Some(source), true) => source.clone(),
                _ => image.filename.clone(),
            };

            let (bboxes, labels) = image
                .bounding_boxes
                .iter()
                .map(|b| {
                    let (x1, y1, x2, y2) = b.corners();
                    (
                        vec![x1.round(), y1.round(), x2.round(), y2.round()],
                        b.label.clone(),
                    )
                })
                .unzip();

            RawAnnotationItem::new(file, bboxes, labels)
        })
        .collect()
}

/// Serializes `data` as JSON with 2-space indentation.
pub fn format_for_export<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Describes what [`raw_to_internal`] does to `raw`.
pub fn build_import_report(raw: &RawAnnotationDataset) -> ConversionReport {
    let mut report = ConversionReport::new(Schema::Raw.name(), Schema::Internal.name());

    let boxes: usize = raw.iter().map(|i| i.annotation.bboxes.len()).sum();
    report.input = ConversionCounts {
        images: raw.len(),
        boxes,
    };
    report.output = report.input.clone();

    let prefixed = raw
        .iter()
        .filter(|i| file_basename(&i.file) != i.file)
        .count();
    if prefixed > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DirectoryPrefixDropped,
            format!(
                "{} image path(s) are reduced to their file name (kept as sourceFile)",
                prefixed
            ),
        ));
    }

    let extra_labels: usize = raw
        .iter()
        .map(|i| {
            i.annotation
                .labels
                .len()
                .saturating_sub(i.annotation.bboxes.len())
        })
        .sum();
    if extra_labels > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::ExtraLabelsIgnored,
            format!("{} label(s) without a matching box will be dropped", extra_labels),
        ));
    }

    let padded: usize = raw
        .iter()
        .map(|i| {
            i.annotation
                .bboxes
                .len()
                .saturating_sub(i.annotation.labels.len())
        })
        .sum();
    if padded > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::LabelsPadded,
            format!("{} box(es) without a label are labeled '{}'", padded, DEFAULT_LABEL),
        ));
    }

    let inverted = raw
        .iter()
        .flat_map(|i| i.annotation.bboxes.iter())
        .filter(|c| c.len() == 4 && (c[2] < c[0] || c[3] < c[1]))
        .count();
    if inverted > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::NegativeExtent,
            format!(
                "{} box(es) have x2 < x1 or y2 < y1 and keep a negative extent",
                inverted
            ),
        ));
    }

    report
}

/// Describes what [`internal_to_raw_with`] does to `dataset`.
pub fn build_export_report(dataset: &Dataset, opts: &RawExportOptions) -> ConversionReport {
    let mut report = ConversionReport::new(Schema::Internal.name(), Schema::Raw.name());

    report.input = ConversionCounts {
        images: dataset.images.len(),
        boxes: dataset.box_count(),
    };
    report.output = report.input.clone();

    let fractional = dataset
        .images
        .iter()
        .flat_map(|i| i.bounding_boxes.iter())
        .filter(|b| {
            let (x1, y1, x2, y2) = b.corners();
            [x1, y1, x2, y2].iter().any(|v| v.fract() != 0.0)
        })
        .count();
    if fractional > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::CoordinatesRounded,
            format!(
                "{} box(es) have fractional coordinates that will be rounded",
                fractional
            ),
        ));
    }

    if report.input.boxes > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::DropBoxIdsAndColors,
            "box ids and colors are not part of the raw format",
        ));
    }

    let with_source = dataset
        .images
        .iter()
        .filter(|i| i.source_file.is_some())
        .count();
    if with_source > 0 {
        if opts.preserve_source_paths {
            report.add(ConversionIssue::info(
                ConversionIssueCode::SourcePathRestored,
                format!("{} image path(s) restored from sourceFile", with_source),
            ));
        } else {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::DirectoryPrefixDropped,
                format!(
                    "{} image(s) are written by file name only; their original directory is dropped",
                    with_source
                ),
            ));
        }
    }

    report
}
