//! Dataset validation.
//!
//! Checks for:
//! - Identity (unique box ids, unique non-empty filenames)
//! - Geometry (finite coordinates, non-negative extents, minimum size)
//! - Labels (non-empty)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;

use crate::geometry::MIN_BOX_SIZE;
use crate::model::{BoxId, Dataset};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a dataset and returns a report of all issues found.
pub fn validate_dataset(dataset: &Dataset, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_images(dataset, &mut report);
    validate_boxes(dataset, &mut report);

    report
}

fn validate_images(dataset: &Dataset, report: &mut ValidationReport) {
    let mut seen_names: HashMap<&str, usize> = HashMap::new();

    for (index, image) in dataset.images.iter().enumerate() {
        if image.filename.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyFileName,
                "Empty filename",
                IssueContext::Image { index },
            ));
            continue;
        }

        if let Some(first) = seen_names.get(image.filename.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateFileName,
                format!(
                    "Filename '{}' also used by image {}",
                    image.filename, first
                ),
                IssueContext::Image { index },
            ));
        } else {
            seen_names.insert(&image.filename, index);
        }
    }
}

fn validate_boxes(dataset: &Dataset, report: &mut ValidationReport) {
    // Ids are unique across the whole dataset, not just per image.
    let mut seen_ids: HashMap<&BoxId, usize> = HashMap::new();

    for (image_index, image) in dataset.images.iter().enumerate() {
        for bbox in &image.bounding_boxes {
            let context = || IssueContext::Box {
                image_index,
                id: bbox.id.to_string(),
            };

            if let Some(first) = seen_ids.get(&bbox.id) {
                report.add(ValidationIssue::error(
                    IssueCode::DuplicateBoxId,
                    format!("Duplicate box id (first seen in image {})", first),
                    context(),
                ));
            } else {
                seen_ids.insert(&bbox.id, image_index);
            }

            if bbox.label.is_empty() {
                report.add(ValidationIssue::warning(
                    IssueCode::EmptyLabel,
                    "Empty label",
                    context(),
                ));
            }

            if !bbox.is_finite() {
                report.add(ValidationIssue::error(
                    IssueCode::BoxNotFinite,
                    format!(
                        "Non-finite geometry (x={}, y={}, width={}, height={})",
                        bbox.x, bbox.y, bbox.width, bbox.height
                    ),
                    context(),
                ));
                continue;
            }

            if !bbox.has_non_negative_extent() {
                report.add(ValidationIssue::error(
                    IssueCode::NegativeExtent,
                    format!(
                        "Negative extent {:.1}x{:.1}",
                        bbox.width, bbox.height
                    ),
                    context(),
                ));
            } else if bbox.width < MIN_BOX_SIZE || bbox.height < MIN_BOX_SIZE {
                report.add(ValidationIssue::warning(
                    IssueCode::BelowMinimumSize,
                    format!(
                        "Size {:.1}x{:.1} is below the {}px minimum",
                        bbox.width, bbox.height, MIN_BOX_SIZE
                    ),
                    context(),
                ));
            }
        }
    }
}
