//! Dataset mutation layer.
//!
//! Edits are pure: every function takes the current value by reference and
//! returns a new one. Box-list helpers work on a single image's boxes; the
//! result is spliced back with [`replace_boxes_at`].

mod session;

pub use session::{EditorMode, EditorSession, PointerPhase};

use crate::error::BboxError;
use crate::geometry::{apply_drag, apply_resize, ResizeDirection};
use crate::model::{BoundingBox, BoxId, Dataset, LabelPalette};

/// Returns a copy of `dataset` with image `index`'s boxes replaced.
///
/// # Errors
/// [`BboxError::ImageIndexOutOfRange`] if `index` is not a valid image index.
pub fn replace_boxes_at(
    dataset: &Dataset,
    index: usize,
    boxes: Vec<BoundingBox>,
) -> Result<Dataset, BboxError> {
    if index >= dataset.images.len() {
        return Err(BboxError::ImageIndexOutOfRange {
            index,
            len: dataset.images.len(),
        });
    }

    let mut updated = dataset.clone();
    updated.images[index].bounding_boxes = boxes;
    Ok(updated)
}

/// Finds a box by id.
pub fn find_box<'a>(boxes: &'a [BoundingBox], id: &BoxId) -> Option<&'a BoundingBox> {
    boxes.iter().find(|b| b.id == *id)
}

/// Appends a box.
pub fn add_box(boxes: &[BoundingBox], bbox: BoundingBox) -> Vec<BoundingBox> {
    let mut out = boxes.to_vec();
    out.push(bbox);
    out
}

/// Removes the box with `id`.
pub fn remove_box(boxes: &[BoundingBox], id: &BoxId) -> Result<Vec<BoundingBox>, BboxError> {
    if find_box(boxes, id).is_none() {
        return Err(BboxError::UnknownBox(id.to_string()));
    }
    Ok(boxes.iter().filter(|b| b.id != *id).cloned().collect())
}

/// Applies `f` to the box with `id`, leaving the others untouched.
pub fn update_box<F>(boxes: &[BoundingBox], id: &BoxId, f: F) -> Result<Vec<BoundingBox>, BboxError>
where
    F: FnOnce(&BoundingBox) -> BoundingBox,
{
    let idx = boxes
        .iter()
        .position(|b| b.id == *id)
        .ok_or_else(|| BboxError::UnknownBox(id.to_string()))?;

    let mut out = boxes.to_vec();
    out[idx] = f(&boxes[idx]);
    Ok(out)
}

/// Changes a box's label; its color is re-resolved for the new label.
pub fn relabel_box(
    boxes: &[BoundingBox],
    id: &BoxId,
    label: &str,
    palette: &LabelPalette,
) -> Result<Vec<BoundingBox>, BboxError> {
    update_box(boxes, id, |b| BoundingBox {
        label: label.to_string(),
        color: Some(palette.resolve(label)),
        ..b.clone()
    })
}

/// Translates the box with `id`.
pub fn move_box(
    boxes: &[BoundingBox],
    id: &BoxId,
    delta_x: f64,
    delta_y: f64,
) -> Result<Vec<BoundingBox>, BboxError> {
    update_box(boxes, id, |b| apply_drag(b, delta_x, delta_y))
}

/// Resizes the box with `id` from the given handle.
pub fn resize_box(
    boxes: &[BoundingBox],
    id: &BoxId,
    direction: ResizeDirection,
    delta_x: f64,
    delta_y: f64,
) -> Result<Vec<BoundingBox>, BboxError> {
    update_box(boxes, id, |b| apply_resize(b, direction, delta_x, delta_y))
}

/// Labels to offer when editing: the palette's known labels followed by
/// labels already used in `dataset`, without duplicates.
pub fn label_suggestions(dataset: &Dataset, palette: &LabelPalette) -> Vec<String> {
    let mut out = palette.known_labels();
    for label in dataset.labels() {
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}
