//! The bounding box entity in origin + extent form.

use serde::{Deserialize, Serialize};

use super::color::{Color, LabelPalette};
use super::ids::BoxId;

/// One annotated rectangle, in image pixel coordinates.
///
/// `(x, y)` is the top-left corner. Extents are not forced non-negative
/// here: boxes imported from a malformed corner pair keep their negative
/// width/height so validation can report them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default = "BoxId::generate")]
    pub id: BoxId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl BoundingBox {
    /// Creates a box with a fresh id and no explicit color.
    pub fn new(x: f64, y: f64, width: f64, height: f64, label: impl Into<String>) -> Self {
        Self {
            id: BoxId::generate(),
            x,
            y,
            width,
            height,
            label: label.into(),
            color: None,
        }
    }

    /// Sets the id.
    pub fn with_id(mut self, id: impl Into<BoxId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets an explicit display color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Builds a box from corner format `(x1, y1, x2, y2)`.
    ///
    /// No reordering: `x2 < x1` yields a negative width.
    #[inline]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64, label: impl Into<String>) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1, label)
    }

    /// Returns the corners `(x1, y1, x2, y2)`.
    #[inline]
    pub fn corners(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns true if both extents are non-negative.
    #[inline]
    pub fn has_non_negative_extent(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// The explicit color, or the palette's color for the label.
    pub fn display_color(&self, palette: &LabelPalette) -> Color {
        self.color.unwrap_or_else(|| palette.resolve(&self.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let bbox = BoundingBox::from_corners(10.0, 10.0, 50.0, 60.0, "cat");
        assert_eq!(bbox.x, 10.0);
        assert_eq!(bbox.y, 10.0);
        assert_eq!(bbox.width, 40.0);
        assert_eq!(bbox.height, 50.0);
        assert_eq!(bbox.corners(), (10.0, 10.0, 50.0, 60.0));
    }

    #[test]
    fn test_malformed_corners_keep_negative_extent() {
        let bbox = BoundingBox::from_corners(50.0, 10.0, 10.0, 60.0, "cat");
        assert_eq!(bbox.width, -40.0);
        assert!(!bbox.has_non_negative_extent());
    }

    #[test]
    fn test_missing_id_is_generated_on_deserialize() {
        let bbox: BoundingBox =
            serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4,"label":"dog"}"#).unwrap();
        assert!(!bbox.id.as_str().is_empty());
        assert_eq!(bbox.color, None);
    }

    #[test]
    fn test_display_color_prefers_explicit() {
        let palette = LabelPalette::builtin();
        let red = Color::rgb(0xFF, 0, 0);

        let plain = BoundingBox::new(0.0, 0.0, 10.0, 10.0, "unlabeled");
        assert_eq!(plain.display_color(&palette), palette.resolve("unlabeled"));
        assert_eq!(plain.with_color(red).display_color(&palette), red);
    }
}
