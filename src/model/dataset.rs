//! The internal dataset document.
//!
//! This is the shape editing operates on, and the shape accepted directly
//! as `{"images": [...]}` JSON on import.

use serde::{Deserialize, Serialize};

use super::bbox::BoundingBox;

/// The whole working document: one entry per image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub images: Vec<ImageAnnotation>,
}

/// One image plus its box list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotation {
    /// Display key for the image (a basename after raw import).
    pub filename: String,

    /// Boxes in insertion order.
    #[serde(default)]
    pub bounding_boxes: Vec<BoundingBox>,

    /// The raw `file` value this image was imported from, when it carried
    /// a directory prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ImageAnnotation {
    /// Creates an image entry with no boxes.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            bounding_boxes: Vec::new(),
            source_file: None,
        }
    }

    /// Sets the box list.
    pub fn with_boxes(mut self, boxes: Vec<BoundingBox>) -> Self {
        self.bounding_boxes = boxes;
        self
    }

    /// Records the original raw path.
    pub fn with_source_file(mut self, file: impl Into<String>) -> Self {
        self.source_file = Some(file.into());
        self
    }
}

impl Dataset {
    pub fn new(images: Vec<ImageAnnotation>) -> Self {
        Self { images }
    }

    /// Total number of boxes across all images.
    pub fn box_count(&self) -> usize {
        self.images.iter().map(|img| img.bounding_boxes.len()).sum()
    }

    /// Every box label in document order, duplicates included.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .flat_map(|img| img.bounding_boxes.iter())
            .map(|b| b.label.as_str())
    }
}

/// The three-image sample dataset offered when nothing has been loaded yet.
pub fn demo_dataset() -> Dataset {
    Dataset::new(vec![
        ImageAnnotation::new("https://images.unsplash.com/photo-1566197341759-47f74d6caee1")
            .with_boxes(vec![
                BoundingBox::new(100.0, 100.0, 200.0, 150.0, "cat").with_id("box1")
            ]),
        ImageAnnotation::new("https://images.unsplash.com/photo-1588943211346-0908a1fb0b01")
            .with_boxes(vec![
                BoundingBox::new(150.0, 120.0, 180.0, 220.0, "dog").with_id("box2")
            ]),
        ImageAnnotation::new("https://images.unsplash.com/photo-1583511655857-d19b40a7a54e")
            .with_boxes(vec![
                BoundingBox::new(120.0, 80.0, 240.0, 200.0, "dog").with_id("box3"),
                BoundingBox::new(400.0, 120.0, 100.0, 80.0, "ball").with_id("box4"),
            ]),
    ])
}
