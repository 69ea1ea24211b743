//! Data model for bbox-buddy.
//!
//! Two dataset schemas live here:
//!
//! 1. **Internal** ([`Dataset`]): origin + extent boxes with ids, labels and
//!    optional colors, grouped per image. Editing works on this shape.
//!
//! 2. **Raw** ([`RawAnnotationDataset`]): the external corner-format
//!    `[x1, y1, x2, y2]` schema with parallel label arrays. This is what
//!    gets written to disk.
//!
//! Model types are permissive: negative extents and arbitrary labels are
//! representable, so that validation can report problems instead of the
//! readers rejecting them.
//!
//! # Example
//!
//! ```
//! use bbox_buddy::model::{BoundingBox, Dataset, ImageAnnotation};
//!
//! let dataset = Dataset::new(vec![
//!     ImageAnnotation::new("img.png")
//!         .with_boxes(vec![BoundingBox::new(10.0, 10.0, 40.0, 50.0, "cat")]),
//! ]);
//! assert_eq!(dataset.box_count(), 1);
//! ```

mod bbox;
mod color;
mod dataset;
mod ids;
pub mod io_json;
mod raw;

pub use bbox::BoundingBox;
pub use color::{
    list_known_labels, resolve_color, Color, ColorPolicy, LabelPalette, DEFAULT_LABEL,
};
pub use dataset::{demo_dataset, Dataset, ImageAnnotation};
pub use ids::BoxId;
pub use raw::{RawAnnotation, RawAnnotationDataset, RawAnnotationItem};
