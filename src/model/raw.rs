//! The external corner-format schema (also the on-disk format).
//!
//! ```json
//! [
//!   {
//!     "file": "frames/img.png",
//!     "annotation": {
//!       "bboxes": [[10, 10, 50, 60]],
//!       "labels": ["cat"]
//!     }
//!   }
//! ]
//! ```

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// A raw dataset: one item per image.
pub type RawAnnotationDataset = Vec<RawAnnotationItem>;

/// One image in the raw format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawAnnotationItem {
    /// Path or identifier as supplied by the producer; may include directories.
    pub file: String,
    pub annotation: RawAnnotation,
}

/// Corner-format boxes with index-aligned labels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnnotation {
    /// `[x1, y1, x2, y2]` per box. Length is checked at conversion time.
    #[serde(serialize_with = "serialize_corner_lists")]
    pub bboxes: Vec<Vec<f64>>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl RawAnnotationItem {
    pub fn new(file: impl Into<String>, bboxes: Vec<Vec<f64>>, labels: Vec<String>) -> Self {
        Self {
            file: file.into(),
            annotation: RawAnnotation { bboxes, labels },
        }
    }
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

// Whole numbers go out as JSON integers so exported files read `[10, 10, 50, 60]`.
fn serialize_corner_lists<S: Serializer>(
    bboxes: &[Vec<f64>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    struct Corners<'a>(&'a [f64]);

    impl Serialize for Corners<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
            for &v in self.0 {
                if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INT {
                    seq.serialize_element(&(v as i64))?;
                } else {
                    seq.serialize_element(&v)?;
                }
            }
            seq.end()
        }
    }

    let mut seq = serializer.serialize_seq(Some(bboxes.len()))?;
    for bbox in bboxes {
        seq.serialize_element(&Corners(bbox))?;
    }
    seq.end()
}
