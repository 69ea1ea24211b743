#![allow(dead_code)]

use bbox_buddy::model::{
    BoundingBox, Dataset, ImageAnnotation, RawAnnotationDataset, RawAnnotationItem,
};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Slack for float sums when comparing reconstructed corners.
pub const EPS_CORNER: f64 = 1e-6;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn label_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("road signs".to_string()),
        Just("traffic signs".to_string()),
        Just("unlabeled".to_string()),
        "[a-z]{1,8}( [a-z]{1,6})?",
    ]
    .boxed()
}

/// File names with zero to two directory components, using either separator.
pub fn file_strategy() -> BoxedStrategy<String> {
    (
        prop::collection::vec("[a-z0-9_]{1,6}", 0..3),
        prop_oneof![Just('/'), Just('\\')],
        "[a-z0-9_]{1,10}\\.(png|jpg)",
    )
        .prop_map(|(dirs, sep, name)| {
            let mut path = String::new();
            for dir in dirs {
                path.push_str(&dir);
                path.push(sep);
            }
            path.push_str(&name);
            path
        })
        .boxed()
}

/// Whole-number corner arrays.
pub fn int_corners_strategy() -> BoxedStrategy<Vec<f64>> {
    (-2000i32..2000, -2000i32..2000, -2000i32..2000, -2000i32..2000)
        .prop_map(|(a, b, c, d)| vec![a as f64, b as f64, c as f64, d as f64])
        .boxed()
}

/// Corner arrays with fractional coordinates.
pub fn frac_corners_strategy() -> BoxedStrategy<Vec<f64>> {
    (
        -2000.0f64..2000.0,
        -2000.0f64..2000.0,
        -2000.0f64..2000.0,
        -2000.0f64..2000.0,
    )
        .prop_map(|(a, b, c, d)| vec![a, b, c, d])
        .boxed()
}

fn raw_item_strategy(corners: BoxedStrategy<Vec<f64>>) -> BoxedStrategy<RawAnnotationItem> {
    (
        file_strategy(),
        prop::collection::vec((corners, label_strategy()), 0..6),
    )
        .prop_map(|(file, boxes)| {
            let (bboxes, labels) = boxes.into_iter().unzip();
            RawAnnotationItem::new(file, bboxes, labels)
        })
        .boxed()
}

pub fn raw_dataset_int_strategy() -> BoxedStrategy<RawAnnotationDataset> {
    prop::collection::vec(raw_item_strategy(int_corners_strategy()), 0..5).boxed()
}

pub fn raw_dataset_frac_strategy() -> BoxedStrategy<RawAnnotationDataset> {
    prop::collection::vec(raw_item_strategy(frac_corners_strategy()), 0..5).boxed()
}

/// Boxes at or above the minimum size, as user edits leave them.
pub fn sized_box_strategy() -> BoxedStrategy<BoundingBox> {
    (
        -1000.0f64..1000.0,
        -1000.0f64..1000.0,
        20.0f64..800.0,
        20.0f64..800.0,
        label_strategy(),
    )
        .prop_map(|(x, y, w, h, label)| BoundingBox::new(x, y, w, h, label))
        .boxed()
}

pub fn dataset_strategy() -> BoxedStrategy<Dataset> {
    prop::collection::vec(
        (
            "[a-z0-9_]{1,10}\\.png",
            prop::collection::vec(sized_box_strategy(), 0..4),
        )
            .prop_map(|(name, boxes)| ImageAnnotation::new(name).with_boxes(boxes)),
        1..6,
    )
    .prop_map(Dataset::new)
    .boxed()
}

/// Pointer deltas, including ones far larger than any box.
pub fn delta_strategy() -> BoxedStrategy<f64> {
    prop_oneof![-50.0f64..50.0, -1.0e6f64..1.0e6].boxed()
}
