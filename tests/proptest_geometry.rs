//! Property tests for box geometry.

mod proptest_helpers;

use bbox_buddy::geometry::{
    apply_drag, apply_resize, finalize_created_box, ResizeDirection, MIN_BOX_SIZE,
};
use proptest::prelude::*;
use proptest_helpers::{delta_strategy, proptest_config, sized_box_strategy, EPS_CORNER};

fn direction_strategy() -> impl Strategy<Value = ResizeDirection> {
    prop::sample::select(ResizeDirection::ALL.to_vec())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS_CORNER * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn finalize_is_normalized_and_covers_drag(
        ox in -5000.0f64..5000.0,
        oy in -5000.0f64..5000.0,
        rw in -5000.0f64..5000.0,
        rh in -5000.0f64..5000.0,
    ) {
        let bbox = finalize_created_box(ox, oy, rw, rh);

        prop_assert!(bbox.width >= 0.0);
        prop_assert!(bbox.height >= 0.0);

        prop_assert!(close(bbox.x, ox.min(ox + rw)));
        prop_assert!(close(bbox.x + bbox.width, ox.max(ox + rw)));
        prop_assert!(close(bbox.y, oy.min(oy + rh)));
        prop_assert!(close(bbox.y + bbox.height, oy.max(oy + rh)));
    }

    #[test]
    fn resize_never_goes_below_minimum(
        bbox in sized_box_strategy(),
        direction in direction_strategy(),
        dx in delta_strategy(),
        dy in delta_strategy(),
    ) {
        let resized = apply_resize(&bbox, direction, dx, dy);
        prop_assert!(resized.width >= MIN_BOX_SIZE);
        prop_assert!(resized.height >= MIN_BOX_SIZE);
        prop_assert_eq!(&resized.id, &bbox.id);
        prop_assert_eq!(&resized.label, &bbox.label);
    }

    #[test]
    fn resize_west_keeps_anchor_when_clamped(
        bbox in sized_box_strategy(),
        dx in delta_strategy(),
        dy in delta_strategy(),
    ) {
        let resized = apply_resize(&bbox, ResizeDirection::West, dx, dy);

        if (bbox.width - dx).max(MIN_BOX_SIZE) == bbox.width {
            prop_assert_eq!(resized.x, bbox.x);
            prop_assert_eq!(resized.width, bbox.width);
        } else {
            prop_assert_eq!(resized.x, bbox.x + dx);
        }
        prop_assert_eq!(resized.y, bbox.y);
        prop_assert_eq!(resized.height, bbox.height);
    }

    #[test]
    fn resize_touches_only_named_axes(
        bbox in sized_box_strategy(),
        direction in direction_strategy(),
        dx in delta_strategy(),
        dy in delta_strategy(),
    ) {
        let resized = apply_resize(&bbox, direction, dx, dy);
        if !direction.has_east() && !direction.has_west() {
            prop_assert_eq!(resized.x, bbox.x);
            prop_assert_eq!(resized.width, bbox.width);
        }
        if !direction.has_north() && !direction.has_south() {
            prop_assert_eq!(resized.y, bbox.y);
            prop_assert_eq!(resized.height, bbox.height);
        }
    }

    #[test]
    fn drag_preserves_extent(
        bbox in sized_box_strategy(),
        dx in delta_strategy(),
        dy in delta_strategy(),
    ) {
        let moved = apply_drag(&bbox, dx, dy);
        prop_assert_eq!(moved.width, bbox.width);
        prop_assert_eq!(moved.height, bbox.height);
        prop_assert_eq!(moved.x, bbox.x + dx);
        prop_assert_eq!(moved.y, bbox.y + dy);
    }
}
