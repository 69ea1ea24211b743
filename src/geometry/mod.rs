//! Pointer-driven box geometry: creation, dragging and resizing.
//!
//! All functions are pure. They never clamp boxes to the image, so a box may
//! be dragged partly or fully off-canvas.

use std::fmt;
use std::str::FromStr;

use crate::error::BboxError;
use crate::model::{BoundingBox, LabelPalette, DEFAULT_LABEL};

/// Smallest width/height a resize handle can shrink a box to.
pub const MIN_BOX_SIZE: f64 = 20.0;

/// Width and height of a click-created box.
pub const DEFAULT_BOX_SIZE: f64 = 100.0;

/// Which handle of a box is being dragged during a resize.
///
/// Holds at most one vertical (`n`/`s`) and one horizontal (`e`/`w`) edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeDirection {
    /// All eight handles, clockwise from the top edge.
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::North,
        ResizeDirection::NorthEast,
        ResizeDirection::East,
        ResizeDirection::SouthEast,
        ResizeDirection::South,
        ResizeDirection::SouthWest,
        ResizeDirection::West,
        ResizeDirection::NorthWest,
    ];

    pub fn has_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn has_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn has_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn has_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Compass token form, e.g. `"ne"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::NorthEast => "ne",
            Self::East => "e",
            Self::SouthEast => "se",
            Self::South => "s",
            Self::SouthWest => "sw",
            Self::West => "w",
            Self::NorthWest => "nw",
        }
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeDirection {
    type Err = BboxError;

    /// Accepts tokens in any order (`"ne"` and `"en"` are the same handle).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BboxError::InvalidResizeDirection(s.to_string());

        let mut vertical: Option<char> = None;
        let mut horizontal: Option<char> = None;
        for c in s.chars() {
            let slot = match c {
                'n' | 's' => &mut vertical,
                'e' | 'w' => &mut horizontal,
                _ => return Err(invalid()),
            };
            if slot.is_some() {
                return Err(invalid());
            }
            *slot = Some(c);
        }

        match (vertical, horizontal) {
            (Some('n'), None) => Ok(Self::North),
            (Some('n'), Some('e')) => Ok(Self::NorthEast),
            (None, Some('e')) => Ok(Self::East),
            (Some('s'), Some('e')) => Ok(Self::SouthEast),
            (Some('s'), None) => Ok(Self::South),
            (Some('s'), Some('w')) => Ok(Self::SouthWest),
            (None, Some('w')) => Ok(Self::West),
            (Some('n'), Some('w')) => Ok(Self::NorthWest),
            _ => Err(invalid()),
        }
    }
}

/// Creates a default-sized box with its top-left corner at `(x, y)`.
pub fn create_box(x: f64, y: f64, label: &str) -> BoundingBox {
    create_box_with_palette(x, y, label, &LabelPalette::builtin())
}

/// Like [`create_box`], resolving the color from `palette`.
pub fn create_box_with_palette(x: f64, y: f64, label: &str, palette: &LabelPalette) -> BoundingBox {
    BoundingBox::new(x, y, DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE, label).with_color(palette.resolve(label))
}

/// Translates a box; extents are unchanged.
pub fn apply_drag(bbox: &BoundingBox, delta_x: f64, delta_y: f64) -> BoundingBox {
    BoundingBox {
        x: bbox.x + delta_x,
        y: bbox.y + delta_y,
        ..bbox.clone()
    }
}

/// Moves the edges named by `direction` by the pointer delta.
///
/// Each axis is handled independently. Dragged edges stop at
/// [`MIN_BOX_SIZE`]; for `w`/`n` the origin moves together with the extent
/// only when the clamped extent actually changes, so the opposite edge stays
/// anchored once the minimum is reached.
pub fn apply_resize(
    bbox: &BoundingBox,
    direction: ResizeDirection,
    delta_x: f64,
    delta_y: f64,
) -> BoundingBox {
    let mut out = bbox.clone();

    if direction.has_east() {
        out.width = (bbox.width + delta_x).max(MIN_BOX_SIZE);
    }
    if direction.has_west() {
        let possible_width = (bbox.width - delta_x).max(MIN_BOX_SIZE);
        if possible_width != bbox.width {
            out.x = bbox.x + delta_x;
            out.width = possible_width;
        }
    }
    if direction.has_south() {
        out.height = (bbox.height + delta_y).max(MIN_BOX_SIZE);
    }
    if direction.has_north() {
        let possible_height = (bbox.height - delta_y).max(MIN_BOX_SIZE);
        if possible_height != bbox.height {
            out.y = bbox.y + delta_y;
            out.height = possible_height;
        }
    }

    out
}

/// Normalizes a box drawn by dragging from `(origin_x, origin_y)`.
///
/// `raw_width`/`raw_height` are the signed pointer offsets and may be
/// negative when dragging up or left. The result always has non-negative
/// extents and covers the same rectangle.
pub fn finalize_created_box(
    origin_x: f64,
    origin_y: f64,
    raw_width: f64,
    raw_height: f64,
) -> BoundingBox {
    finalize_created_box_with_palette(
        origin_x,
        origin_y,
        raw_width,
        raw_height,
        &LabelPalette::builtin(),
    )
}

/// Like [`finalize_created_box`], resolving the color from `palette`.
pub fn finalize_created_box_with_palette(
    origin_x: f64,
    origin_y: f64,
    raw_width: f64,
    raw_height: f64,
    palette: &LabelPalette,
) -> BoundingBox {
    let x = if raw_width > 0.0 {
        origin_x
    } else {
        origin_x + raw_width
    };
    let y = if raw_height > 0.0 {
        origin_y
    } else {
        origin_y + raw_height
    };

    BoundingBox::new(x, y, raw_width.abs(), raw_height.abs(), DEFAULT_LABEL)
        .with_color(palette.resolve(DEFAULT_LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> BoundingBox {
        BoundingBox::new(100.0, 100.0, 50.0, 40.0, "cat").with_id("b")
    }

    #[test]
    fn test_create_box_defaults() {
        let bbox = create_box(12.0, 34.0, DEFAULT_LABEL);
        assert_eq!((bbox.x, bbox.y), (12.0, 34.0));
        assert_eq!((bbox.width, bbox.height), (100.0, 100.0));
        assert_eq!(bbox.label, "unlabeled");
        assert_eq!(bbox.color.map(|c| c.to_string()), Some("#8E9196".into()));
    }

    #[test]
    fn test_create_box_ids_differ() {
        let a = create_box(0.0, 0.0, DEFAULT_LABEL);
        let b = create_box(0.0, 0.0, DEFAULT_LABEL);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_drag_translates_without_clamping() {
        let moved = apply_drag(&sample_box(), -500.0, 7.5);
        assert_eq!((moved.x, moved.y), (-400.0, 107.5));
        assert_eq!((moved.width, moved.height), (50.0, 40.0));
        assert_eq!(moved.id, sample_box().id);
    }

    #[test]
    fn test_resize_east_grows_and_clamps() {
        let grown = apply_resize(&sample_box(), ResizeDirection::East, 10.0, 99.0);
        assert_eq!((grown.x, grown.width, grown.height), (100.0, 60.0, 40.0));

        let clamped = apply_resize(&sample_box(), ResizeDirection::East, -100.0, 0.0);
        assert_eq!(clamped.width, MIN_BOX_SIZE);
    }

    #[test]
    fn test_resize_west_keeps_right_edge() {
        let resized = apply_resize(&sample_box(), ResizeDirection::West, 10.0, 0.0);
        assert_eq!(resized.x, 110.0);
        assert_eq!(resized.width, 40.0);
        assert_eq!(resized.x + resized.width, 150.0);
    }

    #[test]
    fn test_resize_west_at_minimum_does_not_move() {
        let narrow = BoundingBox::new(100.0, 100.0, MIN_BOX_SIZE, 40.0, "cat");
        let resized = apply_resize(&narrow, ResizeDirection::West, 15.0, 0.0);
        assert_eq!(resized.x, 100.0);
        assert_eq!(resized.width, MIN_BOX_SIZE);
    }

    #[test]
    fn test_resize_north_west_composes_axes() {
        let resized = apply_resize(&sample_box(), ResizeDirection::NorthWest, -5.0, -10.0);
        assert_eq!((resized.x, resized.y), (95.0, 90.0));
        assert_eq!((resized.width, resized.height), (55.0, 50.0));
    }

    #[test]
    fn test_resize_south_ignores_horizontal_delta() {
        let resized = apply_resize(&sample_box(), ResizeDirection::South, 30.0, 5.0);
        assert_eq!((resized.x, resized.width), (100.0, 50.0));
        assert_eq!(resized.height, 45.0);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("ne".parse::<ResizeDirection>().unwrap(), ResizeDirection::NorthEast);
        assert_eq!("en".parse::<ResizeDirection>().unwrap(), ResizeDirection::NorthEast);
        assert_eq!("s".parse::<ResizeDirection>().unwrap(), ResizeDirection::South);
        for bad in ["", "x", "ns", "ew", "nn", "nes"] {
            assert!(bad.parse::<ResizeDirection>().is_err(), "accepted {bad:?}");
        }
        for dir in ResizeDirection::ALL {
            assert_eq!(dir.as_str().parse::<ResizeDirection>().unwrap(), dir);
        }
    }

    #[test]
    fn test_finalize_created_box_normalizes() {
        let bbox = finalize_created_box(100.0, 100.0, -30.0, -40.0);
        assert_eq!((bbox.x, bbox.y), (70.0, 60.0));
        assert_eq!((bbox.width, bbox.height), (30.0, 40.0));

        let forward = finalize_created_box(10.0, 20.0, 5.0, 6.0);
        assert_eq!((forward.x, forward.y, forward.width, forward.height), (10.0, 20.0, 5.0, 6.0));
    }
}
