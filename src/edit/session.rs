//! Pointer-driven editing state for one dataset.
//!
//! The session tracks mode, selection, the active pointer gesture and the
//! current image. It never owns the dataset: each call takes the caller's
//! current dataset and, when something changed, returns the updated one.

use crate::error::BboxError;
use crate::geometry::{create_box_with_palette, finalize_created_box_with_palette, ResizeDirection};
use crate::model::{BoundingBox, BoxId, Dataset, LabelPalette, DEFAULT_LABEL};

use super::{add_box, find_box, move_box, relabel_box, remove_box, replace_boxes_at, resize_box};

/// What a click on empty canvas does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Select,
    Create,
}

/// The pointer gesture in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerPhase {
    #[default]
    Idle,
    /// Moving a whole box. `last` is the previous pointer position.
    Dragging { box_id: BoxId, last: (f64, f64) },
    /// Dragging one of a box's handles.
    Resizing {
        box_id: BoxId,
        direction: ResizeDirection,
        last: (f64, f64),
    },
    /// Drawing a new box from `origin`.
    Drawing { origin: (f64, f64), current: (f64, f64) },
}

/// Editing state for the canvas.
#[derive(Clone, Debug, Default)]
pub struct EditorSession {
    mode: EditorMode,
    selected: Option<BoxId>,
    phase: PointerPhase,
    current_image: usize,
    palette: LabelPalette,
}

impl EditorSession {
    pub fn new(palette: LabelPalette) -> Self {
        Self {
            palette,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    pub fn selected(&self) -> Option<&BoxId> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> &PointerPhase {
        &self.phase
    }

    pub fn current_image(&self) -> usize {
        self.current_image
    }

    pub fn palette(&self) -> &LabelPalette {
        &self.palette
    }

    /// Boxes of the current image.
    pub fn current_boxes<'a>(&self, dataset: &'a Dataset) -> Result<&'a [BoundingBox], BboxError> {
        current_boxes_of(dataset, self.current_image)
    }

    /// Switches to image `index`, clearing the selection.
    pub fn select_image(&mut self, dataset: &Dataset, index: usize) -> Result<(), BboxError> {
        if index >= dataset.images.len() {
            return Err(BboxError::ImageIndexOutOfRange {
                index,
                len: dataset.images.len(),
            });
        }
        self.current_image = index;
        self.selected = None;
        self.phase = PointerPhase::Idle;
        Ok(())
    }

    /// Moves to the next image. Returns false at the last image.
    pub fn next_image(&mut self, dataset: &Dataset) -> bool {
        if self.current_image + 1 >= dataset.images.len() {
            return false;
        }
        self.select_image(dataset, self.current_image + 1).is_ok()
    }

    /// Moves to the previous image. Returns false at the first image.
    pub fn previous_image(&mut self, dataset: &Dataset) -> bool {
        if self.current_image == 0 {
            return false;
        }
        self.select_image(dataset, self.current_image - 1).is_ok()
    }

    /// Handles a click on empty canvas.
    ///
    /// In create mode this adds a default-sized box at the click, selects it
    /// and returns to select mode.
    pub fn canvas_click(
        &mut self,
        dataset: &Dataset,
        x: f64,
        y: f64,
    ) -> Result<Option<Dataset>, BboxError> {
        if self.mode != EditorMode::Create || self.phase != PointerPhase::Idle {
            return Ok(None);
        }
        let bbox = create_box_with_palette(x, y, DEFAULT_LABEL, &self.palette);
        self.insert_box(dataset, bbox).map(Some)
    }

    /// Starts moving box `id` from pointer position `(x, y)`.
    pub fn begin_drag(
        &mut self,
        dataset: &Dataset,
        id: &BoxId,
        x: f64,
        y: f64,
    ) -> Result<(), BboxError> {
        self.require_box(dataset, id)?;
        self.selected = Some(id.clone());
        self.phase = PointerPhase::Dragging {
            box_id: id.clone(),
            last: (x, y),
        };
        Ok(())
    }

    /// Starts resizing box `id` from the `direction` handle.
    pub fn begin_resize(
        &mut self,
        dataset: &Dataset,
        id: &BoxId,
        direction: ResizeDirection,
        x: f64,
        y: f64,
    ) -> Result<(), BboxError> {
        self.require_box(dataset, id)?;
        self.selected = Some(id.clone());
        self.phase = PointerPhase::Resizing {
            box_id: id.clone(),
            direction,
            last: (x, y),
        };
        Ok(())
    }

    /// Starts drawing a box. Only valid in create mode.
    pub fn begin_draw(&mut self, x: f64, y: f64) -> bool {
        if self.mode != EditorMode::Create {
            return false;
        }
        self.phase = PointerPhase::Drawing {
            origin: (x, y),
            current: (x, y),
        };
        true
    }

    /// Applies pointer movement to the active gesture.
    ///
    /// Drag and resize deltas are measured from the previous pointer
    /// position, which then advances.
    pub fn pointer_move(
        &mut self,
        dataset: &Dataset,
        x: f64,
        y: f64,
    ) -> Result<Option<Dataset>, BboxError> {
        match &mut self.phase {
            PointerPhase::Idle => Ok(None),
            PointerPhase::Drawing { current, .. } => {
                *current = (x, y);
                Ok(None)
            }
            PointerPhase::Dragging { box_id, last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                let boxes = current_boxes_of(dataset, self.current_image)?;
                let updated = move_box(boxes, box_id, dx, dy)?;
                replace_boxes_at(dataset, self.current_image, updated).map(Some)
            }
            PointerPhase::Resizing {
                box_id,
                direction,
                last,
            } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                let boxes = current_boxes_of(dataset, self.current_image)?;
                let updated = resize_box(boxes, box_id, *direction, dx, dy)?;
                replace_boxes_at(dataset, self.current_image, updated).map(Some)
            }
        }
    }

    /// Ends the active gesture.
    ///
    /// Finishing a draw adds the drawn box; a draw with no movement falls
    /// back to a default-sized box at the press position.
    pub fn pointer_up(&mut self, dataset: &Dataset) -> Result<Option<Dataset>, BboxError> {
        match std::mem::take(&mut self.phase) {
            PointerPhase::Drawing { origin, current } => {
                let (w, h) = (current.0 - origin.0, current.1 - origin.1);
                let bbox = if w == 0.0 && h == 0.0 {
                    create_box_with_palette(origin.0, origin.1, DEFAULT_LABEL, &self.palette)
                } else {
                    finalize_created_box_with_palette(origin.0, origin.1, w, h, &self.palette)
                };
                self.insert_box(dataset, bbox).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Deletes the selected box, if any.
    pub fn delete_selected(&mut self, dataset: &Dataset) -> Result<Option<Dataset>, BboxError> {
        let Some(id) = self.selected.clone() else {
            return Ok(None);
        };
        let boxes = current_boxes_of(dataset, self.current_image)?;
        let updated = replace_boxes_at(dataset, self.current_image, remove_box(boxes, &id)?)?;
        log::debug!("deleted box {}", id);
        self.selected = None;
        Ok(Some(updated))
    }

    /// Changes the label of box `id` on the current image.
    pub fn relabel(
        &mut self,
        dataset: &Dataset,
        id: &BoxId,
        label: &str,
    ) -> Result<Dataset, BboxError> {
        let boxes = current_boxes_of(dataset, self.current_image)?;
        let updated = relabel_box(boxes, id, label, &self.palette)?;
        replace_boxes_at(dataset, self.current_image, updated)
    }

    fn insert_box(&mut self, dataset: &Dataset, bbox: BoundingBox) -> Result<Dataset, BboxError> {
        let boxes = current_boxes_of(dataset, self.current_image)?;
        let id = bbox.id.clone();
        let updated = replace_boxes_at(dataset, self.current_image, add_box(boxes, bbox))?;
        log::debug!("created box {} on image {}", id, self.current_image);
        self.selected = Some(id);
        self.mode = EditorMode::Select;
        Ok(updated)
    }

    fn require_box(&self, dataset: &Dataset, id: &BoxId) -> Result<(), BboxError> {
        find_box(self.current_boxes(dataset)?, id)
            .map(|_| ())
            .ok_or_else(|| BboxError::UnknownBox(id.to_string()))
    }
}

fn current_boxes_of(dataset: &Dataset, index: usize) -> Result<&[BoundingBox], BboxError> {
    dataset
        .images
        .get(index)
        .map(|img| img.bounding_boxes.as_slice())
        .ok_or(BboxError::ImageIndexOutOfRange {
            index,
            len: dataset.images.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DEFAULT_BOX_SIZE, MIN_BOX_SIZE};
    use crate::model::demo_dataset;

    #[test]
    fn click_in_create_mode_adds_box_and_returns_to_select() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Create);

        let updated = session.canvas_click(&dataset, 5.0, 6.0).unwrap().unwrap();
        let boxes = &updated.images[0].bounding_boxes;
        assert_eq!(boxes.len(), 2);

        let created = boxes.last().unwrap();
        assert_eq!((created.x, created.y), (5.0, 6.0));
        assert_eq!(created.width, DEFAULT_BOX_SIZE);
        assert_eq!(session.selected(), Some(&created.id));
        assert_eq!(session.mode(), EditorMode::Select);
    }

    #[test]
    fn click_in_select_mode_does_nothing() {
        let mut session = EditorSession::default();
        assert!(session.canvas_click(&demo_dataset(), 5.0, 6.0).unwrap().is_none());
    }

    #[test]
    fn drag_applies_incremental_deltas() {
        let mut dataset = demo_dataset();
        let mut session = EditorSession::default();
        let id = BoxId::new("box1");

        session.begin_drag(&dataset, &id, 10.0, 10.0).unwrap();
        dataset = session.pointer_move(&dataset, 15.0, 12.0).unwrap().unwrap();
        dataset = session.pointer_move(&dataset, 20.0, 20.0).unwrap().unwrap();
        assert!(session.pointer_up(&dataset).unwrap().is_none());

        let bbox = &dataset.images[0].bounding_boxes[0];
        assert_eq!((bbox.x, bbox.y), (110.0, 110.0));
        assert_eq!(session.phase(), &PointerPhase::Idle);
        assert!(session.pointer_move(&dataset, 99.0, 99.0).unwrap().is_none());
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        let id = BoxId::new("box1");

        session
            .begin_resize(&dataset, &id, ResizeDirection::East, 0.0, 0.0)
            .unwrap();
        let updated = session.pointer_move(&dataset, -1000.0, 0.0).unwrap().unwrap();
        assert_eq!(updated.images[0].bounding_boxes[0].width, MIN_BOX_SIZE);
    }

    #[test]
    fn draw_up_and_left_normalizes() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Create);

        assert!(session.begin_draw(50.0, 50.0));
        session.pointer_move(&dataset, 20.0, 10.0).unwrap();
        let updated = session.pointer_up(&dataset).unwrap().unwrap();

        let created = updated.images[0].bounding_boxes.last().unwrap();
        assert_eq!((created.x, created.y), (20.0, 10.0));
        assert_eq!((created.width, created.height), (30.0, 40.0));
        assert_eq!(session.mode(), EditorMode::Select);
    }

    #[test]
    fn draw_requires_create_mode() {
        let mut session = EditorSession::default();
        assert!(!session.begin_draw(0.0, 0.0));
    }

    #[test]
    fn delete_selected_removes_box() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        session.select_image(&dataset, 2).unwrap();
        session
            .begin_drag(&dataset, &BoxId::new("box4"), 0.0, 0.0)
            .unwrap();
        session.pointer_up(&dataset).unwrap();

        let updated = session.delete_selected(&dataset).unwrap().unwrap();
        assert_eq!(updated.images[2].bounding_boxes.len(), 1);
        assert!(session.selected().is_none());
        assert!(session.delete_selected(&updated).unwrap().is_none());
    }

    #[test]
    fn draw_without_movement_creates_default_box() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Create);

        assert!(session.begin_draw(10.0, 10.0));
        let updated = session.pointer_up(&dataset).unwrap().unwrap();

        let created = updated.images[0].bounding_boxes.last().unwrap();
        assert_eq!((created.x, created.y), (10.0, 10.0));
        assert_eq!((created.width, created.height), (DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE));
    }

    #[test]
    fn draw_along_one_axis_keeps_drawn_width() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Create);

        assert!(session.begin_draw(10.0, 10.0));
        session.pointer_move(&dataset, 90.0, 10.0).unwrap();
        let updated = session.pointer_up(&dataset).unwrap().unwrap();

        let created = updated.images[0].bounding_boxes.last().unwrap();
        assert_eq!((created.x, created.y), (10.0, 10.0));
        assert_eq!((created.width, created.height), (80.0, 0.0));
    }

    #[test]
    fn failed_delete_keeps_selection() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        session
            .begin_drag(&dataset, &BoxId::new("box1"), 0.0, 0.0)
            .unwrap();
        session.pointer_up(&dataset).unwrap();

        let mut without_box = dataset.clone();
        without_box.images[0].bounding_boxes.clear();

        let err = session.delete_selected(&without_box).unwrap_err();
        assert!(matches!(err, BboxError::UnknownBox(_)));
        assert_eq!(session.selected(), Some(&BoxId::new("box1")));
    }

    #[test]
    fn unknown_box_is_rejected() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        let err = session
            .begin_drag(&dataset, &BoxId::new("box4"), 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, BboxError::UnknownBox(_)));
    }

    #[test]
    fn navigation_clamps_and_clears_selection() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();

        assert!(!session.previous_image(&dataset));
        session
            .begin_drag(&dataset, &BoxId::new("box1"), 0.0, 0.0)
            .unwrap();
        assert!(session.next_image(&dataset));
        assert!(session.selected().is_none());
        assert!(session.next_image(&dataset));
        assert!(!session.next_image(&dataset));
        assert_eq!(session.current_image(), 2);
        assert!(session.select_image(&dataset, 3).is_err());
    }

    #[test]
    fn relabel_on_current_image() {
        let dataset = demo_dataset();
        let mut session = EditorSession::default();
        let updated = session
            .relabel(&dataset, &BoxId::new("box1"), "traffic signs")
            .unwrap();
        assert_eq!(updated.images[0].bounding_boxes[0].label, "traffic signs");
    }
}
