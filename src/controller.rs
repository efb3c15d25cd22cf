// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction controller.
//!
//! The controller owns the scene for one editor session and turns pointer
//! and property-panel input into scene mutations. Every mutation marks
//! the controller dirty so the UI knows to re-render the preview (and
//! autosave) on the next frame.

use crate::models::annotation::{AnnotationEdit, AnnotationId, TextAnnotation};
use crate::models::scene::{BackgroundImage, PreviewBounds, Scene};
use crate::util::geometry::{self, Point, TextMeasurer};
use std::sync::Arc;

/// Resize handle kinds. Only the bottom-right corner has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    SouthEast,
}

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    /// Moving the selected annotation; `offset` is the cursor position
    /// relative to its top-left corner when the drag started.
    Dragging { offset: Point },
    Resizing { handle: Handle },
}

/// Cursor to show while hovering the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    ResizeSouthEast,
}

pub struct Controller {
    scene: Scene,
    measurer: Arc<dyn TextMeasurer>,
    pointer: PointerState,
    cursor: CursorHint,
    dirty: bool,
}

impl Controller {
    pub fn new(bounds: PreviewBounds, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            scene: Scene::new(bounds),
            measurer,
            pointer: PointerState::Idle,
            cursor: CursorHint::Default,
            dirty: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.cursor
    }

    /// The annotation the property panel edits; `None` hides the panel.
    pub fn panel(&self) -> Option<&TextAnnotation> {
        self.scene.selected()
    }

    /// Returns whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn load_background(&mut self, image: BackgroundImage) {
        self.scene.load_background(image);
        self.dirty = true;
    }

    /// Replace annotations and selection with a restored session.
    pub fn restore(&mut self, annotations: Vec<TextAnnotation>, selected: Option<AnnotationId>) {
        self.scene.restore(annotations, selected);
        self.dirty = true;
    }

    pub fn add_text(&mut self) -> AnnotationId {
        let id = self.scene.add_annotation(self.measurer.as_ref());
        log::info!("Added {}, total: {}", id, self.scene.annotations().len());
        self.dirty = true;
        id
    }

    pub fn edit(&mut self, id: AnnotationId, edit: AnnotationEdit) {
        if self.scene.update_annotation(id, edit, self.measurer.as_ref()) {
            self.dirty = true;
        }
    }

    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.scene.select(id);
        self.dirty = true;
    }

    pub fn delete(&mut self, id: AnnotationId) {
        if self.scene.remove(id) {
            log::info!("Deleted {}, total: {}", id, self.scene.annotations().len());
            self.dirty = true;
        }
        if self.scene.selected_id().is_none() {
            self.end_interaction();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.scene.selected_id() {
            self.delete(id);
        }
    }

    /// Pointer pressed at `pos` in preview space.
    pub fn pointer_down(&mut self, pos: Point) {
        if let Some(selected) = self.scene.selected() {
            if geometry::resize_handle(selected.bounds()).contains(pos) {
                self.pointer = PointerState::Resizing {
                    handle: Handle::SouthEast,
                };
                return;
            }
        }

        match self.scene.hit_test(pos).map(|a| (a.id, a.x, a.y)) {
            Some((id, x, y)) => {
                self.scene.select(Some(id));
                self.pointer = PointerState::Dragging {
                    offset: Point::new(pos.x - x, pos.y - y),
                };
            }
            None => {
                self.scene.select(None);
                self.pointer = PointerState::Idle;
            }
        }
        self.dirty = true;
    }

    /// Pointer moved to `pos` in preview space.
    pub fn pointer_move(&mut self, pos: Point) {
        match self.pointer {
            PointerState::Resizing { handle: Handle::SouthEast } => {
                if let Some((id, x, y)) = self.scene.selected().map(|a| (a.id, a.x, a.y)) {
                    self.scene.resize_annotation(id, pos.x - x, pos.y - y);
                    self.dirty = true;
                }
            }
            PointerState::Dragging { offset } => {
                if let Some(id) = self.scene.selected_id() {
                    self.scene
                        .move_annotation(id, Point::new(pos.x - offset.x, pos.y - offset.y));
                    self.dirty = true;
                }
            }
            PointerState::Idle => self.cursor = self.hover_hint(pos),
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_interaction();
    }

    fn end_interaction(&mut self) {
        self.pointer = PointerState::Idle;
    }

    fn hover_hint(&self, pos: Point) -> CursorHint {
        let over_handle = self
            .scene
            .selected()
            .is_some_and(|a| geometry::resize_handle(a.bounds()).contains(pos));
        if over_handle {
            CursorHint::ResizeSouthEast
        } else if self.scene.hit_test(pos).is_some() {
            CursorHint::Move
        } else {
            CursorHint::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::testing::FixedAdvance;
    use crate::util::geometry::{MIN_HEIGHT, MIN_WIDTH};

    fn controller() -> Controller {
        Controller::new(PreviewBounds::default(), Arc::new(FixedAdvance))
    }

    #[test]
    fn test_drag_moves_by_grab_offset() {
        let mut controller = controller();
        let id = controller.add_text();
        controller.scene.move_annotation(id, Point::new(30.0, 40.0));

        controller.pointer_down(Point::new(45.0, 52.0));
        assert_eq!(
            controller.pointer_state(),
            PointerState::Dragging { offset: Point::new(15.0, 12.0) }
        );

        controller.pointer_move(Point::new(200.0, 150.0));
        let annotation = controller.scene().get(id).unwrap();
        assert_eq!((annotation.x, annotation.y), (185.0, 138.0));

        controller.pointer_move(Point::new(0.0, 0.0));
        let annotation = controller.scene().get(id).unwrap();
        assert_eq!((annotation.x, annotation.y), (-15.0, -12.0));

        controller.pointer_up();
        assert_eq!(controller.pointer_state(), PointerState::Idle);
        controller.pointer_move(Point::new(300.0, 300.0));
        assert_eq!(controller.scene().get(id).unwrap().x, -15.0);
    }

    #[test]
    fn test_pointer_down_selects_topmost() {
        let mut controller = controller();
        let bottom = controller.add_text();
        let top = controller.add_text();
        controller.select(Some(bottom));

        controller.pointer_down(Point::new(60.0, 60.0));
        assert_eq!(controller.scene().selected_id(), Some(top));
        assert!(controller.panel().is_some());
    }

    #[test]
    fn test_pointer_down_on_empty_space_clears_selection() {
        let mut controller = controller();
        controller.add_text();
        controller.take_dirty();

        controller.pointer_down(Point::new(5.0, 5.0));
        assert_eq!(controller.scene().selected_id(), None);
        assert!(controller.panel().is_none());
        assert_eq!(controller.pointer_state(), PointerState::Idle);
        assert!(controller.take_dirty());
    }

    #[test]
    fn test_resize_from_handle_with_floor() {
        let mut controller = controller();
        let id = controller.add_text();
        let bounds = controller.scene().get(id).unwrap().bounds();
        let corner = Point::new(bounds.x + bounds.width, bounds.y + bounds.height);

        controller.pointer_down(Point::new(corner.x + 3.0, corner.y - 3.0));
        assert_eq!(
            controller.pointer_state(),
            PointerState::Resizing { handle: Handle::SouthEast }
        );

        controller.pointer_move(Point::new(400.0, 200.0));
        let annotation = controller.scene().get(id).unwrap();
        assert_eq!((annotation.width, annotation.height), (350.0, 150.0));

        for pos in [Point::new(60.0, 55.0), Point::new(-100.0, -100.0), Point::new(50.0, 50.0)] {
            controller.pointer_move(pos);
            let annotation = controller.scene().get(id).unwrap();
            assert!(annotation.width >= MIN_WIDTH);
            assert!(annotation.height >= MIN_HEIGHT);
        }
        let annotation = controller.scene().get(id).unwrap();
        assert_eq!((annotation.width, annotation.height), (MIN_WIDTH, MIN_HEIGHT));
        assert_eq!((annotation.x, annotation.y), (50.0, 50.0));
    }

    #[test]
    fn test_handle_uses_resized_bounds() {
        let mut controller = controller();
        let id = controller.add_text();
        controller.scene.resize_annotation(id, 100.0, 40.0);

        controller.pointer_down(Point::new(150.0, 90.0));
        assert!(matches!(controller.pointer_state(), PointerState::Resizing { .. }));
    }

    #[test]
    fn test_handle_only_for_selected_annotation() {
        let mut controller = controller();
        let id = controller.add_text();
        controller.select(None);
        let bounds = controller.scene().get(id).unwrap().bounds();

        // Just outside the body, inside where the handle would be.
        controller.pointer_down(Point::new(bounds.x + bounds.width + 2.0, bounds.y + bounds.height + 2.0));
        assert_eq!(controller.pointer_state(), PointerState::Idle);
        assert_eq!(controller.scene().selected_id(), None);
    }

    #[test]
    fn test_hover_hints_without_mutation() {
        let mut controller = controller();
        let id = controller.add_text();
        let before = controller.scene().get(id).unwrap().clone();
        let bounds = before.bounds();

        controller.pointer_move(Point::new(bounds.x + bounds.width, bounds.y + bounds.height));
        assert_eq!(controller.cursor_hint(), CursorHint::ResizeSouthEast);
        controller.pointer_move(Point::new(bounds.x + 1.0, bounds.y + 1.0));
        assert_eq!(controller.cursor_hint(), CursorHint::Move);
        controller.pointer_move(Point::new(1.0, 1.0));
        assert_eq!(controller.cursor_hint(), CursorHint::Default);

        assert_eq!(controller.scene().get(id).unwrap(), &before);
    }

    #[test]
    fn test_delete_selected_hides_panel() {
        let mut controller = controller();
        let keep = controller.add_text();
        let doomed = controller.add_text();
        controller.pointer_down(Point::new(60.0, 60.0));

        controller.delete_selected();
        assert_eq!(controller.scene().selected_id(), None);
        assert!(controller.panel().is_none());
        assert!(controller.scene().get(doomed).is_none());
        assert!(controller.scene().get(keep).is_some());
        assert_eq!(controller.pointer_state(), PointerState::Idle);

        controller.pointer_move(Point::new(90.0, 90.0));
        assert_eq!(controller.scene().get(keep).unwrap().x, 50.0);
    }

    #[test]
    fn test_edit_marks_dirty_only_when_applied() {
        let mut controller = controller();
        let id = controller.add_text();
        controller.take_dirty();

        controller.edit(AnnotationId::new(99), AnnotationEdit::Text("x".into()));
        assert!(!controller.take_dirty());

        controller.edit(id, AnnotationEdit::Text("HELLO".into()));
        assert!(controller.take_dirty());
        assert_eq!(controller.panel().unwrap().text, "HELLO");
    }
}
