// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene state management.
//!
//! The scene owns the background image and the ordered list of text
//! annotations, and keeps the single-selection invariant: at most one
//! annotation is marked selected, and `selected_id` names exactly that
//! annotation. Rendering is left to the controller.

use super::annotation::{AnnotationEdit, AnnotationId, TextAnnotation};
use crate::util::geometry::{self, Point, TextMeasurer, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Maximum preview canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewBounds {
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for PreviewBounds {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Immutable background bitmap with its native dimensions.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    /// URL or path the image was loaded from.
    pub source: String,
    pub bitmap: Arc<Pixmap>,
    pub native_width: u32,
    pub native_height: u32,
}

impl BackgroundImage {
    pub fn new(source: impl Into<String>, bitmap: Pixmap) -> Self {
        Self {
            source: source.into(),
            native_width: bitmap.width(),
            native_height: bitmap.height(),
            bitmap: Arc::new(bitmap),
        }
    }
}

/// Background image plus the annotations drawn over it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    bounds: PreviewBounds,
    background: Option<BackgroundImage>,
    preview_size: (u32, u32),
    annotations: Vec<TextAnnotation>,
    selected_id: Option<AnnotationId>,
    /// Last id handed out; ids are never reused.
    id_counter: u64,
}

impl Scene {
    pub fn new(bounds: PreviewBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    /// Preview canvas size in whole pixels, `(0, 0)` before a load.
    pub fn preview_size(&self) -> (u32, u32) {
        self.preview_size
    }

    pub fn annotations(&self) -> &[TextAnnotation] {
        &self.annotations
    }

    pub fn selected_id(&self) -> Option<AnnotationId> {
        self.selected_id
    }

    pub fn get(&self, id: AnnotationId) -> Option<&TextAnnotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: AnnotationId) -> Option<&mut TextAnnotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    pub fn selected(&self) -> Option<&TextAnnotation> {
        self.selected_id.and_then(|id| self.get(id))
    }

    /// Replace the background and resize the preview to fit it.
    ///
    /// Annotations are left untouched.
    pub fn load_background(&mut self, image: BackgroundImage) {
        let (width, height) = geometry::fit_to_bounds(
            image.native_width as f32,
            image.native_height as f32,
            self.bounds.max_width,
            self.bounds.max_height,
        );
        // Canvas dimensions are integers; fractional sizes truncate.
        self.preview_size = ((width as u32).max(1), (height as u32).max(1));
        self.background = Some(image);
    }

    /// Append a default annotation, select it, and return its id.
    pub fn add_annotation(&mut self, measurer: &dyn TextMeasurer) -> AnnotationId {
        self.id_counter += 1;
        let id = AnnotationId::new(self.id_counter);

        let mut annotation = TextAnnotation::new(id);
        remeasure(&mut annotation, measurer);
        self.annotations.push(annotation);
        self.select(Some(id));
        id
    }

    /// Apply a property edit. Unknown ids are ignored.
    pub fn update_annotation(
        &mut self,
        id: AnnotationId,
        edit: AnnotationEdit,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        let Some(annotation) = self.get_mut(id) else {
            return false;
        };
        let remeasures = edit.remeasures();
        edit.apply(annotation);
        if remeasures {
            remeasure(annotation, measurer);
        }
        true
    }

    /// Select `id`, or clear the selection when `id` is `None` or unknown.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        for annotation in &mut self.annotations {
            annotation.selected = false;
        }
        self.selected_id = None;

        if let Some(annotation) = id.and_then(|id| self.get_mut(id)) {
            annotation.selected = true;
            self.selected_id = Some(annotation.id);
        }
    }

    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.annotations.len() != before
    }

    pub fn move_annotation(&mut self, id: AnnotationId, position: Point) {
        if let Some(annotation) = self.get_mut(id) {
            annotation.set_position(position);
        }
    }

    pub fn resize_annotation(&mut self, id: AnnotationId, width: f32, height: f32) {
        if let Some(annotation) = self.get_mut(id) {
            annotation.set_size(width, height);
        }
    }

    /// Topmost annotation containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<&TextAnnotation> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.bounds().contains(point))
    }

    /// Replace the annotations with a restored set.
    ///
    /// Sizes are clamped to the floor, selection flags are rebuilt from
    /// `selected`, and the id counter resumes past every restored id.
    pub fn restore(&mut self, annotations: Vec<TextAnnotation>, selected: Option<AnnotationId>) {
        self.annotations = annotations;
        for annotation in &mut self.annotations {
            let (width, height) = (annotation.width, annotation.height);
            annotation.set_size(width, height);
        }
        let max_id = self.annotations.iter().map(|a| a.id.counter()).max();
        self.id_counter = self.id_counter.max(max_id.unwrap_or(0));
        self.select(selected);
    }
}

fn remeasure(annotation: &mut TextAnnotation, measurer: &dyn TextMeasurer) {
    let (width, height) = geometry::measure_text(
        measurer,
        &annotation.text,
        annotation.font_size,
        &annotation.font_family,
    );
    annotation.width = width;
    annotation.height = height;
}
