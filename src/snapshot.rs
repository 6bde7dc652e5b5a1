//! Narrow view of the canvas collaborator
//!
//! The engine never talks to a rendering library directly. Whatever owns the
//! real canvas implements [`CanvasSnapshotProvider`]; [`CanvasSnapshot`] is a
//! plain-data implementation used by tests, the CLI and callers that already
//! hold a serialized snapshot.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::model::{collect_elements, AnnotationRegion, Element, ElementRecord, Viewport};

/// Canvas facts the engine needs besides the element list
pub trait CanvasSnapshotProvider {
    /// The visible canvas rectangle, or `None` when it is unknown
    fn viewport_bounds(&self) -> Option<Viewport>;

    /// User-drawn annotation regions usable as drop zones
    fn annotation_regions(&self) -> Vec<AnnotationRegion>;
}

/// A serializable snapshot of the canvas at one instant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRegion>,
}

impl CanvasSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Add a validated element
    pub fn with_element(mut self, element: &Element) -> Self {
        self.elements.push(ElementRecord::from(element));
        self
    }

    /// Add a raw, possibly partial record
    pub fn with_record(mut self, record: ElementRecord) -> Self {
        self.elements.push(record);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationRegion) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Validated elements; incomplete records are skipped with a warning
    pub fn elements(&self) -> Result<Vec<Element>, LayoutError> {
        collect_elements(&self.elements)
    }
}

impl CanvasSnapshotProvider for CanvasSnapshot {
    fn viewport_bounds(&self) -> Option<Viewport> {
        self.viewport
    }

    fn annotation_regions(&self) -> Vec<AnnotationRegion> {
        self.annotations.clone()
    }
}
