//! Data model shared by every engine component
//!
//! Elements are owned by the canvas collaborator and reach the engine as a
//! read-only snapshot. Raw [`ElementRecord`]s may be partial; they are
//! validated into [`Element`]s before any analysis runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{Point, Rect, Size};

/// The visible canvas rectangle, in canvas coordinates
pub type Viewport = Rect;

/// Kind of visual element on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Chart,
    Kpi,
    Textbox,
    Table,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Chart => "chart",
            ElementType::Kpi => "kpi",
            ElementType::Textbox => "textbox",
            ElementType::Table => "table",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chart" => Ok(ElementType::Chart),
            "kpi" => Ok(ElementType::Kpi),
            "textbox" | "text" => Ok(ElementType::Textbox),
            "table" => Ok(ElementType::Table),
            other => Err(format!("unknown element type '{}'", other)),
        }
    }
}

/// Data columns visualized by a chart
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataBinding {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub measures: Vec<String>,
}

impl DataBinding {
    pub fn new<D, M>(dimensions: D, measures: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimensions: dimensions.into_iter().map(Into::into).collect(),
            measures: measures.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of distinct columns (dimensions and measures)
    pub fn column_count(&self) -> usize {
        let mut columns: Vec<&str> = self
            .dimensions
            .iter()
            .chain(self.measures.iter())
            .map(String::as_str)
            .collect();
        columns.sort_unstable();
        columns.dedup();
        columns.len()
    }
}

/// Anything the relationship detector can reason about
pub trait DataBound {
    fn id(&self) -> &str;
    fn element_type(&self) -> ElementType;
    fn data(&self) -> Option<&DataBinding>;
}

/// A placed, validated element of the canvas snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataBinding>,
}

impl Element {
    pub fn new(id: impl Into<String>, element_type: ElementType, rect: Rect) -> Self {
        Self {
            id: id.into(),
            element_type,
            rect,
            data: None,
        }
    }

    /// Attach the data columns this element visualizes
    pub fn with_data(mut self, data: DataBinding) -> Self {
        self.data = Some(data);
        self
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }
}

impl DataBound for Element {
    fn id(&self) -> &str {
        &self.id
    }

    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn data(&self) -> Option<&DataBinding> {
        self.data.as_ref()
    }
}

/// A raw element as reported by the canvas, possibly missing geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: Option<ElementType>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(alias = "width")]
    pub w: Option<f64>,
    #[serde(alias = "height")]
    pub h: Option<f64>,
    #[serde(default)]
    pub data: Option<DataBinding>,
}

impl ElementRecord {
    /// Validate the record.
    ///
    /// Returns `Ok(None)` for records that should be skipped (see
    /// [`ElementRecord::skip_reason`]) and an error for sizes that are
    /// negative or non-finite.
    pub fn validate(&self) -> Result<Option<Element>, LayoutError> {
        let Some(element_type) = self.element_type else {
            return Ok(None);
        };
        let (Some(x), Some(y), Some(w), Some(h)) = (self.x, self.y, self.w, self.h) else {
            return Ok(None);
        };
        if !Size::new(w, h).is_valid() {
            return Err(LayoutError::invalid_size(&self.id, w, h));
        }
        if !(x.is_finite() && y.is_finite()) {
            return Ok(None);
        }
        Ok(Some(Element {
            id: self.id.clone(),
            element_type,
            rect: Rect::new(x, y, w, h),
            data: self.data.clone(),
        }))
    }

    /// Why the record cannot be placed, if it is incomplete or unplaceable
    pub fn skip_reason(&self) -> Option<&'static str> {
        if self.element_type.is_none() {
            Some("missing type")
        } else if self.x.is_none() || self.y.is_none() {
            Some("missing position")
        } else if self.w.is_none() || self.h.is_none() {
            Some("missing size")
        } else if !(self.x.is_some_and(f64::is_finite) && self.y.is_some_and(f64::is_finite)) {
            Some("position is not finite")
        } else {
            None
        }
    }
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
            element_type: Some(element.element_type),
            x: Some(element.rect.x),
            y: Some(element.rect.y),
            w: Some(element.rect.width),
            h: Some(element.rect.height),
            data: element.data.clone(),
        }
    }
}

/// Validate a batch of records, skipping unplaceable ones with a warning.
///
/// Only an invalid size aborts the batch.
pub fn collect_elements(records: &[ElementRecord]) -> Result<Vec<Element>, LayoutError> {
    let mut elements = Vec::with_capacity(records.len());
    for record in records {
        match record.validate()? {
            Some(element) => elements.push(element),
            None => warn!(
                id = %record.id,
                reason = record.skip_reason().unwrap_or("incomplete"),
                "skipping element"
            ),
        }
    }
    Ok(elements)
}

/// A user-drawn annotation rectangle that may serve as a drop zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRegion {
    pub id: String,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AnnotationRegion {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// An element waiting to be arranged by a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataBinding>,
}

impl PendingElement {
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            estimated_size: None,
            data: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.estimated_size = Some(Size::new(width, height));
        self
    }

    pub fn with_data(mut self, data: DataBinding) -> Self {
        self.data = Some(data);
        self
    }

    /// Estimated size, or the configured default for the element type
    pub fn resolved_size(&self, config: &LayoutConfig) -> Result<Size, LayoutError> {
        let size = self
            .estimated_size
            .unwrap_or_else(|| config.default_size(self.element_type));
        if !size.is_valid() {
            return Err(LayoutError::invalid_size(&self.id, size.width, size.height));
        }
        Ok(size)
    }
}

impl DataBound for PendingElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn data(&self) -> Option<&DataBinding> {
        self.data.as_ref()
    }
}
