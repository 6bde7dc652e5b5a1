//! Placement of single elements on a populated canvas
//!
//! An element dropped without coordinates gets a preferred anchor
//! (top-left, center, ...). The finder scores every empty region large enough
//! for the element by how far it would have to move from that anchor, and
//! falls back to the bare anchor when nothing fits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrange::LayoutPlan;
use crate::config::LayoutConfig;
use crate::geometry::{bounding_box, distance, Point, Rect, Size};
use crate::model::{AnnotationRegion, Element, ElementType, Viewport};
use crate::snapshot::CanvasSnapshotProvider;
use crate::spatial::{find_empty_regions, has_collision};

/// Preferred area of the viewport for a new element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
            Anchor::Center => "center",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.name() == normalized)
            .ok_or_else(|| format!("unknown anchor '{}'", s))
    }
}

/// How a placement was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementSource {
    /// Inside a detected empty region
    EmptyRegion,
    /// Centered in a user-drawn annotation region
    DrawnRegion,
    /// The anchor position, because no empty region was large enough
    Fallback,
}

/// Where a single element should go
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point,
    pub size: Size,
    pub source: PlacementSource,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::from_origin(self.position, self.size)
    }
}

/// Anchor position for an element of `size`, inset by the placement margin.
///
/// Without a viewport every anchor resolves to `(margin, margin)`.
pub fn get_default_position(
    preferred_region: Anchor,
    viewport: Option<Viewport>,
    size: Size,
    config: &LayoutConfig,
) -> Point {
    let margin = config.placement_margin;
    let Some(v) = viewport else {
        return Point::new(margin, margin);
    };

    let left = v.x + margin;
    let top = v.y + margin;
    let right = v.right() - margin - size.width;
    let bottom = v.bottom() - margin - size.height;
    match preferred_region {
        Anchor::TopLeft => Point::new(left, top),
        Anchor::TopRight => Point::new(right, top),
        Anchor::BottomLeft => Point::new(left, bottom),
        Anchor::BottomRight => Point::new(right, bottom),
        Anchor::Center => {
            let center = v.center();
            Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
        }
    }
}

/// Best position for a new element of the given type, at its default size
pub fn find_optimal_position<P>(
    element_type: ElementType,
    preferred_region: Anchor,
    elements: &[Element],
    provider: &P,
    config: &LayoutConfig,
) -> Placement
where
    P: CanvasSnapshotProvider + ?Sized,
{
    find_optimal_position_for_size(
        config.default_size(element_type),
        preferred_region,
        elements,
        provider,
        config,
    )
}

/// Best position for a rectangle of `size`.
///
/// Each empty region that can hold `size` is scored by the distance from the
/// anchor to the closest position inside it; the lowest score wins and ties
/// go to the larger region. Candidates that still collide are discarded.
pub fn find_optimal_position_for_size<P>(
    size: Size,
    preferred_region: Anchor,
    elements: &[Element],
    provider: &P,
    config: &LayoutConfig,
) -> Placement
where
    P: CanvasSnapshotProvider + ?Sized,
{
    let viewport = provider.viewport_bounds();
    let anchor = get_default_position(preferred_region, viewport, size, config);

    let best = find_empty_regions(elements, viewport, config)
        .into_iter()
        .filter(|region| region.fits(size))
        .map(|region| {
            let position = region.clamp_origin(anchor, size);
            (distance(anchor, position), region.area(), position)
        })
        .filter(|(_, _, position)| !has_collision(*position, size, elements))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(b.1.total_cmp(&a.1)));

    match best {
        Some((_, _, position)) => Placement {
            position,
            size,
            source: PlacementSource::EmptyRegion,
        },
        None => {
            debug!(anchor = %preferred_region, "no empty region fits, using anchor position");
            Placement {
                position: anchor,
                size,
                source: PlacementSource::Fallback,
            }
        }
    }
}

/// Origin that centers a rectangle of `size` inside `region`
pub fn find_position_in_region(region: &Rect, size: Size) -> Point {
    Point::new(
        region.x + (region.width - size.width) / 2.0,
        region.y + (region.height - size.height) / 2.0,
    )
}

/// Annotation regions that contain no element center
pub fn find_empty_drawn_regions<'a>(
    annotations: &'a [AnnotationRegion],
    elements: &[Element],
) -> Vec<&'a AnnotationRegion> {
    annotations
        .iter()
        .filter(|region| !elements.iter().any(|e| region.rect.contains_point(e.center())))
        .collect()
}

/// The empty annotation region whose center is closest to `position`
pub fn find_nearest_drawn_region<'a>(
    position: Point,
    annotations: &'a [AnnotationRegion],
    elements: &[Element],
) -> Option<&'a AnnotationRegion> {
    find_empty_drawn_regions(annotations, elements)
        .into_iter()
        .min_by(|a, b| {
            distance(position, a.rect.center()).total_cmp(&distance(position, b.rect.center()))
        })
}

/// Center an element of `size` in the nearest empty annotation region
pub fn place_in_nearest_drawn_region(
    position: Point,
    size: Size,
    annotations: &[AnnotationRegion],
    elements: &[Element],
) -> Option<Placement> {
    let region = find_nearest_drawn_region(position, annotations, elements)?;
    debug!(region = %region.id, "placing into drawn region");
    Some(Placement {
        position: find_position_in_region(&region.rect, size),
        size,
        source: PlacementSource::DrawnRegion,
    })
}

/// Shift a batch plan so it starts one gap below the existing content,
/// aligned with its left edge.
///
/// Plans only avoid collisions among their own entries; this keeps them clear
/// of elements already on the canvas. With no existing elements the plan is
/// returned unchanged.
pub fn anchor_plan_below(plan: &LayoutPlan, elements: &[Element], config: &LayoutConfig) -> LayoutPlan {
    if elements.is_empty() || plan.is_empty() {
        return plan.clone();
    }
    let content = bounding_box(elements.iter().map(Element::bounds));
    let current = plan.bounds();
    plan.translate(content.x - current.x, content.bottom() + config.gap - current.y)
}
