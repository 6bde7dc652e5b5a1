//! Spatial analysis of a canvas snapshot
//!
//! Answers "where is stuff, where is room, what sits together" for a set of
//! placed elements and an optional viewport. Every function is a pure
//! function of its arguments.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::geometry::{bounding_box, centroid, distance, rectangles_overlap, Point, Rect, Size};
use crate::model::{Element, ElementType, Viewport};
use crate::union_find::UnionFind;

/// Space taken by one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupiedRegion {
    pub element_id: String,
    pub element_type: ElementType,
    pub rect: Rect,
}

/// Elements grouped purely by spatial proximity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub members: Vec<Element>,
    pub centroid: Point,
    pub bounds: Rect,
}

impl Cluster {
    fn from_members(members: Vec<Element>) -> Self {
        let centroid = centroid(members.iter().map(Element::bounds));
        let bounds = bounding_box(members.iter().map(Element::bounds));
        Self {
            members,
            centroid,
            bounds,
        }
    }

    pub fn member_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }
}

/// Result of [`analyze_canvas`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialAnalysis {
    pub occupied_regions: Vec<OccupiedRegion>,
    pub empty_regions: Vec<Rect>,
    pub clusters: Vec<Cluster>,
    /// Occupied area over viewport area, in [0, 1]
    pub density: f64,
    pub bounds: Rect,
}

/// Run every analysis over one snapshot
pub fn analyze_canvas(
    elements: &[Element],
    viewport: Option<Viewport>,
    config: &LayoutConfig,
) -> SpatialAnalysis {
    SpatialAnalysis {
        occupied_regions: occupied_regions(elements),
        empty_regions: find_empty_regions(elements, viewport, config),
        clusters: find_clusters(elements, config.cluster_distance),
        density: calculate_density(elements, viewport),
        bounds: canvas_bounds(elements, viewport),
    }
}

/// One tagged rectangle per element, in input order
pub fn occupied_regions(elements: &[Element]) -> Vec<OccupiedRegion> {
    elements
        .iter()
        .map(|e| OccupiedRegion {
            element_id: e.id.clone(),
            element_type: e.element_type,
            rect: e.rect,
        })
        .collect()
}

/// Scan grid derived from a viewport, capped per axis
#[derive(Debug, Clone, Copy)]
struct ScanGrid {
    origin: Point,
    limit: Point,
    cell: Size,
    cols: usize,
    rows: usize,
}

impl ScanGrid {
    fn new(viewport: &Viewport, config: &LayoutConfig) -> Option<Self> {
        let usable = viewport.x.is_finite()
            && viewport.y.is_finite()
            && viewport.width.is_finite()
            && viewport.height.is_finite()
            && viewport.width > 0.0
            && viewport.height > 0.0;
        if !usable {
            return None;
        }

        let (cell_w, cols) = Self::axis(viewport.width, config);
        let (cell_h, rows) = Self::axis(viewport.height, config);
        Some(Self {
            origin: viewport.origin(),
            limit: Point::new(viewport.right(), viewport.bottom()),
            cell: Size::new(cell_w, cell_h),
            cols,
            rows,
        })
    }

    /// Cell length and count along one axis
    fn axis(extent: f64, config: &LayoutConfig) -> (f64, usize) {
        let max = config.max_grid_dimension.max(1);
        let mut cell = config.grid_cell_size;
        if (extent / cell).ceil() > max as f64 {
            debug!(extent, max, "enlarging scan cells to cap grid dimension");
            cell = extent / max as f64;
        }
        let count = ((extent / cell).ceil() as usize).clamp(1, max);
        (cell, count)
    }

    /// Rectangle covering columns `c0..c1` and rows `r0..r1`, clipped to the viewport
    fn span(&self, c0: usize, c1: usize, r0: usize, r1: usize) -> Rect {
        let x0 = self.origin.x + c0 as f64 * self.cell.width;
        let y0 = self.origin.y + r0 as f64 * self.cell.height;
        let x1 = (self.origin.x + c1 as f64 * self.cell.width).min(self.limit.x);
        let y1 = (self.origin.y + r1 as f64 * self.cell.height).min(self.limit.y);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Rectangles of the viewport not covered by any element.
///
/// The viewport is scanned cell by cell; a cell is empty when it overlaps no
/// element. Horizontal runs of empty cells are merged first, then identical
/// runs on consecutive rows are stacked. Results are ordered top to bottom,
/// then left to right. Returns nothing when the viewport is unknown.
pub fn find_empty_regions(
    elements: &[Element],
    viewport: Option<Viewport>,
    config: &LayoutConfig,
) -> Vec<Rect> {
    let Some(grid) = viewport.as_ref().and_then(|v| ScanGrid::new(v, config)) else {
        return Vec::new();
    };

    // (first col, end col, first row, end row), ends exclusive
    let mut open: Vec<(usize, usize, usize, usize)> = Vec::new();
    let mut done: Vec<(usize, usize, usize, usize)> = Vec::new();

    for row in 0..grid.rows {
        let mut next_open = Vec::new();
        let mut col = 0;
        while col < grid.cols {
            if !cell_is_empty(&grid.span(col, col + 1, row, row + 1), elements) {
                col += 1;
                continue;
            }
            let start = col;
            while col < grid.cols && cell_is_empty(&grid.span(col, col + 1, row, row + 1), elements)
            {
                col += 1;
            }
            match open.iter().position(|o| o.0 == start && o.1 == col) {
                Some(pos) => {
                    let mut run = open.swap_remove(pos);
                    run.3 = row + 1;
                    next_open.push(run);
                }
                None => next_open.push((start, col, row, row + 1)),
            }
        }
        done.append(&mut open);
        open = next_open;
    }
    done.append(&mut open);

    done.sort_by_key(|&(c0, _, r0, _)| (r0, c0));
    done.into_iter()
        .map(|(c0, c1, r0, r1)| grid.span(c0, c1, r0, r1))
        .collect()
}

/// A cell is taken by any element overlapping it. An element with no extent
/// on an axis also takes every cell whose closed span on that axis reaches it,
/// so a line on a cell boundary blocks both neighbours.
fn cell_is_empty(cell: &Rect, elements: &[Element]) -> bool {
    !elements.iter().any(|e| {
        span_touches(e.rect.x, e.rect.width, cell.x, cell.right())
            && span_touches(e.rect.y, e.rect.height, cell.y, cell.bottom())
    })
}

fn span_touches(start: f64, len: f64, lo: f64, hi: f64) -> bool {
    if len > 0.0 {
        start < hi && start + len > lo
    } else {
        start >= lo && start <= hi
    }
}

/// Proximity clusters with at least two members.
///
/// Two elements are linked when their centers are at most `threshold`
/// apart; clusters are the connected components of that graph, so chains
/// of near neighbours end up together regardless of input order.
pub fn find_clusters(elements: &[Element], threshold: f64) -> Vec<Cluster> {
    let mut uf = UnionFind::new(elements.len());
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            if distance(elements[i].center(), elements[j].center()) <= threshold {
                uf.union(i, j);
            }
        }
    }

    uf.components()
        .into_iter()
        .filter(|component| component.len() >= 2)
        .map(|component| {
            Cluster::from_members(component.into_iter().map(|i| elements[i].clone()).collect())
        })
        .collect()
}

/// Total element area over viewport area, clamped to [0, 1].
///
/// Overlapping elements are counted once each, so stacked elements inflate
/// the figure. Unknown or degenerate viewports yield 0.
pub fn calculate_density(elements: &[Element], viewport: Option<Viewport>) -> f64 {
    let Some(viewport) = viewport else {
        return 0.0;
    };
    let viewport_area = viewport.area();
    if !(viewport_area.is_finite() && viewport_area > 0.0) {
        return 0.0;
    }
    let occupied: f64 = elements.iter().map(|e| e.rect.area()).sum();
    (occupied / viewport_area).clamp(0.0, 1.0)
}

/// Bounding box of all elements, falling back to the viewport, then to zero
pub fn canvas_bounds(elements: &[Element], viewport: Option<Viewport>) -> Rect {
    if elements.is_empty() {
        return viewport.unwrap_or_else(Rect::zero);
    }
    bounding_box(elements.iter().map(Element::bounds))
}

/// Whether a rectangle at `position` with `size` would overlap any element
pub fn has_collision(position: Point, size: Size, elements: &[Element]) -> bool {
    let candidate = Rect::from_origin(position, size);
    elements.iter().any(|e| rectangles_overlap(&candidate, &e.rect))
}
