//! Geometry primitives in canvas coordinates
//!
//! The canvas is unbounded; x grows to the right and y grows downward, so
//! a rectangle's origin is its top-left corner.

use serde::{Deserialize, Serialize};

/// A 2D point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0)
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Translate by the given offsets
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both components finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Component-wise maximum
    pub fn max(&self, other: &Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// An axis-aligned rectangle: occupied space, empty space or a drawn zone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from an origin and a size
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether a rectangle of `size` can be placed inside this one
    pub fn fits(&self, size: Size) -> bool {
        self.width >= size.width && self.height >= size.height
    }

    /// Check if this rectangle intersects another (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        rectangles_overlap(self, other)
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Overlapping part of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Move `origin` to the nearest position where a rectangle of `size`
    /// stays inside this one.
    ///
    /// Along an axis where `size` does not fit, the origin pins to this
    /// rectangle's near edge.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        let max_x = (self.right() - size.width).max(self.x);
        let max_y = (self.bottom() - size.height).max(self.y);
        Point::new(origin.x.max(self.x).min(max_x), origin.y.max(self.y).min(max_y))
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Separating-axis overlap test for axis-aligned rectangles.
///
/// Symmetric. Rectangles that only share an edge do not overlap; a
/// rectangle with positive area overlaps itself.
pub fn rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Euclidean distance
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Mean of the rectangles' centers; the origin for empty input
pub fn centroid<I>(rects: I) -> Point
where
    I: IntoIterator<Item = Rect>,
{
    let mut count = 0usize;
    let mut sum = Point::zero();
    for rect in rects {
        let c = rect.center();
        sum.x += c.x;
        sum.y += c.y;
        count += 1;
    }
    if count == 0 {
        return Point::zero();
    }
    Point::new(sum.x / count as f64, sum.y / count as f64)
}

/// Min/max reduction over rectangles; a zero rectangle for empty input
pub fn bounding_box<I>(rects: I) -> Rect
where
    I: IntoIterator<Item = Rect>,
{
    rects
        .into_iter()
        .reduce(|acc, r| acc.union(&r))
        .unwrap_or_else(Rect::zero)
}
