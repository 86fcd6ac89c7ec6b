//! Geometric primitives shared by the placement, tiling and gesture code.
//!
//! Desktop coordinates are integer pixels with the origin at the top-left of
//! the primary monitor and `y` growing downwards. [`Rect`] always keeps its
//! edges ordered, so `left <= right` and `top <= bottom` hold for every value
//! built through its constructors. [`Viewport`] boxes follow the GL
//! convention instead (origin at the bottom-left of the drawable).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Points
// ============================================================================

/// An integer point in desktop coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PointI {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl PointI {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

/// A floating point position.
///
/// Used for normalized window coordinates (`0.0..=1.0`) and for dip values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointD {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl PointD {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Euclidean length of the vector from the origin to this point.
    #[must_use]
    pub fn length(self) -> f64 { self.x.hypot(self.y) }

    /// Vector from `self` to `other`.
    #[must_use]
    pub fn vector_to(self, other: Self) -> Self { Self::new(other.x - self.x, other.y - self.y) }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 { self.vector_to(other).length() }

    /// Midpoint of the segment between two points.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// 2D cross product (z component).
    #[must_use]
    pub fn cross(self, other: Self) -> f64 { self.x * other.y - self.y * other.x }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 { self.x * other.x + self.y * other.y }
}

// ============================================================================
// Rect
// ============================================================================

/// An integer rectangle with normalized edges.
///
/// `right` and `bottom` are exclusive: a rectangle spanning pixels `0..1920`
/// has `left = 0` and `right = 1920`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from its edges, swapping them if out of order.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let (left, right) = if left <= right { (left, right) } else { (right, left) };
        let (top, bottom) = if top <= bottom { (top, bottom) } else { (bottom, top) };
        Self { left, top, right, bottom }
    }

    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Returns the same rectangle with ordered edges.
    #[must_use]
    pub const fn normalized(self) -> Self { Self::new(self.left, self.top, self.right, self.bottom) }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 { self.right - self.left }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 { self.bottom - self.top }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> PointI { PointI::new(self.left, self.top) }

    /// Center point, rounded towards the top-left.
    #[must_use]
    pub const fn center(&self) -> PointI {
        PointI::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Returns whether the point lies inside the rectangle.
    ///
    /// Left and top edges are inclusive, right and bottom are exclusive, so
    /// a point on the border between two adjacent monitors belongs to exactly
    /// one of them.
    #[must_use]
    pub const fn contains(&self, point: PointI) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Returns whether the rectangles share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Returns whether either dimension is below `min` pixels.
    #[must_use]
    pub const fn is_degenerate(&self, min: i32) -> bool { self.width() < min || self.height() < min }

    /// Area in square pixels.
    #[must_use]
    pub const fn area(&self) -> i64 { self.width() as i64 * self.height() as i64 }

    /// Returns the rectangle shifted by `(dx, dy)`.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Returns the rectangle moved so its top-left corner is at `(x, y)`.
    #[must_use]
    pub const fn moved_to(&self, x: i32, y: i32) -> Self { self.translated(x - self.left, y - self.top) }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Squared distance from the point to the closest pixel of the rectangle.
    ///
    /// Zero when the point is inside.
    #[must_use]
    pub fn distance_sq_to(&self, point: PointI) -> i64 {
        let dx = if point.x < self.left {
            i64::from(self.left - point.x)
        } else if point.x >= self.right {
            i64::from(point.x - (self.right - 1))
        } else {
            0
        };
        let dy = if point.y < self.top {
            i64::from(self.top - point.y)
        } else if point.y >= self.bottom {
            i64::from(point.y - (self.bottom - 1))
        } else {
            0
        };
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// A GL pixel box, origin at the bottom-left of the drawable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    /// Left offset.
    pub x: i32,
    /// Bottom offset.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self { Self { x, y, width, height } }

    /// Number of pixels covered.
    #[must_use]
    pub const fn area(&self) -> i64 { self.width as i64 * self.height as i64 }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let top = (self.y + self.height).max(other.y + other.height);
        Self::new(x, y, right - x, top - y)
    }

    /// Returns whether the boxes share at least one pixel.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Converts logical pixels to backing-store pixels.
    ///
    /// A scale of `1.0` is an identity conversion.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn scaled(&self, backing_scale: f64) -> Self {
        if (backing_scale - 1.0).abs() < f64::EPSILON {
            return *self;
        }
        let scale = |v: i32| (f64::from(v) * backing_scale).round() as i32;
        Self::new(
            scale(self.x),
            scale(self.y),
            scale(self.width),
            scale(self.height),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
