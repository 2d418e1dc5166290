#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels in the host's client coordinate space
//! (origin at top-left, y grows downward).

use serde::{Deserialize, Serialize};

/// Opaque identity of a rendered tile element.
///
/// The host assigns ids; the engine only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u64);

impl TileId {
    /// Wrap a raw host identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw host identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for TileId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// A pointer position or delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of a tile as measured by the host.
///
/// Stored by edges rather than size so the reflow engine can compare edges
/// directly. Every constructor and mutator keeps `right - x` and
/// `bottom - y` equal to the tile's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Right edge (`x + width`).
    pub right: f64,
    /// Bottom edge (`y + height`).
    pub bottom: f64,
}

impl TileRect {
    /// Create a rectangle from origin and size.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Create a rectangle from its four edges.
    #[inline]
    pub const fn from_edges(x: f64, y: f64, right: f64, bottom: f64) -> Self {
        Self {
            x,
            y,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.y
    }

    /// The same rectangle shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// The same size placed with its top-left corner at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn moved_to(self, x: f64, y: f64) -> Self {
        Self::new(x, y, self.width(), self.height())
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right && point.y >= self.y && point.y < self.bottom
    }
}

/// Accumulated visual offset of a tile, applied as a 3D translation.
///
/// Offsets are cumulative deltas; they are only ever reset to zero, never
/// recomputed from absolute positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Offset3d {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Add a planar delta.
    #[inline]
    #[must_use]
    pub fn shifted(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// CSS transform value for this offset.
    ///
    /// The z component is always emitted as `0`; it is carried for the
    /// host's bookkeeping only.
    pub fn to_css(&self) -> String {
        format!("translate3d({}px, {}px, 0)", self.x, self.y)
    }
}
