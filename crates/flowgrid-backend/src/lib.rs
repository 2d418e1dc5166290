#![forbid(unsafe_code)]
#![doc = "Backend traits for flowgrid: host abstraction for geometry, hit testing, and transforms."]
#![doc = ""]
#![doc = "This crate defines the boundary between the reflow engine and the page that"]
#![doc = "renders the tiles. A browser host implements these against the DOM; tests"]
#![doc = "implement them against an in-memory flow layout."]

use flowgrid_core::{Offset3d, Point, TileId, TileRect};

/// Measured geometry of one tile element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileGeometry {
    /// Bounding client rectangle.
    pub rect: TileRect,
    /// Computed `margin-right` in pixels.
    pub margin_right: f64,
}

/// Measured geometry of the tile container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerGeometry {
    /// Bounding client rectangle.
    pub rect: TileRect,
    /// Computed `gap` in pixels.
    pub gap: f64,
}

/// One entry of a hit-test result, front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitElement {
    /// A tile element that is a direct child of the container.
    Tile(TileId),
    /// Anything else (nested content, unrelated page elements).
    Other,
}

/// Geometry query abstraction.
///
/// Every query returns `None` for elements that are not (or no longer)
/// attached; callers treat that as "skip", never as an error.
pub trait GeometryProbe {
    /// Rendered tiles in flow order.
    fn tiles(&self) -> Vec<TileId>;

    /// Current bounding geometry of a tile.
    fn tile_geometry(&self, tile: TileId) -> Option<TileGeometry>;

    /// Current bounding geometry of the container.
    fn container_geometry(&self) -> Option<ContainerGeometry>;
}

/// Point hit-test abstraction (`document.elementsFromPoint` on the web).
pub trait HitTester {
    /// Elements under `point`, topmost first.
    fn elements_at(&self, point: Point) -> Vec<HitElement>;
}

/// Presentation abstraction: visual transforms on tile elements.
///
/// Applying a transform is synchronous and visible at the next paint.
pub trait TransformPresenter {
    /// Set the tile's translation.
    fn apply_transform(&mut self, tile: TileId, offset: Offset3d);

    /// Drop the drag toolkit's free-drag translation on a released tile.
    fn reset_drag(&mut self, tile: TileId);
}

/// Unified backend combining geometry, hit testing, and presentation.
///
/// The reflow controller is generic over this trait.
pub trait FlowBackend {
    /// Geometry implementation.
    type Geometry: GeometryProbe;

    /// Hit-test implementation.
    type HitTest: HitTester;

    /// Presenter implementation.
    type Presenter: TransformPresenter;

    fn geometry(&self) -> &Self::Geometry;

    fn hit_test(&self) -> &Self::HitTest;

    fn presenter(&mut self) -> &mut Self::Presenter;
}
