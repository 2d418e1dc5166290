#![forbid(unsafe_code)]

//! In-memory host for tests and headless hosts.
//!
//! [`MemoryBackend`] lays tiles out like a wrapping flex row: left to right
//! with a fixed gap, starting a new line whenever the next tile would cross
//! the container's right edge. Presented transforms are applied on top of
//! that natural layout, the way a browser reports bounding rectangles.

use std::cell::Cell;

use flowgrid_backend::{
    ContainerGeometry, FlowBackend, GeometryProbe, HitElement, HitTester, TileGeometry,
    TransformPresenter,
};
use flowgrid_core::{Offset3d, Point, TileId, TileRect};
use rustc_hash::FxHashMap;

/// One rendered tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryTile {
    pub id: TileId,
    pub width: f64,
    pub height: f64,
    pub margin_right: f64,
}

/// Deterministic flow-layout page implementing every backend trait.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    container: Option<TileRect>,
    gap: f64,
    tiles: Vec<MemoryTile>,
    transforms: FxHashMap<TileId, Offset3d>,
    applied: Vec<(TileId, Offset3d)>,
    drag_resets: Vec<TileId>,
    measure_passes: Cell<usize>,
}

impl MemoryBackend {
    /// Empty page whose container starts at the origin.
    pub fn new(container_width: f64, gap: f64) -> Self {
        Self {
            container: Some(TileRect::new(0.0, 0.0, container_width, 0.0)),
            gap,
            tiles: Vec::new(),
            transforms: FxHashMap::default(),
            applied: Vec::new(),
            drag_resets: Vec::new(),
            measure_passes: Cell::new(0),
        }
    }

    /// `count` square tiles of side `size`, exactly `columns` per line.
    pub fn uniform(count: usize, columns: usize, size: f64, gap: f64) -> Self {
        let width = columns as f64 * size + columns.saturating_sub(1) as f64 * gap;
        let mut page = Self::new(width, gap);
        for i in 0..count {
            page.push_tile(TileId::new(i as u64), size, size);
        }
        page
    }

    pub fn push_tile(&mut self, id: TileId, width: f64, height: f64) {
        self.tiles.push(MemoryTile {
            id,
            width,
            height,
            margin_right: 0.0,
        });
    }

    pub fn push_memory_tile(&mut self, tile: MemoryTile) {
        self.tiles.push(tile);
    }

    pub fn remove_tile(&mut self, id: TileId) {
        self.tiles.retain(|tile| tile.id != id);
        self.transforms.remove(&id);
    }

    /// Simulate the container element being torn down.
    pub fn remove_container(&mut self) {
        self.container = None;
    }

    /// Re-render in `order`, dropping every transform.
    ///
    /// Ids not currently rendered are skipped.
    pub fn render(&mut self, order: &[TileId]) {
        let mut by_id: FxHashMap<TileId, MemoryTile> =
            self.tiles.iter().map(|tile| (tile.id, *tile)).collect();
        self.tiles = order.iter().filter_map(|id| by_id.remove(id)).collect();
        self.transforms.clear();
    }

    /// Rendered tile ids in flow order.
    pub fn order(&self) -> Vec<TileId> {
        self.tiles.iter().map(|tile| tile.id).collect()
    }

    /// Transform currently shown on `id`.
    pub fn transform_of(&self, id: TileId) -> Offset3d {
        self.transforms.get(&id).copied().unwrap_or(Offset3d::ZERO)
    }

    /// Every transform presented so far, in call order.
    pub fn applied(&self) -> &[(TileId, Offset3d)] {
        &self.applied
    }

    pub fn drag_resets(&self) -> &[TileId] {
        &self.drag_resets
    }

    pub fn clear_log(&mut self) {
        self.applied.clear();
        self.drag_resets.clear();
    }

    /// Number of container measurements taken (one per cache rebuild).
    pub fn measure_passes(&self) -> usize {
        self.measure_passes.get()
    }

    /// Position of `id` in the natural layout, ignoring transforms.
    pub fn natural_rect(&self, id: TileId) -> Option<TileRect> {
        self.natural_layout()
            .into_iter()
            .find_map(|(tile, rect)| (tile == id).then_some(rect))
    }

    /// Where `id` appears on screen.
    pub fn visual_rect(&self, id: TileId) -> Option<TileRect> {
        let offset = self.transform_of(id);
        self.natural_rect(id)
            .map(|rect| rect.translated(offset.x, offset.y))
    }

    /// Centre of the tile as it appears on screen.
    pub fn center_of(&self, id: TileId) -> Option<Point> {
        self.visual_rect(id).map(|rect| {
            Point::new(
                rect.x + rect.width() / 2.0,
                rect.y + rect.height() / 2.0,
            )
        })
    }

    fn natural_layout(&self) -> Vec<(TileId, TileRect)> {
        let Some(container) = self.container else {
            return Vec::new();
        };
        let mut x = container.x;
        let mut y = container.y;
        let mut line_height: f64 = 0.0;
        let mut out = Vec::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            if x > container.x && x + tile.width > container.right {
                x = container.x;
                y += line_height + self.gap;
                line_height = 0.0;
            }
            out.push((tile.id, TileRect::new(x, y, tile.width, tile.height)));
            x += tile.width + tile.margin_right + self.gap;
            line_height = line_height.max(tile.height);
        }
        out
    }
}

impl GeometryProbe for MemoryBackend {
    fn tiles(&self) -> Vec<TileId> {
        self.order()
    }

    fn tile_geometry(&self, tile: TileId) -> Option<TileGeometry> {
        let margin_right = self.tiles.iter().find(|t| t.id == tile)?.margin_right;
        Some(TileGeometry {
            rect: self.visual_rect(tile)?,
            margin_right,
        })
    }

    fn container_geometry(&self) -> Option<ContainerGeometry> {
        let container = self.container?;
        self.measure_passes.set(self.measure_passes.get() + 1);
        let bottom = self
            .natural_layout()
            .iter()
            .map(|(_, rect)| rect.bottom)
            .fold(container.y, f64::max);
        Some(ContainerGeometry {
            rect: TileRect::from_edges(container.x, container.y, container.right, bottom),
            gap: self.gap,
        })
    }
}

impl HitTester for MemoryBackend {
    fn elements_at(&self, point: Point) -> Vec<HitElement> {
        // Later siblings paint on top.
        let mut hits: Vec<HitElement> = self
            .tiles
            .iter()
            .rev()
            .filter(|tile| {
                self.visual_rect(tile.id)
                    .is_some_and(|rect| rect.contains(point))
            })
            .map(|tile| HitElement::Tile(tile.id))
            .collect();
        hits.push(HitElement::Other);
        hits
    }
}

impl TransformPresenter for MemoryBackend {
    fn apply_transform(&mut self, tile: TileId, offset: Offset3d) {
        if offset.is_zero() {
            self.transforms.remove(&tile);
        } else {
            self.transforms.insert(tile, offset);
        }
        self.applied.push((tile, offset));
    }

    fn reset_drag(&mut self, tile: TileId) {
        self.drag_resets.push(tile);
    }
}

impl FlowBackend for MemoryBackend {
    type Geometry = Self;
    type HitTest = Self;
    type Presenter = Self;

    fn geometry(&self) -> &Self {
        self
    }

    fn hit_test(&self) -> &Self {
        self
    }

    fn presenter(&mut self) -> &mut Self {
        self
    }
}
