#![forbid(unsafe_code)]

//! Host-driven drag reorder controller.
//!
//! [`FlowReorder`] is the single entry point a host talks to. The host
//! forwards drag lifecycle and transition notifications; the controller
//! answers each with a deterministic dispatch record and pushes transforms
//! through the backend's presenter.
//!
//! # Lifecycle
//!
//! ```text
//! attach ─▶ drag_started ─▶ drag_moved* ─▶ drag_ended     (commit)
//!                                       └▶ drag_cancelled (rollback)
//! ```
//!
//! Between gestures the host may mutate the item list, re-render, and call
//! [`FlowReorder::tiles_changed`]; the layout cache is rebuilt only when the
//! rendered tile count differs from the cached one.

use flowgrid_backend::{FlowBackend, GeometryProbe, HitElement, HitTester, TransformPresenter};
use flowgrid_core::{DragEvent, Offset3d, Point, TileId, TransitionEvent};
use flowgrid_layout::{
    ContainerMetrics, LayoutCache, MeasuredTile, ReflowStep, StepRejection, reflow,
};

use crate::config::{FlowConfigError, FlowGridConfig};
use crate::session::{DragSession, TransitionIgnoredReason, TransitionOutcome, TransitionTracker};

/// Lifecycle phase recorded for one drag dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragLifecyclePhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Deterministic reason why a drag notification was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragIgnoredReason {
    Detached,
    NoActiveDrag,
    DragAlreadyInProgress,
    TileMismatch,
    /// The item list and the cached tiles disagree in length; the host has
    /// not re-rendered since the last mutation.
    StaleLayout,
    NoTileUnderPointer,
    SourceNotCached,
    TargetNotCached,
    StepRejected(StepRejection),
}

/// Outcome category for one drag dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragLogOutcome {
    SessionStarted,
    Reordered { from: usize, to: usize },
    Committed { steps: usize },
    RolledBack,
    Ignored(DragIgnoredReason),
}

/// Result of one drag lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDispatch {
    pub phase: DragLifecyclePhase,
    pub tile: TileId,
    pub step: Option<ReflowStep>,
    pub outcome: DragLogOutcome,
}

impl DragDispatch {
    fn ignored(phase: DragLifecyclePhase, tile: TileId, reason: DragIgnoredReason) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(?phase, %tile, ?reason, "drag notification ignored");

        Self {
            phase,
            tile,
            step: None,
            outcome: DragLogOutcome::Ignored(reason),
        }
    }

    fn applied(phase: DragLifecyclePhase, tile: TileId, outcome: DragLogOutcome) -> Self {
        Self {
            phase,
            tile,
            step: None,
            outcome,
        }
    }

    /// Whether the notification changed controller state.
    #[inline]
    pub const fn is_applied(&self) -> bool {
        !matches!(self.outcome, DragLogOutcome::Ignored(_))
    }
}

/// Host notification accepted by [`FlowReorder::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Drag(DragEvent),
    Transition(TransitionEvent),
    /// The host re-rendered the tile list.
    TilesChanged,
    /// A render pass finished.
    Rendered,
}

/// Result of [`FlowReorder::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDispatch {
    Drag(DragDispatch),
    Transition(TransitionOutcome),
    Layout { rebuilt: bool },
    Rendered { animations_enabled: bool },
}

/// Drag reorder controller over a host backend.
///
/// `T` is the host's item type; the controller only moves items around.
#[derive(Debug)]
pub struct FlowReorder<T, B> {
    backend: B,
    config: FlowGridConfig,
    items: Vec<T>,
    cache: LayoutCache,
    session: Option<DragSession<T>>,
    transitions: TransitionTracker,
    attached: bool,
}

impl<T: Clone, B: FlowBackend> FlowReorder<T, B> {
    /// Create a detached controller. Call [`attach`](Self::attach) once the
    /// host has rendered the tiles.
    pub fn new(backend: B, items: Vec<T>, config: FlowGridConfig) -> Result<Self, FlowConfigError> {
        config.validate()?;
        Ok(Self {
            backend,
            config,
            items,
            cache: LayoutCache::new(config.line_tolerance),
            session: None,
            transitions: TransitionTracker::new(
                config.dedupe_transition_starts,
                config.enable_transitions_initially,
            ),
            attached: false,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Committed item order.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Order the items would have if the dragged tile were dropped now.
    pub fn pending_order(&self) -> &[T] {
        self.session
            .as_ref()
            .map_or(self.items.as_slice(), DragSession::order)
    }

    #[inline]
    pub fn animations_enabled(&self) -> bool {
        self.transitions.animations_enabled()
    }

    #[inline]
    pub fn pending_transitions(&self) -> usize {
        self.transitions.pending()
    }

    #[inline]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[inline]
    pub const fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    #[inline]
    pub const fn config(&self) -> &FlowGridConfig {
        &self.config
    }

    #[inline]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // -----------------------------------------------------------------------
    // Layout lifecycle
    // -----------------------------------------------------------------------

    /// Measure the rendered tiles and start listening for transitions.
    ///
    /// Returns `false` without side effects if already attached or the
    /// container is not rendered.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = self.rebuild();
        self.attached
    }

    /// Stop listening for transitions, rolling back any gesture in flight.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.reset();
        self.attached = false;
        true
    }

    /// Re-measure every rendered tile into the layout cache.
    ///
    /// Aborts, leaving the cache untouched, if the container or any tile
    /// cannot be measured.
    pub fn rebuild(&mut self) -> bool {
        let geometry = self.backend.geometry();
        let Some(container) = geometry.container_geometry() else {
            return false;
        };
        let ids = geometry.tiles();
        let mut measured = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(tile) = geometry.tile_geometry(id) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(%id, "rebuild aborted: tile not measurable");
                return false;
            };
            measured.push(MeasuredTile {
                id,
                rect: tile.rect,
                margin_right: tile.margin_right,
            });
        }
        self.cache.rebuild(
            measured,
            ContainerMetrics {
                left: container.rect.x,
                threshold_x: container.rect.right,
                gap: container.gap,
            },
        );
        true
    }

    /// The host re-rendered the tile list. Rebuilds the cache only when the
    /// rendered tile count changed.
    pub fn tiles_changed(&mut self) -> bool {
        if !self.attached || self.session.is_some() {
            return false;
        }
        if self.backend.geometry().tiles().len() == self.cache.len() {
            return false;
        }
        self.rebuild()
    }

    /// A render pass finished. Re-enables animations if nothing is in flight.
    pub fn after_render(&mut self) -> bool {
        let flipped = self.transitions.settle_if_idle();

        #[cfg(feature = "tracing")]
        if flipped {
            tracing::debug!("animations re-enabled after render");
        }

        flipped
    }

    // -----------------------------------------------------------------------
    // Item mutation
    // -----------------------------------------------------------------------

    /// Append an item. A gesture in flight is rolled back first.
    pub fn add(&mut self, item: T) {
        self.reset();
        self.items.push(item);
    }

    /// Remove the item at `index`; `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        self.reset();
        Some(self.items.remove(index))
    }

    /// Replace the whole item list.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.reset();
        self.items = items;
    }

    // -----------------------------------------------------------------------
    // Drag lifecycle
    // -----------------------------------------------------------------------

    pub fn drag_started(&mut self, tile: TileId) -> DragDispatch {
        let phase = DragLifecyclePhase::Started;
        if !self.attached {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::Detached);
        }
        if self.session.is_some() {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::DragAlreadyInProgress);
        }
        if self.items.len() != self.cache.len() {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::StaleLayout);
        }
        if self.cache.index_of(tile).is_none() {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::SourceNotCached);
        }

        self.session = Some(DragSession::begin(tile, &self.items, self.cache.snapshot()));
        self.transitions.exclude(tile);

        #[cfg(feature = "tracing")]
        tracing::debug!(%tile, "drag started");

        DragDispatch::applied(phase, tile, DragLogOutcome::SessionStarted)
    }

    /// Resolve the tile under `pointer` and apply at most one reorder step.
    ///
    /// `delta` is the toolkit's direction of travel; only its per-axis sign
    /// is used.
    pub fn drag_moved(&mut self, tile: TileId, pointer: Point, delta: Point) -> DragDispatch {
        let phase = DragLifecyclePhase::Moved;
        let Some(session) = self.session.as_mut() else {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::NoActiveDrag);
        };
        if session.dragged() != tile {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::TileMismatch);
        }

        let target = self
            .backend
            .hit_test()
            .elements_at(pointer)
            .into_iter()
            .find_map(|hit| match hit {
                HitElement::Tile(id) if id != tile => Some(id),
                _ => None,
            });
        let Some(target) = target else {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::NoTileUnderPointer);
        };
        let Some(from) = self.cache.index_of(tile) else {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::SourceNotCached);
        };
        let Some(to) = self.cache.index_of(target) else {
            return DragDispatch::ignored(phase, tile, DragIgnoredReason::TargetNotCached);
        };
        let step = match ReflowStep::resolve(&self.cache, from, to, delta) {
            Ok(step) => step,
            Err(rejection) => {
                return DragDispatch::ignored(
                    phase,
                    tile,
                    DragIgnoredReason::StepRejected(rejection),
                );
            }
        };

        let outcome = reflow(&mut self.cache, step);
        session.record_step(from, to);
        let presenter = self.backend.presenter();
        for (id, offset) in outcome.transforms(Some(tile)) {
            presenter.apply_transform(id, offset);
        }

        DragDispatch {
            phase,
            tile,
            step: Some(step),
            outcome: DragLogOutcome::Reordered { from, to },
        }
    }

    /// Commit the pending order.
    pub fn drag_ended(&mut self, tile: TileId) -> DragDispatch {
        let phase = DragLifecyclePhase::Ended;
        let session = match self.session.take() {
            None => return DragDispatch::ignored(phase, tile, DragIgnoredReason::NoActiveDrag),
            Some(session) if session.dragged() != tile => {
                self.session = Some(session);
                return DragDispatch::ignored(phase, tile, DragIgnoredReason::TileMismatch);
            }
            Some(session) => session,
        };

        let steps = session.steps();
        self.transitions.disable();
        self.items = session.into_order();
        self.clear_presentation();
        self.cache.reset_offsets();

        #[cfg(feature = "tracing")]
        tracing::debug!(%tile, steps, "drag committed");

        DragDispatch::applied(phase, tile, DragLogOutcome::Committed { steps })
    }

    /// Abandon the gesture, restoring the pre-drag layout.
    pub fn drag_cancelled(&mut self, tile: TileId) -> DragDispatch {
        let phase = DragLifecyclePhase::Cancelled;
        match self.session.as_ref() {
            None => DragDispatch::ignored(phase, tile, DragIgnoredReason::NoActiveDrag),
            Some(session) if session.dragged() != tile => {
                DragDispatch::ignored(phase, tile, DragIgnoredReason::TileMismatch)
            }
            Some(_) => {
                self.reset();
                DragDispatch::applied(phase, tile, DragLogOutcome::RolledBack)
            }
        }
    }

    /// Roll back any gesture in flight. Idempotent: returns `false` and does
    /// nothing when no gesture is active.
    pub fn reset(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.transitions.disable();
        self.cache.restore(session.into_pre_drag_tiles());
        self.clear_presentation();
        self.cache.reset_offsets();

        #[cfg(feature = "tracing")]
        tracing::debug!("drag rolled back");

        true
    }

    /// Zero every tile's transform and drop the toolkit's drag translation.
    fn clear_presentation(&mut self) {
        let presenter = self.backend.presenter();
        for tile in self.cache.tiles() {
            presenter.apply_transform(tile.id, Offset3d::ZERO);
            presenter.reset_drag(tile.id);
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn transition_started(&mut self, tile: TileId) -> TransitionOutcome {
        if !self.attached {
            return TransitionOutcome::Ignored(TransitionIgnoredReason::Detached);
        }
        self.transitions.started(tile)
    }

    pub fn transition_ended(&mut self, tile: TileId) -> TransitionOutcome {
        if !self.attached {
            return TransitionOutcome::Ignored(TransitionIgnoredReason::Detached);
        }
        let outcome = self.transitions.ended(tile);

        #[cfg(feature = "tracing")]
        if outcome == TransitionOutcome::AllEnded {
            tracing::debug!(%tile, "all transitions ended");
        }

        outcome
    }

    /// An interrupted transition fires no end event; count it as ended.
    pub fn transition_cancelled(&mut self, tile: TileId) -> TransitionOutcome {
        self.transition_ended(tile)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Route one host notification to its handler.
    pub fn dispatch(&mut self, event: HostEvent) -> HostDispatch {
        match event {
            HostEvent::Drag(drag) => HostDispatch::Drag(match drag {
                DragEvent::Started { tile } => self.drag_started(tile),
                DragEvent::Moved {
                    tile,
                    pointer,
                    delta,
                } => self.drag_moved(tile, pointer, delta),
                DragEvent::Ended { tile } => self.drag_ended(tile),
                DragEvent::Cancelled { tile } => self.drag_cancelled(tile),
            }),
            HostEvent::Transition(transition) => HostDispatch::Transition(match transition {
                TransitionEvent::Started { tile } => self.transition_started(tile),
                TransitionEvent::Ended { tile } => self.transition_ended(tile),
                TransitionEvent::Cancelled { tile } => self.transition_cancelled(tile),
            }),
            HostEvent::TilesChanged => HostDispatch::Layout {
                rebuilt: self.tiles_changed(),
            },
            HostEvent::Rendered => {
                self.after_render();
                HostDispatch::Rendered {
                    animations_enabled: self.animations_enabled(),
                }
            }
        }
    }
}
