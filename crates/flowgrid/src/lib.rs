#![forbid(unsafe_code)]

//! Flowgrid public facade crate.
//!
//! Drag-to-reorder for wrapped tile grids. This crate re-exports the types a
//! host needs from the internal crates and offers a small prelude.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use flowgrid_core::{DragEvent, Offset3d, Point, TileId, TileRect, TransitionEvent};

// --- Backend re-exports ----------------------------------------------------

pub use flowgrid_backend::{
    ContainerGeometry, FlowBackend, GeometryProbe, HitElement, HitTester, TileGeometry,
    TransformPresenter,
};

// --- Layout re-exports -----------------------------------------------------

pub use flowgrid_layout::{LayoutCache, ReflowStep, StepDelta, StepRejection, TileSnapshot};

// --- Controller re-exports -------------------------------------------------

pub use flowgrid_web::{
    DragDispatch, DragIgnoredReason, DragLogOutcome, FlowConfigError, FlowGridConfig,
    FlowReorder, HostDispatch, HostEvent, MemoryBackend, TransitionOutcome,
};
#[cfg(feature = "input-parser")]
pub use flowgrid_web::{InputParseError, parse_host_event};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for flowgrid hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid controller configuration.
    Config(FlowConfigError),
    /// Malformed host JSON.
    #[cfg(feature = "input-parser")]
    Input(InputParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "input-parser")]
            Self::Input(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            #[cfg(feature = "input-parser")]
            Self::Input(err) => Some(err),
        }
    }
}

impl From<FlowConfigError> for Error {
    fn from(err: FlowConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "input-parser")]
impl From<InputParseError> for Error {
    fn from(err: InputParseError) -> Self {
        Self::Input(err)
    }
}

/// Standard result type for flowgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build an attached controller over `backend`.
///
/// Returns the controller even if the container is not rendered yet; check
/// [`FlowReorder::is_attached`] and call [`FlowReorder::attach`] again later.
pub fn attach<T: Clone, B: FlowBackend>(
    backend: B,
    items: Vec<T>,
    config: FlowGridConfig,
) -> Result<FlowReorder<T, B>> {
    let mut flow = FlowReorder::new(backend, items, config)?;
    flow.attach();
    Ok(flow)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DragEvent, Error, FlowBackend, FlowGridConfig, FlowReorder, HostEvent, Offset3d, Point,
        Result, TileId, TransitionEvent,
    };

    pub use crate::{backend, core, layout, web};
}

pub use flowgrid_backend as backend;
pub use flowgrid_core as core;
pub use flowgrid_layout as layout;
pub use flowgrid_web as web;
