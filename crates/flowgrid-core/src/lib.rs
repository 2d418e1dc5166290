#![forbid(unsafe_code)]

//! Core: geometry, tile identity, and drag lifecycle events.
//!
//! # Role in flowgrid
//! `flowgrid-core` is the vocabulary layer. It owns the pixel-space geometry
//! types the reflow engine computes with and the canonical events a host
//! forwards from its drag-and-drop toolkit.
//!
//! # Primary responsibilities
//! - **TileRect / Offset3d**: measured tile bounds and accumulated visual offsets.
//! - **TileId**: opaque identity of a rendered tile element.
//! - **DragEvent / TransitionEvent**: normalized host notifications.
//!
//! # How it fits in the system
//! `flowgrid-layout` computes over these types, `flowgrid-backend` defines the
//! host seams in terms of them, and `flowgrid-web` drives the whole pipeline
//! from host callbacks.

pub mod event;
pub mod geometry;
pub mod logging;

pub use event::{DragEvent, TransitionEvent};
pub use geometry::{Offset3d, Point, TileId, TileRect};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
