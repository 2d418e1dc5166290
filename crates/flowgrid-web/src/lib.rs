#![forbid(unsafe_code)]

//! `flowgrid-web` drives drag reordering of a wrapped tile grid from host
//! callbacks.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) forwards drag and
//!   transition notifications and re-renders when told the order changed.
//! - **Deterministic**: every notification yields a dispatch record saying
//!   what happened or why it was ignored.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. A host wraps
//! [`FlowReorder`] with whatever JS API it needs and implements
//! [`FlowBackend`](flowgrid_backend::FlowBackend) against the DOM.

pub mod config;
pub mod controller;
#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod session;
pub mod testing;

pub use config::{FlowConfigError, FlowGridConfig};
pub use controller::{
    DragDispatch, DragIgnoredReason, DragLifecyclePhase, DragLogOutcome, FlowReorder,
    HostDispatch, HostEvent,
};
#[cfg(feature = "input-parser")]
pub use input_parser::{InputParseError, parse_host_event};
pub use session::{DragSession, TransitionIgnoredReason, TransitionOutcome, TransitionTracker};
pub use testing::MemoryBackend;
