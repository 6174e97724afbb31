//! Rendering Adapter: renderer-agnostic, read-only views of the lattice.
//!
//! # Invariants
//! - Renderers never mutate the lattice; they take `&Lattice`.
//! - Line data is refreshed in place each frame; points only change with the epoch.

mod batch;
mod renderer;

pub use batch::{LineBatch, LineVertex, PointBatch, PointInstance};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "crystal-render v0.1.0"
}
