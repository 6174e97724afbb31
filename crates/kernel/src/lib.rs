//! Crystal kernel: lattice generation, edge deduplication, and the
//! fracture/heal animation that runs on top of it.
//!
//! # Invariants
//! - An idle edge sits exactly at its base position.
//! - An edge runs at most one fracture/heal cycle at a time.
//! - No two edges of a lattice share a canonical key.
//! - All mutation happens inside [`Crystal::tick`]; readers borrow the lattice.

pub mod anim;
pub mod artifact;
pub mod crystal;
pub mod dedup;
pub mod geometry;
pub mod lattice;
pub mod scheduler;

pub use anim::{AnimState, AnimatedEdge, Timings, Transition};
pub use artifact::{PointArtifact, build_animated_edges, build_points};
pub use crystal::Crystal;
pub use dedup::{
    CanonicalEdge, EPSILON, EdgeKey, QuantizedPoint, dedupe, quantize, unique_vertices,
};
pub use geometry::{
    EdgeKind, RawEdge, build_raw_edges, hex_centers, raw_edge_counts, ring_vertices,
};
pub use lattice::{EdgeHandle, Lattice, LatticeError, StateCounts};
pub use scheduler::{BatchReport, MAX_PICK_ATTEMPTS, Scheduler, batch_size_bounds};
