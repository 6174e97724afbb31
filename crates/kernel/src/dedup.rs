//! Tolerance-based identity for vertices and edges.
//!
//! Adjacent hexagons compute their shared border independently, so the same
//! point can come out a few ulps apart. Coordinates are quantized to integer
//! multiples of [`EPSILON`] and the resulting integer triples are used directly
//! as map keys. Quantization only decides identity: stored geometry keeps the
//! unrounded coordinates of the first occurrence.

use std::collections::HashSet;

use crystal_common::Vertex;

use crate::geometry::{EdgeKind, RawEdge};

/// Quantization step for coordinate identity.
pub const EPSILON: f64 = 1e-10;

/// A vertex snapped to the `EPSILON` grid. Ordering is lexicographic on x, y, z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedPoint {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Snap a vertex to the `EPSILON` grid.
pub fn quantize(v: Vertex) -> QuantizedPoint {
    QuantizedPoint {
        x: (v.x / EPSILON).round() as i64,
        y: (v.y / EPSILON).round() as i64,
        z: (v.z / EPSILON).round() as i64,
    }
}

/// Order-independent identity of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub lo: QuantizedPoint,
    pub hi: QuantizedPoint,
    pub layer: u32,
}

/// An edge whose endpoints are ordered so that `a` quantizes no greater than `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalEdge {
    pub a: Vertex,
    pub b: Vertex,
    pub layer: u32,
    pub kind: EdgeKind,
}

impl CanonicalEdge {
    /// Order the endpoints of a raw edge.
    pub fn from_raw(raw: &RawEdge) -> Self {
        let (a, b) = if quantize(raw.a) <= quantize(raw.b) {
            (raw.a, raw.b)
        } else {
            (raw.b, raw.a)
        };
        Self {
            a,
            b,
            layer: raw.layer,
            kind: raw.kind,
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            lo: quantize(self.a),
            hi: quantize(self.b),
            layer: self.layer,
        }
    }

    fn as_raw(&self) -> RawEdge {
        RawEdge {
            a: self.a,
            b: self.b,
            layer: self.layer,
            kind: self.kind,
        }
    }
}

/// Collapse geometrically identical edges; first occurrence wins.
///
/// Output keeps first-insertion order.
pub fn dedupe(raw: &[RawEdge]) -> Vec<CanonicalEdge> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.iter()
        .map(CanonicalEdge::from_raw)
        .filter(|edge| seen.insert(edge.key()))
        .collect()
}

/// Re-run deduplication over already canonical edges.
pub fn dedupe_canonical(edges: &[CanonicalEdge]) -> Vec<CanonicalEdge> {
    let raw: Vec<RawEdge> = edges.iter().map(CanonicalEdge::as_raw).collect();
    dedupe(&raw)
}

/// Every distinct endpoint of `raw`, in first-seen order.
pub fn unique_vertices(raw: &[RawEdge]) -> Vec<Vertex> {
    let mut seen = HashSet::new();
    raw.iter()
        .flat_map(|e| [e.a, e.b])
        .filter(|v| seen.insert(quantize(*v)))
        .collect()
}
