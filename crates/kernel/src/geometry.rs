//! Hexagonal-prism lattice geometry.
//!
//! Hexagon centers are laid out in offset ("brick") rows: horizontal spacing
//! `sqrt(3) * radius`, vertical spacing `1.5 * radius`, odd rows shifted left
//! by half a column. Every ring uses the same pointy-top orientation, so two
//! neighbouring rings compute the same shared border independently. Those
//! duplicates are expected here and removed by [`crate::dedup`].

use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};

use crystal_common::Vertex;
use glam::DVec2;

/// Whether an edge lies in a layer or connects two layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Border segment of one hexagon within a layer.
    Ring,
    /// Vertical segment between the same ring vertex on adjacent layers.
    Pillar,
}

/// An edge exactly as produced by the geometry, duplicates included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEdge {
    pub a: Vertex,
    pub b: Vertex,
    /// Layer index of a ring edge, or the lower layer of a pillar.
    pub layer: u32,
    pub kind: EdgeKind,
}

/// Horizontal distance between hexagon centers in one row.
pub fn column_spacing(radius: f64) -> f64 {
    3.0_f64.sqrt() * radius
}

/// Vertical distance between rows.
pub fn row_spacing(radius: f64) -> f64 {
    2.0 * radius * 0.75
}

/// Centers of all `width * height` hexagons, row-major.
pub fn hex_centers(width: u32, height: u32, radius: f64) -> Vec<DVec2> {
    let dx = column_spacing(radius);
    let dy = row_spacing(radius);
    let mut centers = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height {
        let stagger = if row % 2 == 1 { -dx / 2.0 } else { 0.0 };
        for col in 0..width {
            centers.push(DVec2::new(col as f64 * dx + stagger, row as f64 * dy));
        }
    }
    centers
}

/// Six corners of a hexagon, counter-clockwise, all at elevation `z`.
///
/// Corner `k` sits at `30° + k * 60°` from +x.
pub fn ring_vertices(center: DVec2, z: f64, radius: f64) -> [Vertex; 6] {
    std::array::from_fn(|k| {
        let angle = FRAC_PI_3 * k as f64 + FRAC_PI_6;
        Vertex::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
            z,
        )
    })
}

/// Closed-form `(ring, pillar)` raw edge counts before deduplication.
pub fn raw_edge_counts(width: u32, height: u32, depth: u32) -> (usize, usize) {
    let rings = width as usize * height as usize;
    (6 * rings * depth as usize, 6 * rings * depth.saturating_sub(1) as usize)
}

/// Every ring and pillar edge of the lattice, duplicates included.
///
/// Layer `z` sits at elevation `z * radius`. Dimensions are trusted: zero in
/// any of them yields an empty list.
pub fn build_raw_edges(width: u32, height: u32, depth: u32, radius: f64) -> Vec<RawEdge> {
    let centers = hex_centers(width, height, radius);
    let (ring_count, pillar_count) = raw_edge_counts(width, height, depth);
    let mut edges = Vec::with_capacity(ring_count + pillar_count);

    for layer in 0..depth {
        let z = layer as f64 * radius;
        for &center in &centers {
            let ring = ring_vertices(center, z, radius);
            for k in 0..6 {
                edges.push(RawEdge {
                    a: ring[k],
                    b: ring[(k + 1) % 6],
                    layer,
                    kind: EdgeKind::Ring,
                });
            }
        }
    }

    // Pillars recompute the rings from the same centers, so both ends differ only in z.
    for layer in 0..depth.saturating_sub(1) {
        let lower_z = layer as f64 * radius;
        let upper_z = (layer + 1) as f64 * radius;
        for &center in &centers {
            let lower = ring_vertices(center, lower_z, radius);
            let upper = ring_vertices(center, upper_z, radius);
            for (a, b) in lower.into_iter().zip(upper) {
                edges.push(RawEdge {
                    a,
                    b,
                    layer,
                    kind: EdgeKind::Pillar,
                });
            }
        }
    }

    edges
}
