//! Draw-ready records built from the deduplicated lattice.

use crystal_common::{Palette, Vertex};

use crate::anim::AnimatedEdge;
use crate::dedup::CanonicalEdge;

/// Decoration sphere at a unique lattice vertex. Static for the life of a lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointArtifact {
    pub position: Vertex,
    pub radius: f64,
}

/// Wrap each canonical edge in a resting [`AnimatedEdge`].
pub fn build_animated_edges(edges: &[CanonicalEdge], palette: &Palette) -> Vec<AnimatedEdge> {
    edges
        .iter()
        .map(|edge| AnimatedEdge::new(edge, palette.rest))
        .collect()
}

pub fn build_points(vertices: &[Vertex], point_radius: f64) -> Vec<PointArtifact> {
    vertices
        .iter()
        .map(|&position| PointArtifact {
            position,
            radius: point_radius,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::{dedupe, unique_vertices};
    use crate::geometry::build_raw_edges;

    #[test]
    fn one_animated_edge_per_canonical_edge() {
        let canonical = dedupe(&build_raw_edges(2, 2, 2, 1.0));
        let palette = Palette::default();
        let animated = build_animated_edges(&canonical, &palette);

        assert_eq!(animated.len(), canonical.len());
        for (a, c) in animated.iter().zip(&canonical) {
            assert_eq!(a.base(), [c.a, c.b]);
            assert_eq!(a.current(), a.base());
            assert_eq!(a.color(), palette.rest);
            assert!(a.is_idle());
        }
    }

    #[test]
    fn points_carry_radius() {
        let vertices = unique_vertices(&build_raw_edges(1, 1, 1, 3.0));
        let points = build_points(&vertices, 0.25);
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.radius == 0.25));
        assert_eq!(points[0].position, vertices[0]);
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(build_animated_edges(&[], &Palette::default()).is_empty());
        assert!(build_points(&[], 1.0).is_empty());
    }
}
