//! GPU-layout vertex data for the lattice.
//!
//! The host uploads these slices as-is. [`LineBatch`] is refreshed every
//! frame and reuses its allocation for as long as the lattice epoch stays
//! the same; [`PointBatch`] only changes when the lattice is regenerated.

use bytemuck::{Pod, Zeroable};
use crystal_kernel::Lattice;

/// One endpoint of a line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Instance data for one decoration sphere.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub radius: f32,
}

/// Two vertices per edge, in edge order, rewritten in place by [`LineBatch::refresh`].
#[derive(Debug, Default)]
pub struct LineBatch {
    vertices: Vec<LineVertex>,
    epoch: Option<u64>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy current endpoint positions and colors out of the lattice.
    ///
    /// Returns `true` when the buffer had to be resized, i.e. the host must
    /// recreate its GPU buffer rather than overwrite it.
    pub fn refresh(&mut self, lattice: &Lattice) -> bool {
        let wanted = lattice.edge_count() * 2;
        let resized = self.epoch != Some(lattice.epoch()) || self.vertices.len() != wanted;
        if resized {
            tracing::debug!(
                epoch = lattice.epoch(),
                vertices = wanted,
                "resizing line batch"
            );
            self.vertices.clear();
            self.vertices.resize(wanted, LineVertex::zeroed());
            self.epoch = Some(lattice.epoch());
        }

        for (pair, edge) in self.vertices.chunks_exact_mut(2).zip(lattice.edges()) {
            let color = edge.color().to_rgba_f32();
            for (slot, position) in pair.iter_mut().zip(edge.current()) {
                *slot = LineVertex {
                    position: position.as_vec3().to_array(),
                    color,
                };
            }
        }
        resized
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Epoch of the lattice last copied, if any.
    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }
}

/// One instance per unique lattice vertex.
#[derive(Debug, Clone)]
pub struct PointBatch {
    instances: Vec<PointInstance>,
    epoch: u64,
}

impl PointBatch {
    pub fn from_lattice(lattice: &Lattice) -> Self {
        let instances = lattice
            .points()
            .iter()
            .map(|p| PointInstance {
                position: p.position.as_vec3().to_array(),
                radius: p.radius as f32,
            })
            .collect();
        Self {
            instances,
            epoch: lattice.epoch(),
        }
    }

    /// Whether this batch was built from a different lattice generation.
    pub fn is_stale(&self, lattice: &Lattice) -> bool {
        self.epoch != lattice.epoch()
    }

    pub fn instances(&self) -> &[PointInstance] {
        &self.instances
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crystal_common::LatticeConfig;
    use crystal_kernel::Crystal;
    use std::time::{Duration, Instant};

    fn config() -> LatticeConfig {
        LatticeConfig {
            grid_width: 3,
            grid_height: 2,
            grid_depth: 2,
            radius: 2.0,
            breaking_duration_secs: 1.0,
            healing_duration_secs: 1.0,
            ..LatticeConfig::default()
        }
    }

    #[test]
    fn vertex_layouts() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
        assert_eq!(std::mem::size_of::<PointInstance>(), 16);
    }

    #[test]
    fn refresh_copies_positions_and_colors() {
        let crystal = Crystal::new(&config(), 0);
        let mut batch = LineBatch::new();
        assert!(batch.refresh(crystal.lattice()));
        assert_eq!(batch.vertex_count() as usize, crystal.lattice().edge_count() * 2);

        let edge = &crystal.lattice().edges()[0];
        let [a, b] = edge.current();
        assert_eq!(batch.vertices()[0].position, a.as_vec3().to_array());
        assert_eq!(batch.vertices()[1].position, b.as_vec3().to_array());
        assert_eq!(batch.vertices()[0].color, edge.color().to_rgba_f32());
    }

    #[test]
    fn refresh_reuses_allocation_within_epoch() {
        let mut crystal = Crystal::new(&config(), 4);
        let mut batch = LineBatch::new();
        batch.refresh(crystal.lattice());
        let ptr = batch.vertices().as_ptr();

        let t0 = Instant::now();
        for frame in 0..30 {
            crystal.tick(t0 + Duration::from_millis(frame * 50));
            assert!(!batch.refresh(crystal.lattice()));
            assert_eq!(batch.vertices().as_ptr(), ptr);
        }
    }

    #[test]
    fn refresh_tracks_animation() {
        let mut crystal = Crystal::new(&config(), 4);
        let mut batch = LineBatch::new();
        let t0 = Instant::now();
        crystal.tick(t0);
        crystal.tick(t0 + Duration::from_millis(500));
        batch.refresh(crystal.lattice());

        for (i, edge) in crystal.lattice().edges().iter().enumerate() {
            let moving = edge.current()[1].as_vec3().to_array();
            assert_eq!(batch.vertices()[i * 2 + 1].position, moving);
        }
    }

    #[test]
    fn regeneration_resizes_batch() {
        let mut crystal = Crystal::new(&config(), 4);
        let mut batch = LineBatch::new();
        batch.refresh(crystal.lattice());

        crystal.reconfigure(&LatticeConfig {
            grid_depth: 3,
            ..config()
        });
        assert!(batch.refresh(crystal.lattice()));
        assert_eq!(batch.epoch(), Some(1));
        assert_eq!(batch.vertex_count() as usize, crystal.lattice().edge_count() * 2);
    }

    #[test]
    fn point_batch_matches_points() {
        let mut crystal = Crystal::new(&config(), 0);
        let points = PointBatch::from_lattice(crystal.lattice());
        assert_eq!(points.instances().len(), crystal.lattice().points().len());
        assert_eq!(points.as_bytes().len(), points.instances().len() * 16);
        assert!(!points.is_stale(crystal.lattice()));

        crystal.reconfigure(&LatticeConfig {
            radius: 3.0,
            ..config()
        });
        assert!(points.is_stale(crystal.lattice()));
    }
}
