use std::time::Instant;

use crystal_common::{LatticeConfig, Palette};

use crate::anim::{AnimState, AnimatedEdge, Timings, Transition};
use crate::artifact::{PointArtifact, build_animated_edges, build_points};
use crate::dedup::{dedupe, unique_vertices};
use crate::geometry::build_raw_edges;

/// Errors from addressing an edge through an [`EdgeHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LatticeError {
    #[error("handle from epoch {handle_epoch} used on lattice epoch {current_epoch}")]
    StaleHandle { handle_epoch: u64, current_epoch: u64 },
    #[error("edge index {index} out of range (lattice has {len} edges)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Reference to one edge of one specific lattice generation.
///
/// A handle outlives nothing: once the lattice is regenerated the epoch
/// no longer matches and every use of the handle is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    pub epoch: u64,
    pub index: usize,
}

/// Number of edges in each animation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub idle: usize,
    pub fracturing: usize,
    pub healing: usize,
}

/// The generated lattice: an arena of animated edges plus static points.
///
/// Owns every piece of mutable animation state. Renderers borrow it
/// immutably; only the scheduler mutates it.
#[derive(Debug, Clone)]
pub struct Lattice {
    config: LatticeConfig,
    epoch: u64,
    timings: Timings,
    raw_edge_count: usize,
    edges: Vec<AnimatedEdge>,
    points: Vec<PointArtifact>,
}

impl Lattice {
    /// Build geometry, deduplicate, and wrap everything in draw records.
    pub fn generate(config: &LatticeConfig, epoch: u64) -> Self {
        let _span = tracing::info_span!("lattice_generate", epoch).entered();
        let start = Instant::now();

        let raw = build_raw_edges(
            config.grid_width,
            config.grid_height,
            config.grid_depth,
            config.radius,
        );
        let canonical = dedupe(&raw);
        let vertices = unique_vertices(&raw);
        let edges = build_animated_edges(&canonical, &config.palette);
        let points = build_points(&vertices, config.point_radius);

        tracing::info!(
            epoch,
            raw_edges = raw.len(),
            edges = edges.len(),
            points = points.len(),
            elapsed = ?start.elapsed(),
            "lattice generated"
        );

        Self {
            config: config.clone(),
            epoch,
            timings: Timings::new(config.breaking_duration(), config.healing_duration()),
            raw_edge_count: raw.len(),
            edges,
            points,
        }
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    /// Generation counter; bumped on every regeneration.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Edge count before deduplication.
    pub fn raw_edge_count(&self) -> usize {
        self.raw_edge_count
    }

    /// Line-segment draw records, mutated in place by the scheduler.
    pub fn edges(&self) -> &[AnimatedEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Point draw records. Static until the next regeneration.
    pub fn points(&self) -> &[PointArtifact] {
        &self.points
    }

    pub fn handle(&self, index: usize) -> Option<EdgeHandle> {
        (index < self.edges.len()).then_some(EdgeHandle {
            epoch: self.epoch,
            index,
        })
    }

    /// Resolve a handle against this generation.
    pub fn edge(&self, handle: EdgeHandle) -> Result<&AnimatedEdge, LatticeError> {
        let index = self.check(handle)?;
        Ok(&self.edges[index])
    }

    /// Start a fracture on the edge behind `handle`.
    ///
    /// `Ok(false)` means the edge is already animating and was left untouched.
    pub fn start_fracture(
        &mut self,
        handle: EdgeHandle,
        now: Instant,
    ) -> Result<bool, LatticeError> {
        let index = self.check(handle)?;
        Ok(self.edges[index].begin_fracture(now, &self.config.palette))
    }

    pub(crate) fn begin_fracture_at(&mut self, index: usize, now: Instant) -> bool {
        self.edges[index].begin_fracture(now, &self.config.palette)
    }

    pub fn is_idle(&self, index: usize) -> bool {
        self.edges.get(index).is_some_and(AnimatedEdge::is_idle)
    }

    /// Advance every animating edge to `now`. Returns the number of edges that came to rest.
    pub fn advance(&mut self, now: Instant) -> usize {
        let timings = self.timings;
        let palette = self.config.palette;
        let mut rested = 0;
        for (index, edge) in self.edges.iter_mut().enumerate() {
            if edge.is_idle() {
                continue;
            }
            if let Some(transition) = edge.advance(now, &timings, &palette) {
                tracing::trace!(index, ?transition, "edge transition");
                if transition == Transition::Rested {
                    rested += 1;
                }
            }
        }
        rested
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for edge in &self.edges {
            match edge.state() {
                AnimState::Idle => counts.idle += 1,
                AnimState::Fracturing { .. } => counts.fracturing += 1,
                AnimState::Healing { .. } => counts.healing += 1,
            }
        }
        counts
    }

    fn check(&self, handle: EdgeHandle) -> Result<usize, LatticeError> {
        if handle.epoch != self.epoch {
            return Err(LatticeError::StaleHandle {
                handle_epoch: handle.epoch,
                current_epoch: self.epoch,
            });
        }
        if handle.index >= self.edges.len() {
            return Err(LatticeError::IndexOutOfRange {
                index: handle.index,
                len: self.edges.len(),
            });
        }
        Ok(handle.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn small_config() -> LatticeConfig {
        LatticeConfig {
            grid_width: 3,
            grid_height: 3,
            grid_depth: 4,
            radius: 10.0,
            breaking_duration_secs: 1.0,
            healing_duration_secs: 1.0,
            ..LatticeConfig::default()
        }
    }

    #[test]
    fn generate_scenario_lattice() {
        let lattice = Lattice::generate(&small_config(), 0);
        assert_eq!(lattice.raw_edge_count(), 378);
        assert_eq!(lattice.edge_count(), 242);
        assert_eq!(lattice.points().len(), 120);
        assert_eq!(lattice.state_counts().idle, 242);
    }

    #[test]
    fn handle_round_trip() {
        let lattice = Lattice::generate(&small_config(), 3);
        let h = lattice.handle(5).unwrap();
        assert_eq!(h.epoch, 3);
        assert!(lattice.edge(h).is_ok());
        assert!(lattice.handle(10_000).is_none());
    }

    #[test]
    fn stale_handle_is_rejected() {
        let old = Lattice::generate(&small_config(), 1);
        let handle = old.handle(0).unwrap();

        let mut fresh = Lattice::generate(&small_config(), 2);
        let err = fresh.start_fracture(handle, Instant::now()).unwrap_err();
        assert_eq!(
            err,
            LatticeError::StaleHandle {
                handle_epoch: 1,
                current_epoch: 2
            }
        );
        assert_eq!(fresh.state_counts().idle, fresh.edge_count());
    }

    #[test]
    fn out_of_range_handle_is_rejected() {
        let mut lattice = Lattice::generate(&small_config(), 0);
        let handle = EdgeHandle {
            epoch: 0,
            index: 9999,
        };
        assert!(matches!(
            lattice.start_fracture(handle, Instant::now()),
            Err(LatticeError::IndexOutOfRange { index: 9999, .. })
        ));
    }

    #[test]
    fn start_fracture_twice_is_noop() {
        let mut lattice = Lattice::generate(&small_config(), 0);
        let h = lattice.handle(0).unwrap();
        let t0 = Instant::now();
        assert_eq!(lattice.start_fracture(h, t0), Ok(true));
        assert_eq!(
            lattice.start_fracture(h, t0 + Duration::from_millis(300)),
            Ok(false)
        );
        assert_eq!(
            lattice.edge(h).unwrap().state(),
            AnimState::Fracturing { started_at: t0 }
        );
    }

    #[test]
    fn advance_returns_edges_to_rest() {
        let mut lattice = Lattice::generate(&small_config(), 0);
        let t0 = Instant::now();
        for i in 0..10 {
            let h = lattice.handle(i).unwrap();
            lattice.start_fracture(h, t0).unwrap();
        }
        assert_eq!(lattice.state_counts().fracturing, 10);

        assert_eq!(lattice.advance(t0 + Duration::from_millis(1500)), 0);
        assert_eq!(lattice.state_counts().healing, 10);

        assert_eq!(lattice.advance(t0 + Duration::from_secs(2)), 10);
        assert_eq!(lattice.state_counts().idle, lattice.edge_count());
        for edge in lattice.edges() {
            assert_eq!(edge.current(), edge.base());
        }
    }

    #[test]
    fn degenerate_config_builds_empty_lattice() {
        let cfg = LatticeConfig {
            grid_depth: 0,
            ..LatticeConfig::default()
        };
        let lattice = Lattice::generate(&cfg, 0);
        assert_eq!(lattice.edge_count(), 0);
        assert!(lattice.points().is_empty());
    }
}
