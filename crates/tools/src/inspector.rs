use std::time::{Duration, Instant};

use crystal_kernel::{AnimState, Crystal, EdgeKind, Lattice};

/// Lattice inspector for developer tooling.
///
/// Provides read-only queries against a crystal for debugging and the CLI.
pub struct LatticeInspector;

impl LatticeInspector {
    /// Produce a summary of the crystal as of `now`.
    pub fn summary(crystal: &Crystal, now: Instant) -> CrystalSummary {
        let lattice = crystal.lattice();
        let counts = lattice.state_counts();
        CrystalSummary {
            epoch: lattice.epoch(),
            raw_edges: lattice.raw_edge_count(),
            edges: lattice.edge_count(),
            points: lattice.points().len(),
            idle: counts.idle,
            fracturing: counts.fracturing,
            healing: counts.healing,
            batches_issued: crystal.scheduler().batches_issued(),
            next_batch_in: crystal
                .scheduler()
                .next_batch_at()
                .map(|at| at.saturating_duration_since(now)),
        }
    }

    /// Details of one edge, if the index exists.
    pub fn inspect_edge(lattice: &Lattice, index: usize) -> Option<EdgeInfo> {
        let edge = lattice.edges().get(index)?;
        let [base_a, base_b] = edge.base();
        let [cur_a, cur_b] = edge.current();
        Some(EdgeInfo {
            index,
            kind: edge.kind(),
            layer: edge.layer(),
            state: match edge.state() {
                AnimState::Idle => "idle",
                AnimState::Fracturing { .. } => "fracturing",
                AnimState::Healing { .. } => "healing",
            },
            base: [base_a.to_array(), base_b.to_array()],
            current: [cur_a.to_array(), cur_b.to_array()],
            displacement: cur_b.distance(base_b),
        })
    }

    /// Indices of every edge currently mid-animation.
    pub fn list_animating(lattice: &Lattice) -> Vec<usize> {
        lattice
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_idle())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Summary of crystal state for the inspector.
#[derive(Debug, Clone)]
pub struct CrystalSummary {
    pub epoch: u64,
    pub raw_edges: usize,
    pub edges: usize,
    pub points: usize,
    pub idle: usize,
    pub fracturing: usize,
    pub healing: usize,
    pub batches_issued: u64,
    /// `None` when the next batch fires on the next tick.
    pub next_batch_in: Option<Duration>,
}

impl std::fmt::Display for CrystalSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crystal: epoch={} edges={} (raw {}) points={} idle={} fracturing={} healing={} batches={}",
            self.epoch,
            self.edges,
            self.raw_edges,
            self.points,
            self.idle,
            self.fracturing,
            self.healing,
            self.batches_issued,
        )?;
        match self.next_batch_in {
            Some(d) => write!(f, " next_batch_in={:.2}s", d.as_secs_f64()),
            None => write!(f, " next_batch_in=now"),
        }
    }
}

/// Detailed info about a single edge.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub index: usize,
    pub kind: EdgeKind,
    pub layer: u32,
    pub state: &'static str,
    pub base: [[f64; 3]; 2],
    pub current: [[f64; 3]; 2],
    /// Distance of the animated endpoint from its base position.
    pub displacement: f64,
}

impl std::fmt::Display for EdgeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b] = self.current;
        write!(
            f,
            "Edge [{}] {:?} L{} {} ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2}) displaced={:.3}",
            self.index,
            self.kind,
            self.layer,
            self.state,
            a[0],
            a[1],
            a[2],
            b[0],
            b[1],
            b[2],
            self.displacement,
        )
    }
}
