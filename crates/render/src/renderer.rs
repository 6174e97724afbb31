use std::fmt::Write;

use crystal_kernel::{AnimState, EdgeKind, Lattice};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the lattice and produces output. It never mutates it:
/// animation state is owned by the scheduler.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the lattice as it stands.
    fn render(&self, lattice: &Lattice) -> Self::Output;
}

/// Human-readable dump of the lattice for the CLI, logs, and tests.
///
/// Lists every animating edge; idle edges are only listed when `show_idle` is set.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    pub show_idle: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle(mut self, show_idle: bool) -> Self {
        self.show_idle = show_idle;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, lattice: &Lattice) -> String {
        let counts = lattice.state_counts();
        let mut out = String::new();
        let _ = writeln!(out, "=== Crystal Lattice (epoch={}) ===", lattice.epoch());
        let _ = writeln!(
            out,
            "Edges: {} (raw {})  Points: {}",
            lattice.edge_count(),
            lattice.raw_edge_count(),
            lattice.points().len()
        );
        let _ = writeln!(
            out,
            "Idle: {}  Fracturing: {}  Healing: {}",
            counts.idle, counts.fracturing, counts.healing
        );

        for (index, edge) in lattice.edges().iter().enumerate() {
            let state = match edge.state() {
                AnimState::Idle if !self.show_idle => continue,
                AnimState::Idle => "idle",
                AnimState::Fracturing { .. } => "fracturing",
                AnimState::Healing { .. } => "healing",
            };
            let kind = match edge.kind() {
                EdgeKind::Ring => "ring",
                EdgeKind::Pillar => "pillar",
            };
            let [a, b] = edge.current();
            let _ = writeln!(
                out,
                "  [{index:>5}] {kind:<6} L{} {state:<10} {} ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
                edge.layer(),
                edge.color(),
                a.x,
                a.y,
                a.z,
                b.x,
                b.y,
                b.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crystal_common::LatticeConfig;
    use std::time::Instant;

    fn lattice() -> Lattice {
        let cfg = LatticeConfig {
            grid_width: 2,
            grid_height: 1,
            grid_depth: 1,
            radius: 1.0,
            ..LatticeConfig::default()
        };
        Lattice::generate(&cfg, 0)
    }

    #[test]
    fn debug_renderer_resting_lattice() {
        let output = DebugTextRenderer::new().render(&lattice());
        assert!(output.contains("epoch=0"));
        assert!(output.contains("Edges: 11 (raw 12)"));
        assert!(output.contains("Idle: 11"));
        assert!(!output.contains("fracturing "));
    }

    #[test]
    fn debug_renderer_lists_animating_edges() {
        let mut lattice = lattice();
        let h = lattice.handle(3).unwrap();
        lattice.start_fracture(h, Instant::now()).unwrap();

        let output = DebugTextRenderer::new().render(&lattice);
        assert!(output.contains("Fracturing: 1"));
        assert!(output.contains("[    3] ring"));
        assert!(output.contains("fracturing"));
    }

    #[test]
    fn debug_renderer_can_show_idle() {
        let output = DebugTextRenderer::new().with_idle(true).render(&lattice());
        assert_eq!(output.matches(" idle ").count(), 11);
    }
}
