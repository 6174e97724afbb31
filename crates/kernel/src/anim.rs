//! Per-edge fracture/heal state machine.
//!
//! An edge cycles Idle -> Fracturing -> Healing -> Idle. While fracturing,
//! endpoint 1 slides from its base position to the segment midpoint; while
//! healing it slides back. Endpoint 0 never moves. Progress is computed from
//! wall-clock timestamps, so the result does not depend on how often
//! [`AnimatedEdge::advance`] is called.

use std::time::{Duration, Instant};

use crystal_common::{Color, Palette, Vertex};

use crate::dedup::CanonicalEdge;
use crate::geometry::EdgeKind;

/// Animation phase of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    Fracturing { started_at: Instant },
    Healing { started_at: Instant },
}

impl AnimState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AnimState::Idle)
    }
}

/// Phase lengths shared by every edge of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub breaking: Duration,
    pub healing: Duration,
}

impl Timings {
    pub fn new(breaking: Duration, healing: Duration) -> Self {
        Self { breaking, healing }
    }
}

/// A state change produced by [`AnimatedEdge::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Fracturing finished; healing started.
    Healing,
    /// Healing finished; the edge is back at rest.
    Rested,
}

/// A lattice edge with its mutable animation state.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedEdge {
    base: [Vertex; 2],
    current: [Vertex; 2],
    state: AnimState,
    color: Color,
    rest_color: Color,
    layer: u32,
    kind: EdgeKind,
}

impl AnimatedEdge {
    pub fn new(edge: &CanonicalEdge, rest_color: Color) -> Self {
        let base = [edge.a, edge.b];
        Self {
            base,
            current: base,
            state: AnimState::Idle,
            color: rest_color,
            rest_color,
            layer: edge.layer,
            kind: edge.kind,
        }
    }

    /// Home position of both endpoints.
    pub fn base(&self) -> [Vertex; 2] {
        self.base
    }

    /// Endpoints as they should be drawn this frame.
    pub fn current(&self) -> [Vertex; 2] {
        self.current
    }

    /// `current` flattened to six floats for vertex buffers.
    pub fn current_positions(&self) -> [f64; 6] {
        let [a, b] = self.current;
        [a.x, a.y, a.z, b.x, b.y, b.z]
    }

    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn rest_color(&self) -> Color {
        self.rest_color
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Midpoint of the two base endpoints.
    pub fn midpoint(&self) -> Vertex {
        (self.base[0] + self.base[1]) * 0.5
    }

    /// Start a fracture. Returns `false` and changes nothing unless the edge is idle.
    pub fn begin_fracture(&mut self, now: Instant, palette: &Palette) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = AnimState::Fracturing { started_at: now };
        self.color = palette.fracture;
        true
    }

    /// Move the animated endpoint to where it belongs at `now`.
    ///
    /// A long gap between calls may finish both phases at once; the last
    /// transition taken is returned.
    pub fn advance(
        &mut self,
        now: Instant,
        timings: &Timings,
        palette: &Palette,
    ) -> Option<Transition> {
        let mut transition = None;
        loop {
            match self.state {
                AnimState::Idle => return transition,
                AnimState::Fracturing { started_at } => {
                    let t = progress(started_at, now, timings.breaking);
                    if t < 1.0 {
                        self.current[1] = self.base[1].lerp(self.midpoint(), t);
                        return transition;
                    }
                    self.current[1] = self.midpoint();
                    self.color = palette.heal;
                    self.state = AnimState::Healing {
                        started_at: started_at + timings.breaking,
                    };
                    transition = Some(Transition::Healing);
                }
                AnimState::Healing { started_at } => {
                    let t = progress(started_at, now, timings.healing);
                    if t < 1.0 {
                        self.current[1] = self.midpoint().lerp(self.base[1], t);
                        return transition;
                    }
                    self.rest();
                    return Some(Transition::Rested);
                }
            }
        }
    }

    fn rest(&mut self) {
        self.current = self.base;
        self.color = self.rest_color;
        self.state = AnimState::Idle;
    }
}

/// Elapsed fraction of a phase. A zero-length phase is always complete.
fn progress(started_at: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(started_at);
    elapsed.as_secs_f64() / duration.as_secs_f64()
}
