//! Recurring batch selection for the fracture/heal effect.
//!
//! The host calls [`Scheduler::tick`] once per frame. When a batch is due the
//! scheduler picks a random 10–20% of the edges among those at rest, starts
//! their fracture, and arms the next batch one full cycle plus
//! [`crystal_common::BATCH_PAUSE`] later. Every tick then advances all
//! animating edges to the current time.

use std::collections::HashSet;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::lattice::Lattice;

/// Random draws allowed per batch slot before the slot is given up.
pub const MAX_PICK_ATTEMPTS: usize = 256;

/// Smallest share of the lattice fractured by one batch.
pub const BATCH_MIN_FRACTION: f64 = 0.10;

/// Largest share of the lattice fractured by one batch.
pub const BATCH_MAX_FRACTION: f64 = 0.20;

/// Inclusive `(min, max)` batch size for a lattice of `total` edges.
pub fn batch_size_bounds(total: usize) -> (usize, usize) {
    let lo = (total as f64 * BATCH_MIN_FRACTION).floor() as usize;
    let hi = (total as f64 * BATCH_MAX_FRACTION).floor() as usize;
    (lo, hi.max(lo))
}

/// Outcome of one batch selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Batch size drawn for this pass.
    pub requested: usize,
    /// Edges whose fracture actually started.
    pub issued: usize,
    /// Slots abandoned after [`MAX_PICK_ATTEMPTS`] draws found no idle edge.
    pub skipped: usize,
}

/// Drives the fracture/heal cycle of a [`Lattice`].
///
/// Seeded, so the same seed and the same tick timestamps replay the same
/// sequence of batches.
#[derive(Debug, Clone)]
pub struct Scheduler {
    rng: StdRng,
    epoch: u64,
    next_batch_at: Option<Instant>,
    batches: u64,
}

impl Scheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            epoch: 0,
            next_batch_at: None,
            batches: 0,
        }
    }

    /// Forget the pending timer and follow lattice generation `epoch`.
    /// The next tick issues a batch immediately.
    pub fn restart(&mut self, epoch: u64) {
        self.epoch = epoch;
        self.next_batch_at = None;
    }

    /// Epoch of the lattice this scheduler is currently driving.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// When the next batch fires; `None` means on the next tick.
    pub fn next_batch_at(&self) -> Option<Instant> {
        self.next_batch_at
    }

    /// Batches issued since construction.
    pub fn batches_issued(&self) -> u64 {
        self.batches
    }

    /// Run one frame: issue a batch if due, then advance every animating edge.
    pub fn tick(&mut self, lattice: &mut Lattice, now: Instant) -> Option<BatchReport> {
        if lattice.epoch() != self.epoch {
            tracing::debug!(
                from = self.epoch,
                to = lattice.epoch(),
                "lattice replaced, restarting scheduler"
            );
            self.restart(lattice.epoch());
        }

        let due = match self.next_batch_at {
            None => true,
            Some(at) => now >= at,
        };
        let report = due.then(|| {
            let report = self.issue_batch(lattice, now);
            self.next_batch_at = Some(now + lattice.config().batch_interval());
            report
        });

        lattice.advance(now);
        report
    }

    /// Draw a batch size and start fracturing that many idle edges.
    pub fn issue_batch(&mut self, lattice: &mut Lattice, now: Instant) -> BatchReport {
        let (lo, hi) = batch_size_bounds(lattice.edge_count());
        let requested = if hi == 0 {
            0
        } else {
            self.rng.gen_range(lo..=hi)
        };

        let picks = self.select_idle(lattice, requested);
        let mut issued = 0;
        for index in &picks {
            if lattice.begin_fracture_at(*index, now) {
                issued += 1;
            }
        }
        self.batches += 1;

        let report = BatchReport {
            requested,
            issued,
            skipped: requested - picks.len(),
        };
        tracing::debug!(
            epoch = lattice.epoch(),
            requested = report.requested,
            issued = report.issued,
            skipped = report.skipped,
            "fracture batch issued"
        );
        report
    }

    /// Pick up to `count` distinct idle edge indices.
    ///
    /// Each slot gets at most [`MAX_PICK_ATTEMPTS`] uniform draws; a slot that
    /// finds nothing is dropped, so a busy lattice yields a short batch.
    pub fn select_idle(&mut self, lattice: &Lattice, count: usize) -> Vec<usize> {
        let total = lattice.edge_count();
        let mut picked = Vec::with_capacity(count);
        if total == 0 {
            return picked;
        }

        let mut taken = HashSet::with_capacity(count);
        for _ in 0..count {
            for _ in 0..MAX_PICK_ATTEMPTS {
                let index = self.rng.gen_range(0..total);
                if lattice.is_idle(index) && taken.insert(index) {
                    picked.push(index);
                    break;
                }
            }
        }
        picked
    }
}
