use std::time::Instant;

use crystal_common::LatticeConfig;

use crate::lattice::Lattice;
use crate::scheduler::{BatchReport, Scheduler};

/// The lattice together with the scheduler that animates it.
///
/// This is the whole surface a host needs: build once, call [`Crystal::tick`]
/// every frame, read [`Crystal::lattice`] to draw, and call
/// [`Crystal::reconfigure`] whenever a parameter changes.
#[derive(Debug, Clone)]
pub struct Crystal {
    lattice: Lattice,
    scheduler: Scheduler,
}

impl Crystal {
    /// Generate the first lattice (epoch 0) with a seeded scheduler.
    pub fn new(config: &LatticeConfig, seed: u64) -> Self {
        let lattice = Lattice::generate(config, 0);
        let mut scheduler = Scheduler::new(seed);
        scheduler.restart(lattice.epoch());
        Self { lattice, scheduler }
    }

    /// Read-only view for renderers.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &LatticeConfig {
        self.lattice.config()
    }

    pub fn epoch(&self) -> u64 {
        self.lattice.epoch()
    }

    /// Advance the animation to `now`.
    pub fn tick(&mut self, now: Instant) -> Option<BatchReport> {
        let _span = tracing::trace_span!("crystal_tick", epoch = self.lattice.epoch()).entered();
        self.scheduler.tick(&mut self.lattice, now)
    }

    /// Discard the current lattice and build a new one from `config`.
    ///
    /// Returns `false` without touching anything when `config` equals the
    /// current one. Otherwise the epoch is bumped, so handles taken from the
    /// old lattice are rejected, and the next tick starts a fresh batch.
    pub fn reconfigure(&mut self, config: &LatticeConfig) -> bool {
        if config == self.lattice.config() {
            return false;
        }
        let epoch = self.lattice.epoch() + 1;
        tracing::info!(epoch, "regenerating lattice");
        self.lattice = Lattice::generate(config, epoch);
        self.scheduler.restart(epoch);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeError;
    use std::time::Duration;

    fn config() -> LatticeConfig {
        LatticeConfig {
            grid_width: 4,
            grid_height: 4,
            grid_depth: 2,
            radius: 5.0,
            breaking_duration_secs: 0.5,
            healing_duration_secs: 0.5,
            ..LatticeConfig::default()
        }
    }

    #[test]
    fn new_crystal_is_at_rest() {
        let crystal = Crystal::new(&config(), 1);
        assert_eq!(crystal.epoch(), 0);
        assert_eq!(
            crystal.lattice().state_counts().idle,
            crystal.lattice().edge_count()
        );
    }

    #[test]
    fn reconfigure_same_config_is_noop() {
        let mut crystal = Crystal::new(&config(), 1);
        assert!(!crystal.reconfigure(&config()));
        assert_eq!(crystal.epoch(), 0);
    }

    #[test]
    fn reconfigure_rebuilds_and_bumps_epoch() {
        let mut crystal = Crystal::new(&config(), 1);
        let t0 = Instant::now();
        crystal.tick(t0);
        let old_handle = crystal.lattice().handle(0).unwrap();
        let old_edges = crystal.lattice().edge_count();

        let bigger = LatticeConfig {
            grid_depth: 3,
            ..config()
        };
        assert!(crystal.reconfigure(&bigger));
        assert_eq!(crystal.epoch(), 1);
        assert!(crystal.lattice().edge_count() > old_edges);
        assert_eq!(
            crystal.lattice().state_counts().idle,
            crystal.lattice().edge_count()
        );
        assert!(matches!(
            crystal.lattice().edge(old_handle),
            Err(LatticeError::StaleHandle { .. })
        ));

        // The scheduler restarts: a batch fires right away.
        assert!(crystal.tick(t0 + Duration::from_millis(10)).is_some());
    }

    #[test]
    fn idle_edges_stay_at_base_through_many_frames() {
        let mut crystal = Crystal::new(&config(), 99);
        let t0 = Instant::now();
        for frame in 0..600 {
            crystal.tick(t0 + Duration::from_millis(frame * 16));
            for edge in crystal.lattice().edges() {
                if edge.is_idle() {
                    assert_eq!(edge.current(), edge.base());
                }
            }
        }
        assert!(crystal.scheduler().batches_issued() >= 4);
    }
}
