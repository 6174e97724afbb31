//! Developer Tooling: read-only inspection of a running crystal.
//!
//! # Invariants
//! - Tools never mutate the lattice or the scheduler.

mod inspector;

pub use inspector::{CrystalSummary, EdgeInfo, LatticeInspector};

pub fn crate_info() -> &'static str {
    "crystal-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
