//! Shared types for the crystal lattice: vertices, display colors, and the
//! per-generation configuration.

mod config;
mod types;

pub use config::{
    BATCH_PAUSE, ConfigError, DURATION_RANGE, GRID_DEPTH_RANGE, GRID_HEIGHT_RANGE,
    GRID_WIDTH_RANGE, INSTABILITY_RANGE, LatticeConfig, POINT_RADIUS_RANGE, RADIUS_RANGE,
    SPEED_RANGE,
};
pub use types::{Color, Palette, Vertex};
