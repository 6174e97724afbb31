use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::types::Palette;

/// Valid ranges for every tunable field. `clamped` and `validate` both use these.
pub const GRID_WIDTH_RANGE: RangeInclusive<u32> = 1..=32;
pub const GRID_HEIGHT_RANGE: RangeInclusive<u32> = 1..=32;
pub const GRID_DEPTH_RANGE: RangeInclusive<u32> = 1..=16;
pub const RADIUS_RANGE: RangeInclusive<f64> = 0.1..=100.0;
pub const SPEED_RANGE: RangeInclusive<f64> = 0.0..=10.0;
pub const DURATION_RANGE: RangeInclusive<f64> = 0.0..=30.0;
pub const INSTABILITY_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const POINT_RADIUS_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// Pause inserted after a full fracture+heal cycle before the next batch.
pub const BATCH_PAUSE: Duration = Duration::from_secs(1);

/// Errors from validating a [`LatticeConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside the valid range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

/// Parameters of one lattice generation pass.
///
/// Immutable once handed to the kernel: any change means a full regeneration.
/// `speed` and `instability` drive the host's camera orbit and are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Hexagons per row.
    pub grid_width: u32,
    /// Rows per layer.
    pub grid_height: u32,
    /// Number of stacked layers.
    pub grid_depth: u32,
    /// Hexagon circumradius; also the spacing between layers.
    pub radius: f64,
    pub speed: f64,
    /// Seconds an edge spends growing back from its midpoint.
    pub healing_duration_secs: f64,
    /// Seconds an edge spends collapsing toward its midpoint.
    pub breaking_duration_secs: f64,
    pub instability: f64,
    /// Radius of the decoration sphere drawn at each unique vertex.
    pub point_radius: f64,
    pub palette: Palette,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            grid_width: 5,
            grid_height: 5,
            grid_depth: 3,
            radius: 10.0,
            speed: 1.0,
            healing_duration_secs: 1.6,
            breaking_duration_secs: 0.8,
            instability: 0.3,
            point_radius: 0.4,
            palette: Palette::default(),
        }
    }
}

impl LatticeConfig {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_u32("grid_width", self.grid_width, &GRID_WIDTH_RANGE)?;
        check_u32("grid_height", self.grid_height, &GRID_HEIGHT_RANGE)?;
        check_u32("grid_depth", self.grid_depth, &GRID_DEPTH_RANGE)?;
        check_f64("radius", self.radius, &RADIUS_RANGE)?;
        check_f64("speed", self.speed, &SPEED_RANGE)?;
        check_f64(
            "healing_duration_secs",
            self.healing_duration_secs,
            &DURATION_RANGE,
        )?;
        check_f64(
            "breaking_duration_secs",
            self.breaking_duration_secs,
            &DURATION_RANGE,
        )?;
        check_f64("instability", self.instability, &INSTABILITY_RANGE)?;
        check_f64("point_radius", self.point_radius, &POINT_RADIUS_RANGE)?;
        Ok(())
    }

    /// Return a copy with every field forced into its valid range.
    ///
    /// Non-finite floats fall back to the default value for that field.
    pub fn clamped(&self) -> Self {
        let d = Self::default();
        Self {
            grid_width: clamp_u32(self.grid_width, &GRID_WIDTH_RANGE),
            grid_height: clamp_u32(self.grid_height, &GRID_HEIGHT_RANGE),
            grid_depth: clamp_u32(self.grid_depth, &GRID_DEPTH_RANGE),
            radius: clamp_f64(self.radius, &RADIUS_RANGE, d.radius),
            speed: clamp_f64(self.speed, &SPEED_RANGE, d.speed),
            healing_duration_secs: clamp_f64(
                self.healing_duration_secs,
                &DURATION_RANGE,
                d.healing_duration_secs,
            ),
            breaking_duration_secs: clamp_f64(
                self.breaking_duration_secs,
                &DURATION_RANGE,
                d.breaking_duration_secs,
            ),
            instability: clamp_f64(self.instability, &INSTABILITY_RANGE, d.instability),
            point_radius: clamp_f64(self.point_radius, &POINT_RADIUS_RANGE, d.point_radius),
            palette: self.palette,
        }
    }

    pub fn breaking_duration(&self) -> Duration {
        secs_to_duration(self.breaking_duration_secs)
    }

    pub fn healing_duration(&self) -> Duration {
        secs_to_duration(self.healing_duration_secs)
    }

    /// Delay between two batch selections: one full fracture+heal cycle plus [`BATCH_PAUSE`].
    pub fn batch_interval(&self) -> Duration {
        self.breaking_duration() + self.healing_duration() + BATCH_PAUSE
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::ZERO)
}

fn check_u32(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
        })
    }
}

fn check_f64(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn clamp_u32(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(LatticeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_width() {
        let cfg = LatticeConfig {
            grid_width: 0,
            ..LatticeConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "grid_width",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_nan_radius() {
        let cfg = LatticeConfig {
            radius: f64::NAN,
            ..LatticeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NotFinite { field: "radius" })
        );
    }

    #[test]
    fn clamped_forces_ranges() {
        let cfg = LatticeConfig {
            grid_width: 0,
            grid_height: 1000,
            grid_depth: 0,
            radius: -5.0,
            breaking_duration_secs: -1.0,
            healing_duration_secs: f64::INFINITY,
            instability: 4.0,
            ..LatticeConfig::default()
        }
        .clamped();

        assert_eq!(cfg.grid_width, 1);
        assert_eq!(cfg.grid_height, 32);
        assert_eq!(cfg.grid_depth, 1);
        assert_eq!(cfg.radius, 0.1);
        assert_eq!(cfg.breaking_duration_secs, 0.0);
        assert_eq!(
            cfg.healing_duration_secs,
            LatticeConfig::default().healing_duration_secs
        );
        assert_eq!(cfg.instability, 1.0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn batch_interval_adds_pause() {
        let cfg = LatticeConfig {
            breaking_duration_secs: 1.0,
            healing_duration_secs: 2.0,
            ..LatticeConfig::default()
        };
        assert_eq!(cfg.batch_interval(), Duration::from_secs(4));
    }

    #[test]
    fn negative_duration_is_zero() {
        let cfg = LatticeConfig {
            breaking_duration_secs: -3.0,
            ..LatticeConfig::default()
        };
        assert_eq!(cfg.breaking_duration(), Duration::ZERO);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: LatticeConfig =
            serde_json::from_str(r#"{ "grid_width": 3, "radius": 2.5 }"#).unwrap();
        assert_eq!(cfg.grid_width, 3);
        assert_eq!(cfg.radius, 2.5);
        assert_eq!(cfg.grid_depth, LatticeConfig::default().grid_depth);
        assert_eq!(cfg.palette, Palette::default());
    }
}
