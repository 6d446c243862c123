//! Engine configuration.

use crate::detect::{MatchMode, SNAP_TOLERANCE, SidePairing};
use crate::guides::GuideStyle;
use crate::resolve::{GLOBAL_SNAP_THRESHOLD, SnapPolicyKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Snap tolerance must be a finite, non-negative number, got {0}")]
    InvalidTolerance(f64),
    #[error("Global snap threshold must be a finite, positive number, got {0}")]
    InvalidThreshold(f64),
    #[error("Invalid zoom range [{min}, {max}]")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("Invalid guide style: {0}")]
    InvalidGuideStyle(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for the alignment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which snapping policy to run.
    pub policy: SnapPolicyKind,
    /// Gap within which the per-side policy snaps.
    pub snap_tolerance: f64,
    /// Gap below which the global-nearest policy snaps.
    pub global_threshold: f64,
    /// Compare cross sides (left with right, ...) as well as like sides.
    pub cross_side: bool,
    /// How target lines are matched when deciding guide visibility.
    pub guide_match: MatchMode,
    pub guide_style: GuideStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: SnapPolicyKind::default(),
            snap_tolerance: SNAP_TOLERANCE,
            global_threshold: GLOBAL_SNAP_THRESHOLD,
            cross_side: true,
            guide_match: MatchMode::Exact,
            guide_style: GuideStyle::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.snap_tolerance.is_finite() || self.snap_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.snap_tolerance));
        }
        if let MatchMode::Tolerance { tolerance } = self.guide_match {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ConfigError::InvalidTolerance(tolerance));
            }
        }
        if !self.global_threshold.is_finite() || self.global_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.global_threshold));
        }

        let limits = self.guide_style.zoom_limits;
        if !(limits.min > 0.0 && limits.min <= limits.max && limits.max.is_finite()) {
            return Err(ConfigError::InvalidZoomRange {
                min: limits.min,
                max: limits.max,
            });
        }

        let style = &self.guide_style;
        if !style.stroke_width.is_finite() || style.stroke_width <= 0.0 {
            return Err(ConfigError::InvalidGuideStyle(format!(
                "stroke width {}",
                style.stroke_width
            )));
        }
        if !style.min_tick_half_size.is_finite() || style.min_tick_half_size < 0.0 {
            return Err(ConfigError::InvalidGuideStyle(format!(
                "tick half-size {}",
                style.min_tick_half_size
            )));
        }
        Ok(())
    }

    /// Side pairing implied by `cross_side`.
    pub fn pairing(&self) -> SidePairing {
        if self.cross_side {
            SidePairing::AllPairs
        } else {
            SidePairing::SameSide
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.policy, SnapPolicyKind::PerSide);
        assert!((config.snap_tolerance - 10.0).abs() < f64::EPSILON);
        assert!((config.global_threshold - 85.0).abs() < f64::EPSILON);
        assert_eq!(config.guide_match, MatchMode::Exact);
        assert_eq!(config.pairing(), SidePairing::AllPairs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(
            r#"{
                "policy": "global_nearest",
                "cross_side": false,
                "guide_match": { "mode": "tolerance", "tolerance": 2.0 },
                "guide_style": { "min_tick_half_size": 4.0 }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.policy, SnapPolicyKind::GlobalNearest);
        assert_eq!(config.pairing(), SidePairing::SameSide);
        assert_eq!(config.guide_match, MatchMode::Tolerance { tolerance: 2.0 });
        assert!((config.guide_style.min_tick_half_size - 4.0).abs() < f64::EPSILON);
        assert!((config.guide_style.stroke_width - 1.0).abs() < f64::EPSILON);
        assert!((config.snap_tolerance - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json("{}").expect("valid config");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = EngineConfig::from_json(r#"{ "snap_tolerance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTolerance(_)));
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let mut config = EngineConfig::default();
        config.guide_style.zoom_limits.min = 5.0;
        config.guide_style.zoom_limits.max = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidZoomRange { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let config = EngineConfig {
            global_threshold: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidZoomRange { min: 2.0, max: 1.0 };
        assert_eq!(err.to_string(), "Invalid zoom range [2, 1]");
    }
}
