use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::processing::curve::InterpolationMode;
use crate::processing::radius::GaussianStenosis;

/// Tuning for the lumen radius model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusParams {
    /// Nominal, unconstricted lumen radius.
    pub baseline: f64,
    pub penalty_gain: f64,
    pub penalty_cap: f64,
    /// Lower bound on the effective radius.
    pub floor: f64,
    /// Focal narrowings, combined multiplicatively. Empty means a healthy vessel.
    pub stenoses: Vec<GaussianStenosis>,
}

impl Default for RadiusParams {
    fn default() -> Self {
        Self {
            baseline: 2.8,
            penalty_gain: 0.15,
            penalty_cap: 0.6,
            floor: 0.6,
            stenoses: vec![GaussianStenosis::default()],
        }
    }
}

/// Simulation settings. Every field has a working default, so a TOML file
/// only needs to name what it overrides:
///
/// ```toml
/// wire_radius = 1.2
///
/// [radius]
/// baseline = 3.0
/// stenoses = [{ center = 0.4, width = 0.05, depth = 0.7 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub wire_radius: f64,
    /// Input units per held advance/withdraw key per tick.
    pub forward_speed: f64,
    /// Converts input units into progress units.
    pub step_scale: f64,
    /// Radians per held twist key per tick.
    pub twist_speed: f64,
    /// Upper clamp for progress.
    pub max_progress: f64,
    pub success_threshold: f64,
    pub overpush_fail_threshold: f64,
    pub overpush_increment: f64,
    pub overpush_decay: f64,
    pub wire_samples: usize,
    pub vessel_samples: usize,
    /// Centerline evaluation used for both geometry and the radius model.
    pub interpolation: InterpolationMode,
    pub radius: RadiusParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wire_radius: 0.55,
            forward_speed: 0.22,
            step_scale: 0.002,
            twist_speed: 0.03,
            max_progress: 0.999,
            success_threshold: 0.995,
            overpush_fail_threshold: 60.0,
            overpush_increment: 1.0,
            overpush_decay: 0.5,
            wire_samples: 80,
            vessel_samples: 160,
            interpolation: InterpolationMode::CatmullRom,
            radius: RadiusParams::default(),
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(contents: &str) -> Result<SimConfig> {
        let config: SimConfig =
            toml::from_str(contents).context("failed to parse simulation config")?;
        config.validate().context("invalid simulation config")?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<SimConfig> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        SimConfig::from_toml_str(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Rejects values that would make a tick panic or silently disable blocking.
    pub fn validate(&self) -> Result<()> {
        let checks: &[(&str, fn(&SimConfig) -> Result<()>)] = &[
            ("check_progress_bounds", check_progress_bounds),
            ("check_motion_params", check_motion_params),
            ("check_overpush_params", check_overpush_params),
            ("check_radius_params", check_radius_params),
        ];

        for (name, f) in checks {
            if let Err(e) = f(self) {
                tracing::warn!(check = *name, error = %e, "config check failed");
                return Err(e);
            }
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(anyhow!("{} must be finite and non-negative, found {}", name, value))
    }
}

/// `0 < success_threshold < max_progress <= 1`
fn check_progress_bounds(config: &SimConfig) -> Result<()> {
    let (success, max) = (config.success_threshold, config.max_progress);
    if success > 0.0 && success < max && max <= 1.0 {
        Ok(())
    } else {
        Err(anyhow!(
            "expected 0 < success_threshold < max_progress <= 1, found success_threshold={} max_progress={}",
            success,
            max
        ))
    }
}

fn check_motion_params(config: &SimConfig) -> Result<()> {
    non_negative("wire_radius", config.wire_radius)?;
    non_negative("forward_speed", config.forward_speed)?;
    non_negative("step_scale", config.step_scale)?;
    if !config.twist_speed.is_finite() {
        return Err(anyhow!("twist_speed must be finite, found {}", config.twist_speed));
    }
    Ok(())
}

fn check_overpush_params(config: &SimConfig) -> Result<()> {
    non_negative("overpush_fail_threshold", config.overpush_fail_threshold)?;
    non_negative("overpush_increment", config.overpush_increment)?;
    non_negative("overpush_decay", config.overpush_decay)
}

fn check_radius_params(config: &SimConfig) -> Result<()> {
    let radius = &config.radius;
    non_negative("radius.baseline", radius.baseline)?;
    non_negative("radius.penalty_gain", radius.penalty_gain)?;
    non_negative("radius.penalty_cap", radius.penalty_cap)?;
    non_negative("radius.floor", radius.floor)?;
    if radius.floor <= 0.0 {
        return Err(anyhow!("radius.floor must be positive, found {}", radius.floor));
    }
    for (index, s) in radius.stenoses.iter().enumerate() {
        if !(s.center.is_finite() && s.width.is_finite() && s.depth.is_finite()) {
            return Err(anyhow!("radius.stenoses[{}] has non-finite values: {:?}", index, s));
        }
    }
    Ok(())
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_toml_is_default() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SimConfig::from_toml_str(
            r#"
            wire_radius = 1.2
            overpush_fail_threshold = 10
            interpolation = "linear"

            [radius]
            baseline = 3.0
            stenoses = [{ center = 0.4, width = 0.05, depth = 0.7 }]
            "#,
        )
        .unwrap();

        assert_relative_eq!(config.wire_radius, 1.2);
        assert_relative_eq!(config.overpush_fail_threshold, 10.0);
        assert_relative_eq!(config.forward_speed, 0.22);
        assert_relative_eq!(config.radius.baseline, 3.0);
        assert_relative_eq!(config.radius.floor, 0.6);
        assert_eq!(config.interpolation, InterpolationMode::Linear);
        assert_eq!(config.radius.stenoses.len(), 1);
        assert_relative_eq!(config.radius.stenoses[0].center, 0.4);
    }

    #[test]
    fn test_healthy_vessel_override() {
        let config = SimConfig::from_toml_str("[radius]\nstenoses = []\n").unwrap();
        assert!(config.radius.stenoses.is_empty());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_order_progress_bounds() {
        for toml in [
            "max_progress = -0.1",
            "max_progress = nan",
            "max_progress = 1.5",
            "success_threshold = 0.0",
            "success_threshold = 0.9995",
            "success_threshold = nan",
        ] {
            assert!(SimConfig::from_toml_str(toml).is_err(), "accepted `{}`", toml);
        }
    }

    #[test]
    fn test_rejects_bad_motion_values() {
        for toml in [
            "wire_radius = nan",
            "wire_radius = -0.5",
            "forward_speed = inf",
            "forward_speed = -0.22",
            "step_scale = nan",
            "step_scale = -0.002",
            "twist_speed = nan",
        ] {
            assert!(SimConfig::from_toml_str(toml).is_err(), "accepted `{}`", toml);
        }
    }

    #[test]
    fn test_rejects_bad_overpush_values() {
        for toml in [
            "overpush_fail_threshold = nan",
            "overpush_fail_threshold = -1",
            "overpush_increment = -1",
            "overpush_decay = inf",
        ] {
            assert!(SimConfig::from_toml_str(toml).is_err(), "accepted `{}`", toml);
        }
    }

    #[test]
    fn test_rejects_bad_radius_values() {
        for toml in [
            "[radius]\nbaseline = nan",
            "[radius]\nbaseline = -2.8",
            "[radius]\npenalty_gain = -0.15",
            "[radius]\npenalty_cap = inf",
            "[radius]\nfloor = 0.0",
            "[radius]\nfloor = nan",
            "[radius]\nstenoses = [{ center = nan, width = 0.06, depth = 0.6 }]",
        ] {
            assert!(SimConfig::from_toml_str(toml).is_err(), "accepted `{}`", toml);
        }
    }

    #[test]
    fn test_validation_error_names_the_field() {
        let err = SimConfig::from_toml_str("wire_radius = nan").unwrap_err();
        assert!(format!("{:#}", err).contains("wire_radius"));
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(SimConfig::from_toml_str("wire_radius = \"thick\"").is_err());
        assert!(SimConfig::from_toml_file("no/such/config.toml").is_err());
    }
}
