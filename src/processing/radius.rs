use serde::{Deserialize, Serialize};

use super::curvature::curvature_at_with;
use super::curve::InterpolationMode;
use crate::config::{RadiusParams, SimConfig};
use crate::io::input::Centerline;

/// Available lumen radius at progress `u` along a centerline.
pub trait RadiusModel {
    fn effective_radius(&self, centerline: &Centerline, u: f64) -> f64;
}

impl<F> RadiusModel for F
where
    F: Fn(&Centerline, f64) -> f64,
{
    fn effective_radius(&self, centerline: &Centerline, u: f64) -> f64 {
        self(centerline, u)
    }
}

/// Multiplier applied to the baseline radius at progress `u`.
/// 1 means unconstricted.
pub trait StenosisProfile {
    fn multiplier(&self, u: f64) -> f64;
}

impl<F> StenosisProfile for F
where
    F: Fn(f64) -> f64,
{
    fn multiplier(&self, u: f64) -> f64 {
        self(u)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoStenosis;

impl StenosisProfile for NoStenosis {
    fn multiplier(&self, _u: f64) -> f64 {
        1.0
    }
}

/// Single focal narrowing with a Gaussian profile in progress space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianStenosis {
    pub center: f64,
    pub width: f64,
    /// Fractional radius loss at the center, 0.6 = 60 % narrowing.
    pub depth: f64,
}

impl Default for GaussianStenosis {
    fn default() -> Self {
        Self {
            center: 0.55,
            width: 0.06,
            depth: 0.6,
        }
    }
}

impl StenosisProfile for GaussianStenosis {
    fn multiplier(&self, u: f64) -> f64 {
        if self.width <= 0.0 {
            return 1.0;
        }
        let d = u - self.center;
        let weight = (-(d * d) / (2.0 * self.width * self.width)).exp();
        1.0 - self.depth * weight
    }
}

/// Several lesions; their multipliers compound.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiStenosis(pub Vec<GaussianStenosis>);

impl StenosisProfile for MultiStenosis {
    fn multiplier(&self, u: f64) -> f64 {
        self.0.iter().map(|s| s.multiplier(u)).product()
    }
}

/// Baseline lumen narrowed by a stenosis profile and by a bend penalty:
/// a stiff wire sees less room where the vessel curves.
#[derive(Debug, Clone, PartialEq)]
pub struct LumenRadiusModel<P = MultiStenosis> {
    pub baseline: f64,
    pub penalty_gain: f64,
    pub penalty_cap: f64,
    pub floor: f64,
    pub interpolation: InterpolationMode,
    pub profile: P,
}

impl LumenRadiusModel<MultiStenosis> {
    pub fn from_config(config: &SimConfig) -> Self {
        LumenRadiusModel::with_profile(
            &config.radius,
            config.interpolation,
            MultiStenosis(config.radius.stenoses.clone()),
        )
    }
}

impl Default for LumenRadiusModel<MultiStenosis> {
    fn default() -> Self {
        LumenRadiusModel::from_config(&SimConfig::default())
    }
}

impl<P: StenosisProfile> LumenRadiusModel<P> {
    /// Constants from `params`, narrowing from `profile`. `params.stenoses` is ignored.
    pub fn with_profile(params: &RadiusParams, interpolation: InterpolationMode, profile: P) -> Self {
        Self {
            baseline: params.baseline,
            penalty_gain: params.penalty_gain,
            penalty_cap: params.penalty_cap,
            floor: params.floor,
            interpolation,
            profile,
        }
    }

    pub fn bend_penalty(&self, centerline: &Centerline, u: f64) -> f64 {
        let kappa = curvature_at_with(centerline, u, self.interpolation);
        (kappa * self.penalty_gain).min(self.penalty_cap)
    }
}

impl<P: StenosisProfile> RadiusModel for LumenRadiusModel<P> {
    fn effective_radius(&self, centerline: &Centerline, u: f64) -> f64 {
        let narrowed = self.baseline * self.profile.multiplier(u);
        let radius = narrowed * (1.0 - self.bend_penalty(centerline, u));
        radius.max(self.floor)
    }
}

/// Effective radius under the default model.
pub fn effective_radius(centerline: &Centerline, u: f64) -> f64 {
    LumenRadiusModel::default().effective_radius(centerline, u)
}
