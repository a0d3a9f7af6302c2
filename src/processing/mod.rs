pub mod curvature;
pub mod curve;
pub mod radius;

pub use curvature::{curvature_at, curvature_at_with};
pub use curve::{point_at, point_at_with, resample, resample_with, InterpolationMode};
pub use radius::{
    effective_radius, GaussianStenosis, LumenRadiusModel, MultiStenosis, NoStenosis, RadiusModel,
    StenosisProfile,
};
