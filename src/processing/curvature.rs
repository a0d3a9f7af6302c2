use super::curve::{point_at_with, InterpolationMode};
use crate::io::input::Centerline;

/// Half-width of the finite-difference stencil, in progress units.
const STENCIL: f64 = 0.002;
/// Chords shorter than this are treated as a stationary region.
const MIN_CHORD: f64 = 1e-5;
const MAX_STENCIL_U: f64 = 0.999;

pub fn curvature_at(centerline: &Centerline, u: f64) -> f64 {
    curvature_at_with(centerline, u, InterpolationMode::CatmullRom)
}

/// Turning angle per unit progress around `u`.
///
/// Samples the curve at `u - e`, `u`, `u + e` and measures the angle between
/// the two chords. Returns 0 wherever either chord collapses.
pub fn curvature_at_with(centerline: &Centerline, u: f64, mode: InterpolationMode) -> f64 {
    let p0 = point_at_with(centerline, (u - STENCIL).clamp(0.0, MAX_STENCIL_U), mode);
    let p1 = point_at_with(centerline, u, mode);
    let p2 = point_at_with(centerline, (u + STENCIL).clamp(0.0, MAX_STENCIL_U), mode);

    let v01 = p1 - p0;
    let v12 = p2 - p1;
    let a = v01.norm();
    let b = v12.norm();
    if a < MIN_CHORD || b < MIN_CHORD {
        return 0.0;
    }

    let cos = (v01.dot(&v12) / (a * b)).clamp(-1.0, 1.0);
    cos.acos() / STENCIL
}
