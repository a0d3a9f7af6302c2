use serde::{Deserialize, Serialize};

use crate::io::input::{Centerline, Point3};

/// Slack (in index units) that keeps the last segment addressable at `u = 1`.
const SEGMENT_SLACK: f64 = 1e-4;
/// Smallest resample extent, so a wire at `u = 0` still has a visible stub.
pub const MIN_RESAMPLE_EXTENT: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Cubic through the four neighbouring samples, boundary samples repeated.
    #[default]
    CatmullRom,
    /// Straight blend between the two enclosing samples.
    Linear,
}

/// Point on the centerline at progress `u`, using Catmull-Rom interpolation.
pub fn point_at(centerline: &Centerline, u: f64) -> Point3 {
    point_at_with(centerline, u, InterpolationMode::CatmullRom)
}

/// Point on the centerline at progress `u`.
///
/// `u` is an index fraction: 0 is the first sample and 1 the last. Any real
/// value is accepted and clamped, NaN is treated as 0. An empty centerline
/// evaluates to the origin and a single-point centerline to that point.
pub fn point_at_with(centerline: &Centerline, u: f64, mode: InterpolationMode) -> Point3 {
    let n = centerline.len();
    match n {
        0 => return Point3::origin(),
        1 => return centerline.points()[0],
        _ => {}
    }

    let u = if u.is_nan() { 0.0 } else { u };
    let seg_float = (u * (n - 1) as f64).clamp(0.0, (n - 1) as f64 - SEGMENT_SLACK);
    let i = seg_float.floor() as isize;
    let t = seg_float - i as f64;

    match mode {
        InterpolationMode::Linear => {
            let a = centerline.clamped(i);
            let b = centerline.clamped(i + 1);
            Point3::from(a.coords.lerp(&b.coords, t))
        }
        InterpolationMode::CatmullRom => catmull_rom(
            &centerline.clamped(i - 1),
            &centerline.clamped(i),
            &centerline.clamped(i + 1),
            &centerline.clamped(i + 2),
            t,
        ),
    }
}

/// Uniform Catmull-Rom segment between `p1` and `p2`.
fn catmull_rom(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3, t: f64) -> Point3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let (a, b, c, d) = (p0.coords, p1.coords, p2.coords, p3.coords);

    let v = (b * 2.0
        + (c - a) * t
        + (a * 2.0 - b * 5.0 + c * 4.0 - d) * t2
        + (b * 3.0 - a - c * 3.0 + d) * t3)
        * 0.5;
    Point3::from(v)
}

/// `sample_count` evenly spaced points from `u = 0` to `max(u_end, 0.001)`.
pub fn resample(centerline: &Centerline, u_end: f64, sample_count: usize) -> Vec<Point3> {
    resample_with(centerline, u_end, sample_count, InterpolationMode::CatmullRom)
}

pub fn resample_with(
    centerline: &Centerline,
    u_end: f64,
    sample_count: usize,
    mode: InterpolationMode,
) -> Vec<Point3> {
    let extent = u_end.max(MIN_RESAMPLE_EXTENT);
    match sample_count {
        0 => Vec::new(),
        1 => vec![point_at_with(centerline, 0.0, mode)],
        _ => {
            let denom = (sample_count - 1) as f64;
            (0..sample_count)
                .map(|i| point_at_with(centerline, (i as f64 / denom) * extent, mode))
                .collect()
        }
    }
}
