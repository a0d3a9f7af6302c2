use crate::io::input::{Centerline, Point3};

/// L-shaped centerline: `n_per_leg` segments along +x, then `n_per_leg`
/// along +y. The corner sits at `u = 0.5`.
pub fn right_angle_centerline(n_per_leg: usize, spacing: f64) -> Centerline {
    let corner = n_per_leg as f64 * spacing;
    let mut points: Vec<Point3> = (0..=n_per_leg)
        .map(|i| Point3::new(i as f64 * spacing, 0.0, 0.0))
        .collect();
    points.extend((1..=n_per_leg).map(|j| Point3::new(corner, j as f64 * spacing, 0.0)));
    Centerline::new(points).expect("fixture points are finite")
}
