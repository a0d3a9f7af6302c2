use super::input::{Centerline, Point3};

/// Straight demo vessel: 80 points, 2 units apart along +z.
pub fn straight_centerline() -> Centerline {
    let points = (0..80).map(|i| Point3::new(0.0, 0.0, i as f64 * 2.0)).collect();
    Centerline::from_trusted(points)
}

/// Gently winding demo vessel: 160 points with a lateral sine sweep.
pub fn curved_centerline() -> Centerline {
    let points = (0..160)
        .map(|i| {
            let i = i as f64;
            Point3::new((i * 0.08).sin() * 6.0, (i * 0.04).cos() * 2.0, i * 1.2)
        })
        .collect();
    Centerline::from_trusted(points)
}
