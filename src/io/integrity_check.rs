use super::input::Point3;
use crate::error::CenterlineError;

pub fn check_centerline_integrity(points: &[Point3]) -> Result<(), CenterlineError> {
    let checks: &[(&str, fn(&[Point3]) -> Result<(), CenterlineError>)] =
        &[("check_finite_coordinates", check_finite_coordinates)];

    for (name, f) in checks {
        if let Err(e) = f(points) {
            tracing::warn!(check = *name, error = %e, "integrity check failed");
            return Err(e);
        }
    }

    Ok(())
}

/// Every coordinate must be finite, otherwise every downstream sample is poisoned.
fn check_finite_coordinates(points: &[Point3]) -> Result<(), CenterlineError> {
    for (index, p) in points.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(CenterlineError::NonFiniteCoordinate {
                index,
                x: p.x,
                y: p.y,
                z: p.z,
            });
        }
    }
    Ok(())
}
