use thiserror::Error;

/// Errors raised when a centerline is handed to the simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CenterlineError {
    #[error("centerline point {index} has non-finite coordinates ({x}, {y}, {z})")]
    NonFiniteCoordinate { index: usize, x: f64, y: f64, z: f64 },
}
