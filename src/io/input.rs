use super::integrity_check::check_centerline_integrity;
use crate::error::CenterlineError;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;

use std::path::Path;

pub type Point3 = nalgebra::Point3<f64>;

/// Ordered vessel centerline, index-addressable from proximal (index 0)
/// to distal (last index).
///
/// Only finite coordinates are accepted. Fewer than two points is allowed
/// but degenerate: every evaluation collapses onto the sole point (or the
/// origin when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    points: Vec<Point3>,
}

/// One row of a centerline file:
///
/// .. text::
///
///     x, y, z
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
struct CenterlineRow {
    x: f64,
    y: f64,
    z: f64,
}

impl Centerline {
    pub fn new(points: Vec<Point3>) -> Result<Centerline, CenterlineError> {
        check_centerline_integrity(&points)?;
        if points.len() < 2 {
            tracing::warn!(
                points = points.len(),
                "centerline degenerates to a constant point"
            );
        }
        Ok(Centerline { points })
    }

    pub fn from_xyz(coords: &[(f64, f64, f64)]) -> Result<Centerline, CenterlineError> {
        let points = coords
            .iter()
            .map(|&(x, y, z)| Point3::new(x, y, z))
            .collect();
        Centerline::new(points)
    }

    /// Skips validation for generated lines whose coordinates are finite by construction.
    pub(crate) fn from_trusted(points: Vec<Point3>) -> Centerline {
        debug_assert!(check_centerline_integrity(&points).is_ok());
        Centerline { points }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, with the index clamped into the valid range.
    /// Callers must check `is_empty` first.
    pub(crate) fn clamped(&self, index: isize) -> Point3 {
        let last = self.points.len() as isize - 1;
        self.points[index.clamp(0, last) as usize]
    }

    /// Reads a centerline from a headerless CSV/TSV file of `x, y, z` rows.
    /// Malformed rows are skipped.
    pub fn read_centerline_data<P: AsRef<Path>>(path: P) -> Result<Centerline> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read centerline file {:?}", path))?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(detect_delimiter(&contents))
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let mut points = Vec::new();
        for result in rdr.records() {
            match result {
                Ok(record) => match record.deserialize(None) {
                    Ok(CenterlineRow { x, y, z }) => points.push(Point3::new(x, y, z)),
                    Err(e) => tracing::warn!(error = %e, "skipping invalid record"),
                },
                Err(e) => tracing::warn!(error = %e, "skipping invalid row"),
            }
        }

        let centerline = Centerline::new(points)
            .with_context(|| format!("rejected centerline from {}", path.display()))?;
        Ok(centerline)
    }
}

/// Tab wins only when the first line has more tabs than commas.
fn detect_delimiter(contents: &str) -> u8 {
    let first_line = contents.lines().next().unwrap_or("");
    let tabs = first_line.matches('\t').count();
    let commas = first_line.matches(',').count();
    if tabs > commas {
        b'\t'
    } else {
        b','
    }
}
