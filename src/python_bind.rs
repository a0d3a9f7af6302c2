// File: src/python_bind.rs
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::SimConfig;
use crate::io::{curved_centerline, Centerline, Point3};
use crate::navigation::{HeldInput, Navigator};

fn to_tuple(p: &Point3) -> (f64, f64, f64) {
    (p.x, p.y, p.z)
}

/// Navigation session driven from Python, one `tick` per rendered frame.
#[pyclass(unsendable, name = "Navigator")]
pub struct PyNavigator {
    inner: Navigator,
}

#[pymethods]
impl PyNavigator {
    #[new]
    #[pyo3(signature = (centerline = None, config_path = None))]
    fn new(centerline: Option<Vec<(f64, f64, f64)>>, config_path: Option<&str>) -> PyResult<Self> {
        let centerline = match centerline {
            Some(coords) => Centerline::from_xyz(&coords)
                .map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => curved_centerline(),
        };
        let config = match config_path {
            Some(path) => SimConfig::from_toml_file(path)
                .map_err(|e| PyRuntimeError::new_err(format!("{:#}", e)))?,
            None => SimConfig::default(),
        };
        let inner = Navigator::new(centerline, config)
            .map_err(|e| PyValueError::new_err(format!("{:#}", e)))?;
        Ok(Self { inner })
    }

    #[pyo3(signature = (advance = false, withdraw = false, twist_left = false, twist_right = false, paused = false))]
    fn tick(
        &mut self,
        advance: bool,
        withdraw: bool,
        twist_left: bool,
        twist_right: bool,
        paused: bool,
    ) -> String {
        let held = HeldInput {
            advance,
            withdraw,
            twist_left,
            twist_right,
        };
        self.inner.tick(held, paused).run_state().to_string()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    #[getter]
    fn u(&self) -> f64 {
        self.inner.state().u()
    }

    #[getter]
    fn state(&self) -> String {
        self.inner.state().run_state().to_string()
    }

    #[getter]
    fn twist(&self) -> f64 {
        self.inner.state().twist()
    }

    /// `(hit, clearance)` for the latest tick.
    #[getter]
    fn collision(&self) -> (bool, f64) {
        let c = self.inner.state().collision();
        (c.hit, c.clearance)
    }

    fn wire_path(&self) -> Vec<(f64, f64, f64)> {
        self.inner.wire_geometry().path.iter().map(to_tuple).collect()
    }

    fn tip(&self) -> (f64, f64, f64) {
        to_tuple(&self.inner.wire_geometry().tip)
    }

    fn vessel_path(&self) -> Vec<(f64, f64, f64)> {
        self.inner.vessel_path().iter().map(to_tuple).collect()
    }

    fn __repr__(&self) -> String {
        let s = self.inner.state();
        format!(
            "Navigator(state={}, u={:.4}, twist={:.2}, clearance={:.2})",
            s.run_state(),
            s.u(),
            s.twist(),
            s.collision().clearance
        )
    }
}

/// Reads `x, y, z` rows from a CSV/TSV file.
#[pyfunction]
pub fn read_centerline_py(path: &str) -> PyResult<Vec<(f64, f64, f64)>> {
    let centerline = Centerline::read_centerline_data(path)
        .map_err(|e| PyRuntimeError::new_err(format!("{:#}", e)))?;
    Ok(centerline.points().iter().map(to_tuple).collect())
}
