//! Guidewire navigation through a vessel centerline.
//!
//! A 1-D reduced model: the wire tip is a progress value along the
//! centerline, the lumen is a scalar effective radius, and a small state
//! machine decides when an advance is refused, when the run fails from
//! sustained pushing and when it succeeds at the distal end.

pub mod config;
pub mod error;
pub mod io;
pub mod navigation;
pub mod processing;
mod utils;

#[cfg(feature = "python")]
mod python_bind;

pub use config::{RadiusParams, SimConfig};
pub use error::CenterlineError;
pub use io::{curved_centerline, straight_centerline, Centerline, Point3};
pub use navigation::{
    Collision, HeldInput, NavState, NavigationEvent, NavigationObserver, Navigator, RunState,
    TickInput, WireGeometry,
};
pub use processing::{
    curvature_at, effective_radius, point_at, point_at_with, resample, resample_with,
    GaussianStenosis, InterpolationMode, LumenRadiusModel, MultiStenosis, NoStenosis,
    RadiusModel, StenosisProfile,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// This is the module importable from Python:
///
/// ```python
/// import guidewire_sim as gs
/// nav = gs.Navigator()
/// while nav.tick(advance=True) == "navigating":
///     path = nav.wire_path()
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn guidewire_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<python_bind::PyNavigator>()?;
    m.add_function(wrap_pyfunction!(python_bind::read_centerline_py, m)?)?;
    Ok(())
}
