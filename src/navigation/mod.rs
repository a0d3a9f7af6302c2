pub mod input;
pub mod navigator;
pub mod state;

pub use input::{HeldInput, TickInput};
pub use navigator::{NavigationEvent, NavigationObserver, Navigator, WireGeometry};
pub use state::{Collision, NavState, RunState};
