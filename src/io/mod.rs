pub mod builtin;
pub mod input;
mod integrity_check;

pub use builtin::{curved_centerline, straight_centerline};
pub use input::{Centerline, Point3};
