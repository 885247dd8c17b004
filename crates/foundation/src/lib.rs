pub mod bounds;
pub mod math;

// Geometry and geodesy primitives shared by every other crate.
pub use bounds::*;
