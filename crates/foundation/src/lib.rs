pub mod color;
pub mod geo;
pub mod ids;

// Small, dependency-light primitives shared by every other crate.
pub use color::*;
pub use geo::*;
pub use ids::*;
