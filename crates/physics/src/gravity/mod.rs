//! Multi-source gravity.
//!
//! A [`GravityField`] sums the contribution of every registered
//! [`GravitySource`]. The up axis at a point is always the negated,
//! normalized sum, so walking around a planet or onto the inside of a box
//! only depends on which sources are registered.

pub mod cuboid;
pub mod field;
pub mod plane;
pub mod source;
pub mod sphere;

pub use cuboid::BoxGravity;
pub use field::GravityField;
pub use plane::PlaneGravity;
pub use source::{GravitySource, UniformGravity, STANDARD_GRAVITY};
pub use sphere::SphereGravity;
