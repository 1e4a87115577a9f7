//! Level behaviours that act on bodies: launch pads, moving platforms,
//! detection zones and floating props.

mod acceleration_zone;
mod detection_zone;
mod floating;
mod slider;

pub use acceleration_zone::AccelerationZone;
pub use detection_zone::{DetectionZone, Occupant, ZoneEvent};
pub use floating::{Buoyancy, FloatingBody};
pub use slider::{AutomaticSlider, PositionInterpolator, SlidingPlatform};
