//! Collision layers and layer masks.
//!
//! Every collider belongs to exactly one [`Layer`]. Queries and the contact
//! classifier filter by [`LayerMask`], a set of layers.

use serde::{Deserialize, Serialize};

/// Category a collider belongs to (0..32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layer(pub u8);

impl Layer {
    /// Ordinary solid geometry.
    pub const DEFAULT: Self = Self(0);

    /// Steps and stairs, allowed a steeper ground angle.
    pub const STAIRS: Self = Self(1);

    /// Walls the character may climb.
    pub const CLIMBABLE: Self = Self(2);

    /// Water volumes (triggers).
    pub const WATER: Self = Self(3);

    /// Characters and other agents, excluded from ground probes.
    pub const AGENT: Self = Self(4);

    /// Non-water trigger volumes (zones, detectors).
    pub const TRIGGER: Self = Self(5);

    /// Mask containing only this layer.
    #[inline]
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << (self.0 as u32 & 31))
    }
}

/// Set of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Solid surfaces the ground probe may snap to.
    pub const PROBE: Self = Self(
        Layer::DEFAULT.mask().0 | Layer::STAIRS.mask().0 | Layer::CLIMBABLE.mask().0,
    );

    /// Check if a layer is in this mask.
    #[inline]
    pub fn contains(self, layer: Layer) -> bool {
        (self.0 & layer.mask().0) != 0
    }

    /// Check if any layer is shared with another mask.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// This mask plus a layer.
    #[inline]
    pub fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.mask().0)
    }

    /// This mask minus a layer.
    #[inline]
    pub fn without(self, layer: Layer) -> Self {
        Self(self.0 & !layer.mask().0)
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for LayerMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
