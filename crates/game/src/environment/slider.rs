//! Scripted motion: a 0..1 slider driving a kinematic body.

use glam::Vec3;
use gravwalk_physics::collision::{BodyHandle, CollisionWorld};
use gravwalk_physics::math::{smoothstep, Frame};
use serde::{Deserialize, Serialize};

/// Value that slides from 0 to 1 over `duration` seconds.
///
/// With `auto_reverse` it ping-pongs forever, reflecting any overshoot at
/// either end. Without it the slider stops (disables itself) at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomaticSlider {
    pub duration: f32,
    pub auto_reverse: bool,
    pub smoothstep: bool,
    /// Running backward from 1 to 0.
    pub reversed: bool,
    pub enabled: bool,
    value: f32,
}

impl AutomaticSlider {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.01),
            auto_reverse: false,
            smoothstep: false,
            reversed: false,
            enabled: true,
            value: 0.0,
        }
    }

    pub fn with_auto_reverse(mut self) -> Self {
        self.auto_reverse = true;
        self
    }

    pub fn with_smoothstep(mut self) -> Self {
        self.smoothstep = true;
        self
    }

    /// Raw linear value in [0, 1].
    pub fn raw_value(&self) -> f32 {
        self.value
    }

    /// Value as emitted, after the optional smoothstep.
    pub fn value(&self) -> f32 {
        if self.smoothstep {
            smoothstep(self.value)
        } else {
            self.value
        }
    }

    /// Advance one fixed step and return the emitted value.
    ///
    /// Returns `None` while disabled.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        let delta = dt / self.duration;
        if self.reversed {
            self.value -= delta;
            if self.value <= 0.0 {
                if self.auto_reverse {
                    self.value = (-self.value).min(1.0);
                    self.reversed = false;
                } else {
                    self.value = 0.0;
                    self.enabled = false;
                }
            }
        } else {
            self.value += delta;
            if self.value >= 1.0 {
                if self.auto_reverse {
                    self.value = (2.0 - self.value).max(0.0);
                    self.reversed = true;
                } else {
                    self.value = 1.0;
                    self.enabled = false;
                }
            }
        }
        Some(self.value())
    }
}

/// Maps a slider value to a kinematic body's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionInterpolator {
    pub body: BodyHandle,
    pub from: Vec3,
    pub to: Vec3,
    /// Frame `from` and `to` are expressed in; world space when `None`.
    pub relative_to: Option<Frame>,
}

impl PositionInterpolator {
    pub fn new(body: BodyHandle, from: Vec3, to: Vec3) -> Self {
        Self {
            body,
            from,
            to,
            relative_to: None,
        }
    }

    pub fn relative_to(mut self, frame: Frame) -> Self {
        self.relative_to = Some(frame);
        self
    }

    /// World position at slider value `t`, not clamped.
    pub fn position(&self, t: f32) -> Vec3 {
        let (from, to) = match &self.relative_to {
            Some(frame) => (frame.transform_point(self.from), frame.transform_point(self.to)),
            None => (self.from, self.to),
        };
        from.lerp(to, t)
    }

    /// Move the body to the position for `t`, keeping its rotation.
    pub fn apply(&self, world: &mut CollisionWorld, t: f32, dt: f32) {
        let Some(body) = world.body(self.body) else {
            log::warn!("interpolator drives unknown body {:?}", self.body);
            return;
        };
        let pose = Frame::new(self.position(t), body.pose.rotation);
        world.set_body_pose(self.body, pose, dt);
    }
}

/// A slider wired to an interpolator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidingPlatform {
    pub slider: AutomaticSlider,
    pub interpolator: PositionInterpolator,
}

impl SlidingPlatform {
    pub fn advance(&mut self, world: &mut CollisionWorld, dt: f32) {
        if let Some(t) = self.slider.advance(dt) {
            self.interpolator.apply(world, t, dt);
        }
    }
}
