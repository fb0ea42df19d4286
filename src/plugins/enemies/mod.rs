//! UFO steering.
//!
//! Pursuit is pure proportional navigation: every pursuit firing re-aims the
//! UFO straight at the rocket's current position, no lead, no prediction.
//! Shots are aimed the same way and then fly straight (no homing).
//!
//! The cadence (200 ms pursuit, 4000 ms fire) is owned by the scheduler;
//! this module only computes velocities.

use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::pool::{Category, SpawnRequest};

/// Velocity of magnitude `speed` along the bearing from `from` to `to`.
///
/// Coincident points give a bearing of zero radians (+x).
#[inline]
pub fn bearing_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let d = to - from;
    Vec2::from_angle(d.y.atan2(d.x)) * speed
}

#[inline]
pub fn pursuit_velocity(ufo: Vec2, target: Vec2, tunables: &Tunables) -> Vec2 {
    bearing_velocity(ufo, target, tunables.ufo_speed)
}

/// A UFO bullet leaving `ufo` toward where the rocket is now.
pub fn ufo_shot(ufo: Vec2, target: Vec2, tunables: &Tunables) -> SpawnRequest {
    SpawnRequest::new(
        Category::UfoBullet,
        ufo,
        bearing_velocity(ufo, target, tunables.ufo_bullet_speed),
    )
}

#[cfg(test)]
mod tests;
