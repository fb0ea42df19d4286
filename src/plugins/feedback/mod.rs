//! Gameplay feedback intent (screen shake).
//!
//! Producers (the collision resolver) write intent here. The camera plugin is
//! the only consumer and turns it into a transform offset. Keeping the intent
//! in a plain resource lets headless runs and tests observe it without a
//! camera.
//!
//! The shake timer runs on real (wall-clock) time.

use bevy::prelude::*;
use bevy::time::Real;

/// Value normalized to [0..1]. Clamped on write, so readers never re-check.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitF32(f32);

impl UnitF32 {
    #[inline]
    pub fn new_clamped(v: f32) -> Self {
        Self(v.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

/// Non-negative seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RealSeconds(f32);

impl RealSeconds {
    #[inline]
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn set_max(&mut self, v: f32) {
        self.0 = self.0.max(v.max(0.0));
    }

    #[inline]
    pub fn tick_down(&mut self, dt: f32) {
        self.0 = (self.0 - dt).max(0.0);
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

/// Camera shake request.
///
/// `intensity` is a fraction of the viewport width; overlapping requests keep
/// the longer remaining time and the stronger intensity.
#[derive(Resource, Debug, Default, Clone)]
pub struct ScreenShake {
    remaining: RealSeconds,
    intensity: UnitF32,
    phase: f32,
}

impl ScreenShake {
    pub fn trigger(&mut self, duration_secs: f32, intensity: f32) {
        self.remaining.set_max(duration_secs);
        self.intensity = UnitF32::new_clamped(self.intensity.get().max(intensity));
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining.is_positive()
    }

    #[inline]
    pub fn remaining_secs(&self) -> f32 {
        self.remaining.get()
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.remaining.tick_down(dt);
        self.phase += dt;
        if !self.is_active() {
            self.intensity = UnitF32::default();
            self.phase = 0.0;
        }
    }

    /// Current camera offset. Deterministic pseudo-noise, no RNG needed.
    pub fn offset(&self, viewport: Vec2) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        let p = self.phase * std::f32::consts::TAU;
        let x = (p * 37.0).sin() + 0.5 * (p * 61.0).sin();
        let y = (p * 41.0).cos() + 0.5 * (p * 53.0).cos();
        Vec2::new(x, y).clamp_length_max(1.0) * self.intensity.get() * viewport.x
    }
}

fn tick_screen_shake(real_time: Res<Time<Real>>, mut shake: ResMut<ScreenShake>) {
    shake.tick(real_time.delta_secs());
}

pub fn plugin(app: &mut App) {
    app.insert_resource(ScreenShake::default());
    app.add_systems(Update, tick_screen_shake);
}

#[cfg(test)]
mod tests;
