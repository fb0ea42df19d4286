//! Tunable gameplay constants.
//!
//! Distances are in pixels, speeds in pixels per second, durations in
//! milliseconds of simulation time. The playfield uses screen convention:
//! y grows downward, so "up" is a negative y velocity.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,

    // World + viewport.
    pub world_size: Vec2,
    pub viewport_size: Vec2,
    pub camera_follow_lerp: f32,
    pub scroll_step_up: f32,
    pub scroll_step_down: f32,
    pub backdrop_step_up: f32,
    pub backdrop_step_down: f32,
    pub backdrop_parallax: f32,

    // Rocket.
    pub rocket_spawn: Vec2,
    pub rocket_speed: f32,
    pub rocket_idle_drift: f32,
    pub pointer_lerp: f32,
    pub pointer_gain: Vec2,
    pub pointer_deadzone: f32,
    pub rocket_nose_offset: f32,
    pub bullet_speed: f32,
    pub bullet_cooldown_ms: u64,

    // UFOs.
    pub ufo_speed: f32,
    pub pursuit_interval_ms: u64,
    pub ufo_fire_interval_ms: u64,
    pub ufo_bullet_speed: f32,

    // Cows.
    pub flee_distance: f32,
    pub flee_speed: f32,
    pub alarm_ms: u64,
    pub knock_speed: f32,
    pub knock_despawn_ms: u64,

    // Spawner.
    pub star_burst: usize,
    pub star_respawn_throttle_ms: u64,
    pub cow_interval_ms: u64,
    pub chasing_ufo_interval_ms: u64,
    pub aggressive_ufo_interval_ms: u64,

    // Cleanup.
    pub cleanup_buffer: f32,
    pub bullet_top_margin: f32,
    pub ufo_bullet_world_margin: f32,

    // Session.
    pub restart_delay_ms: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,

            world_size: Vec2::new(1600.0, 2000.0),
            viewport_size: Vec2::new(800.0, 600.0),
            camera_follow_lerp: 0.1,
            scroll_step_up: 4.0,
            scroll_step_down: 2.0,
            backdrop_step_up: 2.0,
            backdrop_step_down: 1.0,
            backdrop_parallax: 0.02,

            rocket_spawn: Vec2::new(400.0, 500.0),
            rocket_speed: 200.0,
            rocket_idle_drift: -50.0,
            pointer_lerp: 0.3,
            pointer_gain: Vec2::new(1.0, 0.5),
            pointer_deadzone: 8.0,
            rocket_nose_offset: 20.0,
            bullet_speed: 300.0,
            bullet_cooldown_ms: 300,

            ufo_speed: 60.0,
            pursuit_interval_ms: 200,
            ufo_fire_interval_ms: 4000,
            ufo_bullet_speed: 200.0,

            flee_distance: 150.0,
            flee_speed: 170.0,
            alarm_ms: 1000,
            knock_speed: 300.0,
            knock_despawn_ms: 2000,

            star_burst: 10,
            star_respawn_throttle_ms: 3000,
            cow_interval_ms: 7000,
            chasing_ufo_interval_ms: 10_000,
            aggressive_ufo_interval_ms: 15_000,

            cleanup_buffer: 700.0,
            bullet_top_margin: 50.0,
            ufo_bullet_world_margin: 100.0,

            restart_delay_ms: 3000,
        }
    }
}

impl Tunables {
    /// Largest camera scroll that keeps the viewport inside the world.
    #[inline]
    pub fn max_scroll(&self) -> Vec2 {
        (self.world_size - self.viewport_size).max(Vec2::ZERO)
    }
}
