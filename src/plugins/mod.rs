//! Feature plugins.

use bevy::prelude::*;

pub mod cleanup;
pub mod collision;
pub mod core;
pub mod cows;
pub mod enemies;
pub mod feedback;
pub mod physics;
pub mod player;
pub mod pool;
pub mod scheduler;
pub mod session;
pub mod spawner;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;
pub mod scoreboard;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    pool::plugin(app);
    scheduler::plugin(app);
    spawner::plugin(app);
    player::plugin(app);
    cows::plugin(app);
    feedback::plugin(app);
    session::plugin(app);
    collision::plugin(app);
    cleanup::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
    lighting::plugin(app);
    scoreboard::plugin(app);
}
