//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `rocket_rescue::game::configure_headless` to install gameplay plugins.
//!
//! Ticks are driven by hand (`tick`) so simulation time is exact; `app.update()`
//! is only used once, to run Startup and the first state transition.

#![allow(dead_code)]

use std::time::Duration;

use avian2d::prelude::CollisionStart;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::state::state::StateTransition;

use rocket_rescue::plugins::pool::{Category, EntityPool, SpawnRequest};

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    rocket_rescue::game::configure_headless(&mut app);
    app
}

/// Headless app with the first session already started.
pub fn app_playing() -> App {
    let mut app = app_headless();
    app.update();
    app
}

/// One fixed tick of `ms` simulation milliseconds, then apply any state change.
pub fn tick(app: &mut App, ms: u64) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_millis(ms));
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(StateTransition);
}

/// Request a pooled entity at `pos` and run the tick that allocates it.
pub fn spawn(app: &mut App, category: Category, pos: Vec2) -> Entity {
    let before: Vec<Entity> = app
        .world()
        .resource::<EntityPool>()
        .members(category)
        .collect();
    app.world_mut()
        .write_message(SpawnRequest::new(category, pos, Vec2::ZERO));
    tick(app, 16);
    app.world()
        .resource::<EntityPool>()
        .members(category)
        .find(|e| !before.contains(e))
        .expect("allocated")
}

/// Report an overlap between `a` and `b` for the next tick to resolve.
pub fn collide(app: &mut App, a: Entity, b: Entity) {
    app.world_mut().write_message(CollisionStart {
        collider1: a,
        collider2: b,
        body1: Some(a),
        body2: Some(b),
    });
}
