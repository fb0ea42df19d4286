//! Spawn consumer: turn `SpawnRequest` messages into pooled entities.
//!
//! A full pool drops the request (capacity decision, not a correctness
//! failure). UFOs get their steering timers attached here, because this is
//! the first point where their entity id exists.
//!
//! Bodies are dynamic with zero gravity; avian integrates `LinearVelocity`
//! and reports sensor overlaps. Rotation is locked, contacts never push.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::tunables::Tunables;
use crate::plugins::cows::{Cow, Wobble};
use crate::plugins::scheduler::{Scheduler, TimedAction};
use crate::plugins::spawner::SpawnRng;

use super::{Category, EntityPool, SpawnRequest};

fn sprite_for(category: Category) -> Sprite {
    let (color, size) = match category {
        Category::Star => (Color::srgb(1.0, 0.92, 0.3), Vec2::new(28.0, 22.0)),
        Category::Cow => (Color::srgb(0.95, 0.95, 0.92), Vec2::new(36.0, 30.0)),
        Category::ChasingUfo => (Color::srgb(0.45, 0.95, 0.55), Vec2::new(54.0, 36.0)),
        Category::AggressiveUfo => (Color::srgb(0.95, 0.35, 0.75), Vec2::new(62.0, 42.0)),
        Category::RocketBullet => (Color::srgb(1.0, 0.08, 0.58), Vec2::new(4.0, 10.0)),
        Category::UfoBullet => (Color::WHITE, Vec2::splat(10.0)),
    };
    Sprite {
        color,
        custom_size: Some(size),
        ..default()
    }
}

pub fn allocate_spawns(
    mut commands: Commands,
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    pool: Option<ResMut<EntityPool>>,
    mut scheduler: ResMut<Scheduler>,
    mut rng: ResMut<SpawnRng>,
    mut reader: MessageReader<SpawnRequest>,
) {
    let Some(mut pool) = pool else {
        let dropped = reader.read().count();
        error!("EntityPool is not initialized; dropped {dropped} spawn requests");
        return;
    };

    let now = clock.now_ms();

    for req in reader.read() {
        let bundle = (
            Name::new(req.category.label()),
            sprite_for(req.category),
            Transform::from_translation(req.pos.extend(2.0)),
            RigidBody::Dynamic,
            Collider::circle(req.category.hit_radius()),
            req.category.collision_layers(),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity(req.vel),
        );

        let e = match pool.create(&mut commands, req.category, bundle) {
            Ok(e) => e,
            Err(err) => {
                debug!("{err}; skipping spawn");
                continue;
            }
        };

        match req.category {
            Category::Cow => {
                commands
                    .entity(e)
                    .insert((Cow::default(), Wobble::random(&mut rng.0)));
            }
            Category::ChasingUfo => {
                scheduler.every(now, tunables.pursuit_interval_ms, TimedAction::Pursue(e));
            }
            Category::AggressiveUfo => {
                scheduler.every(now, tunables.pursuit_interval_ms, TimedAction::Pursue(e));
                scheduler.every(
                    now + tunables.ufo_fire_interval_ms,
                    tunables.ufo_fire_interval_ms,
                    TimedAction::Fire(e),
                );
            }
            Category::RocketBullet => {
                // Sensors carry no collider mass.
                commands
                    .entity(e)
                    .insert((Sensor, CollisionEventsEnabled, Mass(1.0)));
            }
            Category::Star | Category::UfoBullet => {}
        }

        debug!("spawned {:?} at {:?}", req.category, req.pos);
    }
}
