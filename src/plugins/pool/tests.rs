use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, sim_world};
use crate::plugins::cows::{Cow, Wobble};
use crate::plugins::scheduler::{Scheduler, TimedAction};

use super::allocator::allocate_spawns;
use super::{Category, EntityPool, PoolError, SpawnRequest};

fn request(category: Category) -> SpawnRequest {
    SpawnRequest::new(category, Vec2::new(400.0, 100.0), Vec2::new(0.0, 20.0))
}

fn send(world: &mut World, reqs: impl IntoIterator<Item = SpawnRequest>) {
    let mut msgs = world.resource_mut::<Messages<SpawnRequest>>();
    for r in reqs {
        msgs.write(r);
    }
}

/// Spawn `n` bare entities and register them under `category`.
fn fill(world: &mut World, category: Category, n: usize) -> Vec<Entity> {
    let ids: Vec<Entity> = (0..n).map(|_| world.spawn(category).id()).collect();
    let mut pool = world.resource_mut::<EntityPool>();
    for e in &ids {
        pool.adopt(*e, category).expect("below cap");
    }
    ids
}

#[test]
fn caps_match_the_design_table() {
    let caps: Vec<usize> = Category::ALL.iter().map(|c| c.cap()).collect();
    assert_eq!(caps, vec![30, 5, 3, 4, 20, 10]);
}

#[test]
fn create_refuses_past_cap() {
    let mut world = sim_world(0);

    let results: Vec<Result<Entity, PoolError>> =
        run_system_once(&mut world, |mut commands: Commands, mut pool: ResMut<EntityPool>| {
            (0..4)
                .map(|_| pool.create(&mut commands, Category::ChasingUfo, ()))
                .collect::<Vec<_>>()
        });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert_eq!(
        results[3],
        Err(PoolError::AtCapacity {
            category: Category::ChasingUfo,
            cap: 3
        })
    );
    assert_eq!(world.resource::<EntityPool>().active_count(Category::ChasingUfo), 3);
    assert_eq!(world.query::<&Category>().iter(&world).count(), 3);
}

#[test]
fn destroy_twice_is_not_tracked() {
    let mut world = sim_world(0);
    let cow = fill(&mut world, Category::Cow, 1)[0];

    let (first, second) =
        run_system_once(&mut world, move |mut commands: Commands, mut pool: ResMut<EntityPool>| {
            (
                pool.destroy(&mut commands, cow),
                pool.destroy(&mut commands, cow),
            )
        });

    assert_eq!(first, Ok(Category::Cow));
    assert_eq!(second, Err(PoolError::NotTracked(cow)));
    assert_eq!(world.resource::<EntityPool>().active_count(Category::Cow), 0);
    assert!(world.get_entity(cow).is_err());
}

#[test]
fn clear_despawns_every_member() {
    let mut world = sim_world(0);
    fill(&mut world, Category::Star, 4);
    fill(&mut world, Category::UfoBullet, 2);

    let removed = run_system_once(&mut world, |mut commands: Commands, mut pool: ResMut<EntityPool>| {
        pool.clear(&mut commands)
    });

    assert_eq!(removed, 6);
    let pool = world.resource::<EntityPool>();
    assert_eq!(pool.total(), 0);
    assert!(Category::ALL.iter().all(|c| pool.active_count(*c) == 0));
    assert_eq!(world.query::<&Category>().iter(&world).count(), 0);
}

#[test]
fn burst_is_trimmed_to_remaining_capacity() {
    let mut world = sim_world(0);
    fill(&mut world, Category::Star, 25);

    send(&mut world, (0..10).map(|_| request(Category::Star)));
    run_system_once(&mut world, allocate_spawns);

    assert_eq!(world.resource::<EntityPool>().active_count(Category::Star), 30);
    let spawned = world
        .query_filtered::<&Category, With<Sprite>>()
        .iter(&world)
        .count();
    assert_eq!(spawned, 5);
}

#[test]
fn allocator_tags_cows_and_arms_ufo_timers() {
    let mut world = sim_world(1_000);

    send(
        &mut world,
        [
            request(Category::Cow),
            request(Category::ChasingUfo),
            request(Category::AggressiveUfo),
        ],
    );
    run_system_once(&mut world, allocate_spawns);

    assert_eq!(world.query_filtered::<(), (With<Cow>, With<Wobble>)>().iter(&world).count(), 1);

    let pool = world.resource::<EntityPool>();
    let chaser = pool.members(Category::ChasingUfo).next().expect("chaser");
    let aggressor = pool.members(Category::AggressiveUfo).next().expect("aggressor");

    let scheduler = world.resource::<Scheduler>();
    assert_eq!(scheduler.next_fire_of(TimedAction::Pursue(chaser)), Some(1_000));
    assert_eq!(scheduler.next_fire_of(TimedAction::Fire(chaser)), None);
    assert_eq!(scheduler.next_fire_of(TimedAction::Pursue(aggressor)), Some(1_000));
    assert_eq!(scheduler.next_fire_of(TimedAction::Fire(aggressor)), Some(5_000));
}

#[test]
fn only_rocket_bullets_are_sensors() {
    let mut world = sim_world(0);

    send(&mut world, [request(Category::RocketBullet), request(Category::Star)]);
    run_system_once(&mut world, allocate_spawns);

    let pool = world.resource::<EntityPool>();
    let bullet = pool.members(Category::RocketBullet).next().expect("bullet");
    let star = pool.members(Category::Star).next().expect("star");

    assert!(world.get::<Sensor>(bullet).is_some());
    assert!(world.get::<CollisionEventsEnabled>(bullet).is_some());
    assert!(world.get::<Sensor>(star).is_none());
    assert!(world.get::<Collider>(star).is_some());
    assert_eq!(
        world.get::<CollisionLayers>(star).copied(),
        Some(Category::Star.collision_layers())
    );
}

#[test]
fn allocator_without_pool_drops_requests() {
    let mut world = sim_world(0);
    world.remove_resource::<EntityPool>();

    send(&mut world, [request(Category::Star)]);
    run_system_once(&mut world, allocate_spawns);

    assert_eq!(world.query::<&Category>().iter(&world).count(), 0);
}
