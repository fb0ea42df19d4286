use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::test_utils::{run_system_once, sim_world};
use crate::common::tunables::Tunables;
use crate::plugins::pool::{Category, SpawnRequest};
use crate::plugins::world::{ScrollCamera, VerticalIntent};

use super::{
    InputMode, PlayerInput, Rocket, RocketSlot, fire_rocket_bullets, keyboard_velocity,
    pointer_velocity, spawn_rocket, steer_rocket,
};

fn world_with_rocket(now_ms: u64, input: PlayerInput) -> (World, Entity) {
    let mut world = sim_world(now_ms);
    world.insert_resource(input);
    world.insert_resource(ScrollCamera {
        scroll: Vec2::new(0.0, 200.0),
        backdrop: Vec2::ZERO,
    });
    let rocket = run_system_once(&mut world, |mut commands: Commands, t: Res<Tunables>| {
        spawn_rocket(&mut commands, &t)
    });
    world.resource_mut::<RocketSlot>().set(rocket);
    (world, rocket)
}

fn shots(world: &mut World) -> Vec<SpawnRequest> {
    world
        .resource_mut::<Messages<SpawnRequest>>()
        .drain()
        .collect()
}

#[test]
fn spawn_places_rocket_at_start() {
    let (world, rocket) = world_with_rocket(0, PlayerInput::default());
    let tf = world.get::<Transform>(rocket).expect("tf");
    assert_eq!(tf.translation.truncate(), Vec2::new(400.0, 500.0));
    assert!(world.get::<Rocket>(rocket).is_some());
    assert!(world.get::<Sensor>(rocket).is_some());
    assert!(world.get::<CollisionEventsEnabled>(rocket).is_some());
    assert!(world.get::<Collider>(rocket).is_some());
}

#[test]
fn keyboard_moves_at_rocket_speed_and_drifts_when_idle() {
    let t = Tunables::default();
    let mut input = PlayerInput {
        move_x: -1.0,
        vertical: VerticalIntent::Up,
        ..default()
    };
    assert_eq!(keyboard_velocity(&input, &t), Vec2::new(-200.0, -200.0));

    input.vertical = VerticalIntent::Down;
    assert_eq!(keyboard_velocity(&input, &t), Vec2::new(-200.0, 200.0));

    input.move_x = 0.0;
    input.vertical = VerticalIntent::Idle;
    assert_eq!(keyboard_velocity(&input, &t), Vec2::new(0.0, -50.0));
}

#[test]
fn pointer_eases_toward_scaled_offset() {
    let t = Tunables::default();
    let (v, intent) = pointer_velocity(
        Vec2::ZERO,
        Vec2::new(400.0, 500.0),
        Some(Vec2::new(500.0, 300.0)),
        &t,
    );
    // Target (100, -100): 30% of the way there.
    assert!((v - Vec2::new(30.0, -30.0)).length() < 1e-4);
    assert_eq!(intent, VerticalIntent::Up);

    let (_, intent) = pointer_velocity(
        Vec2::ZERO,
        Vec2::new(400.0, 500.0),
        Some(Vec2::new(300.0, 510.0)),
        &t,
    );
    assert_eq!(intent, VerticalIntent::Idle);
}

#[test]
fn released_pointer_eases_toward_idle_drift() {
    let t = Tunables::default();
    let (v, intent) = pointer_velocity(Vec2::new(100.0, 0.0), Vec2::ZERO, None, &t);
    assert!((v - Vec2::new(70.0, -15.0)).length() < 1e-4);
    assert_eq!(intent, VerticalIntent::Idle);
}

#[test]
fn steering_up_nudges_the_camera() {
    let input = PlayerInput {
        mode: InputMode::Keyboard,
        vertical: VerticalIntent::Up,
        ..default()
    };
    let (mut world, rocket) = world_with_rocket(0, input);

    run_system_once(&mut world, steer_rocket);

    assert_eq!(world.get::<LinearVelocity>(rocket).expect("v").0, Vec2::new(0.0, -200.0));
    let cam = world.resource::<ScrollCamera>();
    assert_eq!(cam.scroll.y, 196.0);
    assert_eq!(cam.backdrop.y, -2.0);
}

#[test]
fn steering_clamps_rocket_inside_world() {
    let (mut world, rocket) = world_with_rocket(0, PlayerInput::default());
    world.get_mut::<Transform>(rocket).expect("tf").translation.x = -40.0;

    run_system_once(&mut world, steer_rocket);

    let x = world.get::<Transform>(rocket).expect("tf").translation.x;
    assert_eq!(x, Rocket::HIT_RADIUS);
}

#[test]
fn held_fire_respects_cooldown() {
    let input = PlayerInput {
        fire_held: true,
        ..default()
    };
    let (mut world, _) = world_with_rocket(1_000, input);

    run_system_once(&mut world, fire_rocket_bullets);
    let first = shots(&mut world);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].category, Category::RocketBullet);
    assert_eq!(first[0].pos, Vec2::new(400.0, 480.0));
    assert_eq!(first[0].vel, Vec2::new(0.0, -300.0));

    // 299 ms later: still cooling down.
    world.insert_resource(SimClock::at_ms(1_299));
    run_system_once(&mut world, fire_rocket_bullets);
    assert!(shots(&mut world).is_empty());

    world.insert_resource(SimClock::at_ms(1_300));
    run_system_once(&mut world, fire_rocket_bullets);
    assert_eq!(shots(&mut world).len(), 1);
}

#[test]
fn tap_fire_is_consumed_once() {
    let input = PlayerInput {
        mode: InputMode::Pointer,
        tap_fire: true,
        ..default()
    };
    let (mut world, _) = world_with_rocket(0, input);

    run_system_once(&mut world, fire_rocket_bullets);
    assert_eq!(shots(&mut world).len(), 1);
    assert!(!world.resource::<PlayerInput>().tap_fire);

    world.insert_resource(SimClock::at_ms(5_000));
    run_system_once(&mut world, fire_rocket_bullets);
    assert!(shots(&mut world).is_empty());
}

#[test]
fn no_rocket_no_shot() {
    let mut world = sim_world(0);
    world.insert_resource(PlayerInput {
        fire_held: true,
        ..default()
    });

    run_system_once(&mut world, fire_rocket_bullets);

    assert!(shots(&mut world).is_empty());
}
