//! Player plugin.
//!
//! Pipeline:
//! - Update: sample keyboard/pointer input, write `PlayerInput`
//! - FixedUpdate: steer the rocket, couple the camera scroll, fire
//!
//! Two input modes are mutually exclusive. Whichever channel produced the
//! most recent press owns the rocket:
//! - keyboard: ±speed per held direction; with no vertical key held the ship
//!   keeps drifting forward (up) at the idle drift speed.
//! - pointer: velocity eases toward the vector from the ship to the pointer
//!   (vertical component halved); with the pointer released it eases toward
//!   the same idle drift.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::layers::rocket_layers;
use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::camera::MainCamera;
use crate::plugins::pool::{Category, SpawnRequest};
use crate::plugins::session::GameSession;
use crate::plugins::world::{ScrollCamera, VerticalIntent, confine};

#[derive(Component, Debug, Clone, Copy)]
pub struct Rocket;

impl Rocket {
    pub const HIT_RADIUS: f32 = 20.0;
}

/// The single rocket slot.
///
/// Everything that targets the rocket looks it up here and must tolerate
/// `None` (after game over, before the next session spawns a new one).
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RocketSlot(Option<Entity>);

impl RocketSlot {
    #[inline]
    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    #[inline]
    pub fn set(&mut self, e: Entity) {
        self.0 = Some(e);
    }

    #[inline]
    pub fn take(&mut self) -> Option<Entity> {
        self.0.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Keyboard,
    Pointer,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    pub mode: InputMode,
    /// -1, 0 or 1.
    pub move_x: f32,
    pub vertical: VerticalIntent,
    /// Pointer position in world space while held.
    pub pointer: Option<Vec2>,
    pub fire_held: bool,
    /// Tap-on-ship, latched until the next tick consumes it.
    pub tap_fire: bool,
}

const LEFT: [KeyCode; 2] = [KeyCode::ArrowLeft, KeyCode::KeyA];
const RIGHT: [KeyCode; 2] = [KeyCode::ArrowRight, KeyCode::KeyD];
const UP: [KeyCode; 2] = [KeyCode::ArrowUp, KeyCode::KeyW];
const DOWN: [KeyCode; 2] = [KeyCode::ArrowDown, KeyCode::KeyS];

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .insert_resource(RocketSlot::default())
        .add_systems(Update, gather_input)
        .add_systems(
            FixedUpdate,
            (steer_rocket, fire_rocket_bullets)
                .chain()
                .in_set(TickSet::Control)
                .run_if(in_state(GameState::Playing)),
        );
}

pub fn spawn_rocket(commands: &mut Commands, tunables: &Tunables) -> Entity {
    commands
        .spawn((
            Name::new("Rocket"),
            Rocket,
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(Vec2::new(32.0, 52.0)),
                ..default()
            },
            Transform::from_translation(tunables.rocket_spawn.extend(3.0)),
            RigidBody::Dynamic,
            Collider::circle(Rocket::HIT_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            rocket_layers(),
            Mass(1.0),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
        ))
        .id()
}

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    windows: Query<&Window>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    rocket: Res<RocketSlot>,
    q_rocket: Query<&Transform, With<Rocket>>,
    mut input: ResMut<PlayerInput>,
) {
    if let Some(keys) = keys.as_deref() {
        input.move_x = if keys.any_pressed(RIGHT) {
            1.0
        } else if keys.any_pressed(LEFT) {
            -1.0
        } else {
            0.0
        };
        input.vertical = if keys.any_pressed(UP) {
            VerticalIntent::Up
        } else if keys.any_pressed(DOWN) {
            VerticalIntent::Down
        } else {
            VerticalIntent::Idle
        };
        input.fire_held = keys.pressed(KeyCode::Space);

        if [LEFT, RIGHT, UP, DOWN].iter().any(|set| keys.any_just_pressed(*set)) {
            input.mode = InputMode::Keyboard;
        }
    }

    let mouse_held = buttons.as_deref().is_some_and(|b| b.pressed(MouseButton::Left));
    let mouse_tapped = buttons.as_deref().is_some_and(|b| b.just_pressed(MouseButton::Left));
    let touch_tapped = touches.as_deref().is_some_and(|t| t.any_just_pressed());

    let screen = if mouse_held {
        windows.iter().next().and_then(|w| w.cursor_position())
    } else {
        touches.as_deref().and_then(|t| t.iter().next().map(|touch| touch.position()))
    };

    input.pointer = match (screen, q_camera.single()) {
        (Some(p), Ok((camera, camera_tf))) => camera.viewport_to_world_2d(camera_tf, p).ok(),
        _ => None,
    };

    if mouse_tapped || touch_tapped {
        input.mode = InputMode::Pointer;

        let rocket_pos = rocket
            .get()
            .and_then(|e| q_rocket.get(e).ok())
            .map(|tf| tf.translation.truncate());
        if let (Some(p), Some(r)) = (input.pointer, rocket_pos) {
            if p.distance(r) <= Rocket::HIT_RADIUS {
                input.tap_fire = true;
            }
        }
    }
}

/// Keyboard mode velocity.
pub fn keyboard_velocity(input: &PlayerInput, tunables: &Tunables) -> Vec2 {
    let vy = match input.vertical {
        VerticalIntent::Up => -tunables.rocket_speed,
        VerticalIntent::Down => tunables.rocket_speed,
        VerticalIntent::Idle => tunables.rocket_idle_drift,
    };
    Vec2::new(input.move_x * tunables.rocket_speed, vy)
}

/// Pointer mode velocity and the vertical intent it implies.
pub fn pointer_velocity(
    current: Vec2,
    rocket: Vec2,
    pointer: Option<Vec2>,
    tunables: &Tunables,
) -> (Vec2, VerticalIntent) {
    let Some(pointer) = pointer else {
        let idle = Vec2::new(0.0, tunables.rocket_idle_drift);
        return (current.lerp(idle, tunables.pointer_lerp), VerticalIntent::Idle);
    };

    let target = (pointer - rocket) * tunables.pointer_gain;
    let intent = if target.y < -tunables.pointer_deadzone {
        VerticalIntent::Up
    } else if target.y > tunables.pointer_deadzone {
        VerticalIntent::Down
    } else {
        VerticalIntent::Idle
    };
    (current.lerp(target, tunables.pointer_lerp), intent)
}

pub fn steer_rocket(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    rocket: Res<RocketSlot>,
    mut scroll: ResMut<ScrollCamera>,
    mut q_rocket: Query<(&mut Transform, &mut LinearVelocity), With<Rocket>>,
) {
    let Some((mut tf, mut vel)) = rocket.get().and_then(|e| q_rocket.get_mut(e).ok()) else {
        return;
    };

    let (pos, _) = confine(tf.translation.truncate(), Rocket::HIT_RADIUS, tunables.world_size);
    tf.translation.x = pos.x;
    tf.translation.y = pos.y;

    let (v, intent) = match input.mode {
        InputMode::Keyboard => (keyboard_velocity(&input, &tunables), input.vertical),
        InputMode::Pointer => pointer_velocity(vel.0, pos, input.pointer, &tunables),
    };
    vel.0 = v;
    scroll.nudge(intent, &tunables);
}

pub fn fire_rocket_bullets(
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    rocket: Res<RocketSlot>,
    mut input: ResMut<PlayerInput>,
    mut session: ResMut<GameSession>,
    mut requests: MessageWriter<SpawnRequest>,
    q_rocket: Query<&Transform, With<Rocket>>,
) {
    let tapped = std::mem::take(&mut input.tap_fire);
    if !(input.fire_held || tapped) {
        return;
    }
    let Some(tf) = rocket.get().and_then(|e| q_rocket.get(e).ok()) else {
        return;
    };
    if !session.try_fire(clock.now_ms(), tunables.bullet_cooldown_ms) {
        return;
    }

    let nose = tf.translation.truncate() - Vec2::new(0.0, tunables.rocket_nose_offset);
    requests.write(SpawnRequest::new(
        Category::RocketBullet,
        nose,
        Vec2::new(0.0, -tunables.bullet_speed),
    ));
}

#[cfg(test)]
mod tests;
