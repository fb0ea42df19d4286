//! World plugin: playfield bounds, the scrolling camera window and the
//! backdrop.
//!
//! The camera window is simulation state, not a render detail: spawn
//! placement and the cleanup sweep are both defined relative to its top edge.
//! The render camera only mirrors it.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::player::{Rocket, RocketSlot};

const TILE: f32 = 100.0;

/// Distance after which the backdrop pattern repeats.
pub const BACKDROP_PERIOD: f32 = TILE * 2.0;

/// Which way the player is pushing the rocket vertically this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalIntent {
    #[default]
    Idle,
    Up,
    Down,
}

/// Camera window over the world plus the backdrop scroll offset.
///
/// `scroll` is the world position of the viewport's top-left corner.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollCamera {
    pub scroll: Vec2,
    pub backdrop: Vec2,
}

impl ScrollCamera {
    /// Window centred on `focus`, clamped to the world.
    pub fn centered_on(focus: Vec2, tunables: &Tunables) -> Self {
        let mut cam = Self {
            scroll: focus - tunables.viewport_size * 0.5,
            backdrop: Vec2::ZERO,
        };
        cam.clamp(tunables);
        cam
    }

    /// World y of the viewport's top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.scroll.y
    }

    /// Scroll coupling: moving up pulls the window (and backdrop) up faster
    /// than moving down pushes it.
    pub fn nudge(&mut self, intent: VerticalIntent, tunables: &Tunables) {
        match intent {
            VerticalIntent::Up => {
                self.scroll.y -= tunables.scroll_step_up;
                self.backdrop.y -= tunables.backdrop_step_up;
            }
            VerticalIntent::Down => {
                self.scroll.y += tunables.scroll_step_down;
                self.backdrop.y += tunables.backdrop_step_down;
            }
            VerticalIntent::Idle => {}
        }
    }

    /// Ease the window toward `focus` and keep it inside the world.
    pub fn follow(&mut self, focus: Vec2, tunables: &Tunables) {
        let target = focus - tunables.viewport_size * 0.5;
        self.scroll += (target - self.scroll) * tunables.camera_follow_lerp;
        self.clamp(tunables);
    }

    #[inline]
    pub fn clamp(&mut self, tunables: &Tunables) {
        self.scroll = self.scroll.clamp(Vec2::ZERO, tunables.max_scroll());
    }
}

/// Keep a circle of `radius` inside the world rectangle.
///
/// Returns the corrected position and a mask of the axes that were hit.
pub fn confine(pos: Vec2, radius: f32, world: Vec2) -> (Vec2, BVec2) {
    let min = Vec2::splat(radius);
    let max = (world - Vec2::splat(radius)).max(min);
    let clamped = pos.clamp(min, max);
    (clamped, BVec2::new(clamped.x != pos.x, clamped.y != pos.y))
}

/// Whether a point lies inside the world rectangle grown by `margin`.
#[inline]
pub fn within_world(pos: Vec2, world: Vec2, margin: f32) -> bool {
    pos.x >= -margin && pos.y >= -margin && pos.x <= world.x + margin && pos.y <= world.y + margin
}

/// Camera follow + backdrop parallax. Runs after the player's scroll nudges.
pub fn follow_rocket(
    tunables: Res<Tunables>,
    rocket: Res<RocketSlot>,
    mut scroll: ResMut<ScrollCamera>,
    q_rocket: Query<(&Transform, &LinearVelocity), With<Rocket>>,
) {
    let Some((tf, vel)) = rocket.get().and_then(|e| q_rocket.get(e).ok()) else {
        return;
    };

    scroll.follow(tf.translation.truncate(), &tunables);
    scroll.backdrop += vel.0 * tunables.backdrop_parallax;
}

/// Backdrop parent; the camera plugin offsets it by the parallax scroll.
#[derive(Component, Debug, Clone, Copy)]
pub struct BackdropLayer;

/// Spawn an asset-free checker backdrop over the world, with one extra
/// period of margin so the parallax offset never exposes the clear colour.
fn spawn_backdrop(mut commands: Commands, tunables: Res<Tunables>) {
    let cols = (tunables.world_size.x / TILE).ceil() as i32 + 2;
    let rows = (tunables.world_size.y / TILE).ceil() as i32 + 2;

    commands
        .spawn((
            Name::new("Backdrop"),
            BackdropLayer,
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|layer| {
            (-2..rows)
                .flat_map(|y| (-2..cols).map(move |x| (x, y)))
                .for_each(|(x, y)| {
                    let color = if (x + y) % 2 == 0 {
                        Color::srgb(0.03, 0.03, 0.08)
                    } else {
                        Color::srgb(0.04, 0.04, 0.10)
                    };
                    let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * TILE;
                    layer.spawn((
                        Sprite::from_color(color, Vec2::splat(TILE)),
                        Transform::from_translation(centre.extend(0.0)),
                    ));
                });
        });
}

pub fn plugin(app: &mut App) {
    app.insert_resource(ScrollCamera::default());
    app.add_systems(Startup, spawn_backdrop);
    app.add_systems(
        FixedUpdate,
        follow_rocket
            .in_set(TickSet::Control)
            .after(crate::plugins::player::steer_rocket)
            .run_if(in_state(GameState::Playing)),
    );
}
