//! Camera plugin (render-only).
//!
//! The simulation keeps its own camera window (`ScrollCamera`, top-left
//! corner, y down). This plugin mirrors it onto the render camera each frame:
//!
//! ```text
//! Startup:    spawn MainCamera (y axis flipped so world y grows downward)
//! PostUpdate: camera centre = scroll + viewport / 2 + shake offset
//!             backdrop layer = -parallax offset
//! ```
//!
//! Queries on `Transform` are kept disjoint with `Without<...>` filters so the
//! camera and backdrop can both be written from one system (B0001).

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::feedback::ScreenShake;
use crate::plugins::world::{BACKDROP_PERIOD, BackdropLayer, ScrollCamera};

#[derive(Component, Debug, Clone, Copy)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera).add_systems(
        PostUpdate,
        mirror_scroll_camera.before(TransformSystems::Propagate),
    );
}

fn spawn_camera(mut commands: Commands, tunables: Res<Tunables>) {
    let centre = tunables.rocket_spawn;
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        FireflyConfig::default(),
        Transform::from_xyz(centre.x, centre.y, 999.0).with_scale(Vec3::new(1.0, -1.0, 1.0)),
    ));
}

/// Render centre for a given simulation window.
#[inline]
pub fn camera_centre(scroll: &ScrollCamera, shake: &ScreenShake, tunables: &Tunables) -> Vec2 {
    scroll.scroll + tunables.viewport_size * 0.5 + shake.offset(tunables.viewport_size)
}

/// Backdrop layer translation for an accumulated parallax scroll.
#[inline]
pub fn backdrop_offset(backdrop: Vec2) -> Vec2 {
    -backdrop.rem_euclid(Vec2::splat(BACKDROP_PERIOD))
}

fn mirror_scroll_camera(
    tunables: Res<Tunables>,
    scroll: Res<ScrollCamera>,
    shake: Res<ScreenShake>,
    mut q_cam: Query<&mut Transform, (With<MainCamera>, Without<BackdropLayer>)>,
    mut q_backdrop: Query<&mut Transform, (With<BackdropLayer>, Without<MainCamera>)>,
) {
    let centre = camera_centre(&scroll, &shake, &tunables);
    for mut tf in &mut q_cam {
        tf.translation.x = centre.x;
        tf.translation.y = centre.y;
    }

    // Checker pattern repeats every two tiles, so the offset wraps.
    let offset = backdrop_offset(scroll.backdrop);
    for mut tf in &mut q_backdrop {
        tf.translation.x = offset.x;
        tf.translation.y = offset.y;
    }
}
