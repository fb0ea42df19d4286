//! Lighting plugin (Firefly) (render-only): a warm light rides on the rocket.

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::plugins::player::{Rocket, RocketSlot};

#[derive(Component)]
pub struct RocketLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(Startup, setup)
        .add_systems(Update, follow_rocket_light);
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("RocketLight"),
        RocketLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            range: 450.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
    ));
}

/// The light stays where the rocket died until the next session spawns one.
fn follow_rocket_light(
    rocket: Res<RocketSlot>,
    q_rocket: Query<&Transform, (With<Rocket>, Without<RocketLight>)>,
    mut q_light: Query<&mut Transform, (With<RocketLight>, Without<Rocket>)>,
) {
    let Some(tf_rocket) = rocket.get().and_then(|e| q_rocket.get(e).ok()) else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_rocket.translation.x;
    tf_light.translation.y = tf_rocket.translation.y;
}
