//! Collision layers.
//!
//! The rocket and its bullets are sensors with collision events enabled.
//! Everything they can touch is a solid collider whose filter admits only
//! those two layers, so no two bodies ever push on each other and every
//! gameplay contact surfaces as a `CollisionStart` message.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Rocket,
    RocketBullet,
    Star,
    Cow,
    Ufo,
    UfoBullet,
}

pub fn rocket_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Rocket,
        [Layer::Star, Layer::Cow, Layer::Ufo, Layer::UfoBullet],
    )
}
