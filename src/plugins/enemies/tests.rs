use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::pool::Category;

use super::{bearing_velocity, pursuit_velocity, ufo_shot};

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn bearing_has_requested_magnitude() {
    let v = bearing_velocity(Vec2::new(10.0, 10.0), Vec2::new(13.0, 14.0), 50.0);
    assert!((v.length() - 50.0).abs() < 1e-3);
    assert!(close(v, Vec2::new(30.0, 40.0)));
}

#[test]
fn coincident_points_aim_along_positive_x() {
    let v = bearing_velocity(Vec2::splat(5.0), Vec2::splat(5.0), 60.0);
    assert!(close(v, Vec2::new(60.0, 0.0)));
}

#[test]
fn pursuit_aims_straight_at_the_rocket() {
    let t = Tunables::default();
    let v = pursuit_velocity(Vec2::new(100.0, 100.0), Vec2::new(100.0, 400.0), &t);
    assert!(close(v, Vec2::new(0.0, 60.0)));
}

#[test]
fn shot_starts_at_the_ufo_and_flies_at_bullet_speed() {
    let t = Tunables::default();
    let shot = ufo_shot(Vec2::new(500.0, 100.0), Vec2::new(200.0, 100.0), &t);
    assert_eq!(shot.category, Category::UfoBullet);
    assert_eq!(shot.pos, Vec2::new(500.0, 100.0));
    assert!(close(shot.vel, Vec2::new(-200.0, 0.0)));
}
