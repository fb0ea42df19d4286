use bevy::prelude::*;

use super::{RealSeconds, ScreenShake, UnitF32};

#[test]
fn unit_and_seconds_clamp_on_write() {
    assert_eq!(UnitF32::new_clamped(1.7).get(), 1.0);
    assert_eq!(UnitF32::new_clamped(-0.2).get(), 0.0);

    let mut s = RealSeconds::new(-1.0);
    assert_eq!(s.get(), 0.0);
    s.set_max(0.3);
    s.set_max(0.1);
    assert_eq!(s.get(), 0.3);
    s.tick_down(1.0);
    assert!(!s.is_positive());
}

#[test]
fn overlapping_triggers_keep_longest_and_strongest() {
    let mut shake = ScreenShake::default();
    shake.trigger(0.3, 0.01);
    shake.trigger(0.2, 0.02);

    assert!((shake.remaining_secs() - 0.3).abs() < 1e-6);
    let off = shake.offset(Vec2::new(800.0, 600.0));
    assert!(off.length() <= 0.02 * 800.0 + 1e-3);
}

#[test]
fn shake_expires_and_stops_offsetting() {
    let mut shake = ScreenShake::default();
    assert_eq!(shake.offset(Vec2::new(800.0, 600.0)), Vec2::ZERO);

    shake.trigger(0.2, 0.02);
    assert!(shake.is_active());
    shake.tick(0.1);
    assert!(shake.is_active());
    shake.tick(0.15);
    assert!(!shake.is_active());
    assert_eq!(shake.offset(Vec2::new(800.0, 600.0)), Vec2::ZERO);
}
