//! Buffered spawn requests.
//!
//! Producers (scheduler dispatch, reactive stars, rocket and UFO fire) write
//! intent; the allocator is the single writer to `EntityPool`.

use bevy::prelude::*;

use super::Category;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub category: Category,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl SpawnRequest {
    pub fn new(category: Category, pos: Vec2, vel: Vec2) -> Self {
        Self { category, pos, vel }
    }
}
