//! Global state machine.
//!
//! `Playing` is the default, so the first session starts on the first
//! state transition run. `GameOver` lasts until the restart timer fires.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Playing,
    GameOver,
}
