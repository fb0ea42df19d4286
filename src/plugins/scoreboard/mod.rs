//! Scoreboard (render-only): mirrors the session into the window title.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::session::GameSession;

pub const TITLE: &str = "Rocket Rescue";

/// Title text for the current session state.
pub fn scoreboard_text(session: &GameSession, state: GameState) -> String {
    match (state, session.final_tally()) {
        (GameState::GameOver, Some(tally)) => format!(
            "{TITLE} | GAME OVER | cows rescued: {} | restarting...",
            tally.cows_rescued
        ),
        _ => format!(
            "{TITLE} | score: {} | health: {}/{} | cows rescued: {}",
            session.score(),
            session.health(),
            GameSession::MAX_HEALTH,
            session.cows_rescued()
        ),
    }
}

fn update_window_title(
    session: Res<GameSession>,
    state: Res<State<GameState>>,
    mut windows: Query<&mut Window>,
) {
    if !session.is_changed() && !state.is_changed() {
        return;
    }
    let text = scoreboard_text(&session, *state.get());
    for mut window in &mut windows {
        if window.title != text {
            window.title.clone_from(&text);
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, update_window_title);
}
