//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! player movement only runs while `GameState::InGame` is active and the
//! volume overlay is closed.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read configuration and data files
/// - `StartScreen` shows the title panel and plays menu music
/// - `Intro` plays the intro card and the opening dialogue line
/// - `InGame` is active gameplay
/// - `Dead` shows the death screen until the player restarts
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading configuration and data files
    #[default]
    Loading,
    /// Title screen with the start button
    StartScreen,
    /// Intro card followed by the opening dialogue
    Intro,
    /// Active gameplay
    InGame,
    /// Death screen is up
    Dead,
}

/// Overlay state for the volume panel.
///
/// Independent of `GameState` so the panel can be opened both from the
/// start screen and during gameplay. Virtual time is paused while open.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum MenuOverlay {
    #[default]
    Closed,
    Volume,
}

/// Run condition: gameplay is live (in game, overlay closed).
///
/// Takes optional resources so it evaluates to `false` in apps that never
/// registered the states.
pub fn gameplay_running(
    game: Option<Res<State<GameState>>>,
    overlay: Option<Res<State<MenuOverlay>>>,
) -> bool {
    let in_game = game.is_some_and(|state| *state.get() == GameState::InGame);
    let overlay_closed = overlay.map_or(true, |state| *state.get() == MenuOverlay::Closed);
    in_game && overlay_closed
}

/// Frame ordering shared by the gameplay plugins.
///
/// Input and AI produce `DamageEvent`s, `Damage` applies them, `Resolve`
/// reacts to deaths, and `Progression` updates barriers, keys and save
/// points against the settled world.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Ai,
    Damage,
    Resolve,
    Progression,
}
