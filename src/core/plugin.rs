//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::config::load_game_config;
use super::events::*;
use super::lifetime::despawn_expired;
use super::messages::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, StartScreen, Intro, InGame, Dead) and the menu overlay
/// - Global events (DamageEvent, DeathEvent, ShowMessage, PlaySound, ...)
/// - Game config resources
/// - The message board and delayed despawning
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .init_state::<MenuOverlay>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<ShowMessage>()
            .add_event::<PlaySound>()
            .add_event::<RespawnRequested>()

            .init_resource::<MessageBoard>()

            // Config must exist before any plugin's OnEnter systems read it
            .add_systems(PreStartup, load_game_config)

            // Data files are read synchronously at startup, so loading is done
            // by the time the first frame runs
            .add_systems(OnEnter(GameState::Loading), transition_to_start_screen)

            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Ai,
                    GameplaySet::Damage,
                    GameplaySet::Resolve,
                    GameplaySet::Progression,
                )
                    .chain()
                    .run_if(gameplay_running),
            )

            .add_systems(Update, (expire_messages, receive_messages).chain())
            .add_systems(Update, despawn_expired);
    }
}

/// Leave the loading state once startup systems have run.
fn transition_to_start_screen(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::StartScreen);
}
