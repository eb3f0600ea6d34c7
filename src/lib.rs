//! Grimoire Woods - a first-person forest adventure in Bevy.
//!
//! The player searches the woods for a lost cat. Each clearing is closed
//! off by a barrier once its save point is reached, and opens again when
//! its key(s) are found or its enemies are defeated.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, config, message board
//! - **Player**: First-person movement, camera, death and respawn
//! - **Combat**: Health, damage, grimoire, fireballs, weapon switching
//! - **Enemies**: Data-driven bears and goblins with a chase/attack AI
//! - **Progression**: Barriers, keys, save points, clues
//! - **World**: Level data and construction
//! - **Audio**: Sound cues and music channels
//! - **Persistence**: Settings file
//! - **UI**: Start screen, intro, volume panel, death screen, HUD

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod persistence;
pub mod player;
pub mod progression;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
///
/// Expects `DefaultPlugins`, `RapierPhysicsPlugin` and
/// `bevy_kira_audio::AudioPlugin` to be added by the caller.
pub struct GrimoireWoodsPlugin;

impl Plugin for GrimoireWoodsPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(persistence::SettingsPlugin)

            // Gameplay
            .add_plugins(player::PlayerPlugin)
            .add_plugins(combat::CombatPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(progression::ProgressionPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Presentation
            .add_plugins(audio::AudioCuePlugin)
            .add_plugins(ui::UiPlugin);
    }
}
