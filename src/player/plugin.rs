//! Player plugin - movement, camera, death and respawn.

use bevy::prelude::*;

use super::components::*;
use super::health::*;
use super::movement;
use crate::core::GameplaySet;

/// Player plugin - handles player movement, camera and the death/respawn cycle.
///
/// The player entity itself is spawned by the world builder.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);

        app.init_resource::<SpawnPoint>()
            .add_systems(
                Update,
                (on_player_death, tick_death_screen_delay)
                    .chain()
                    .in_set(GameplaySet::Resolve),
            )
            .add_systems(Update, respawn_player);
    }
}
