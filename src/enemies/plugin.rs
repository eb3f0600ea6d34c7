//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::data::{load_enemy_definitions, EnemyRegistry};
use crate::core::GameplaySet;

/// Enemy plugin - handles enemy definitions, AI and death.
///
/// Enemies themselves are spawned by the world builder from the level file.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            // Definitions must be ready before the world builder runs
            .add_systems(Startup, load_enemy_definitions)
            .add_systems(
                Update,
                (ai::tick_kill_locks, ai::ai_decide, ai::ai_chase, ai::ai_attack)
                    .chain()
                    .in_set(GameplaySet::Ai),
            )
            .add_systems(
                Update,
                (ai::apply_kill_locks, ai::handle_enemy_death).in_set(GameplaySet::Resolve),
            );
    }
}
