//! World plugin - level loading and construction.

use bevy::prelude::*;

use crate::core::{GameState, MessageBoard, PlayerConfig};
use crate::enemies::EnemyRegistry;
use crate::player::{spawn_player, Player, SpawnPoint};
use crate::progression::ClueBoard;

use super::builder::{build_level_from_data, LevelEntity};
use super::data::{load_level, CurrentLevel, LevelDefinition};

/// World plugin - loads the level and builds it behind the start screen.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_level).add_systems(
            OnEnter(GameState::StartScreen),
            (cleanup_level, setup_level).chain(),
        );
    }
}

/// Set up the level and the player from data.
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    current_level: Option<Res<CurrentLevel>>,
    enemy_registry: Res<EnemyRegistry>,
    player_config: Res<PlayerConfig>,
) {
    let Some(current_level) = current_level else {
        error!("No level loaded");
        return;
    };

    let level = match current_level.0.validate(&enemy_registry) {
        Ok(()) => current_level.0.clone(),
        Err(e) => {
            error!("Level '{}' is invalid: {}", current_level.0.name, e);
            match LevelDefinition::embedded() {
                Ok(embedded) => embedded,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            }
        }
    };

    info!("Building level: {}", level.name);
    let (start, _) = build_level_from_data(
        &mut commands,
        &mut meshes,
        &mut materials,
        &level,
        &enemy_registry,
    );

    commands.insert_resource(start);
    spawn_player(&mut commands, start, &player_config);
}

/// Tear down a previous run so a restart begins from a fresh level.
fn cleanup_level(
    mut commands: Commands,
    level_query: Query<Entity, With<LevelEntity>>,
    player_query: Query<Entity, With<Player>>,
    mut clue: ResMut<ClueBoard>,
    mut messages: ResMut<MessageBoard>,
) {
    if level_query.is_empty() && player_query.is_empty() {
        return;
    }

    info!("Clearing level for a fresh start");
    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    for entity in player_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    if clue.has_active() {
        clue.clear();
    }
    messages.clear();
}
