//! Level data structures and RON loading.
//!
//! A level is open ground with scenery and a list of locations. Each
//! location bundles one barrier, the save point that arms it, and the keys
//! or enemies that open it again.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::{parse_ron, read_ron_file, DataLoadError};
use crate::enemies::EnemyRegistry;

/// Default level file, relative to the working directory.
pub const LEVEL_PATH: &str = "assets/data/levels/forest.ron";

/// Level compiled into the binary, used when the file is missing or broken.
const EMBEDDED_LEVEL: &str = include_str!("../../assets/data/levels/forest.ron");

fn default_one() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub enum SceneryKind {
    Tree,
    Rock,
}

/// A tree or rock. Both block movement and fireballs.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneryDef {
    pub kind: SceneryKind,
    pub position: (f32, f32),
    #[serde(default = "default_one")]
    pub scale: f32,
}

/// How a barrier opens, as written in the level file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub enum UnlockDef {
    SingleKey,
    MultiKey { required: u32 },
    DefeatEnemies {
        #[serde(default = "default_true")]
        auto_find: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct BarrierDef {
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_edge_buffer")]
    pub edge_buffer: f32,
    #[serde(default = "default_one")]
    pub scale: f32,
    pub unlock: UnlockDef,
    /// Overrides the default edge message
    #[serde(default)]
    pub blocked_message: Option<String>,
}

fn default_radius() -> f32 {
    30.0
}

fn default_edge_buffer() -> f32 {
    3.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavePointDef {
    pub position: (f32, f32, f32),
    /// Facing on respawn, in degrees
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_trigger_radius")]
    pub trigger_radius: f32,
    #[serde(default)]
    pub clue: Option<String>,
    #[serde(default = "default_clue_delay")]
    pub clue_delay: f32,
    #[serde(default)]
    pub announcement: Option<String>,
}

fn default_trigger_radius() -> f32 {
    2.0
}

fn default_clue_delay() -> f32 {
    2.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyDef {
    pub name: String,
    pub position: (f32, f32, f32),
    #[serde(default)]
    pub start_visible: bool,
    #[serde(default = "default_true")]
    pub bob: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemySpawnDef {
    /// Enemy definition file stem, e.g. "bear"
    pub kind: String,
    pub position: (f32, f32),
    /// Hidden until the location's save point is reached
    #[serde(default = "default_true")]
    pub dormant: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationDef {
    pub name: String,
    /// Barrier center on the ground
    pub center: (f32, f32),
    pub barrier: BarrierDef,
    pub save_point: SavePointDef,
    #[serde(default)]
    pub keys: Vec<KeyDef>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawnDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    /// Side length of the square ground plane
    pub ground_size: f32,
    pub player_start: (f32, f32, f32),
    /// Starting facing, in degrees
    #[serde(default)]
    pub player_yaw: f32,
    #[serde(default = "default_ambient")]
    pub ambient_brightness: f32,
    #[serde(default)]
    pub scenery: Vec<SceneryDef>,
    pub locations: Vec<LocationDef>,
}

fn default_ambient() -> f32 {
    300.0
}

impl LevelDefinition {
    /// Load a level file.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        read_ron_file(path)
    }

    /// The level shipped in the binary.
    pub fn embedded() -> Result<Self, DataLoadError> {
        parse_ron(EMBEDDED_LEVEL, "embedded level")
    }

    /// Check that every location can actually be completed.
    pub fn validate(&self, enemies: &EnemyRegistry) -> Result<(), DataLoadError> {
        for location in &self.locations {
            let barrier = &location.barrier;
            if barrier.radius * barrier.scale - barrier.edge_buffer <= 1.0 {
                return Err(DataLoadError::DegenerateBarrier {
                    location: location.name.clone(),
                    radius: barrier.radius * barrier.scale,
                    edge_buffer: barrier.edge_buffer,
                });
            }

            if let UnlockDef::MultiKey { required } = barrier.unlock {
                if (required as usize) > location.keys.len() {
                    return Err(DataLoadError::NotEnoughKeys {
                        location: location.name.clone(),
                        required,
                        available: location.keys.len(),
                    });
                }
            }

            if let Some(unknown) = location.enemies.iter().find(|e| !enemies.contains(&e.kind)) {
                return Err(DataLoadError::UnknownEnemyKind {
                    location: location.name.clone(),
                    kind: unknown.kind.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The level being played.
#[derive(Resource, Debug, Clone)]
pub struct CurrentLevel(pub LevelDefinition);

/// Read the level file, falling back to the embedded copy.
pub fn load_level(mut commands: Commands) {
    let path = Path::new(LEVEL_PATH);
    let level = match LevelDefinition::load(path) {
        Ok(level) => {
            info!("Loaded level: {}", level.name);
            Some(level)
        }
        Err(e) => {
            warn!("{}. Using embedded level.", e);
            LevelDefinition::embedded()
                .map_err(|e| error!("{}", e))
                .ok()
        }
    };

    match level {
        Some(level) => commands.insert_resource(CurrentLevel(level)),
        None => error!("No level available, the world will be empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_level_is_valid() {
        let level = LevelDefinition::embedded().unwrap();
        assert_eq!(level.locations.len(), 3);
        level.validate(&EnemyRegistry::embedded()).unwrap();
    }

    #[test]
    fn embedded_level_covers_every_barrier_kind() {
        let level = LevelDefinition::embedded().unwrap();
        let unlocks: Vec<_> = level.locations.iter().map(|l| l.barrier.unlock.clone()).collect();
        assert!(unlocks.contains(&UnlockDef::SingleKey));
        assert!(unlocks.contains(&UnlockDef::MultiKey { required: 2 }));
        assert!(unlocks
            .iter()
            .any(|unlock| matches!(unlock, UnlockDef::DefeatEnemies { .. })));
    }

    fn one_location(unlock: &str, keys: &str, enemies: &str) -> LevelDefinition {
        let source = format!(
            r#"(
                name: "test",
                ground_size: 100.0,
                player_start: (0.0, 1.0, 0.0),
                locations: [(
                    name: "Clearing",
                    center: (0.0, 0.0),
                    barrier: (unlock: {unlock}),
                    save_point: (position: (0.0, 1.0, 0.0)),
                    keys: [{keys}],
                    enemies: [{enemies}],
                )],
            )"#
        );
        parse_ron(&source, "inline").unwrap()
    }

    #[test]
    fn multi_key_barrier_needs_enough_keys() {
        let level = one_location(
            "MultiKey(required: 2)",
            r#"(name: "Oak Key", position: (1.0, 1.0, 1.0))"#,
            "",
        );
        let err = level.validate(&EnemyRegistry::embedded()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::NotEnoughKeys {
                required: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn unknown_enemy_kind_is_rejected() {
        let level = one_location(
            "DefeatEnemies(auto_find: false)",
            "",
            r#"(kind: "dragon", position: (3.0, 3.0))"#,
        );
        let err = level.validate(&EnemyRegistry::embedded()).unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownEnemyKind { .. }));
    }

    #[test]
    fn barrier_defaults_match_the_forest_layout() {
        let level = one_location("SingleKey", "", "");
        let barrier = &level.locations[0].barrier;
        assert_eq!(barrier.radius, 30.0);
        assert_eq!(barrier.edge_buffer, 3.0);
        assert_eq!(barrier.scale, 1.0);
        assert!(level.locations[0].save_point.clue.is_none());
    }
}
