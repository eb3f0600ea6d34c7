//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::components::EnemyStats;
use crate::core::{parse_ron, read_ron_file, DataLoadError};

/// Directory holding one `<kind>.ron` per enemy kind.
pub const ENEMIES_DIR: &str = "assets/data/enemies";

/// Definitions compiled into the binary, used when the directory is missing.
const EMBEDDED_DEFINITIONS: &[(&str, &str)] = &[
    ("bear", include_str!("../../assets/data/enemies/bear.ron")),
    ("goblin", include_str!("../../assets/data/enemies/goblin.ron")),
];

/// Collider configuration for an enemy kind.
#[derive(Deserialize, Clone, Debug)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.5,
            radius: 0.4,
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub stats: EnemyStats,
    /// Placeholder body color (linear RGB)
    #[serde(default = "default_color")]
    pub color: (f32, f32, f32),
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub collider: ColliderConfig,
}

fn default_color() -> (f32, f32, f32) {
    (0.4, 0.3, 0.2)
}

fn default_scale() -> f32 {
    1.0
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by kind name.
    pub fn get(&self, kind: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Registry built from the definitions shipped in the binary.
    pub fn embedded() -> Self {
        let mut registry = Self::default();
        for (kind, contents) in EMBEDDED_DEFINITIONS {
            match parse_ron::<EnemyDefinition>(contents, kind) {
                Ok(definition) => {
                    registry.definitions.insert(kind.to_string(), definition);
                }
                Err(e) => error!("{}", e),
            }
        }
        registry
    }

    /// Read every `.ron` file in `dir`. Files that fail to parse are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, DataLoadError> {
        let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
            path: dir.display().to_string(),
            details: e.to_string(),
        })?;

        let mut registry = Self::default();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(kind) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            match read_ron_file::<EnemyDefinition>(&path) {
                Ok(definition) => {
                    info!("Loaded enemy definition: {} ({})", definition.name, kind);
                    registry.definitions.insert(kind, definition);
                }
                Err(e) => error!("{}", e),
            }
        }
        Ok(registry)
    }
}

/// Load all enemy definitions, falling back to the embedded set.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let dir = Path::new(ENEMIES_DIR);

    *registry = match EnemyRegistry::load_dir(dir) {
        Ok(loaded) if !loaded.definitions.is_empty() => loaded,
        Ok(_) => {
            warn!("No enemy definitions in {:?}, using embedded set", dir);
            EnemyRegistry::embedded()
        }
        Err(e) => {
            warn!("{}. Using embedded enemy definitions.", e);
            EnemyRegistry::embedded()
        }
    };

    info!("Loaded {} enemy definitions", registry.definitions.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_definitions_parse() {
        let registry = EnemyRegistry::embedded();

        let bear = registry.get("bear").expect("bear definition");
        assert_eq!(bear.stats.run_speed, 5.0);
        assert_eq!(bear.stats.chase_range, 15.0);
        assert_eq!(bear.stats.recover_delay, 1.0);
        assert!(bear.stats.detection_cue);

        let goblin = registry.get("goblin").expect("goblin definition");
        assert_eq!(goblin.stats.damage, 50.0);
        assert_eq!(goblin.stats.attack_cooldown, 2.5);
        assert_eq!(goblin.stats.recover_delay, 1.5);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = EnemyRegistry::load_dir(Path::new("does/not/exist"));
        assert!(matches!(result, Err(DataLoadError::ReadError { .. })));
    }
}
