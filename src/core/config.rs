//! Game configuration loaded from an external RON file.
//!
//! Allows tweaking gameplay tunables without recompilation. Every field has
//! a default, so the file only needs to list what it overrides.

use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::read_ron_file;
use super::events::SoundCue;

/// Default location of the config file, relative to the working directory.
pub const GAME_CONFIG_PATH: &str = "assets/data/config/game.ron";

/// First-person controller and player health tunables.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y-axis for mouse look
    pub invert_y: bool,
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Sprint speed multiplier
    pub sprint_multiplier: f32,
    /// Jump velocity
    pub jump_force: f32,
    /// Gravity acceleration
    pub gravity: f32,
    pub max_health: f32,
    /// Seconds between death and the death screen
    pub respawn_delay: f32,
    /// Camera height above the player origin
    pub eye_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
            move_speed: 5.0,
            sprint_multiplier: 1.5,
            jump_force: 6.0,
            gravity: 15.0,
            max_health: 100.0,
            respawn_delay: 2.0,
            eye_height: 0.6,
        }
    }
}

/// Grimoire and fireball tunables.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GrimoireConfig {
    pub fireball_speed: f32,
    pub fireball_damage: f32,
    pub fireball_lifetime: f32,
    /// Radius of the falloff blast; 0 disables area damage
    pub explosion_radius: f32,
    pub shoot_cooldown: f32,
    pub unlimited_ammo: bool,
    pub max_ammo: u32,
    pub start_with_grimoire: bool,
    /// Lockout between weapon switches
    pub switch_delay: f32,
}

impl Default for GrimoireConfig {
    fn default() -> Self {
        Self {
            fireball_speed: 20.0,
            fireball_damage: 34.0,
            fireball_lifetime: 5.0,
            explosion_radius: 0.0,
            shoot_cooldown: 0.5,
            unlimited_ammo: true,
            max_ammo: 50,
            start_with_grimoire: false,
            switch_delay: 0.2,
        }
    }
}

/// Timings and text for the menus and cutscene.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    pub intro_card_text: String,
    pub intro_card_duration: f32,
    pub intro_dialogue: String,
    pub dialogue_duration: f32,
    pub death_fade_duration: f32,
    pub clue_display_time: f32,
    /// Step applied by the volume panel's -/+ buttons
    pub volume_step: f32,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            intro_card_text: "Somewhere in the old woods, a cat has wandered off...".to_string(),
            intro_card_duration: 6.0,
            intro_dialogue: "I've got to find my cat. These woods cannot be safe for him. I've got to hurry."
                .to_string(),
            dialogue_duration: 4.0,
            death_fade_duration: 1.0,
            clue_display_time: 5.0,
            volume_step: 0.1,
        }
    }
}

/// Clip paths for sound cues and music.
#[derive(Resource, Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sounds: HashMap<SoundCue, String>,
    pub menu_music: Option<String>,
    pub gameplay_music: Option<String>,
}

/// Whole config file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub grimoire: GrimoireConfig,
    pub interface: InterfaceConfig,
    pub audio: AudioConfig,
}

impl GameConfig {
    /// Load the config file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match read_ron_file(path) {
            Ok(config) => {
                info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}. Using default game config.", e);
                Self::default()
            }
        }
    }

    /// Insert each section as its own resource.
    pub fn insert_into(self, commands: &mut Commands) {
        commands.insert_resource(self.player);
        commands.insert_resource(self.grimoire);
        commands.insert_resource(self.interface);
        commands.insert_resource(self.audio);
    }
}

/// System to load the game config at startup.
pub fn load_game_config(mut commands: Commands) {
    GameConfig::load(Path::new(GAME_CONFIG_PATH)).insert_into(&mut commands);
}
