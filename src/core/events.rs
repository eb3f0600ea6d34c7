//! Global events used for cross-system communication.
//!
//! Events replace direct object lookups: the combat system sends
//! `DamageEvent`s, the health systems apply them; any system can send a
//! `ShowMessage` and the message panel picks it up.

use bevy::prelude::*;
use serde::Deserialize;

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage, if any
    pub source: Option<Entity>,
    /// Damage amount
    pub amount: f32,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// Request to show a line of text on the message panel.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ShowMessage {
    pub text: String,
    /// Seconds the message stays on screen
    pub duration: f32,
}

impl ShowMessage {
    pub fn new(text: impl Into<String>, duration: f32) -> Self {
        Self {
            text: text.into(),
            duration,
        }
    }
}

/// One-shot sound effects. The audio plugin maps each cue to a clip path
/// from the game config; cues without a clip are silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SoundCue {
    PlayerHurt,
    PlayerDeath,
    EnemyHit,
    EnemyDeath,
    EnemyDetect,
    EnemyAttack,
    KeySpawn,
    KeyCollect,
    SavePoint,
    FireballCast,
    FireballImpact,
    PageFlip,
    Equip,
    Unequip,
    ButtonClick,
}

/// Play a one-shot sound effect.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySound(pub SoundCue);

/// Sent when the player should be brought back at the last spawn point.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RespawnRequested;
