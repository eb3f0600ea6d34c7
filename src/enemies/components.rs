//! Enemy-related components.

use bevy::prelude::*;
use serde::Deserialize;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy kind identifier (matches RON file name).
#[derive(Component, Clone, Debug, PartialEq)]
pub struct EnemyKind(pub String);

/// AI state machine for enemy behavior.
#[derive(Component, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiState {
    /// Standing still, waiting for the player to come within chase range.
    #[default]
    Idle,
    /// Running toward the player.
    Chasing,
    /// Mid attack; movement is suspended until the attack releases.
    Attacking,
}

/// Enemy stats loaded from RON data files.
#[derive(Component, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    /// `None` means the enemy has no health pool and dies to any fireball hit
    pub max_health: Option<f32>,
    pub run_speed: f32,
    pub chase_range: f32,
    pub attack_range: f32,
    pub damage: f32,
    pub attack_cooldown: f32,
    /// Seconds from attack start until the hit lands
    pub hit_delay: f32,
    /// Seconds from attack start until the enemy may act again
    pub recover_delay: f32,
    /// Seconds the enemy ignores the player after killing them
    pub kill_lock: f32,
    /// Play a cue the first time the player enters chase range
    pub detection_cue: bool,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: Some(100.0),
            run_speed: 5.0,
            chase_range: 15.0,
            attack_range: 2.5,
            damage: 10.0,
            attack_cooldown: 2.0,
            hit_delay: 0.5,
            recover_delay: 1.0,
            kill_lock: 3.0,
            detection_cue: false,
        }
    }
}

/// Per-enemy bookkeeping that outlives a single attack.
#[derive(Component, Default, Debug)]
pub struct EnemyMemory {
    /// Elapsed-time stamp of the last attack start
    pub last_attack: Option<f32>,
    /// Player has been inside chase range since the last time they left it
    pub detected_player: bool,
}

impl EnemyMemory {
    pub fn attack_ready(&self, now: f32, cooldown: f32) -> bool {
        self.last_attack.map_or(true, |last| now >= last + cooldown)
    }
}

/// A running attack: the hit lands when `hit` finishes, the enemy is
/// released when `recover` finishes.
#[derive(Component, Debug)]
pub struct AttackSequence {
    pub hit: Timer,
    pub recover: Timer,
    pub hit_resolved: bool,
}

impl AttackSequence {
    pub fn new(stats: &EnemyStats) -> Self {
        Self {
            hit: Timer::from_seconds(stats.hit_delay.max(0.0), TimerMode::Once),
            recover: Timer::from_seconds(stats.recover_delay.max(0.0), TimerMode::Once),
            hit_resolved: false,
        }
    }
}

/// Enemy ignores the player until this runs out. Added after it kills them.
#[derive(Component)]
pub struct KillLock(pub Timer);

/// Hidden and inert until a save point reveals it.
#[derive(Component)]
pub struct Dormant;
