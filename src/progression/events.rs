//! Events linking save points, barriers and keys.

use bevy::prelude::*;

/// Arm a barrier.
#[derive(Event, Debug, Clone)]
pub struct LockBarrier {
    pub barrier: Entity,
    /// Enemies to defeat when the barrier does not search for them itself
    pub enemies: Vec<Entity>,
    /// Shown with the enemy count once a defeat-enemies barrier is armed
    pub announcement: Option<String>,
}

/// A key was picked up.
#[derive(Event, Debug, Clone)]
pub struct KeyCollected {
    pub key: Entity,
    pub key_name: String,
    pub barrier: Option<Entity>,
}

/// A barrier stopped containing the player.
#[derive(Event, Debug, Clone, Copy)]
pub struct BarrierUnlocked(pub Entity);

/// Make a hidden key appear.
#[derive(Event, Debug, Clone, Copy)]
pub struct RevealKey(pub Entity);

/// Re-arm a save point and release its barrier.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetSavePoint(pub Entity);
