//! Player-related components and resources.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Tracks player movement state for physics.
#[derive(Component)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            is_grounded: true,
            vertical_velocity: 0.0,
        }
    }
}

/// Where the player comes back after dying. Save points overwrite it.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

impl SpawnPoint {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn set(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
        info!("Spawn point updated to: {}", position);
    }
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY)
    }
}

/// Counts down from death to the death screen.
#[derive(Component)]
pub struct DeathScreenDelay(pub Timer);
