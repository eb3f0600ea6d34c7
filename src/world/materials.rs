//! Shared materials for the forest and its interactables.

use bevy::prelude::*;

/// Material handles reused across every spawned piece of the level.
pub struct MaterialRegistry {
    pub grass: Handle<StandardMaterial>,
    pub bark: Handle<StandardMaterial>,
    pub leaves: Handle<StandardMaterial>,
    pub rock: Handle<StandardMaterial>,
    /// Translucent shell of an active barrier
    pub barrier: Handle<StandardMaterial>,
    pub pedestal: Handle<StandardMaterial>,
    pub save_glow: Handle<StandardMaterial>,
    pub key: Handle<StandardMaterial>,
}

impl MaterialRegistry {
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            // Muted moss green
            grass: materials.add(StandardMaterial {
                base_color: Color::srgb(0.22, 0.32, 0.18),
                perceptual_roughness: 0.95,
                ..default()
            }),
            bark: materials.add(StandardMaterial {
                base_color: Color::srgb(0.30, 0.22, 0.15),
                perceptual_roughness: 0.9,
                ..default()
            }),
            leaves: materials.add(StandardMaterial {
                base_color: Color::srgb(0.16, 0.36, 0.17),
                perceptual_roughness: 0.8,
                ..default()
            }),
            rock: materials.add(StandardMaterial {
                base_color: Color::srgb(0.40, 0.39, 0.37),
                perceptual_roughness: 0.85,
                ..default()
            }),
            barrier: materials.add(StandardMaterial {
                base_color: Color::srgba(0.45, 0.3, 0.9, 0.18),
                emissive: LinearRgba::new(0.25, 0.1, 0.6, 1.0),
                alpha_mode: AlphaMode::Blend,
                cull_mode: None,
                unlit: true,
                ..default()
            }),
            pedestal: materials.add(StandardMaterial {
                base_color: Color::srgb(0.42, 0.40, 0.38),
                perceptual_roughness: 0.7,
                ..default()
            }),
            save_glow: materials.add(StandardMaterial {
                base_color: Color::srgba(0.4, 0.8, 1.0, 0.6),
                emissive: LinearRgba::new(0.6, 1.6, 2.4, 1.0),
                alpha_mode: AlphaMode::Blend,
                ..default()
            }),
            // Gold
            key: materials.add(StandardMaterial {
                base_color: Color::srgb(0.95, 0.75, 0.25),
                metallic: 0.9,
                perceptual_roughness: 0.3,
                emissive: LinearRgba::new(0.4, 0.3, 0.05, 1.0),
                ..default()
            }),
        }
    }
}
