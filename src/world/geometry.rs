//! Ground and scenery spawning.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::builder::LevelEntity;
use super::data::{SceneryDef, SceneryKind};
use super::materials::MaterialRegistry;

/// Thickness of the ground slab below y = 0.
const GROUND_DEPTH: f32 = 1.0;

/// Spawn the square ground slab. Its top face sits at y = 0.
pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    size: f32,
) {
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Cuboid::new(size, GROUND_DEPTH, size))),
        MeshMaterial3d(mat_registry.grass.clone()),
        Transform::from_xyz(0.0, -GROUND_DEPTH / 2.0, 0.0),
        Collider::cuboid(size / 2.0, GROUND_DEPTH / 2.0, size / 2.0),
        LevelEntity,
    ));
}

/// Spawn a tree or a rock.
pub fn spawn_scenery(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    scenery: &SceneryDef,
) {
    let (x, z) = scenery.position;
    let scale = scenery.scale.max(0.1);

    match scenery.kind {
        SceneryKind::Tree => {
            let trunk_height = 4.0 * scale;
            let trunk_radius = 0.3 * scale;
            commands
                .spawn((
                    Name::new("Tree"),
                    Mesh3d(meshes.add(Cylinder::new(trunk_radius, trunk_height))),
                    MeshMaterial3d(mat_registry.bark.clone()),
                    Transform::from_xyz(x, trunk_height / 2.0, z),
                    Collider::cylinder(trunk_height / 2.0, trunk_radius),
                    LevelEntity,
                ))
                .with_children(|parent| {
                    // Canopy is decoration only
                    parent.spawn((
                        Mesh3d(meshes.add(Sphere::new(1.8 * scale))),
                        MeshMaterial3d(mat_registry.leaves.clone()),
                        Transform::from_xyz(0.0, trunk_height / 2.0 + scale, 0.0),
                    ));
                });
        }
        SceneryKind::Rock => {
            let radius = 0.8 * scale;
            commands.spawn((
                Name::new("Rock"),
                Mesh3d(meshes.add(Sphere::new(radius))),
                MeshMaterial3d(mat_registry.rock.clone()),
                Transform::from_xyz(x, radius * 0.4, z).with_scale(Vec3::new(1.2, 0.7, 1.0)),
                Collider::ball(radius),
                NotShadowCaster,
                LevelEntity,
            ));
        }
    }
}
