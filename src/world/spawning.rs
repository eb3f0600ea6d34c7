//! Entity spawning functions for level construction.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::builder::LevelEntity;
use super::data::{BarrierDef, EnemySpawnDef, KeyDef, LocationDef, SavePointDef, UnlockDef};
use super::materials::MaterialRegistry;
use crate::combat::Health;
use crate::enemies::{AiState, Dormant, Enemy, EnemyKind, EnemyMemory, EnemyRegistry};
use crate::progression::{ActivationEffect, Barrier, BarrierVisual, KeyItem, SavePoint, UnlockCondition};

/// Spawn a point light.
pub fn spawn_light(commands: &mut Commands, position: Vec3, intensity: f32, color: Color, range: f32) {
    commands.spawn((
        PointLight {
            color,
            intensity,
            range,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(position),
        LevelEntity,
    ));
}

/// Spawn one enemy, dormant and hidden unless the level says otherwise.
pub fn spawn_enemy(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    enemy_registry: &EnemyRegistry,
    spawn: &EnemySpawnDef,
) -> Option<Entity> {
    let Some(definition) = enemy_registry.get(&spawn.kind) else {
        warn!("Unknown enemy kind in level: {}", spawn.kind);
        return None;
    };

    let collider = &definition.collider;
    // Stand the capsule on the ground
    let height = (collider.half_height + collider.radius) * definition.scale;
    let (x, z) = spawn.position;
    let (r, g, b) = definition.color;

    let mut enemy = commands.spawn((
        Enemy,
        Name::new(definition.name.clone()),
        EnemyKind(spawn.kind.clone()),
        AiState::default(),
        EnemyMemory::default(),
        definition.stats.clone(),
        Mesh3d(meshes.add(Capsule3d::new(collider.radius, collider.half_height * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(x, height, z).with_scale(Vec3::splat(definition.scale)),
        Collider::capsule_y(collider.half_height, collider.radius),
        RigidBody::KinematicPositionBased,
        LevelEntity,
    ));

    if let Some(max_health) = definition.stats.max_health {
        enemy.insert(Health::new(max_health));
    }
    if spawn.dormant {
        enemy.insert((Dormant, ColliderDisabled, Visibility::Hidden));
    } else {
        enemy.insert(Visibility::Inherited);
    }

    info!("Spawned {} at ({}, {})", definition.name, x, z);
    Some(enemy.id())
}

/// Spawn a key, hidden until its save point reveals it.
pub fn spawn_key(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    key: &KeyDef,
    barrier: Entity,
) -> Entity {
    let (x, y, z) = key.position;
    let mut item = KeyItem::new(key.name.clone(), Some(barrier), y);
    if !key.bob {
        item.bob = None;
    }
    let visibility = if key.start_visible {
        item.spawn();
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    commands
        .spawn((
            Name::new(key.name.clone()),
            item,
            Transform::from_xyz(x, y, z),
            visibility,
            LevelEntity,
        ))
        .with_children(|parent| {
            // Bow and shaft
            parent.spawn((
                Mesh3d(meshes.add(Torus::new(0.1, 0.2))),
                MeshMaterial3d(mat_registry.key.clone()),
                Transform::from_xyz(0.0, 0.3, 0.0)
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            ));
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.08, 0.5, 0.08))),
                MeshMaterial3d(mat_registry.key.clone()),
                Transform::default(),
            ));
        })
        .id()
}

fn unlock_condition(def: &UnlockDef) -> UnlockCondition {
    match *def {
        UnlockDef::SingleKey => UnlockCondition::SingleKey,
        UnlockDef::MultiKey { required } => UnlockCondition::MultiKey {
            required,
            collected: 0,
        },
        UnlockDef::DefeatEnemies { auto_find } => UnlockCondition::DefeatEnemies {
            tracked: Vec::new(),
            initial: 0,
            auto_find,
        },
    }
}

/// Spawn an inactive barrier with its translucent shell.
pub fn spawn_barrier(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    location: &LocationDef,
) -> Entity {
    let def: &BarrierDef = &location.barrier;
    let mut barrier = Barrier::new(
        format!("{} Barrier", location.name),
        def.radius,
        def.edge_buffer,
        unlock_condition(&def.unlock),
    );
    if let Some(message) = &def.blocked_message {
        barrier = barrier.with_blocked_message(message.clone());
    }

    let (x, z) = location.center;
    commands
        .spawn((
            Name::new(barrier.name.clone()),
            barrier,
            Transform::from_xyz(x, 0.0, z).with_scale(Vec3::splat(def.scale)),
            Visibility::default(),
            LevelEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                BarrierVisual,
                Mesh3d(meshes.add(Sphere::new(def.radius))),
                MeshMaterial3d(mat_registry.barrier.clone()),
                Transform::default(),
                Visibility::Hidden,
            ));
        })
        .id()
}

/// Spawn a save point wired to its location's barrier, keys and enemies.
pub fn spawn_save_point(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    location: &LocationDef,
    barrier: Entity,
    keys: Vec<Entity>,
    enemies: Vec<Entity>,
) -> Entity {
    let def: &SavePointDef = &location.save_point;
    let mut save_point = SavePoint::new(location.name.clone());
    save_point.trigger_radius = def.trigger_radius;
    save_point.barrier = Some(barrier);
    save_point.keys = keys;
    save_point.enemies = enemies;
    save_point.clue = def.clue.clone();
    save_point.clue_delay = def.clue_delay;
    save_point.announcement = def.announcement.clone();

    let (x, y, z) = def.position;
    commands
        .spawn((
            Name::new(format!("{} Save Point", location.name)),
            save_point,
            Transform::from_xyz(x, y, z).with_rotation(Quat::from_rotation_y(def.yaw.to_radians())),
            Visibility::default(),
            LevelEntity,
        ))
        .with_children(|parent| {
            // Pedestal rests on the ground below the respawn height
            parent.spawn((
                Mesh3d(meshes.add(Cylinder::new(0.6, 0.4))),
                MeshMaterial3d(mat_registry.pedestal.clone()),
                Transform::from_xyz(0.0, 0.2 - y, 0.0),
            ));
            parent.spawn((
                ActivationEffect,
                Mesh3d(meshes.add(Sphere::new(0.35))),
                MeshMaterial3d(mat_registry.save_glow.clone()),
                PointLight {
                    color: Color::srgb(0.5, 0.85, 1.0),
                    intensity: 60_000.0,
                    range: 8.0,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.9 - y, 0.0),
                Visibility::Hidden,
            ));
        })
        .id()
}
