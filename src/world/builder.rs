//! Level construction from data definitions.

use bevy::prelude::*;

use super::data::{LevelDefinition, LocationDef};
use super::geometry::{spawn_ground, spawn_scenery};
use super::materials::MaterialRegistry;
use super::spawning::{spawn_barrier, spawn_enemy, spawn_key, spawn_light, spawn_save_point};
use crate::enemies::EnemyRegistry;
use crate::player::SpawnPoint;

/// Marker for everything the level builder spawns, cleared on restart.
#[derive(Component)]
pub struct LevelEntity;

/// Entities spawned for one location.
#[derive(Debug, Clone)]
pub struct BuiltLocation {
    pub barrier: Entity,
    pub save_point: Entity,
    pub keys: Vec<Entity>,
    pub enemies: Vec<Entity>,
}

/// Build a level from a level definition. Returns the player start.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    level: &LevelDefinition,
    enemy_registry: &EnemyRegistry,
) -> (SpawnPoint, Vec<BuiltLocation>) {
    let mat_registry = MaterialRegistry::new(materials);

    setup_environment(commands, level);
    spawn_ground(commands, meshes, &mat_registry, level.ground_size);
    for scenery in &level.scenery {
        spawn_scenery(commands, meshes, &mat_registry, scenery);
    }

    let built = level
        .locations
        .iter()
        .map(|location| {
            build_location(commands, meshes, materials, &mat_registry, location, enemy_registry)
        })
        .collect();

    let (x, y, z) = level.player_start;
    let start = SpawnPoint::new(
        Vec3::new(x, y, z),
        Quat::from_rotation_y(level.player_yaw.to_radians()),
    );
    (start, built)
}

/// Spawn a location's enemies and keys, then the barrier and save point
/// that reference them.
fn build_location(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    mat_registry: &MaterialRegistry,
    location: &LocationDef,
    enemy_registry: &EnemyRegistry,
) -> BuiltLocation {
    let barrier = spawn_barrier(commands, meshes, mat_registry, location);

    let enemies: Vec<Entity> = location
        .enemies
        .iter()
        .filter_map(|spawn| spawn_enemy(commands, meshes, materials, enemy_registry, spawn))
        .collect();

    let keys: Vec<Entity> = location
        .keys
        .iter()
        .map(|key| spawn_key(commands, meshes, mat_registry, key, barrier))
        .collect();

    let save_point = spawn_save_point(
        commands,
        meshes,
        mat_registry,
        location,
        barrier,
        keys.clone(),
        enemies.clone(),
    );

    // Lantern over each save point so they can be found at night
    let (x, _, z) = location.save_point.position;
    spawn_light(commands, Vec3::new(x, 4.0, z), 120_000.0, Color::srgb(1.0, 0.8, 0.55), 14.0);

    info!(
        "Built location '{}': {} key(s), {} enemy(ies)",
        location.name,
        keys.len(),
        enemies.len()
    );

    BuiltLocation {
        barrier,
        save_point,
        keys,
        enemies,
    }
}

/// Set up global ambient light and directional light.
fn setup_environment(commands: &mut Commands, level: &LevelDefinition) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.75, 0.8, 0.9),
        brightness: level.ambient_brightness,
    });

    // Low evening sun through the canopy
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.9, 0.75),
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelEntity,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::Dormant;
    use bevy_rapier3d::prelude::ColliderDisabled;
    use crate::progression::{Barrier, KeyItem, KeyState, SavePoint, UnlockCondition};

    fn build(level: LevelDefinition) -> (App, SpawnPoint, Vec<BuiltLocation>) {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>();

        let world = app.world_mut();
        let registry = EnemyRegistry::embedded();
        let mut result = None;
        world.resource_scope(|world, mut meshes: Mut<Assets<Mesh>>| {
            world.resource_scope(|world, mut materials: Mut<Assets<StandardMaterial>>| {
                let mut commands = world.commands();
                result = Some(build_level_from_data(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &level,
                    &registry,
                ));
            });
        });
        app.world_mut().flush();
        let (start, built) = result.unwrap();
        (app, start, built)
    }

    #[test]
    fn forest_locations_are_wired_together() {
        let level = LevelDefinition::embedded().unwrap();
        let (app, start, built) = build(level);

        assert_eq!(built.len(), 3);
        assert!(start.position.y > 0.0);

        let first = &built[0];
        let save_point = app.world().get::<SavePoint>(first.save_point).unwrap();
        assert_eq!(save_point.barrier, Some(first.barrier));
        assert_eq!(save_point.keys, first.keys);
        assert!(!save_point.activated);

        let barrier = app.world().get::<Barrier>(first.barrier).unwrap();
        assert!(!barrier.active);
        assert_eq!(barrier.unlock, UnlockCondition::SingleKey);

        for key in &first.keys {
            let item = app.world().get::<KeyItem>(*key).unwrap();
            assert_eq!(item.state, KeyState::Hidden);
            assert_eq!(item.barrier, Some(first.barrier));
            assert_eq!(app.world().get::<Visibility>(*key), Some(&Visibility::Hidden));
        }
    }

    #[test]
    fn enemies_start_dormant() {
        let level = LevelDefinition::embedded().unwrap();
        let (app, _, built) = build(level);

        let defeat = built
            .iter()
            .find(|location| !location.enemies.is_empty())
            .unwrap();
        for enemy in &defeat.enemies {
            assert!(app.world().get::<Dormant>(*enemy).is_some());
            assert!(app.world().get::<ColliderDisabled>(*enemy).is_some());
            assert_eq!(app.world().get::<Visibility>(*enemy), Some(&Visibility::Hidden));
        }
    }
}
