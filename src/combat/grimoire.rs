//! Casting fireballs from the grimoire.

use bevy::prelude::*;

use super::components::*;
use crate::core::{DespawnAfter, GrimoireConfig, PlaySound, SoundCue};
use crate::player::{Player, PlayerCamera};

/// Shared mesh and material for fireballs.
#[derive(Resource)]
pub struct FireballAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Build the fireball mesh and glowing material once.
pub fn setup_fireball_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(FireballAssets {
        mesh: meshes.add(Sphere::new(0.25)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.45, 0.1),
            emissive: LinearRgba::rgb(12.0, 4.0, 0.5),
            unlit: true,
            ..default()
        }),
    });
}

/// Give a freshly spawned player their grimoire and weapon loadout.
pub fn equip_player(
    mut commands: Commands,
    config: Res<GrimoireConfig>,
    players: Query<Entity, Added<Player>>,
) {
    for player in players.iter() {
        let start = if config.start_with_grimoire {
            WeaponSlot::Grimoire
        } else {
            WeaponSlot::Hands
        };
        commands.entity(player).insert((
            Grimoire::from_config(&config),
            WeaponLoadout::new(start, config.switch_delay),
        ));
    }
}

/// True while the pointer hovers or presses any UI button.
fn pointer_over_ui(buttons: &Query<&Interaction, With<Button>>) -> bool {
    buttons
        .iter()
        .any(|interaction| *interaction != Interaction::None)
}

/// Left click casts a fireball from just in front of the camera.
pub fn cast_fireball(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    config: Res<GrimoireConfig>,
    assets: Option<Res<FireballAssets>>,
    mut player_query: Query<(Entity, &WeaponLoadout, &mut Grimoire), (With<Player>, Without<Dead>)>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    buttons: Query<&Interaction, With<Button>>,
    mut sounds: EventWriter<PlaySound>,
) {
    if !mouse.just_pressed(MouseButton::Left) || pointer_over_ui(&buttons) {
        return;
    }

    let Ok((player, loadout, mut grimoire)) = player_query.get_single_mut() else {
        return;
    };
    if loadout.current != WeaponSlot::Grimoire {
        return;
    }
    let Ok(camera) = camera_query.get_single() else {
        warn!("Grimoire has no camera to aim with");
        return;
    };

    if !grimoire.try_cast(time.elapsed_secs()) {
        return;
    }

    let direction = camera.forward().as_vec3();
    let origin = camera.translation() + direction;

    let mut fireball = commands.spawn((
        Name::new("Fireball"),
        Fireball {
            direction,
            speed: config.fireball_speed,
            damage: config.fireball_damage,
            explosion_radius: config.explosion_radius,
            owner: player,
            hit: false,
        },
        Transform::from_translation(origin).looking_to(direction, Vec3::Y),
        Visibility::default(),
        DespawnAfter::seconds(config.fireball_lifetime),
    ));
    if let Some(assets) = assets {
        fireball.insert((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material.clone()),
        ));
        fireball.with_children(|parent| {
            parent.spawn(PointLight {
                color: Color::srgb(1.0, 0.5, 0.2),
                intensity: 20000.0,
                range: 6.0,
                shadows_enabled: false,
                ..default()
            });
        });
    }

    debug!("Fireball cast toward {}", direction);
    sounds.send(PlaySound(SoundCue::FireballCast));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_app(slot: WeaponSlot) -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(GrimoireConfig::default())
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<PlaySound>()
            .add_systems(Update, cast_fireball);

        let player = app
            .world_mut()
            .spawn((
                Player,
                Grimoire::from_config(&GrimoireConfig::default()),
                WeaponLoadout::new(slot, 0.2),
                Transform::default(),
            ))
            .id();
        app.world_mut().spawn((
            PlayerCamera::default(),
            GlobalTransform::from(Transform::from_xyz(0.0, 1.6, 0.0)),
        ));
        (app, player)
    }

    fn click(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        mouse.release(MouseButton::Left);
        mouse.clear();
        mouse.press(MouseButton::Left);
        app.update();
    }

    fn fireballs(app: &mut App) -> Vec<Fireball> {
        app.world_mut()
            .query::<&Fireball>()
            .iter(app.world())
            .cloned()
            .collect()
    }

    #[test]
    fn cast_spawns_fireball_in_front_of_camera() {
        let (mut app, player) = test_app(WeaponSlot::Grimoire);
        click(&mut app, 0.0);

        let spawned = fireballs(&mut app);
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].owner, player);
        assert_eq!(spawned[0].direction, Vec3::NEG_Z);

        let mut query = app.world_mut().query_filtered::<&Transform, With<Fireball>>();
        let transform = query.single(app.world());
        assert!((transform.translation - Vec3::new(0.0, 1.6, -1.0)).length() < 1e-4);
    }

    #[test]
    fn cooldown_limits_cast_rate() {
        let (mut app, _) = test_app(WeaponSlot::Grimoire);
        click(&mut app, 1.0);
        click(&mut app, 0.1);
        assert_eq!(fireballs(&mut app).len(), 1);

        click(&mut app, 0.5);
        assert_eq!(fireballs(&mut app).len(), 2);
    }

    #[test]
    fn bare_hands_cannot_cast() {
        let (mut app, _) = test_app(WeaponSlot::Hands);
        click(&mut app, 1.0);
        assert!(fireballs(&mut app).is_empty());
    }

    #[test]
    fn dead_player_cannot_cast() {
        let (mut app, player) = test_app(WeaponSlot::Grimoire);
        app.world_mut().entity_mut(player).insert(Dead);
        click(&mut app, 1.0);
        assert!(fireballs(&mut app).is_empty());
    }
}
