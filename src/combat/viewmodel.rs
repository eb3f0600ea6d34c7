//! Grimoire viewmodel - the book held in front of the camera.
//!
//! The viewmodel is spawned as a child of the player's camera so it moves
//! with the view without any per-frame position tracking.

use bevy::prelude::*;

use super::components::*;
use crate::player::{Player, PlayerCamera};

/// Resting offset of the book, local to the camera.
const REST_OFFSET: Vec3 = Vec3::new(0.3, -0.25, -0.55);

/// Spawn the grimoire model under a newly created player camera.
pub fn attach_grimoire_viewmodel(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera_query: Query<Entity, Added<PlayerCamera>>,
) {
    for camera in camera_query.iter() {
        let cover = materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.08, 0.1),
            perceptual_roughness: 0.8,
            ..default()
        });
        let pages = materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.85, 0.7),
            ..default()
        });

        commands.entity(camera).with_children(|parent| {
            parent
                .spawn((
                    Name::new("Grimoire"),
                    GrimoireViewmodel,
                    Transform::from_translation(REST_OFFSET)
                        .with_rotation(Quat::from_euler(EulerRot::XYZ, -0.4, -0.3, 0.0)),
                    Visibility::Hidden,
                ))
                .with_children(|book| {
                    book.spawn((
                        Mesh3d(meshes.add(Cuboid::new(0.22, 0.04, 0.3))),
                        MeshMaterial3d(cover),
                    ));
                    book.spawn((
                        Mesh3d(meshes.add(Cuboid::new(0.2, 0.045, 0.28))),
                        MeshMaterial3d(pages),
                        Transform::from_xyz(0.0, 0.005, 0.0),
                    ));
                });
        });
    }
}

/// Show the book only while the grimoire is equipped.
pub fn sync_viewmodel_visibility(
    loadout_query: Query<&WeaponLoadout, (With<Player>, Changed<WeaponLoadout>)>,
    mut viewmodel_query: Query<&mut Visibility, With<GrimoireViewmodel>>,
) {
    let Ok(loadout) = loadout_query.get_single() else {
        return;
    };

    let visibility = match loadout.current {
        WeaponSlot::Grimoire => Visibility::Inherited,
        WeaponSlot::Hands => Visibility::Hidden,
    };
    for mut current in viewmodel_query.iter_mut() {
        current.set_if_neq(visibility);
    }
}

/// Gentle idle sway, with a short kick right after a cast.
pub fn animate_viewmodel(
    time: Res<Time>,
    grimoire_query: Query<&Grimoire, With<Player>>,
    mut viewmodel_query: Query<&mut Transform, With<GrimoireViewmodel>>,
) {
    let Ok(mut transform) = viewmodel_query.get_single_mut() else {
        return;
    };

    let now = time.elapsed_secs();
    let kick = grimoire_query
        .get_single()
        .ok()
        .and_then(|grimoire| grimoire.last_cast)
        .map_or(0.0, |last| (1.0 - (now - last) / 0.15).clamp(0.0, 1.0));

    let bob = (now * 2.0).sin() * 0.006;
    let sway = (now * 1.5).cos() * 0.004;
    transform.translation = REST_OFFSET + Vec3::new(sway, bob, -0.12 * kick);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_is_hidden_with_bare_hands() {
        let mut app = App::new();
        app.add_systems(Update, sync_viewmodel_visibility);

        let player = app
            .world_mut()
            .spawn((Player, WeaponLoadout::new(WeaponSlot::Grimoire, 0.2)))
            .id();
        let book = app
            .world_mut()
            .spawn((GrimoireViewmodel, Visibility::Hidden))
            .id();

        app.update();
        assert_eq!(*app.world().get::<Visibility>(book).unwrap(), Visibility::Inherited);

        app.world_mut()
            .get_mut::<WeaponLoadout>(player)
            .unwrap()
            .current = WeaponSlot::Hands;
        app.update();
        assert_eq!(*app.world().get::<Visibility>(book).unwrap(), Visibility::Hidden);
    }
}
