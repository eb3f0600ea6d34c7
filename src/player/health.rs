//! Player death and respawn flow.

use bevy::prelude::*;

use super::components::*;
use crate::combat::{Dead, Health};
use crate::core::{DeathEvent, GameState, PlayerConfig, PlaySound, RespawnRequested, SoundCue};

/// Start the death sequence when the player dies.
///
/// Controls stop immediately (movement systems skip `Dead` players); the
/// death screen follows after `respawn_delay`.
pub fn on_player_death(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<Entity, With<Player>>,
    config: Res<PlayerConfig>,
    mut sounds: EventWriter<PlaySound>,
) {
    for event in death_events.read() {
        if player_query.get(event.entity).is_err() {
            continue;
        }

        info!("Player died");
        sounds.send(PlaySound(SoundCue::PlayerDeath));
        commands
            .entity(event.entity)
            .insert(DeathScreenDelay(Timer::from_seconds(
                config.respawn_delay.max(0.0),
                TimerMode::Once,
            )));
    }
}

/// Show the death screen once the delay has passed.
pub fn tick_death_screen_delay(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DeathScreenDelay), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (entity, mut delay) in query.iter_mut() {
        if delay.0.tick(time.delta()).finished() {
            commands.entity(entity).remove::<DeathScreenDelay>();
            next_state.set(GameState::Dead);
        }
    }
}

/// Bring the player back at the current spawn point with full health.
pub fn respawn_player(
    mut commands: Commands,
    mut respawn_events: EventReader<RespawnRequested>,
    spawn_point: Res<SpawnPoint>,
    mut player_query: Query<(Entity, &mut Health, &mut Transform, &mut MovementState), With<Player>>,
) {
    if respawn_events.read().last().is_none() {
        return;
    }

    let Ok((entity, mut health, mut transform, mut movement)) = player_query.get_single_mut() else {
        warn!("Respawn requested but no player exists");
        return;
    };

    restore_player(&mut commands, entity, &mut health, &mut movement);
    transform.translation = spawn_point.position;
    transform.rotation = spawn_point.rotation;
    info!("Player respawned at save point with full health");
}

/// Reset health and liveness, used by respawn and by a fresh start.
pub fn restore_player(
    commands: &mut Commands,
    entity: Entity,
    health: &mut Health,
    movement: &mut MovementState,
) {
    health.reset();
    *movement = MovementState::default();
    commands
        .entity(entity)
        .remove::<Dead>()
        .remove::<DeathScreenDelay>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<GameState>()
            .init_resource::<Time>()
            .insert_resource(PlayerConfig::default())
            .init_resource::<SpawnPoint>()
            .add_event::<DeathEvent>()
            .add_event::<PlaySound>()
            .add_event::<RespawnRequested>()
            .add_systems(
                Update,
                (on_player_death, tick_death_screen_delay, respawn_player).chain(),
            );
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    #[test]
    fn death_screen_follows_after_delay() {
        let mut app = test_app();
        let mut health = Health::new(100.0);
        health.take_damage(100.0);
        let player = app
            .world_mut()
            .spawn((Player, health, Dead, Transform::default(), MovementState::default()))
            .id();

        app.world_mut().send_event(DeathEvent {
            entity: player,
            killed_by: None,
        });
        advance(&mut app, 0.0);
        assert!(app.world().get::<DeathScreenDelay>(player).is_some());

        advance(&mut app, 2.1);
        // State change applies on the next transition run.
        advance(&mut app, 0.0);
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Dead);
    }

    #[test]
    fn respawn_restores_health_at_spawn_point() {
        let mut app = test_app();
        let spawn = Vec3::new(12.0, 1.0, -4.0);
        app.world_mut()
            .resource_mut::<SpawnPoint>()
            .set(spawn, Quat::from_rotation_y(1.0));

        let mut health = Health::new(100.0);
        health.take_damage(250.0);
        let player = app
            .world_mut()
            .spawn((
                Player,
                health,
                Dead,
                Transform::from_xyz(50.0, 1.0, 50.0),
                MovementState::default(),
            ))
            .id();

        app.world_mut().send_event(RespawnRequested);
        advance(&mut app, 0.0);

        let world = app.world();
        assert_eq!(world.get::<Health>(player).unwrap().current, 100.0);
        assert!(world.get::<Dead>(player).is_none());
        assert_eq!(world.get::<Transform>(player).unwrap().translation, spawn);
    }
}
