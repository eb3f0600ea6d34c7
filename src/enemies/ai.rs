//! Enemy AI behavior systems.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;

use super::components::*;
use crate::combat::Dead;
use crate::core::{DamageEvent, DeathEvent, PlaySound, SoundCue};
use crate::player::Player;

/// Enemies that are awake and able to act.
type ActiveEnemy = (With<Enemy>, Without<Dormant>, Without<Dead>, Without<KillLock>);

/// Decide what each enemy does this frame: idle, chase or start an attack.
///
/// Distances are measured in 3-D. Enemies stand down while the player is
/// dead and while an attack is still running.
pub fn ai_decide(
    mut commands: Commands,
    time: Res<Time>,
    player_query: Query<(&Transform, Has<Dead>), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (
            Entity,
            &Transform,
            &EnemyStats,
            &mut AiState,
            &mut EnemyMemory,
        ),
        ActiveEnemy,
    >,
    mut sounds: EventWriter<PlaySound>,
) {
    let Ok((player_transform, player_dead)) = player_query.get_single() else {
        return;
    };
    let now = time.elapsed_secs();

    for (entity, transform, stats, mut ai_state, mut memory) in enemy_query.iter_mut() {
        let attacking = *ai_state == AiState::Attacking;

        if player_dead {
            if !attacking {
                *ai_state = AiState::Idle;
            }
            continue;
        }

        let distance = transform.translation.distance(player_transform.translation);

        if distance > stats.chase_range {
            // Leaving range re-arms the detection cue
            memory.detected_player = false;
            if !attacking {
                *ai_state = AiState::Idle;
            }
            continue;
        }

        if !memory.detected_player {
            memory.detected_player = true;
            if stats.detection_cue {
                sounds.send(PlaySound(SoundCue::EnemyDetect));
            }
        }

        if attacking {
            continue;
        }

        if distance <= stats.attack_range && memory.attack_ready(now, stats.attack_cooldown) {
            *ai_state = AiState::Attacking;
            memory.last_attack = Some(now);
            commands.entity(entity).insert(AttackSequence::new(stats));
            sounds.send(PlaySound(SoundCue::EnemyAttack));
        } else {
            *ai_state = AiState::Chasing;
        }
    }
}

/// Run chasing enemies toward the player, turning to face them.
pub fn ai_chase(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&mut Transform, &EnemyStats, &AiState), ActiveEnemy>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    for (mut enemy_transform, stats, ai_state) in enemy_query.iter_mut() {
        if *ai_state != AiState::Chasing {
            continue;
        }

        // Stay upright: move and turn on the horizontal plane only
        let mut direction = player_transform.translation - enemy_transform.translation;
        direction.y = 0.0;
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }

        enemy_transform.translation += direction * stats.run_speed * time.delta_secs();

        let target = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
        let turn = (time.delta_secs() * 8.0).min(1.0);
        enemy_transform.rotation = enemy_transform.rotation.slerp(target, turn);
    }
}

/// Advance running attacks: land the hit if the player is still in reach,
/// then release the enemy.
pub fn ai_attack(
    mut commands: Commands,
    time: Res<Time>,
    player_query: Query<(Entity, &Transform, Has<Dead>), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (Entity, &Transform, &EnemyStats, &mut AiState, &mut AttackSequence),
        (With<Enemy>, Without<Dead>),
    >,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let player = player_query.get_single().ok();

    for (entity, transform, stats, mut ai_state, mut attack) in enemy_query.iter_mut() {
        attack.hit.tick(time.delta());
        attack.recover.tick(time.delta());

        if attack.hit.finished() && !attack.hit_resolved {
            attack.hit_resolved = true;
            if let Some((player_entity, player_transform, false)) = player {
                let distance = transform.translation.distance(player_transform.translation);
                if distance <= stats.attack_range {
                    damage_events.send(DamageEvent {
                        target: player_entity,
                        source: Some(entity),
                        amount: stats.damage,
                    });
                } else {
                    debug!("Enemy {:?} swung at nothing ({:.1} away)", entity, distance);
                }
            }
        }

        if attack.recover.finished() {
            *ai_state = AiState::Idle;
            commands.entity(entity).remove::<AttackSequence>();
        }
    }
}

/// Lock out an enemy for a while after it kills the player.
pub fn apply_kill_locks(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<(), With<Player>>,
    enemy_query: Query<&EnemyStats, With<Enemy>>,
) {
    for event in death_events.read() {
        if player_query.get(event.entity).is_err() {
            continue;
        }
        let Some(killer) = event.killed_by else {
            continue;
        };
        if let Ok(stats) = enemy_query.get(killer) {
            info!("Enemy {:?} killed the player", killer);
            commands.entity(killer).insert(KillLock(Timer::from_seconds(
                stats.kill_lock.max(0.0),
                TimerMode::Once,
            )));
        }
    }
}

/// Release kill locks whose time is up.
pub fn tick_kill_locks(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut KillLock)>,
) {
    for (entity, mut lock) in query.iter_mut() {
        if lock.0.tick(time.delta()).finished() {
            commands.entity(entity).remove::<KillLock>();
        }
    }
}

/// Remove enemies as soon as they die.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    enemy_query: Query<Option<&Name>, With<Enemy>>,
    mut sounds: EventWriter<PlaySound>,
) {
    for event in death_events.read() {
        let Ok(name) = enemy_query.get(event.entity) else {
            continue;
        };
        info!(
            "{} died",
            name.map_or("Enemy".to_string(), |n| n.as_str().to_string())
        );
        sounds.send(PlaySound(SoundCue::EnemyDeath));
        commands.entity(event.entity).despawn_recursive();
    }
}

/// Wake an enemy: show it, give it back its collider and let the AI pick it up.
pub fn wake_enemy(commands: &mut Commands, entity: Entity) {
    let Some(mut enemy) = commands.get_entity(entity) else {
        warn!("Cannot wake missing enemy {:?}", entity);
        return;
    };
    enemy
        .remove::<(Dormant, ColliderDisabled)>()
        .try_insert(Visibility::Inherited);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{apply_damage, Health};
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<PlaySound>()
            .add_systems(
                Update,
                (
                    tick_kill_locks,
                    ai_decide,
                    ai_chase,
                    ai_attack,
                    apply_damage,
                    apply_kill_locks,
                    handle_enemy_death,
                )
                    .chain(),
            );
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn spawn_player(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((Player, Health::new(100.0), Transform::from_translation(position)))
            .id()
    }

    fn spawn_enemy(app: &mut App, position: Vec3, stats: EnemyStats) -> Entity {
        let health = Health::new(stats.max_health.unwrap_or(1.0));
        app.world_mut()
            .spawn((
                Enemy,
                stats,
                health,
                AiState::default(),
                EnemyMemory::default(),
                Transform::from_translation(position),
            ))
            .id()
    }

    #[test]
    fn enemy_chases_player_in_range() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::ZERO);
        let enemy = spawn_enemy(&mut app, Vec3::new(10.0, 0.0, 0.0), EnemyStats::default());

        advance(&mut app, 0.1);
        assert_eq!(*app.world().get::<AiState>(enemy).unwrap(), AiState::Chasing);

        advance(&mut app, 0.1);
        let x = app.world().get::<Transform>(enemy).unwrap().translation.x;
        assert!(x < 10.0, "enemy should have moved toward the player, x = {}", x);
    }

    #[test]
    fn enemy_ignores_distant_player() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::ZERO);
        let enemy = spawn_enemy(&mut app, Vec3::new(40.0, 0.0, 0.0), EnemyStats::default());

        advance(&mut app, 0.5);
        assert_eq!(*app.world().get::<AiState>(enemy).unwrap(), AiState::Idle);
        assert_eq!(
            app.world().get::<Transform>(enemy).unwrap().translation,
            Vec3::new(40.0, 0.0, 0.0)
        );
    }

    #[test]
    fn attack_lands_after_hit_delay() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Vec3::ZERO);
        spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), EnemyStats::default());

        advance(&mut app, 0.1);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 100.0);

        advance(&mut app, 0.3);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 100.0);

        advance(&mut app, 0.3);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 90.0);
    }

    #[test]
    fn attack_misses_when_player_steps_away() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Vec3::ZERO);
        spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), EnemyStats::default());

        advance(&mut app, 0.1);
        app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(-8.0, 0.0, 0.0);
        advance(&mut app, 0.6);

        assert_eq!(app.world().get::<Health>(player).unwrap().current, 100.0);
    }

    #[test]
    fn dead_enemy_is_removed_and_deals_no_damage() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Vec3::ZERO);
        let enemy = spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), EnemyStats::default());

        advance(&mut app, 0.1);
        app.world_mut().send_event(DamageEvent {
            target: enemy,
            source: Some(player),
            amount: 150.0,
        });
        advance(&mut app, 0.1);
        assert!(!app.world().entities().contains(enemy));

        advance(&mut app, 1.0);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 100.0);
    }

    #[test]
    fn waking_restores_collision_and_visibility() {
        let mut app = test_app();
        let enemy = app
            .world_mut()
            .spawn((Enemy, Dormant, ColliderDisabled, Visibility::Hidden))
            .id();

        let mut commands = app.world_mut().commands();
        wake_enemy(&mut commands, enemy);
        app.world_mut().flush();

        assert!(app.world().get::<Dormant>(enemy).is_none());
        assert!(app.world().get::<ColliderDisabled>(enemy).is_none());
        assert_eq!(app.world().get::<Visibility>(enemy), Some(&Visibility::Inherited));
    }

    #[test]
    fn killer_backs_off_for_a_while() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Vec3::ZERO);
        let goblin = EnemyStats {
            damage: 150.0,
            ..default()
        };
        let enemy = spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), goblin);

        advance(&mut app, 0.1);
        advance(&mut app, 0.5);
        assert!(app.world().get::<Dead>(player).is_some());

        advance(&mut app, 0.0);
        assert!(app.world().get::<KillLock>(enemy).is_some());

        advance(&mut app, 3.1);
        advance(&mut app, 0.0);
        assert!(app.world().get::<KillLock>(enemy).is_none());
    }
}
