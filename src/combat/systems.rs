//! Damage handling shared by players and enemies.

use std::collections::HashSet;

use bevy::prelude::*;

use super::components::*;
use crate::core::{PlaySound, SoundCue};
use crate::player::Player;

/// Apply queued damage to entities with `Health`.
///
/// Dead targets are skipped; the killing blow marks the target `Dead` and
/// sends exactly one `DeathEvent`.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, Has<Dead>, Has<Player>)>,
    mut death_events: EventWriter<DeathEvent>,
    mut sounds: EventWriter<PlaySound>,
) {
    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = HashSet::new();

    for event in damage_events.read() {
        if died_this_frame.contains(&event.target) {
            continue;
        }

        let Ok((mut health, dead, is_player)) = health_query.get_mut(event.target) else {
            continue;
        };
        if dead {
            continue;
        }

        let taken = health.take_damage(event.amount);
        if taken <= 0.0 {
            continue;
        }

        debug!(
            "{:?} took {:.1} damage ({:.1}/{:.1})",
            event.target, taken, health.current, health.maximum
        );
        sounds.send(PlaySound(if is_player {
            SoundCue::PlayerHurt
        } else {
            SoundCue::EnemyHit
        }));

        if health.is_dead() {
            died_this_frame.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: event.source,
            });
        }
    }
}

/// Kill an entity outright, bypassing health. Used for enemies without a
/// health pool.
pub fn kill_outright(
    commands: &mut Commands,
    death_events: &mut EventWriter<DeathEvent>,
    target: Entity,
    killer: Option<Entity>,
) {
    commands.entity(target).insert(Dead);
    death_events.send(DeathEvent {
        entity: target,
        killed_by: killer,
    });
}
