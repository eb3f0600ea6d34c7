//! Fireball flight and impact.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::systems::kill_outright;
use crate::core::{DespawnAfter, PlaySound, SoundCue};
use crate::enemies::{Dormant, Enemy};

/// Enemies a fireball can strike.
type Targetable = (With<Enemy>, Without<Dormant>, Without<Dead>, Without<Fireball>);

/// Closest distance from `point` to the segment `a..b`.
fn distance_to_segment(a: Vec3, b: Vec3, point: Vec3) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq <= f32::EPSILON {
        return a.distance(point);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(point)
}

/// First point on the segment `a..b` within `radius` of `center`.
///
/// Falls back to the closest point when the segment never gets that near.
fn contact_point(a: Vec3, b: Vec3, center: Vec3, radius: f32) -> Vec3 {
    let ab = b - a;
    let to_start = a - center;
    let qa = ab.length_squared();
    let qc = to_start.length_squared() - radius * radius;
    if qc <= 0.0 || qa <= f32::EPSILON {
        return a;
    }
    let qb = 2.0 * to_start.dot(ab);
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        let t = (-to_start.dot(ab) / qa).clamp(0.0, 1.0);
        return a + ab * t;
    }
    let t = ((-qb - discriminant.sqrt()) / (2.0 * qa)).clamp(0.0, 1.0);
    a + ab * t
}

/// Move fireballs and detonate them on first contact.
///
/// Enemies are hit by proximity along this frame's path; anything else with
/// a collider (ground, rocks, trees) stops the fireball via a ray cast. The
/// caster's own collider is excluded.
pub fn move_fireballs(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    mut fireballs: Query<(Entity, &mut Transform, &mut Fireball), Without<Enemy>>,
    enemies: Query<(Entity, &Transform, Has<Health>), Targetable>,
    mut damage_events: EventWriter<DamageEvent>,
    mut death_events: EventWriter<DeathEvent>,
    mut sounds: EventWriter<PlaySound>,
) {
    let context = rapier_context.get_single().ok();
    let mut killed = HashSet::new();

    for (entity, mut transform, mut fireball) in fireballs.iter_mut() {
        if fireball.hit {
            continue;
        }

        let start = transform.translation;
        let travel = fireball.speed * time.delta_secs();
        let end = start + fireball.direction * travel;

        // Nearest enemy along the path
        let struck_enemy = enemies
            .iter()
            .map(|(enemy, enemy_transform, _)| {
                (enemy, distance_to_segment(start, end, enemy_transform.translation))
            })
            .filter(|(_, distance)| *distance <= FIREBALL_CONTACT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(enemy, _)| enemy);

        let impact = if let Some(enemy) = struck_enemy {
            let point = enemy_position(&enemies, enemy)
                .map_or(end, |center| contact_point(start, end, center, FIREBALL_CONTACT_RADIUS));
            Some((point, Some(enemy)))
        } else if let Some(context) = context {
            context
                .cast_ray(
                    start,
                    fireball.direction,
                    travel,
                    true,
                    QueryFilter::default().exclude_collider(fireball.owner),
                )
                .map(|(hit_entity, toi)| {
                    let point = start + fireball.direction * toi;
                    let struck = enemies.get(hit_entity).ok().map(|(e, _, _)| e);
                    (point, struck)
                })
        } else {
            None
        };

        let Some((point, struck)) = impact else {
            transform.translation = end;
            continue;
        };

        transform.translation = point;
        fireball.hit = true;
        commands
            .entity(entity)
            .insert(DespawnAfter::seconds(FIREBALL_IMPACT_LINGER));
        sounds.send(PlaySound(SoundCue::FireballImpact));

        if let Some(target) = struck {
            let has_health = enemies.get(target).is_ok_and(|(_, _, has_health)| has_health);
            if has_health {
                damage_events.send(DamageEvent {
                    target,
                    source: Some(fireball.owner),
                    amount: fireball.damage,
                });
            } else if killed.insert(target) {
                info!("Fireball destroyed {:?} outright", target);
                kill_outright(&mut commands, &mut death_events, target, Some(fireball.owner));
            }
        }

        if fireball.explosion_radius > 0.0 {
            for (enemy, enemy_transform, has_health) in enemies.iter() {
                let distance = point.distance(enemy_transform.translation);
                let Some(amount) = area_damage(fireball.damage, distance, fireball.explosion_radius)
                else {
                    continue;
                };

                if has_health {
                    damage_events.send(DamageEvent {
                        target: enemy,
                        source: Some(fireball.owner),
                        amount,
                    });
                } else if amount / fireball.damage > 0.5 && killed.insert(enemy) {
                    kill_outright(&mut commands, &mut death_events, enemy, Some(fireball.owner));
                }
            }
        }
    }
}

fn enemy_position(
    enemies: &Query<(Entity, &Transform, Has<Health>), Targetable>,
    enemy: Entity,
) -> Option<Vec3> {
    enemies.get(enemy).ok().map(|(_, transform, _)| transform.translation)
}
