//! Delayed despawning.

use bevy::prelude::*;

/// Despawns its entity (and children) once the timer finishes.
///
/// Used for collected keys, spent fireballs and projectile lifetimes.
#[derive(Component)]
pub struct DespawnAfter(pub Timer);

impl DespawnAfter {
    pub fn seconds(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds.max(0.0), TimerMode::Once))
    }
}

/// Tick despawn timers and remove expired entities.
pub fn despawn_expired(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DespawnAfter)>,
) {
    for (entity, mut despawn) in query.iter_mut() {
        despawn.0.tick(time.delta());
        if despawn.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn entity_is_removed_after_its_delay() {
        let mut app = App::new();
        app.init_resource::<Time>().add_systems(Update, despawn_expired);

        let entity = app.world_mut().spawn(DespawnAfter::seconds(0.5)).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(0.3));
        app.update();
        assert!(app.world().entities().contains(entity));

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(0.3));
        app.update();
        assert!(!app.world().entities().contains(entity));
    }
}
