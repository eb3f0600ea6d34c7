//! Save points: one-shot triggers that checkpoint the player and start a
//! location's challenge.

use bevy::prelude::*;

use super::barrier::Barrier;
use super::clue::ClueBoard;
use super::events::*;
use crate::combat::Dead;
use crate::core::{PlaySound, ShowMessage, SoundCue};
use crate::enemies::wake_enemy;
use crate::player::{Player, SpawnPoint};

/// Seconds the published clue stays on the message panel.
pub const CLUE_MESSAGE_DURATION: f32 = 6.0;

#[derive(Component, Debug, Clone)]
pub struct SavePoint {
    pub name: String,
    pub activated: bool,
    /// Player within this distance activates the save point
    pub trigger_radius: f32,
    pub barrier: Option<Entity>,
    pub keys: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub clue: Option<String>,
    /// Seconds between activation and the clue appearing
    pub clue_delay: f32,
    /// Lead-in for the enemy count message of a defeat-enemies barrier
    pub announcement: Option<String>,
    pub message_duration: f32,
}

impl SavePoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activated: false,
            trigger_radius: 2.0,
            barrier: None,
            keys: Vec::new(),
            enemies: Vec::new(),
            clue: None,
            clue_delay: 2.0,
            announcement: None,
            message_duration: 3.0,
        }
    }

    /// Mark activated. Returns false if it already was.
    pub fn activate(&mut self) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;
        true
    }

    pub fn reset(&mut self) {
        self.activated = false;
    }
}

/// Glow shown once a save point has been used.
#[derive(Component)]
pub struct ActivationEffect;

/// A clue waiting to be published. Dropped with its save point.
#[derive(Component, Debug)]
pub struct PendingClue {
    pub text: String,
    pub timer: Timer,
}

fn set_effect_visibility(
    children: Option<&Children>,
    effects: &mut Query<&mut Visibility, With<ActivationEffect>>,
    visibility: Visibility,
) {
    for child in children.into_iter().flat_map(|children| children.iter()) {
        if let Ok(mut current) = effects.get_mut(*child) {
            current.set_if_neq(visibility);
        }
    }
}

/// Activate save points the player walks into.
pub fn activate_save_points(
    mut commands: Commands,
    player_query: Query<&Transform, (With<Player>, Without<Dead>)>,
    mut save_points: Query<(Entity, &mut SavePoint, &Transform, Option<&Children>), Without<Player>>,
    mut effects: Query<&mut Visibility, With<ActivationEffect>>,
    mut spawn_point: ResMut<SpawnPoint>,
    mut messages: EventWriter<ShowMessage>,
    mut lock_events: EventWriter<LockBarrier>,
    mut reveal_events: EventWriter<RevealKey>,
    mut sounds: EventWriter<PlaySound>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };

    for (entity, mut save_point, transform, children) in save_points.iter_mut() {
        if save_point.activated
            || transform.translation.distance(player.translation) > save_point.trigger_radius
        {
            continue;
        }
        save_point.activate();

        info!("Save point activated: {}", save_point.name);
        spawn_point.set(transform.translation, transform.rotation);
        messages.send(ShowMessage::new(
            format!("Save Point Activated: {}", save_point.name),
            save_point.message_duration,
        ));

        match save_point.barrier {
            Some(barrier) => {
                lock_events.send(LockBarrier {
                    barrier,
                    enemies: save_point.enemies.clone(),
                    announcement: save_point.announcement.clone(),
                });
            }
            None => warn!("No linked barrier found for {}", save_point.name),
        }

        for key in &save_point.keys {
            reveal_events.send(RevealKey(*key));
        }
        for enemy in &save_point.enemies {
            wake_enemy(&mut commands, *enemy);
        }

        sounds.send(PlaySound(SoundCue::SavePoint));
        set_effect_visibility(children, &mut effects, Visibility::Inherited);

        if let Some(text) = save_point.clue.clone().filter(|text| !text.is_empty()) {
            commands.entity(entity).insert(PendingClue {
                text,
                timer: Timer::from_seconds(save_point.clue_delay.max(0.0), TimerMode::Once),
            });
        }
    }
}

/// Publish clues whose delay has passed.
pub fn publish_pending_clues(
    mut commands: Commands,
    time: Res<Time>,
    mut pending: Query<(Entity, &mut PendingClue)>,
    mut clue: ResMut<ClueBoard>,
    mut messages: EventWriter<ShowMessage>,
) {
    for (entity, mut pending_clue) in pending.iter_mut() {
        if !pending_clue.timer.tick(time.delta()).finished() {
            continue;
        }
        messages.send(ShowMessage::new(
            format!("CLUE: {}", pending_clue.text),
            CLUE_MESSAGE_DURATION,
        ));
        clue.set(pending_clue.text.clone());
        commands.entity(entity).remove::<PendingClue>();
    }
}

/// Re-arm save points and let their barriers go.
pub fn reset_save_points(
    mut commands: Commands,
    mut reset_events: EventReader<ResetSavePoint>,
    mut save_points: Query<(&mut SavePoint, Option<&Children>)>,
    mut effects: Query<&mut Visibility, With<ActivationEffect>>,
    mut barriers: Query<&mut Barrier>,
    mut messages: EventWriter<ShowMessage>,
    mut unlocked: EventWriter<BarrierUnlocked>,
) {
    for ResetSavePoint(entity) in reset_events.read() {
        let Ok((mut save_point, children)) = save_points.get_mut(*entity) else {
            continue;
        };

        save_point.reset();
        commands.entity(*entity).remove::<PendingClue>();
        set_effect_visibility(children, &mut effects, Visibility::Hidden);
        info!("Save point reset: {}", save_point.name);

        if let Some(barrier_entity) = save_point.barrier {
            if let Ok(mut barrier) = barriers.get_mut(barrier_entity) {
                messages.send(ShowMessage::new(barrier.unlock(), 4.0));
                unlocked.send(BarrierUnlocked(barrier_entity));
            }
        }
    }
}
