//! Collectible keys.

use bevy::prelude::*;

use super::events::*;
use crate::combat::Dead;
use crate::core::{DespawnAfter, PlaySound, ShowMessage, SoundCue};
use crate::player::Player;

/// Seconds a collected key lingers (hidden) before it is despawned.
pub const COLLECTED_KEY_LINGER: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Hidden,
    Spawned,
    Collected,
}

/// Vertical bobbing of a spawned key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bob {
    pub speed: f32,
    pub height: f32,
}

#[derive(Component, Debug, Clone)]
pub struct KeyItem {
    pub name: String,
    pub barrier: Option<Entity>,
    pub state: KeyState,
    pub interaction_range: f32,
    /// Degrees per second around Y
    pub spin_speed: f32,
    pub bob: Option<Bob>,
    /// Resting height the bob oscillates around
    pub base_y: f32,
    pub in_range: bool,
}

impl KeyItem {
    pub fn new(name: impl Into<String>, barrier: Option<Entity>, base_y: f32) -> Self {
        Self {
            name: name.into(),
            barrier,
            state: KeyState::Hidden,
            interaction_range: 3.0,
            spin_speed: 50.0,
            bob: Some(Bob {
                speed: 1.0,
                height: 0.5,
            }),
            base_y,
            in_range: false,
        }
    }

    /// Hidden -> Spawned. Returns false if the key was not hidden.
    pub fn spawn(&mut self) -> bool {
        if self.state != KeyState::Hidden {
            return false;
        }
        self.state = KeyState::Spawned;
        true
    }

    /// Spawned -> Collected. A key can be picked up only once, and only
    /// after it has appeared.
    pub fn collect(&mut self) -> bool {
        if self.state != KeyState::Spawned {
            return false;
        }
        self.state = KeyState::Collected;
        self.in_range = false;
        true
    }

    pub fn bob_height(&self, elapsed: f32) -> f32 {
        match self.bob {
            Some(bob) => self.base_y + (elapsed * bob.speed).sin() * bob.height,
            None => self.base_y,
        }
    }
}

/// Show keys that a save point revealed.
pub fn reveal_keys(
    mut reveal_events: EventReader<RevealKey>,
    mut keys: Query<(&mut KeyItem, &mut Visibility)>,
    mut messages: EventWriter<ShowMessage>,
    mut sounds: EventWriter<PlaySound>,
) {
    for RevealKey(entity) in reveal_events.read() {
        let Ok((mut key, mut visibility)) = keys.get_mut(*entity) else {
            warn!("Reveal requested for missing key {:?}", entity);
            continue;
        };
        if !key.spawn() {
            continue;
        }

        info!("{} spawned", key.name);
        *visibility = Visibility::Inherited;
        sounds.send(PlaySound(SoundCue::KeySpawn));
        messages.send(ShowMessage::new(format!("The {} has appeared!", key.name), 3.0));
    }
}

/// Spin and bob keys that are out in the world.
pub fn animate_keys(time: Res<Time>, mut keys: Query<(&KeyItem, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (key, mut transform) in keys.iter_mut() {
        if key.state != KeyState::Spawned {
            continue;
        }
        transform.rotate_y(key.spin_speed.to_radians() * time.delta_secs());
        transform.translation.y = key.bob_height(elapsed);
    }
}

/// Prompt when the player walks up to a key, and pick it up on E.
pub fn interact_with_keys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    player_query: Query<&Transform, (With<Player>, Without<Dead>)>,
    mut keys: Query<(Entity, &mut KeyItem, &Transform, &mut Visibility), Without<Player>>,
    mut collected: EventWriter<KeyCollected>,
    mut messages: EventWriter<ShowMessage>,
    mut sounds: EventWriter<PlaySound>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };

    for (entity, mut key, transform, mut visibility) in keys.iter_mut() {
        if key.state != KeyState::Spawned {
            continue;
        }

        let in_range = transform.translation.distance(player.translation) <= key.interaction_range;
        if in_range && !key.in_range {
            messages.send(ShowMessage::new(format!("Press E to collect {}", key.name), 2.0));
        }
        key.in_range = in_range;

        if !(in_range && keyboard.just_pressed(KeyCode::KeyE)) || !key.collect() {
            continue;
        }

        info!("Collected: {}", key.name);
        *visibility = Visibility::Hidden;
        commands
            .entity(entity)
            .insert(DespawnAfter::seconds(COLLECTED_KEY_LINGER));
        sounds.send(PlaySound(SoundCue::KeyCollect));
        collected.send(KeyCollected {
            key: entity,
            key_name: key.name.clone(),
            barrier: key.barrier,
        });
    }
}
