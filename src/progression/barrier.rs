//! Area barriers that keep the player inside a location until it is cleared.
//!
//! A barrier is a sphere around its entity. While active, the player is
//! held inside `radius * scale - edge_buffer` on the horizontal plane. Three
//! unlock conditions exist: one key, several keys, or defeating every
//! enemy inside the area.

use bevy::prelude::*;

use super::events::*;
use crate::combat::Dead;
use crate::core::ShowMessage;
use crate::enemies::{Dormant, Enemy};
use crate::player::Player;

/// Seconds between repeated "you cannot leave" messages.
pub const BLOCKED_MESSAGE_COOLDOWN: f32 = 2.0;

/// What it takes to open a barrier.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockCondition {
    SingleKey,
    MultiKey {
        required: u32,
        collected: u32,
    },
    DefeatEnemies {
        tracked: Vec<Entity>,
        /// How many were tracked when the barrier locked
        initial: usize,
        /// Search the area for enemies on lock instead of using a given list
        auto_find: bool,
    },
}

/// Outcome of registering a key with a barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyProgress {
    Unlocked,
    Counted { collected: u32, required: u32 },
    /// This barrier does not take keys
    Ignored,
}

#[derive(Component, Debug, Clone)]
pub struct Barrier {
    pub name: String,
    pub active: bool,
    pub radius: f32,
    pub edge_buffer: f32,
    /// Text shown when the player hits the edge; see `blocked_text`
    pub blocked_message: String,
    pub message_duration: f32,
    pub unlock: UnlockCondition,
    message_cooldown: Option<Timer>,
}

impl Barrier {
    pub fn new(name: impl Into<String>, radius: f32, edge_buffer: f32, unlock: UnlockCondition) -> Self {
        let blocked_message = match unlock {
            UnlockCondition::SingleKey => "You cannot leave yet. Find the key to unlock the barrier!",
            UnlockCondition::MultiKey { .. } => "You need {} more key(s) to unlock this barrier!",
            UnlockCondition::DefeatEnemies { .. } => "Defeat all enemies to unlock the barrier!",
        };
        Self {
            name: name.into(),
            active: false,
            radius,
            edge_buffer,
            blocked_message: blocked_message.to_string(),
            message_duration: 3.0,
            unlock,
            message_cooldown: None,
        }
    }

    pub fn with_blocked_message(mut self, message: impl Into<String>) -> Self {
        self.blocked_message = message.into();
        self
    }

    /// Furthest the player may stray from the center.
    pub fn max_allowed(&self, scale: f32) -> f32 {
        self.radius * scale - self.edge_buffer
    }

    /// Where to put the player back, if they reached the edge.
    ///
    /// Distance is measured on the horizontal plane; the safe point is one
    /// unit inside the limit, on the line to the center, at the player's
    /// own height.
    pub fn containment(&self, center: Vec3, scale: f32, player: Vec3) -> Option<Vec3> {
        if !self.active {
            return None;
        }

        let offset = Vec3::new(player.x - center.x, 0.0, player.z - center.z);
        let max_allowed = self.max_allowed(scale);
        if offset.length() < max_allowed {
            return None;
        }

        let outward = offset.normalize_or_zero();
        let mut safe = center + outward * (max_allowed - 1.0);
        safe.y = player.y;
        Some(safe)
    }

    /// Arm the barrier. `enemies` seeds a defeat-enemies condition.
    pub fn lock(&mut self, enemies: Vec<Entity>) {
        self.active = true;
        self.message_cooldown = None;
        match &mut self.unlock {
            UnlockCondition::SingleKey => {}
            UnlockCondition::MultiKey { collected, .. } => *collected = 0,
            UnlockCondition::DefeatEnemies { tracked, initial, .. } => {
                *initial = enemies.len();
                *tracked = enemies;
            }
        }
        info!("{} locked", self.name);
    }

    /// Release the player. Returns the message to show.
    pub fn unlock(&mut self) -> &'static str {
        self.active = false;
        info!("{} unlocked", self.name);
        match self.unlock {
            UnlockCondition::SingleKey => "Barrier unlocked! You can now continue.",
            UnlockCondition::MultiKey { .. } => "All keys found! Barrier unlocked! You can now continue.",
            UnlockCondition::DefeatEnemies { .. } => "All enemies defeated! Barrier unlocked!",
        }
    }

    /// Count a collected key, unlocking once enough are in.
    pub fn register_key(&mut self) -> KeyProgress {
        match &mut self.unlock {
            UnlockCondition::SingleKey => KeyProgress::Unlocked,
            UnlockCondition::MultiKey { required, collected } => {
                *collected += 1;
                if *collected >= *required {
                    KeyProgress::Unlocked
                } else {
                    KeyProgress::Counted {
                        collected: *collected,
                        required: *required,
                    }
                }
            }
            UnlockCondition::DefeatEnemies { .. } => KeyProgress::Ignored,
        }
    }

    /// Drop tracked enemies that are gone. Returns true when the last one
    /// went and the barrier should open.
    pub fn prune_defeated(&mut self, alive: impl Fn(Entity) -> bool) -> bool {
        if !self.active {
            return false;
        }
        match &mut self.unlock {
            UnlockCondition::DefeatEnemies { tracked, initial, .. } => {
                tracked.retain(|enemy| alive(*enemy));
                *initial > 0 && tracked.is_empty()
            }
            _ => false,
        }
    }

    pub fn remaining_enemies(&self) -> usize {
        match &self.unlock {
            UnlockCondition::DefeatEnemies { tracked, .. } => tracked.len(),
            _ => 0,
        }
    }

    /// The edge message, filled in for the unlock condition.
    pub fn blocked_text(&self) -> String {
        match &self.unlock {
            UnlockCondition::SingleKey => self.blocked_message.clone(),
            UnlockCondition::MultiKey { required, collected } => self
                .blocked_message
                .replace("{}", &required.saturating_sub(*collected).to_string()),
            UnlockCondition::DefeatEnemies { tracked, .. } => {
                format!("{} ({} remaining)", self.blocked_message, tracked.len())
            }
        }
    }

    /// True if the blocked message may be shown now; starts the cooldown.
    pub fn take_message_slot(&mut self) -> bool {
        if self.message_cooldown.is_some() {
            return false;
        }
        self.message_cooldown = Some(Timer::from_seconds(BLOCKED_MESSAGE_COOLDOWN, TimerMode::Once));
        true
    }

    pub fn tick_message_cooldown(&mut self, delta: std::time::Duration) {
        let expired = self
            .message_cooldown
            .as_mut()
            .is_some_and(|timer| timer.tick(delta).finished());
        if expired {
            self.message_cooldown = None;
        }
    }
}

/// Semi-transparent shell showing where an active barrier stands.
#[derive(Component)]
pub struct BarrierVisual;

/// Arm barriers, collecting the enemies a defeat-enemies barrier must track.
pub fn lock_barriers(
    mut lock_events: EventReader<LockBarrier>,
    mut barriers: Query<(&mut Barrier, &Transform)>,
    enemies: Query<(Entity, &Transform, Has<Dormant>), (With<Enemy>, Without<Dead>, Without<Barrier>)>,
    mut messages: EventWriter<ShowMessage>,
) {
    for event in lock_events.read() {
        let Ok((mut barrier, transform)) = barriers.get_mut(event.barrier) else {
            warn!("Lock requested for missing barrier {:?}", event.barrier);
            continue;
        };

        let auto_find = matches!(barrier.unlock, UnlockCondition::DefeatEnemies { auto_find: true, .. });
        let tracked = if auto_find {
            let center = transform.translation;
            let reach = barrier.max_allowed(transform.scale.x);
            // Sleepers this save point does not wake could never be fought
            enemies
                .iter()
                .filter(|(entity, _, dormant)| !dormant || event.enemies.contains(entity))
                .filter(|(_, enemy, _)| enemy.translation.distance(center) <= reach)
                .map(|(entity, _, _)| entity)
                .collect()
        } else {
            event
                .enemies
                .iter()
                .copied()
                .filter(|entity| enemies.contains(*entity))
                .collect()
        };

        barrier.lock(tracked);

        if let UnlockCondition::DefeatEnemies { initial, .. } = barrier.unlock {
            info!("{} must defeat {} enemies", barrier.name, initial);
            if let Some(announcement) = &event.announcement {
                messages.send(ShowMessage::new(
                    format!("{} Defeat {} enemies to proceed.", announcement, initial),
                    4.0,
                ));
            }
        }
    }
}

/// Feed collected keys to their barriers.
pub fn register_collected_keys(
    mut key_events: EventReader<KeyCollected>,
    mut barriers: Query<&mut Barrier>,
    mut messages: EventWriter<ShowMessage>,
    mut unlocked: EventWriter<BarrierUnlocked>,
) {
    for event in key_events.read() {
        let Some(barrier_entity) = event.barrier else {
            warn!("{} is not linked to any barrier", event.key_name);
            continue;
        };
        let Ok(mut barrier) = barriers.get_mut(barrier_entity) else {
            warn!("{} is linked to a missing barrier", event.key_name);
            continue;
        };

        match barrier.register_key() {
            KeyProgress::Unlocked => {
                let single = matches!(barrier.unlock, UnlockCondition::SingleKey);
                messages.send(ShowMessage::new(barrier.unlock(), 4.0));
                if single {
                    messages.send(ShowMessage::new(
                        format!("You found the {}! The barrier has been unlocked.", event.key_name),
                        4.0,
                    ));
                }
                unlocked.send(BarrierUnlocked(barrier_entity));
            }
            KeyProgress::Counted { collected, required } => {
                info!("Key collected! Progress: {}/{}", collected, required);
                messages.send(ShowMessage::new(
                    format!("Key found! ({}/{})", collected, required),
                    3.0,
                ));
            }
            KeyProgress::Ignored => {
                warn!("{} does not take keys", barrier.name);
            }
        }
    }
}

/// Open defeat-enemies barriers once every tracked enemy is gone.
pub fn track_defeated_enemies(
    mut barriers: Query<(Entity, &mut Barrier)>,
    enemies: Query<(), (With<Enemy>, Without<Dead>)>,
    mut messages: EventWriter<ShowMessage>,
    mut unlocked: EventWriter<BarrierUnlocked>,
) {
    for (entity, mut barrier) in barriers.iter_mut() {
        if barrier.prune_defeated(|enemy| enemies.contains(enemy)) {
            messages.send(ShowMessage::new(barrier.unlock(), 4.0));
            unlocked.send(BarrierUnlocked(entity));
        }
    }
}

/// Hold the player inside active barriers.
pub fn contain_player(
    time: Res<Time>,
    mut barriers: Query<(&mut Barrier, &Transform), Without<Player>>,
    mut player_query: Query<&mut Transform, (With<Player>, Without<Dead>)>,
    mut messages: EventWriter<ShowMessage>,
) {
    for (mut barrier, _) in barriers.iter_mut() {
        barrier.tick_message_cooldown(time.delta());
    }

    let Ok(mut player) = player_query.get_single_mut() else {
        return;
    };

    for (mut barrier, transform) in barriers.iter_mut() {
        let Some(safe) = barrier.containment(transform.translation, transform.scale.x, player.translation)
        else {
            continue;
        };

        debug!("Player at the edge of {}", barrier.name);
        player.translation = safe;

        if barrier.take_message_slot() {
            let duration = barrier.message_duration;
            messages.send(ShowMessage::new(barrier.blocked_text(), duration));
        }
    }
}

/// Show the barrier shell only while it is active.
pub fn sync_barrier_visuals(
    barriers: Query<(&Barrier, &Children), Changed<Barrier>>,
    mut visuals: Query<&mut Visibility, With<BarrierVisual>>,
) {
    for (barrier, children) in barriers.iter() {
        let visibility = if barrier.active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for child in children.iter() {
            if let Ok(mut current) = visuals.get_mut(*child) {
                current.set_if_neq(visibility);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MessageBoard;
    use crate::core::{expire_messages, receive_messages};
    use std::time::Duration;

    fn single_key() -> Barrier {
        Barrier::new("Location 1 Barrier", 30.0, 3.0, UnlockCondition::SingleKey)
    }

    #[test]
    fn inactive_barrier_never_pushes() {
        let barrier = single_key();
        assert_eq!(barrier.containment(Vec3::ZERO, 1.0, Vec3::new(100.0, 0.0, 0.0)), None);
    }

    #[test]
    fn active_barrier_pulls_player_inside() {
        let mut barrier = single_key();
        barrier.lock(Vec::new());

        assert_eq!(barrier.containment(Vec3::ZERO, 1.0, Vec3::new(20.0, 0.0, 0.0)), None);

        let safe = barrier
            .containment(Vec3::new(10.0, 0.0, 0.0), 1.0, Vec3::new(10.0, 4.0, 40.0))
            .unwrap();
        assert!((safe - Vec3::new(10.0, 4.0, 26.0)).length() < 1e-4);
    }

    #[test]
    fn scale_widens_the_limit() {
        let mut barrier = single_key();
        barrier.lock(Vec::new());
        assert_eq!(barrier.max_allowed(2.0), 57.0);
        assert_eq!(barrier.containment(Vec3::ZERO, 2.0, Vec3::new(50.0, 0.0, 0.0)), None);
    }

    #[test]
    fn multi_key_unlocks_only_when_all_keys_are_in() {
        let mut barrier = Barrier::new(
            "Location 2 Barrier",
            30.0,
            3.0,
            UnlockCondition::MultiKey {
                required: 2,
                collected: 0,
            },
        );
        barrier.lock(Vec::new());
        assert_eq!(barrier.blocked_text(), "You need 2 more key(s) to unlock this barrier!");

        assert_eq!(
            barrier.register_key(),
            KeyProgress::Counted {
                collected: 1,
                required: 2
            }
        );
        assert_eq!(barrier.blocked_text(), "You need 1 more key(s) to unlock this barrier!");
        assert_eq!(barrier.register_key(), KeyProgress::Unlocked);
    }

    #[test]
    fn relocking_resets_the_key_count() {
        let mut barrier = Barrier::new(
            "gate",
            30.0,
            3.0,
            UnlockCondition::MultiKey {
                required: 3,
                collected: 0,
            },
        );
        barrier.lock(Vec::new());
        barrier.register_key();
        barrier.lock(Vec::new());
        assert_eq!(
            barrier.unlock,
            UnlockCondition::MultiKey {
                required: 3,
                collected: 0
            }
        );
    }

    #[test]
    fn defeat_barrier_needs_enemies_to_start_with() {
        let mut barrier = Barrier::new(
            "Location 3 Barrier",
            30.0,
            3.0,
            UnlockCondition::DefeatEnemies {
                tracked: Vec::new(),
                initial: 0,
                auto_find: true,
            },
        );
        barrier.lock(Vec::new());
        assert!(!barrier.prune_defeated(|_| false));
        assert!(barrier.active);
    }

    #[test]
    fn defeat_barrier_counts_down() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let mut barrier = Barrier::new(
            "Location 3 Barrier",
            30.0,
            3.0,
            UnlockCondition::DefeatEnemies {
                tracked: Vec::new(),
                initial: 0,
                auto_find: false,
            },
        );
        barrier.lock(vec![a, b]);
        assert_eq!(
            barrier.blocked_text(),
            "Defeat all enemies to unlock the barrier! (2 remaining)"
        );

        assert!(!barrier.prune_defeated(|e| e == b));
        assert_eq!(barrier.remaining_enemies(), 1);
        assert!(barrier.prune_defeated(|_| false));
    }

    fn lock_app() -> App {
        let mut app = App::new();
        app.add_event::<LockBarrier>()
            .add_event::<ShowMessage>()
            .add_systems(Update, lock_barriers);
        app
    }

    fn defeat_barrier(app: &mut App, auto_find: bool) -> Entity {
        app.world_mut()
            .spawn((
                Barrier::new(
                    "Location 3 Barrier",
                    30.0,
                    3.0,
                    UnlockCondition::DefeatEnemies {
                        tracked: Vec::new(),
                        initial: 0,
                        auto_find,
                    },
                ),
                Transform::default(),
            ))
            .id()
    }

    #[test]
    fn auto_find_skips_sleepers_it_will_not_wake() {
        let mut app = lock_app();
        let barrier = defeat_barrier(&mut app, true);
        let awake = app.world_mut().spawn((Enemy, Transform::from_xyz(5.0, 1.0, 0.0))).id();
        let woken = app
            .world_mut()
            .spawn((Enemy, Dormant, Transform::from_xyz(-5.0, 1.0, 0.0)))
            .id();
        let stranger = app
            .world_mut()
            .spawn((Enemy, Dormant, Transform::from_xyz(0.0, 1.0, 5.0)))
            .id();
        app.world_mut().spawn((Enemy, Transform::from_xyz(80.0, 1.0, 0.0)));

        app.world_mut().send_event(LockBarrier {
            barrier,
            enemies: vec![woken],
            announcement: None,
        });
        app.update();

        let barrier = app.world().get::<Barrier>(barrier).unwrap();
        assert!(barrier.active);
        let UnlockCondition::DefeatEnemies { tracked, initial, .. } = &barrier.unlock else {
            panic!("unlock condition changed");
        };
        assert_eq!(*initial, 2);
        assert!(tracked.contains(&awake));
        assert!(tracked.contains(&woken));
        assert!(!tracked.contains(&stranger));
    }

    fn containment_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<MessageBoard>()
            .add_event::<ShowMessage>()
            .add_systems(Update, (contain_player, receive_messages, expire_messages).chain());
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn message_count(app: &App) -> usize {
        app.world()
            .resource::<Events<ShowMessage>>()
            .iter_current_update_events()
            .count()
    }

    #[test]
    fn blocked_message_is_debounced() {
        let mut app = containment_app();
        let mut barrier = single_key();
        barrier.lock(Vec::new());
        app.world_mut().spawn((barrier, Transform::default()));
        let player = app
            .world_mut()
            .spawn((Player, Transform::from_xyz(0.0, 1.0, 28.0)))
            .id();

        advance(&mut app, 0.1);
        assert_eq!(message_count(&app), 1);
        let pulled = app.world().get::<Transform>(player).unwrap().translation;
        assert!((pulled - Vec3::new(0.0, 1.0, 26.0)).length() < 1e-4);

        // Still pressing against the edge
        app.world_mut().get_mut::<Transform>(player).unwrap().translation.z = 27.5;
        advance(&mut app, 0.5);
        assert_eq!(message_count(&app), 0);

        app.world_mut().get_mut::<Transform>(player).unwrap().translation.z = 27.5;
        advance(&mut app, 2.0);
        assert_eq!(message_count(&app), 1);
        assert_eq!(
            app.world().resource::<MessageBoard>().current(),
            Some("You cannot leave yet. Find the key to unlock the barrier!")
        );
    }
}
