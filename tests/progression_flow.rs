//! Drives a headless app through a location: save point, barrier, key or
//! enemies, and back out.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use grimoire_woods::combat::{apply_damage, Health};
use grimoire_woods::core::{
    CorePlugin, DamageEvent, GameState, GameplaySet, MessageBoard,
};
use grimoire_woods::enemies::{
    AiState, Dormant, Enemy, EnemyKind, EnemyMemory, EnemyPlugin, EnemyRegistry,
};
use grimoire_woods::player::{MovementState, Player, SpawnPoint};
use grimoire_woods::progression::{
    Barrier, ClueBoard, KeyItem, KeyState, ProgressionPlugin, SavePoint, UnlockCondition,
};

const BARRIER_CENTER: Vec3 = Vec3::new(0.0, 0.0, -20.0);
const SAVE_POINT: Vec3 = Vec3::new(0.0, 1.0, -5.0);

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(StatesPlugin)
        .init_resource::<Time>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<SpawnPoint>()
        .add_plugins((CorePlugin, EnemyPlugin, ProgressionPlugin))
        .add_systems(Update, apply_damage.in_set(GameplaySet::Damage));

    // Loading -> StartScreen happens on its own; then straight into play
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    app
}

fn step(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

fn spawn_player(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Health::new(100.0),
            MovementState::default(),
            Transform::from_xyz(0.0, 1.0, 25.0),
        ))
        .id()
}

fn spawn_barrier(app: &mut App, unlock: UnlockCondition) -> Entity {
    app.world_mut()
        .spawn((
            Barrier::new("Location Barrier", 30.0, 3.0, unlock),
            Transform::from_translation(BARRIER_CENTER),
        ))
        .id()
}

fn spawn_save_point(app: &mut App, barrier: Entity, keys: Vec<Entity>, enemies: Vec<Entity>) -> Entity {
    let mut save_point = SavePoint::new("Location 1");
    save_point.barrier = Some(barrier);
    save_point.keys = keys;
    save_point.enemies = enemies;
    save_point.clue = Some("It is sweet, it's oh so plenty! and oh it's red.".to_string());
    app.world_mut()
        .spawn((save_point, Transform::from_translation(SAVE_POINT)))
        .id()
}

fn move_player(app: &mut App, player: Entity, to: Vec3) {
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = to;
}

fn barrier_active(app: &App, barrier: Entity) -> bool {
    app.world().get::<Barrier>(barrier).unwrap().active
}

#[test]
fn single_key_location_from_save_point_to_exit() {
    let mut app = app();
    let player = spawn_player(&mut app);
    let barrier = spawn_barrier(&mut app, UnlockCondition::SingleKey);
    let key = app
        .world_mut()
        .spawn((
            KeyItem::new("Mysterious Key", Some(barrier), 1.0),
            Transform::from_xyz(12.0, 1.0, -30.0),
            Visibility::Hidden,
        ))
        .id();
    spawn_save_point(&mut app, barrier, vec![key], vec![]);

    // Walking around outside does nothing
    step(&mut app, 0.1);
    assert!(!barrier_active(&app, barrier));

    move_player(&mut app, player, SAVE_POINT);
    step(&mut app, 0.1);

    assert!(barrier_active(&app, barrier));
    assert_eq!(app.world().resource::<SpawnPoint>().position, SAVE_POINT);
    assert_eq!(app.world().get::<KeyItem>(key).unwrap().state, KeyState::Spawned);
    assert_eq!(app.world().get::<Visibility>(key), Some(&Visibility::Inherited));

    // The clue follows after its delay
    assert!(!app.world().resource::<ClueBoard>().has_active());
    step(&mut app, 2.1);
    assert!(app.world().resource::<ClueBoard>().has_active());
    step(&mut app, 0.0);
    assert!(app
        .world()
        .resource::<MessageBoard>()
        .current()
        .is_some_and(|message| message.starts_with("CLUE: ")));

    // The barrier holds the player in
    move_player(&mut app, player, Vec3::new(0.0, 1.0, 25.0));
    step(&mut app, 0.1);
    let position = app.world().get::<Transform>(player).unwrap().translation;
    let planar = Vec2::new(position.x - BARRIER_CENTER.x, position.z - BARRIER_CENTER.z);
    assert!(planar.length() < 27.0);

    // Pick up the key
    move_player(&mut app, player, Vec3::new(11.0, 1.0, -29.0));
    step(&mut app, 0.1);
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyE);
    step(&mut app, 0.1);

    assert_eq!(app.world().get::<KeyItem>(key).unwrap().state, KeyState::Collected);
    assert!(!barrier_active(&app, barrier));
    assert!(!app.world().resource::<ClueBoard>().has_active());

    // Free to leave now
    move_player(&mut app, player, Vec3::new(0.0, 1.0, 25.0));
    step(&mut app, 0.1);
    assert_eq!(
        app.world().get::<Transform>(player).unwrap().translation,
        Vec3::new(0.0, 1.0, 25.0)
    );

    // The collected key goes away shortly after
    step(&mut app, 0.6);
    step(&mut app, 0.0);
    assert!(!app.world().entities().contains(key));
}

#[test]
fn defeat_enemies_location_opens_when_the_goblin_dies() {
    let mut app = app();
    let player = spawn_player(&mut app);
    let barrier = spawn_barrier(
        &mut app,
        UnlockCondition::DefeatEnemies {
            tracked: Vec::new(),
            initial: 0,
            auto_find: true,
        },
    );

    let registry = EnemyRegistry::embedded();
    let goblin = registry.get("goblin").unwrap();
    let enemy = app
        .world_mut()
        .spawn((
            Enemy,
            Name::new(goblin.name.clone()),
            EnemyKind("goblin".to_string()),
            AiState::default(),
            EnemyMemory::default(),
            goblin.stats.clone(),
            Health::new(goblin.stats.max_health.unwrap()),
            Transform::from_xyz(4.0, 1.0, -30.0),
            Dormant,
            Visibility::Hidden,
        ))
        .id();
    spawn_save_point(&mut app, barrier, vec![], vec![enemy]);

    move_player(&mut app, player, SAVE_POINT);
    step(&mut app, 0.1);
    step(&mut app, 0.0);

    assert!(barrier_active(&app, barrier));
    assert_eq!(app.world().get::<Barrier>(barrier).unwrap().remaining_enemies(), 1);
    assert!(app.world().get::<Dormant>(enemy).is_none());

    app.world_mut().send_event(DamageEvent {
        target: enemy,
        source: Some(player),
        amount: 1000.0,
    });
    step(&mut app, 0.1);
    step(&mut app, 0.0);

    assert!(!app.world().entities().contains(enemy));
    assert!(!barrier_active(&app, barrier));
}

#[test]
fn a_save_point_fires_only_once() {
    let mut app = app();
    let player = spawn_player(&mut app);
    let barrier = spawn_barrier(&mut app, UnlockCondition::SingleKey);
    let save_point = spawn_save_point(&mut app, barrier, vec![], vec![]);

    move_player(&mut app, player, SAVE_POINT);
    step(&mut app, 0.1);
    assert!(app.world().get::<SavePoint>(save_point).unwrap().activated);

    // Unlock by hand, then stand on the save point again
    app.world_mut().get_mut::<Barrier>(barrier).unwrap().unlock();
    step(&mut app, 0.1);
    step(&mut app, 0.1);
    assert!(!barrier_active(&app, barrier));
}

fn spawn_key(app: &mut App, name: &str, barrier: Entity, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            KeyItem::new(name, Some(barrier), position.y),
            Transform::from_translation(position),
            Visibility::Hidden,
        ))
        .id()
}

fn collect_key_at(app: &mut App, player: Entity, key_position: Vec3) {
    move_player(app, player, key_position + Vec3::new(1.0, 0.0, 1.0));
    step(app, 0.1);
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyE);
    step(app, 0.1);
    step(app, 0.0);

    let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keyboard.release(KeyCode::KeyE);
    keyboard.clear();
}

fn current_message(app: &App) -> Option<String> {
    app.world()
        .resource::<MessageBoard>()
        .current()
        .map(str::to_string)
}

fn spawn_goblin(app: &mut App, position: Vec3) -> Entity {
    let registry = EnemyRegistry::embedded();
    let goblin = registry.get("goblin").unwrap();
    app.world_mut()
        .spawn((
            Enemy,
            Name::new(goblin.name.clone()),
            EnemyKind("goblin".to_string()),
            AiState::default(),
            EnemyMemory::default(),
            goblin.stats.clone(),
            Health::new(goblin.stats.max_health.unwrap()),
            Transform::from_translation(position),
            Dormant,
            Visibility::Hidden,
        ))
        .id()
}

#[test]
fn multi_key_location_needs_every_key() {
    let mut app = app();
    let player = spawn_player(&mut app);
    let barrier = spawn_barrier(
        &mut app,
        UnlockCondition::MultiKey {
            required: 2,
            collected: 0,
        },
    );
    let oak_at = Vec3::new(-12.0, 1.0, -30.0);
    let shrine_at = Vec3::new(10.0, 1.0, -10.0);
    let oak = spawn_key(&mut app, "Oak Key", barrier, oak_at);
    let shrine = spawn_key(&mut app, "Shrine Key", barrier, shrine_at);
    spawn_save_point(&mut app, barrier, vec![oak, shrine], vec![]);

    move_player(&mut app, player, SAVE_POINT);
    step(&mut app, 0.1);
    assert!(barrier_active(&app, barrier));
    for key in [oak, shrine] {
        assert_eq!(app.world().get::<KeyItem>(key).unwrap().state, KeyState::Spawned);
    }
    step(&mut app, 2.1);
    assert!(app.world().resource::<ClueBoard>().has_active());

    collect_key_at(&mut app, player, oak_at);
    assert_eq!(app.world().get::<KeyItem>(oak).unwrap().state, KeyState::Collected);
    assert!(barrier_active(&app, barrier));
    assert_eq!(current_message(&app).as_deref(), Some("Key found! (1/2)"));
    assert!(app.world().resource::<ClueBoard>().has_active());

    collect_key_at(&mut app, player, shrine_at);
    assert_eq!(app.world().get::<KeyItem>(shrine).unwrap().state, KeyState::Collected);
    assert!(!barrier_active(&app, barrier));
    assert_eq!(
        current_message(&app).as_deref(),
        Some("All keys found! Barrier unlocked! You can now continue.")
    );
    assert!(!app.world().resource::<ClueBoard>().has_active());
}

#[test]
fn listed_enemies_are_the_only_ones_that_count() {
    let mut app = app();
    let player = spawn_player(&mut app);
    let barrier = spawn_barrier(
        &mut app,
        UnlockCondition::DefeatEnemies {
            tracked: Vec::new(),
            initial: 0,
            auto_find: false,
        },
    );
    let first = spawn_goblin(&mut app, Vec3::new(4.0, 1.0, -30.0));
    let second = spawn_goblin(&mut app, Vec3::new(-8.0, 1.0, -32.0));
    // Inside the barrier but not part of this fight
    let onlooker = app
        .world_mut()
        .spawn((Enemy, Health::new(50.0), Transform::from_xyz(0.0, 1.0, -25.0)))
        .id();
    spawn_save_point(&mut app, barrier, vec![], vec![first, second]);

    move_player(&mut app, player, SAVE_POINT);
    step(&mut app, 0.1);
    step(&mut app, 0.0);
    assert!(barrier_active(&app, barrier));
    assert_eq!(app.world().get::<Barrier>(barrier).unwrap().remaining_enemies(), 2);

    app.world_mut().send_event(DamageEvent {
        target: first,
        source: Some(player),
        amount: 1000.0,
    });
    step(&mut app, 0.1);
    step(&mut app, 0.0);
    assert!(barrier_active(&app, barrier));
    assert_eq!(app.world().get::<Barrier>(barrier).unwrap().remaining_enemies(), 1);

    app.world_mut().send_event(DamageEvent {
        target: second,
        source: Some(player),
        amount: 1000.0,
    });
    step(&mut app, 0.1);
    step(&mut app, 0.0);
    assert!(!barrier_active(&app, barrier));
    assert!(app.world().entities().contains(onlooker));
}
