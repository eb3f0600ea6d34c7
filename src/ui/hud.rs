//! In-game HUD - health, messages, clue prompt and weapon display.

use bevy::prelude::*;

use crate::combat::{Ammo, Grimoire, Health, WeaponLoadout, WeaponSlot};
use crate::core::{GameState, MessageBoard};
use crate::player::Player;
use crate::progression::ClueBoard;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// The message panel text.
#[derive(Component)]
pub struct MessageText;

/// "[C] View Clue" prompt.
#[derive(Component)]
pub struct CluePrompt;

#[derive(Component)]
pub struct WeaponLabel;

#[derive(Component)]
pub struct WeaponHint;

#[derive(Component)]
pub struct AmmoLabel;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                update_health_bar,
                update_message_panel,
                update_clue_prompt,
                update_weapon_display,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn hud_text(text: &str, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// Spawn the HUD UI.
pub fn spawn_hud(mut commands: Commands) {
    // Bottom-left: weapon, ammo and health
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(12.0),
                    margin: UiRect::bottom(Val::Px(4.0)),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        hud_text("Weapon: Hands", 18.0, Color::srgb(0.85, 0.85, 0.8)),
                        WeaponLabel,
                    ));
                    row.spawn((
                        hud_text("[2] Grimoire", 14.0, Color::srgb(0.55, 0.55, 0.6)),
                        WeaponHint,
                    ));
                });

            parent.spawn((
                hud_text("", 16.0, Color::srgb(0.9, 0.6, 0.3)),
                Node {
                    margin: UiRect::bottom(Val::Px(6.0)),
                    ..default()
                },
                Visibility::Hidden,
                AmmoLabel,
            ));

            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
        });

    // Top center: message panel, with the clue prompt under it
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::top(Val::Px(40.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                hud_text("", 24.0, Color::srgb(0.95, 0.92, 0.85)),
                TextLayout::new_with_justify(JustifyText::Center),
                Node {
                    max_width: Val::Px(800.0),
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
                Visibility::Hidden,
                MessageText,
            ));
            parent.spawn((
                hud_text("[C] View Clue", 16.0, Color::srgb(0.7, 0.8, 0.95)),
                Node {
                    margin: UiRect::top(Val::Px(8.0)),
                    ..default()
                },
                Visibility::Hidden,
                CluePrompt,
            ));
        });

    // Crosshair (center of screen)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                hud_text(label, 14.0, Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&Health, With<Player>>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(health.percentage() * 100.0);
}

fn update_message_panel(
    board: Res<MessageBoard>,
    mut panel: Query<(&mut Text, &mut Visibility), With<MessageText>>,
) {
    let Ok((mut text, mut visibility)) = panel.get_single_mut() else {
        return;
    };
    match board.current() {
        Some(message) => {
            if text.0 != message {
                text.0 = message.to_string();
            }
            visibility.set_if_neq(Visibility::Inherited);
        }
        None => {
            visibility.set_if_neq(Visibility::Hidden);
        }
    }
}

fn update_clue_prompt(clue: Res<ClueBoard>, mut prompt: Query<&mut Visibility, With<CluePrompt>>) {
    let visible = clue.has_active() && !clue.is_showing();
    for mut visibility in prompt.iter_mut() {
        visibility.set_if_neq(if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}

/// Ammo counter text, shown only for limited ammo.
pub fn ammo_text(ammo: &Ammo) -> Option<String> {
    match ammo {
        Ammo::Unlimited => None,
        Ammo::Limited { current, max } => Some(format!("Ammo: {}/{}", current, max)),
    }
}

#[allow(clippy::type_complexity)]
fn update_weapon_display(
    player_query: Query<(&WeaponLoadout, Option<&Grimoire>), With<Player>>,
    mut labels: Query<&mut Text, (With<WeaponLabel>, Without<WeaponHint>, Without<AmmoLabel>)>,
    mut hints: Query<&mut Text, (With<WeaponHint>, Without<WeaponLabel>, Without<AmmoLabel>)>,
    mut ammo_labels: Query<(&mut Text, &mut Visibility), (With<AmmoLabel>, Without<WeaponLabel>, Without<WeaponHint>)>,
) {
    let Ok((loadout, grimoire)) = player_query.get_single() else {
        return;
    };
    let slot: WeaponSlot = loadout.current;

    for mut label in labels.iter_mut() {
        let text = format!("Weapon: {}", slot.label());
        if label.0 != text {
            label.0 = text;
        }
    }
    for mut hint in hints.iter_mut() {
        if hint.0 != slot.switch_hint() {
            hint.0 = slot.switch_hint().to_string();
        }
    }

    let ammo = grimoire.and_then(|grimoire| ammo_text(&grimoire.ammo));
    for (mut text, mut visibility) in ammo_labels.iter_mut() {
        match &ammo {
            Some(ammo) => {
                if &text.0 != ammo {
                    text.0 = ammo.clone();
                }
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
