//! Shared menu button widget and its actions.

use bevy::prelude::*;

use crate::core::{GameState, InterfaceConfig, MenuOverlay, PlaySound, RespawnRequested, SoundCue};
use crate::persistence::Settings;

use super::intro::IntroSequence;

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// What a menu button does when pressed.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuButton {
    Start,
    SkipIntro,
    VolumeDown,
    VolumeUp,
    /// Back to the start screen
    Restart,
    /// Back to the last save point
    Respawn,
    Quit,
}

/// Helper to spawn a menu button.
pub fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// Small square button, used for the volume -/+ controls.
pub fn spawn_small_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(50.0),
                height: Val::Px(50.0),
                margin: UiRect::horizontal(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// Tint buttons on hover and press.
pub fn button_colors(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<MenuButton>)>,
) {
    for (interaction, mut bg_color) in buttons.iter_mut() {
        *bg_color = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        }
        .into();
    }
}

/// Run the action of every button pressed this frame.
#[allow(clippy::too_many_arguments)]
pub fn handle_menu_buttons(
    buttons: Query<(&Interaction, &MenuButton), Changed<Interaction>>,
    config: Res<InterfaceConfig>,
    mut settings: ResMut<Settings>,
    mut intro: Option<ResMut<IntroSequence>>,
    mut next_game: ResMut<NextState<GameState>>,
    mut next_overlay: ResMut<NextState<MenuOverlay>>,
    mut respawn: EventWriter<RespawnRequested>,
    mut sounds: EventWriter<PlaySound>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        sounds.send(PlaySound(SoundCue::ButtonClick));

        match button {
            MenuButton::Start => {
                info!("Starting game");
                next_game.set(GameState::Intro);
            }
            MenuButton::SkipIntro => {
                if let Some(intro) = intro.as_mut() {
                    intro.skip();
                }
            }
            MenuButton::VolumeDown => {
                settings.adjust_music_volume(-config.volume_step);
            }
            MenuButton::VolumeUp => {
                settings.adjust_music_volume(config.volume_step);
            }
            MenuButton::Restart => {
                info!("Restarting from the start screen");
                next_overlay.set(MenuOverlay::Closed);
                next_game.set(GameState::StartScreen);
            }
            MenuButton::Respawn => {
                respawn.send(RespawnRequested);
                next_game.set(GameState::InGame);
            }
            MenuButton::Quit => {
                info!("Quitting");
                exit.send(AppExit::Success);
            }
        }
    }
}
