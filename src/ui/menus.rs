//! Start screen, volume panel and death screen.

use bevy::prelude::*;

use super::widgets::{spawn_menu_button, spawn_small_button, MenuButton};
use crate::core::{GameState, InterfaceConfig, MenuOverlay};
use crate::persistence::Settings;

/// Marker for start screen UI entities.
#[derive(Component)]
struct StartScreenUi;

/// Marker for volume panel UI entities.
#[derive(Component)]
struct VolumePanelUi;

/// Text showing the current volume.
#[derive(Component)]
struct VolumeLabel;

/// Marker for death screen UI entities.
#[derive(Component)]
struct DeathScreenUi;

/// Fade-in of the death screen, in real time.
#[derive(Component)]
pub struct DeathFade {
    pub timer: Timer,
}

/// Background alpha the death screen fades up to.
const DEATH_SCREEN_ALPHA: f32 = 0.85;

pub fn setup_menu_systems(app: &mut App) {
    app
        // Start screen
        .add_systems(OnEnter(GameState::StartScreen), setup_start_screen)
        .add_systems(OnExit(GameState::StartScreen), cleanup::<StartScreenUi>)

        // Volume panel
        .add_systems(Update, toggle_volume_panel)
        .add_systems(OnEnter(MenuOverlay::Volume), (setup_volume_panel, pause_time))
        .add_systems(OnExit(MenuOverlay::Volume), (cleanup::<VolumePanelUi>, resume_time))
        .add_systems(
            Update,
            update_volume_label.run_if(in_state(MenuOverlay::Volume)),
        )

        // Death screen
        .add_systems(OnEnter(GameState::Dead), setup_death_screen)
        .add_systems(Update, fade_death_screen.run_if(in_state(GameState::Dead)))
        .add_systems(OnExit(GameState::Dead), cleanup::<DeathScreenUi>);
}

/// Set up the start screen over the forest.
fn setup_start_screen(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.02, 0.04, 0.03, 0.75)),
            StartScreenUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("GRIMOIRE WOODS"),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.8, 0.6)),
                Node {
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::new("[V] Volume"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.55)),
                Node {
                    margin: UiRect::bottom(Val::Px(50.0)),
                    ..default()
                },
            ));

            spawn_menu_button(parent, "Start", MenuButton::Start);
        });
}

/// V opens and closes the volume panel, except during the intro.
fn toggle_volume_panel(
    keyboard: Res<ButtonInput<KeyCode>>,
    game_state: Res<State<GameState>>,
    overlay: Res<State<MenuOverlay>>,
    mut next_overlay: ResMut<NextState<MenuOverlay>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyV) {
        return;
    }
    if matches!(game_state.get(), GameState::Loading | GameState::Intro) {
        return;
    }
    next_overlay.set(match overlay.get() {
        MenuOverlay::Closed => MenuOverlay::Volume,
        MenuOverlay::Volume => MenuOverlay::Closed,
    });
}

fn volume_text(volume: f32) -> String {
    format!("Music Volume: {}%", (volume * 100.0).round() as i32)
}

fn setup_volume_panel(mut commands: Commands, settings: Res<Settings>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GlobalZIndex(10),
            VolumePanelUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("SETTINGS"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                })
                .with_children(|row| {
                    spawn_small_button(row, "-", MenuButton::VolumeDown);
                    row.spawn((
                        Text::new(volume_text(settings.music_volume)),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.8, 0.85)),
                        Node {
                            width: Val::Px(260.0),
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                        TextLayout::new_with_justify(JustifyText::Center),
                        VolumeLabel,
                    ));
                    spawn_small_button(row, "+", MenuButton::VolumeUp);
                });

            spawn_menu_button(parent, "Restart", MenuButton::Restart);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
}

fn update_volume_label(settings: Res<Settings>, mut labels: Query<&mut Text, With<VolumeLabel>>) {
    if !settings.is_changed() {
        return;
    }
    for mut label in labels.iter_mut() {
        label.0 = volume_text(settings.music_volume);
    }
}

fn pause_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn resume_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}

/// Set up the death screen, fully transparent until it fades in.
fn setup_death_screen(mut commands: Commands, config: Res<InterfaceConfig>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.0, 0.0, 0.0)),
            DeathFade {
                timer: Timer::from_seconds(config.death_fade_duration.max(0.0), TimerMode::Once),
            },
            DeathScreenUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("YOU DIED"),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.2, 0.2, 0.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(60.0)),
                    ..default()
                },
            ));

            spawn_menu_button(parent, "Restart", MenuButton::Respawn);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
}

/// Fade the death screen in. Uses real time so it runs while paused.
pub fn fade_death_screen(
    time: Res<Time<Real>>,
    mut screens: Query<(&mut DeathFade, &mut BackgroundColor, &Children)>,
    mut texts: Query<&mut TextColor>,
) {
    for (mut fade, mut background, children) in screens.iter_mut() {
        if fade.timer.finished() {
            continue;
        }
        fade.timer.tick(time.delta());
        let progress = fade.timer.fraction();

        background.0.set_alpha(progress * DEATH_SCREEN_ALPHA);
        for child in children.iter() {
            if let Ok(mut color) = texts.get_mut(*child) {
                color.0.set_alpha(progress);
            }
        }
    }
}

fn cleanup<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    #[test]
    fn volume_text_is_a_percentage() {
        assert_eq!(volume_text(1.0), "Music Volume: 100%");
        assert_eq!(volume_text(0.3), "Music Volume: 30%");
    }

    fn overlay_app(state: GameState) -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Time<Virtual>>()
            .init_resource::<Settings>()
            .insert_state(state)
            .init_state::<MenuOverlay>()
            .add_systems(Update, toggle_volume_panel)
            .add_systems(OnEnter(MenuOverlay::Volume), (setup_volume_panel, pause_time))
            .add_systems(OnExit(MenuOverlay::Volume), (cleanup::<VolumePanelUi>, resume_time));
        app
    }

    fn press_v(app: &mut App) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.release_all();
        keyboard.clear();
        keyboard.press(KeyCode::KeyV);
        app.update();
        app.update();
    }

    #[test]
    fn volume_panel_pauses_game_time() {
        let mut app = overlay_app(GameState::InGame);

        press_v(&mut app);
        assert_eq!(*app.world().resource::<State<MenuOverlay>>().get(), MenuOverlay::Volume);
        assert!(app.world().resource::<Time<Virtual>>().is_paused());

        press_v(&mut app);
        assert_eq!(*app.world().resource::<State<MenuOverlay>>().get(), MenuOverlay::Closed);
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
        let panels = app
            .world_mut()
            .query_filtered::<(), With<VolumePanelUi>>()
            .iter(app.world())
            .count();
        assert_eq!(panels, 0);
    }

    #[test]
    fn volume_panel_stays_shut_during_intro() {
        let mut app = overlay_app(GameState::Intro);
        press_v(&mut app);
        assert_eq!(*app.world().resource::<State<MenuOverlay>>().get(), MenuOverlay::Closed);
    }

    #[test]
    fn death_screen_fades_in_over_real_time() {
        let mut app = App::new();
        app.init_resource::<Time<Real>>()
            .add_systems(Update, fade_death_screen);

        let text = app
            .world_mut()
            .spawn(TextColor(Color::srgba(0.8, 0.2, 0.2, 0.0)))
            .id();
        let screen = app
            .world_mut()
            .spawn((
                BackgroundColor(Color::srgba(0.1, 0.0, 0.0, 0.0)),
                DeathFade {
                    timer: Timer::from_seconds(1.0, TimerMode::Once),
                },
            ))
            .add_child(text)
            .id();

        let mut real = app.world_mut().resource_mut::<Time<Real>>();
        real.update_with_duration(Duration::ZERO);
        real.update_with_duration(Duration::from_millis(500));
        app.update();

        let alpha = app.world().get::<BackgroundColor>(screen).unwrap().0.alpha();
        assert!((alpha - 0.5 * DEATH_SCREEN_ALPHA).abs() < 0.01);
        let text_alpha = app.world().get::<TextColor>(text).unwrap().0.alpha();
        assert!((text_alpha - 0.5).abs() < 0.01);
    }
}
