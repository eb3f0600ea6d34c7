//! Intro cutscene: a skippable title card, then the opening dialogue line.

use std::time::Duration;

use bevy::prelude::*;

use super::widgets::{spawn_menu_button, MenuButton};
use crate::core::{GameState, InterfaceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroStage {
    Card,
    Dialogue,
    Finished,
}

/// Progress through the intro. Inserted on entering `GameState::Intro`.
#[derive(Resource, Debug)]
pub struct IntroSequence {
    pub stage: IntroStage,
    timer: Timer,
    dialogue_duration: f32,
}

impl IntroSequence {
    pub fn new(card_duration: f32, dialogue_duration: f32) -> Self {
        Self {
            stage: IntroStage::Card,
            timer: Timer::from_seconds(card_duration.max(0.0), TimerMode::Once),
            dialogue_duration,
        }
    }

    /// Jump from the card straight to the dialogue.
    pub fn skip(&mut self) {
        if self.stage == IntroStage::Card {
            self.begin_dialogue();
        }
    }

    /// Advance the timer. Returns true when the stage changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.timer.tick(delta).finished() {
            return false;
        }
        match self.stage {
            IntroStage::Card => self.begin_dialogue(),
            IntroStage::Dialogue => self.stage = IntroStage::Finished,
            IntroStage::Finished => return false,
        }
        true
    }

    fn begin_dialogue(&mut self) {
        self.stage = IntroStage::Dialogue;
        self.timer = Timer::from_seconds(self.dialogue_duration.max(0.0), TimerMode::Once);
    }
}

#[derive(Component)]
pub struct IntroUi;

#[derive(Component)]
pub struct IntroText;

pub fn setup_intro_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::Intro), spawn_intro)
        .add_systems(
            Update,
            (skip_intro_on_escape, advance_intro, sync_intro_ui)
                .chain()
                .run_if(in_state(GameState::Intro)),
        )
        .add_systems(OnExit(GameState::Intro), cleanup_intro);
}

fn spawn_intro(mut commands: Commands, config: Res<InterfaceConfig>) {
    commands.insert_resource(IntroSequence::new(
        config.intro_card_duration,
        config.dialogue_duration,
    ));

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
            BackgroundColor(Color::BLACK),
            IntroUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(config.intro_card_text.clone()),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.82, 0.75)),
                TextLayout::new_with_justify(JustifyText::Center),
                Node {
                    max_width: Val::Px(900.0),
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
                IntroText,
            ));

            spawn_menu_button(parent, "Skip", MenuButton::SkipIntro);
        });
}

fn skip_intro_on_escape(keyboard: Res<ButtonInput<KeyCode>>, mut intro: ResMut<IntroSequence>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        intro.skip();
    }
}

fn advance_intro(
    time: Res<Time>,
    mut intro: ResMut<IntroSequence>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    intro.tick(time.delta());
    if intro.stage == IntroStage::Finished {
        info!("Intro finished");
        next_state.set(GameState::InGame);
    }
}

/// Swap the card for the dialogue once the stage changes.
fn sync_intro_ui(
    intro: Res<IntroSequence>,
    config: Res<InterfaceConfig>,
    mut root: Query<&mut BackgroundColor, With<IntroUi>>,
    mut text: Query<&mut Text, With<IntroText>>,
    mut buttons: Query<(&MenuButton, &mut Visibility)>,
) {
    if !intro.is_changed() || intro.stage != IntroStage::Dialogue {
        return;
    }

    // Let the forest show through behind the line
    for mut background in root.iter_mut() {
        background.0 = Color::srgba(0.0, 0.0, 0.0, 0.35);
    }
    for mut line in text.iter_mut() {
        line.0 = format!("\"{}\"", config.intro_dialogue);
    }
    for (button, mut visibility) in buttons.iter_mut() {
        if *button == MenuButton::SkipIntro {
            *visibility = Visibility::Hidden;
        }
    }
}

fn cleanup_intro(mut commands: Commands, query: Query<Entity, With<IntroUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<IntroSequence>();
}
