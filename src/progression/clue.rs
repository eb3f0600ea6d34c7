//! The current clue and the C key that shows it again.

use std::time::Duration;

use bevy::prelude::*;

use super::events::BarrierUnlocked;
use crate::core::{InterfaceConfig, ShowMessage};

/// The one active clue, replaced wholesale by each save point.
#[derive(Resource, Debug, Default)]
pub struct ClueBoard {
    text: String,
    active: bool,
    /// Running while the clue is on screen
    showing: Option<Timer>,
}

impl ClueBoard {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.active = true;
        info!("Clue set: {}", self.text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.active = false;
        info!("Clue cleared");
    }

    pub fn has_active(&self) -> bool {
        self.active && !self.text.is_empty()
    }

    pub fn text(&self) -> Option<&str> {
        self.has_active().then_some(self.text.as_str())
    }

    pub fn is_showing(&self) -> bool {
        self.showing.is_some()
    }

    /// Start showing the clue. Returns the message text, or `None` if there
    /// is nothing to show or it is already up.
    pub fn show(&mut self, duration: f32) -> Option<String> {
        if !self.has_active() || self.is_showing() {
            return None;
        }
        self.showing = Some(Timer::from_seconds(duration.max(0.0), TimerMode::Once));
        Some(format!("CLUE: {}", self.text))
    }

    pub fn tick(&mut self, delta: Duration) {
        let done = self
            .showing
            .as_mut()
            .is_some_and(|timer| timer.tick(delta).finished());
        if done {
            self.showing = None;
        }
    }
}

/// C shows the active clue for a few seconds.
pub fn view_clue(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<InterfaceConfig>,
    mut clue: ResMut<ClueBoard>,
    mut messages: EventWriter<ShowMessage>,
) {
    clue.tick(time.delta());

    if !keyboard.just_pressed(KeyCode::KeyC) {
        return;
    }
    if let Some(text) = clue.show(config.clue_display_time) {
        messages.send(ShowMessage::new(text, config.clue_display_time));
    }
}

/// A cleared location has no use for its clue.
pub fn clear_clue_on_unlock(
    mut unlocked: EventReader<BarrierUnlocked>,
    mut clue: ResMut<ClueBoard>,
) {
    if unlocked.read().last().is_some() && clue.has_active() {
        clue.clear();
    }
}
