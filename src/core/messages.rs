//! On-screen message board.
//!
//! Any system can send a `ShowMessage`; the most recent one wins and stays
//! up for its own duration. The UI reads `MessageBoard` to draw the panel.

use std::time::Duration;

use bevy::prelude::*;

use super::events::ShowMessage;

/// The message currently on screen.
#[derive(Debug)]
pub struct DisplayedMessage {
    pub text: String,
    timer: Timer,
}

/// Resource holding the active message, if any.
#[derive(Resource, Default, Debug)]
pub struct MessageBoard {
    current: Option<DisplayedMessage>,
}

impl MessageBoard {
    /// Replace the current message.
    pub fn show(&mut self, text: impl Into<String>, duration: f32) {
        self.current = Some(DisplayedMessage {
            text: text.into(),
            timer: Timer::from_seconds(duration.max(0.0), TimerMode::Once),
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Text of the message on screen.
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|message| message.text.as_str())
    }

    pub fn tick(&mut self, delta: Duration) {
        let expired = match self.current.as_mut() {
            Some(message) => message.timer.tick(delta).finished(),
            None => false,
        };
        if expired {
            self.current = None;
        }
    }
}

/// Hide messages whose time is up.
pub fn expire_messages(time: Res<Time>, mut board: ResMut<MessageBoard>) {
    board.tick(time.delta());
}

/// Move queued `ShowMessage` events onto the board.
pub fn receive_messages(mut events: EventReader<ShowMessage>, mut board: ResMut<MessageBoard>) {
    for event in events.read() {
        debug!("Message: {}", event.text);
        board.show(event.text.clone(), event.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_message_replaces_previous() {
        let mut board = MessageBoard::default();
        board.show("Save Point Activated: Location 1", 3.0);
        board.show("CLUE: It is sweet", 6.0);
        assert_eq!(board.current(), Some("CLUE: It is sweet"));

        // The replacing message keeps its own duration.
        board.tick(Duration::from_secs_f32(4.0));
        assert_eq!(board.current(), Some("CLUE: It is sweet"));
        board.tick(Duration::from_secs_f32(2.5));
        assert_eq!(board.current(), None);
    }

    #[test]
    fn events_reach_the_board() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<MessageBoard>()
            .add_event::<ShowMessage>()
            .add_systems(Update, (expire_messages, receive_messages).chain());

        app.world_mut()
            .send_event(ShowMessage::new("Barrier unlocked! You can now continue.", 4.0));
        app.update();

        let board = app.world().resource::<MessageBoard>();
        assert_eq!(board.current(), Some("Barrier unlocked! You can now continue."));
    }
}
