//! Audio module - sound cues and background music.

mod library;
mod plugin;

pub use library::{CurrentMusic, MusicTrack, SoundLibrary};
pub use plugin::{AudioCuePlugin, MusicChannel, UiChannel};
