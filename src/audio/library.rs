//! Sound clip handles resolved from the audio config.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_kira_audio::AudioSource;

use crate::core::{AudioConfig, SoundCue};

/// Loaded handles for every configured cue and music track.
#[derive(Resource, Default)]
pub struct SoundLibrary {
    sounds: HashMap<SoundCue, Handle<AudioSource>>,
    menu_music: Option<Handle<AudioSource>>,
    gameplay_music: Option<Handle<AudioSource>>,
}

impl SoundLibrary {
    pub fn sound(&self, cue: SoundCue) -> Option<Handle<AudioSource>> {
        self.sounds.get(&cue).cloned()
    }

    pub fn music(&self, track: MusicTrack) -> Option<Handle<AudioSource>> {
        match track {
            MusicTrack::Menu => self.menu_music.clone(),
            MusicTrack::Gameplay => self.gameplay_music.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Gameplay,
}

/// The track the music channel is playing.
#[derive(Resource, Debug, Default)]
pub struct CurrentMusic(pub Option<MusicTrack>);

impl CurrentMusic {
    /// Record a switch. Returns false if `track` is already playing.
    pub fn switch_to(&mut self, track: MusicTrack) -> bool {
        if self.0 == Some(track) {
            return false;
        }
        self.0 = Some(track);
        true
    }
}

/// Which channel a cue is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueChannel {
    Effects,
    Ui,
}

pub fn channel_for(cue: SoundCue) -> CueChannel {
    match cue {
        SoundCue::ButtonClick | SoundCue::PageFlip => CueChannel::Ui,
        _ => CueChannel::Effects,
    }
}

/// Start loading every clip named in the audio config.
pub fn load_sound_library(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<AudioConfig>,
) {
    let sounds: HashMap<_, _> = config
        .sounds
        .iter()
        .map(|(cue, path)| (*cue, asset_server.load(path.clone())))
        .collect();
    info!("Loading {} sound cue(s)", sounds.len());

    commands.insert_resource(SoundLibrary {
        sounds,
        menu_music: config.menu_music.clone().map(|path| asset_server.load(path)),
        gameplay_music: config.gameplay_music.clone().map(|path| asset_server.load(path)),
    });
}
