//! Audio plugin - sound cues and music on kira channels.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioApp, AudioChannel, AudioControl};

use super::library::*;
use crate::core::{GameState, PlaySound};
use crate::persistence::Settings;

/// Channel for looping background music.
#[derive(Resource)]
pub struct MusicChannel;

/// Channel for interface sounds (clicks, page flips).
#[derive(Resource)]
pub struct UiChannel;

/// Plays `PlaySound` cues and switches music with the game state.
///
/// Requires `bevy_kira_audio::AudioPlugin`.
pub struct AudioCuePlugin;

impl Plugin for AudioCuePlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_channel::<MusicChannel>()
            .add_audio_channel::<UiChannel>()
            .init_resource::<CurrentMusic>()
            .add_systems(Startup, load_sound_library)
            .add_systems(OnEnter(GameState::StartScreen), play_menu_music)
            .add_systems(OnEnter(GameState::InGame), play_gameplay_music)
            .add_systems(Update, (play_sound_cues, apply_volume));
    }
}

fn play_sound_cues(
    mut events: EventReader<PlaySound>,
    library: Option<Res<SoundLibrary>>,
    effects: Res<Audio>,
    ui: Res<AudioChannel<UiChannel>>,
) {
    let Some(library) = library else {
        events.clear();
        return;
    };
    for PlaySound(cue) in events.read() {
        let Some(handle) = library.sound(*cue) else {
            continue;
        };
        match channel_for(*cue) {
            CueChannel::Effects => {
                effects.play(handle);
            }
            CueChannel::Ui => {
                ui.play(handle);
            }
        }
    }
}

fn switch_music(
    track: MusicTrack,
    library: Option<&SoundLibrary>,
    current: &mut CurrentMusic,
    music: &AudioChannel<MusicChannel>,
    volume: f32,
) {
    if !current.switch_to(track) {
        return;
    }
    music.stop();
    match library.and_then(|library| library.music(track)) {
        Some(handle) => {
            debug!("Switching music to {:?}", track);
            music.play(handle).looped().with_volume(volume as f64);
        }
        None => debug!("No clip configured for {:?} music", track),
    }
}

fn play_menu_music(
    library: Option<Res<SoundLibrary>>,
    mut current: ResMut<CurrentMusic>,
    music: Res<AudioChannel<MusicChannel>>,
    settings: Option<Res<Settings>>,
) {
    let volume = settings.map_or(1.0, |settings| settings.music_volume);
    switch_music(MusicTrack::Menu, library.as_deref(), &mut current, &music, volume);
}

/// Entering gameplay again after a death keeps the current track going.
fn play_gameplay_music(
    library: Option<Res<SoundLibrary>>,
    mut current: ResMut<CurrentMusic>,
    music: Res<AudioChannel<MusicChannel>>,
    settings: Option<Res<Settings>>,
) {
    let volume = settings.map_or(1.0, |settings| settings.music_volume);
    switch_music(MusicTrack::Gameplay, library.as_deref(), &mut current, &music, volume);
}

fn apply_volume(
    settings: Option<Res<Settings>>,
    music: Res<AudioChannel<MusicChannel>>,
    ui: Res<AudioChannel<UiChannel>>,
) {
    let Some(settings) = settings else {
        return;
    };
    if !settings.is_changed() {
        return;
    }
    let volume = settings.music_volume as f64;
    music.set_volume(volume);
    ui.set_volume(volume);
}
