//! Settings plugin - loads settings at startup and saves them on change.

use bevy::prelude::*;

use super::settings::{load_settings, save_settings_on_change, SettingsPath};

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SettingsPath>()
            .add_systems(PreStartup, load_settings)
            .add_systems(Last, save_settings_on_change);
    }
}
