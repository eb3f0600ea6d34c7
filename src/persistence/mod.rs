//! Persistence module - settings that survive between sessions.

mod plugin;
mod settings;

pub use plugin::SettingsPlugin;
pub use settings::*;
