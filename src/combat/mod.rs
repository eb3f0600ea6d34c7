//! Combat module - health, the grimoire and its fireballs.

mod components;
mod fireball;
mod grimoire;
mod plugin;
mod switcher;
mod systems;
mod viewmodel;

pub use components::*;
pub use grimoire::FireballAssets;
pub use plugin::CombatPlugin;
pub use systems::{apply_damage, kill_outright};
