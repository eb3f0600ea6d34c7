//! Player module - player entity, movement, camera control and respawning.

mod components;
mod health;
mod movement;
mod plugin;

pub use components::*;
pub use health::restore_player;
pub use movement::{spawn_player, PlayerCamera};
pub use plugin::PlayerPlugin;
