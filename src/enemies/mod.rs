//! Enemies module - enemy definitions, AI, and death.

mod ai;
mod components;
pub mod data;
mod plugin;

pub use ai::wake_enemy;
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use plugin::EnemyPlugin;
