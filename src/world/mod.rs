//! World module - level data, construction, and environment.

mod builder;
pub mod data;
mod geometry;
mod materials;
mod plugin;
mod spawning;

pub use builder::{build_level_from_data, BuiltLocation, LevelEntity};
pub use data::{CurrentLevel, LevelDefinition};
pub use plugin::WorldPlugin;
