//! Core game module - states, events, configuration and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
mod lifetime;
mod messages;
mod plugin;
mod states;

pub use config::*;
pub use error::*;
pub use events::*;
pub use lifetime::*;
pub use messages::*;
pub use plugin::CorePlugin;
pub use states::*;
