//! Progression module - how the player moves from one location to the next.
//!
//! A location is gated by a barrier. Its save point arms the barrier and
//! reveals what the player needs to open it: keys to find or enemies to
//! defeat. Clues hint at where to look.

pub mod barrier;
pub mod clue;
pub mod events;
pub mod key;
mod plugin;
pub mod save_point;

pub use barrier::{Barrier, BarrierVisual, UnlockCondition};
pub use clue::ClueBoard;
pub use events::*;
pub use key::{Bob, KeyItem, KeyState};
pub use plugin::ProgressionPlugin;
pub use save_point::{ActivationEffect, SavePoint};
