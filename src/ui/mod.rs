//! UI module - menus, intro, HUD and the shared button widget.

mod hud;
mod intro;
mod menus;
mod plugin;
mod widgets;

pub use intro::{IntroSequence, IntroStage};
pub use plugin::UiPlugin;
pub use widgets::MenuButton;
