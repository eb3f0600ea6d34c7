//! UI plugin - menus, HUD, and interface elements.

use bevy::prelude::*;

use super::widgets::{button_colors, handle_menu_buttons};
use super::{hud, intro, menus};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        intro::setup_intro_systems(app);
        menus::setup_menu_systems(app);

        app.add_systems(Update, (button_colors, handle_menu_buttons));
    }
}
