//! Combat plugin - grimoire, fireballs and damage.

use bevy::prelude::*;

use super::fireball::move_fireballs;
use super::grimoire::*;
use super::switcher::switch_weapons;
use super::systems::apply_damage;
use super::viewmodel::*;
use crate::core::GameplaySet;

/// Combat plugin - handles weapons, projectiles and health.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_fireball_assets)
            .add_systems(
                Update,
                (equip_player, attach_grimoire_viewmodel, sync_viewmodel_visibility).chain(),
            )
            .add_systems(
                Update,
                (switch_weapons, cast_fireball, animate_viewmodel)
                    .chain()
                    .in_set(GameplaySet::Input),
            )
            .add_systems(Update, move_fireballs.in_set(GameplaySet::Ai))
            .add_systems(Update, apply_damage.in_set(GameplaySet::Damage));
    }
}
