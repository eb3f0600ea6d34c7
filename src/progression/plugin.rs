//! Progression plugin - save points, barriers, keys and clues.

use bevy::prelude::*;

use super::barrier::*;
use super::clue::*;
use super::events::*;
use super::key::*;
use super::save_point::*;
use crate::core::GameplaySet;

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClueBoard>()
            .add_event::<LockBarrier>()
            .add_event::<KeyCollected>()
            .add_event::<BarrierUnlocked>()
            .add_event::<RevealKey>()
            .add_event::<ResetSavePoint>()
            .add_systems(
                Update,
                (
                    activate_save_points,
                    reveal_keys,
                    lock_barriers,
                    interact_with_keys,
                    register_collected_keys,
                    track_defeated_enemies,
                    reset_save_points,
                    clear_clue_on_unlock,
                    publish_pending_clues,
                    contain_player,
                )
                    .chain()
                    .in_set(GameplaySet::Progression),
            )
            .add_systems(
                Update,
                (animate_keys, view_clue, sync_barrier_visuals).in_set(GameplaySet::Progression),
            );
    }
}
