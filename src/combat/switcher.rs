//! Switching between bare hands and the grimoire.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use super::components::*;
use crate::core::{PlaySound, SoundCue};
use crate::player::Player;

/// 1 selects hands, 2 selects the grimoire, the mouse wheel toggles.
pub fn switch_weapons(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut wheel: EventReader<MouseWheel>,
    time: Res<Time>,
    mut player_query: Query<&mut WeaponLoadout, (With<Player>, Without<Dead>)>,
    mut sounds: EventWriter<PlaySound>,
) {
    let scrolled = wheel.read().fold(0.0, |total, event| total + event.y);

    let Ok(mut loadout) = player_query.get_single_mut() else {
        return;
    };
    loadout.switch_lock.tick(time.delta());

    let wanted = if keyboard.just_pressed(KeyCode::Digit1) && loadout.current != WeaponSlot::Hands {
        Some(WeaponSlot::Hands)
    } else if keyboard.just_pressed(KeyCode::Digit2) && loadout.current != WeaponSlot::Grimoire {
        Some(WeaponSlot::Grimoire)
    } else if scrolled != 0.0 {
        Some(loadout.current.other())
    } else {
        None
    };

    let Some(slot) = wanted else {
        return;
    };
    if !loadout.switch_to(slot) {
        return;
    }

    info!("Switched to {}", slot.label());
    sounds.send(PlaySound(SoundCue::PageFlip));
    sounds.send(PlaySound(match slot {
        WeaponSlot::Grimoire => SoundCue::Equip,
        WeaponSlot::Hands => SoundCue::Unequip,
    }));
}
