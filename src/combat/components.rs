//! Combat-related components.

use bevy::prelude::*;

use crate::core::GrimoireConfig;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, DeathEvent};

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Subtract `amount`, clamped at zero. Returns the damage actually taken.
    ///
    /// Non-positive amounts and hits on a dead entity do nothing.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 || self.is_dead() {
            return 0.0;
        }
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    /// Add `amount`, clamped at the maximum. Returns the health actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 || self.is_dead() {
            return 0.0;
        }
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn reset(&mut self) {
        self.current = self.maximum;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// A travelling fireball.
#[derive(Component, Debug, Clone)]
pub struct Fireball {
    /// Unit direction, fixed at spawn
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    /// Falloff blast radius; 0 disables area damage
    pub explosion_radius: f32,
    /// Who cast it; never struck by its own fireball
    pub owner: Entity,
    /// Set on first contact; the fireball stops and despawns shortly after
    pub hit: bool,
}

/// Distance at which a fireball counts as touching an enemy.
pub const FIREBALL_CONTACT_RADIUS: f32 = 0.9;

/// Seconds a spent fireball lingers before despawning.
pub const FIREBALL_IMPACT_LINGER: f32 = 0.1;

/// Falloff damage at `distance` from a blast of `radius`.
///
/// Returns `None` outside the blast or when area damage is disabled.
pub fn area_damage(base: f32, distance: f32, radius: f32) -> Option<f32> {
    if radius <= 0.0 || distance > radius {
        return None;
    }
    Some(base * (1.0 - distance / radius))
}

/// Grimoire ammunition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ammo {
    Unlimited,
    Limited { current: u32, max: u32 },
}

/// The spellbook weapon, carried by the player.
#[derive(Component, Debug, Clone)]
pub struct Grimoire {
    pub ammo: Ammo,
    pub cooldown: f32,
    /// Elapsed-time stamp of the last cast
    pub last_cast: Option<f32>,
}

impl Grimoire {
    pub fn from_config(config: &GrimoireConfig) -> Self {
        let ammo = if config.unlimited_ammo {
            Ammo::Unlimited
        } else {
            Ammo::Limited {
                current: config.max_ammo,
                max: config.max_ammo,
            }
        };
        Self {
            ammo,
            cooldown: config.shoot_cooldown,
            last_cast: None,
        }
    }

    pub fn ready(&self, now: f32) -> bool {
        self.last_cast
            .map_or(true, |last| now >= last + self.cooldown)
    }

    /// Try to cast at `now`. Spends one charge of limited ammo.
    pub fn try_cast(&mut self, now: f32) -> bool {
        if !self.ready(now) {
            return false;
        }
        if let Ammo::Limited { current, .. } = &mut self.ammo {
            if *current == 0 {
                debug!("Grimoire is out of ammo");
                return false;
            }
            *current -= 1;
        }
        self.last_cast = Some(now);
        true
    }

    /// Refill limited ammo, clamped to the maximum.
    pub fn add_ammo(&mut self, amount: u32) {
        if let Ammo::Limited { current, max } = &mut self.ammo {
            *current = current.saturating_add(amount).min(*max);
            info!("Added {} ammo. Current: {}/{}", amount, current, max);
        }
    }
}

/// What the player is holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponSlot {
    #[default]
    Hands,
    Grimoire,
}

impl WeaponSlot {
    pub fn label(&self) -> &'static str {
        match self {
            WeaponSlot::Hands => "Hands",
            WeaponSlot::Grimoire => "Grimoire",
        }
    }

    /// Hint for switching to the other slot.
    pub fn switch_hint(&self) -> &'static str {
        match self {
            WeaponSlot::Hands => "[2] Grimoire",
            WeaponSlot::Grimoire => "[1] Hands",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            WeaponSlot::Hands => WeaponSlot::Grimoire,
            WeaponSlot::Grimoire => WeaponSlot::Hands,
        }
    }
}

/// Current weapon plus the short lockout after a switch.
#[derive(Component, Debug)]
pub struct WeaponLoadout {
    pub current: WeaponSlot,
    pub switch_lock: Timer,
}

impl WeaponLoadout {
    pub fn new(start: WeaponSlot, switch_delay: f32) -> Self {
        let mut switch_lock = Timer::from_seconds(switch_delay.max(0.0), TimerMode::Once);
        // Switching is allowed immediately
        switch_lock.tick(switch_lock.duration());
        Self {
            current: start,
            switch_lock,
        }
    }

    pub fn can_switch(&self) -> bool {
        self.switch_lock.finished()
    }

    /// Equip `slot`, starting the lockout. Returns false while locked.
    pub fn switch_to(&mut self, slot: WeaponSlot) -> bool {
        if !self.can_switch() {
            return false;
        }
        self.current = slot;
        self.switch_lock.reset();
        true
    }
}

/// Marker for the grimoire model held in front of the camera.
#[derive(Component)]
pub struct GrimoireViewmodel;
