//! Combat module — hitscan weapon core + ECS integration
//!
//! Core (чистая логика, без ECS):
//! - FireController: start/stop fire, fire-rate gating, выстрел, reload
//! - AmmoState: clip + reserve, reload transfer
//! - HitResolver: spread → trace → HitOutcome
//! - DamageCalculator: base damage × surface multiplier
//!
//! ECS ответственность:
//! - Weapon component (controller + TickScheduler + owner)
//! - Intents (StartFire/StopFire/Reload) → controller
//! - PointDamageEvent → Health
//!
//! Presentation (эффекты, звуки, camera shake) — только через WeaponSignalEvent.

use bevy::prelude::*;

pub mod ammo;
pub mod components;
pub mod config;
pub mod damage;
pub mod fire;
pub mod hit;
pub mod spread;
pub mod surface;
pub mod systems;
pub mod weapon;

#[cfg(test)]
mod fire_tests;

// Re-export основных типов
pub use ammo::{AmmoSnapshot, AmmoState, ReloadOutcome};
pub use components::{spawn_weapon, PhysicalSurface, Weapon};
pub use config::{MissingOwnerPolicy, WeaponConfig, WeaponConfigError, WeaponSounds};
pub use damage::{compute_damage, DamageCalculator, PointDamage};
pub use fire::{
    FireController, FireState, OwnerView, ShotOutcome, SignalSink, WeaponSignal,
};
pub use hit::{HitOutcome, HitResolver, TraceFilter, TraceHit, WorldTrace};
pub use spread::SpreadSampler;
pub use surface::{DamageTable, SurfaceKind, SurfaceMultiplier};
pub use systems::{apply_point_damage, process_weapon_intents, tick_weapons, DamageDealt, Dead, EntityDied};
pub use weapon::{PointDamageEvent, ReloadIntent, StartFireIntent, StopFireIntent, WeaponSignalEvent};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. process_weapon_intents — start/stop/reload
/// 2. tick_weapons — часы оружия, выстрелы, сигналы
/// 3. apply_point_damage — PointDamageEvent → Health
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<StartFireIntent>()
            .add_event::<StopFireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<WeaponSignalEvent>()
            .add_event::<PointDamageEvent>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (process_weapon_intents, tick_weapons, apply_point_damage).chain(),
        );
    }
}
