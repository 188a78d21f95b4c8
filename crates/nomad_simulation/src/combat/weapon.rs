//! Weapon events — intents (input → ECS) и signals (ECS → presentation)
//!
//! Architecture:
//! - Input layer: StartFireIntent / StopFireIntent / ReloadIntent
//! - Presentation: WeaponSignalEvent (эффекты, звуки, camera shake)
//! - Damage: PointDamageEvent → `apply_point_damage` → Health

use bevy::prelude::*;

use super::damage::PointDamage;
use super::fire::WeaponSignal;

/// Event: нажали fire (LMB down / AI решил стрелять)
#[derive(Event, Debug, Clone, Copy)]
pub struct StartFireIntent {
    pub weapon: Entity,
}

/// Event: отпустили fire
#[derive(Event, Debug, Clone, Copy)]
pub struct StopFireIntent {
    pub weapon: Entity,
}

/// Event: reload (R / AI)
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadIntent {
    pub weapon: Entity,
}

/// Event: сигнал presentation слою (ECS → визуал/звук)
///
/// **Note:** ApplyPointDamage сюда не попадает, идёт отдельным PointDamageEvent.
#[derive(Event, Debug, Clone)]
pub struct WeaponSignalEvent {
    pub weapon: Entity,
    pub signal: WeaponSignal,
}

/// Event: запрос point damage (hitscan попал в actor)
#[derive(Event, Debug, Clone)]
pub struct PointDamageEvent {
    pub weapon: Entity,
    pub damage: PointDamage,
}

