//! Damage calculation (hitscan)
//!
//! Формула: base_damage × multiplier(surface)
//! - FleshVulnerable → ×4.0 (default table)
//! - всё остальное → ×1.0
//!
//! Ядро не трогает Health напрямую, только PointDamage сигнал,
//! применение урона делает host (см. `systems::damage`).

use bevy::prelude::*;

use super::surface::{DamageTable, SurfaceKind};

/// Вычисляет final damage для поверхности (pure function)
pub fn compute_damage(base_damage: f32, surface: SurfaceKind, table: &DamageTable) -> f32 {
    base_damage * table.multiplier(surface)
}

/// Damage calculator поверх конфигурируемой таблицы
#[derive(Debug, Clone, Default)]
pub struct DamageCalculator {
    table: DamageTable,
}

impl DamageCalculator {
    pub fn new(table: DamageTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DamageTable {
        &self.table
    }

    pub fn compute_damage(&self, base_damage: f32, surface: SurfaceKind) -> f32 {
        compute_damage(base_damage, surface, &self.table)
    }
}

/// Point damage request (ApplyPointDamage contract)
#[derive(Debug, Clone, PartialEq)]
pub struct PointDamage {
    /// В кого попали
    pub target: Entity,
    /// Урон после surface multiplier
    pub amount: f32,
    /// Направление выстрела (после spread)
    pub direction: Vec3,
    pub impact_point: Vec3,
    pub surface: SurfaceKind,
    /// Controller владельца (None = AI без controller)
    pub instigator: Option<Entity>,
    /// Кто нанёс урон (owner оружия)
    pub causer: Entity,
    pub damage_type: Option<String>,
}
