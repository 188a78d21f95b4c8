//! Surface classification + damage multiplier table
//!
//! SurfaceKind — открытый id (u8), не закрытый enum: новые типы поверхностей
//! добавляются через config (DamageTable), без изменения кода.

use serde::{Deserialize, Serialize};

/// Тип поверхности, в которую попал луч
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceKind(pub u8);

impl SurfaceKind {
    /// Поверхность без материала / неизвестный материал
    pub const DEFAULT: SurfaceKind = SurfaceKind(0);
    pub const FLESH_DEFAULT: SurfaceKind = SurfaceKind(1);
    /// Уязвимые зоны (голова)
    pub const FLESH_VULNERABLE: SurfaceKind = SurfaceKind(2);

    /// Flesh поверхности используют один impact effect
    pub fn is_flesh(self) -> bool {
        matches!(self, Self::FLESH_DEFAULT | Self::FLESH_VULNERABLE)
    }
}

/// Один override в таблице множителей
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMultiplier {
    pub surface: SurfaceKind,
    pub multiplier: f32,
}

/// Data-driven таблица: SurfaceKind → damage multiplier
///
/// Всё, чего нет в `overrides`, получает `default_multiplier` (1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTable {
    pub default_multiplier: f32,
    pub overrides: Vec<SurfaceMultiplier>,
}

impl Default for DamageTable {
    fn default() -> Self {
        Self {
            default_multiplier: 1.0,
            overrides: vec![SurfaceMultiplier {
                surface: SurfaceKind::FLESH_VULNERABLE,
                multiplier: 4.0,
            }],
        }
    }
}

impl DamageTable {
    /// Таблица без overrides (всё ×1.0)
    pub fn uniform() -> Self {
        Self {
            default_multiplier: 1.0,
            overrides: Vec::new(),
        }
    }

    /// Builder: добавить/заменить множитель для поверхности
    pub fn with_multiplier(mut self, surface: SurfaceKind, multiplier: f32) -> Self {
        self.overrides.retain(|entry| entry.surface != surface);
        self.overrides.push(SurfaceMultiplier { surface, multiplier });
        self
    }

    pub fn multiplier(&self, surface: SurfaceKind) -> f32 {
        self.overrides
            .iter()
            .find(|entry| entry.surface == surface)
            .map_or(self.default_multiplier, |entry| entry.multiplier)
    }

    /// Все множители (default + overrides)
    pub(crate) fn multipliers(&self) -> impl Iterator<Item = f32> + '_ {
        std::iter::once(self.default_multiplier).chain(self.overrides.iter().map(|e| e.multiplier))
    }
}
