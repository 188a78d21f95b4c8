//! Базовые компоненты акторов: Health, Player, Controller, EyeOffset

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Урон (clamp в 0, отрицательный amount игнорируем)
    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}

/// Marker: актор управляется игроком (camera shake на выстрел)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Кто управляет актором (игрок / AI brain entity), instigator для damage
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller(pub Entity);

/// Смещение глаз от origin актора (eye viewpoint = translation + offset)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EyeOffset(pub Vec3);

impl Default for EyeOffset {
    fn default() -> Self {
        Self(Vec3::new(0.0, 1.6, 0.0)) // Рост ~1.8m
    }
}
