//! Weapon config (immutable per weapon instance)
//!
//! Задаётся при создании оружия и больше не меняется.
//! Загружается из TOML (`WeaponConfig::from_toml_str`) или из preset'ов.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::surface::DamageTable;

/// Ошибки config (только на этапе создания, не в fire loop)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeaponConfigError {
    #[error("base_damage must be > 0, got {0}")]
    NonPositiveDamage(f32),

    #[error("bullet_spread_degrees must be >= 0, got {0}")]
    NegativeSpread(f32),

    #[error("rate_of_fire must be finite and > 0 rounds/minute, got {0}")]
    NonPositiveRateOfFire(f32),

    #[error("weapon_range must be finite and > 0, got {0}")]
    NonPositiveRange(f32),

    #[error("damage multiplier must be >= 0, got {0}")]
    NegativeMultiplier(f32),

    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Что делать с тиком, если у оружия нет owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingOwnerPolicy {
    /// Вместо выстрела попытаться перезарядиться (timer продолжает работать)
    #[default]
    Reload,
    /// Opt-in: просто пропустить выстрел на этот тик, патроны не трогаем
    SkipShot,
}

/// Sound keys (presentation layer маппит их на ассеты)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSounds {
    pub fire: Option<String>,
    pub reload: Option<String>,
    pub out_of_ammo: Option<String>,
}

/// Параметры hitscan оружия
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Базовый урон (до surface multiplier)
    pub base_damage: f32,

    /// Half-angle конуса разброса (градусы)
    pub bullet_spread_degrees: f32,

    /// Скорострельность (выстрелов в минуту)
    pub rate_of_fire: f32,

    /// Дальность трассировки (world units)
    pub weapon_range: f32,

    pub clip_size: u32,

    /// Общий запас патронов (резерв при спавне = max − clip)
    pub max_reserve_ammo: u32,

    pub damage_table: DamageTable,

    pub sounds: WeaponSounds,

    /// Camera shake key (только для player-controlled owner)
    pub camera_shake: Option<String>,

    pub damage_type: Option<String>,

    pub missing_owner_policy: MissingOwnerPolicy,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self::rifle()
    }
}

impl WeaponConfig {
    /// Автоматическая винтовка (базовые параметры оружия)
    pub fn rifle() -> Self {
        Self {
            base_damage: 20.0,
            bullet_spread_degrees: 2.0,
            rate_of_fire: 600.0,
            weapon_range: 2000.0,
            clip_size: 30,
            max_reserve_ammo: 300,
            damage_table: DamageTable::default(),
            sounds: WeaponSounds {
                fire: Some("audio/rifle_fire".into()),
                reload: Some("audio/rifle_reload".into()),
                out_of_ammo: Some("audio/dry_fire".into()),
            },
            camera_shake: Some("camera/rifle_recoil".into()),
            damage_type: Some("bullet".into()),
            missing_owner_policy: MissingOwnerPolicy::Reload,
        }
    }

    /// Пистолет: медленнее, точнее, меньше обойма
    pub fn pistol() -> Self {
        Self {
            base_damage: 15.0,
            bullet_spread_degrees: 1.0,
            rate_of_fire: 240.0,
            weapon_range: 1200.0,
            clip_size: 12,
            max_reserve_ammo: 96,
            sounds: WeaponSounds {
                fire: Some("audio/pistol_fire".into()),
                reload: Some("audio/pistol_reload".into()),
                out_of_ammo: Some("audio/dry_fire".into()),
            },
            camera_shake: None,
            ..Self::rifle()
        }
    }

    /// Builder helpers (tests, presets)
    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.bullet_spread_degrees = degrees;
        self
    }

    pub fn with_ammo(mut self, clip_size: u32, max_reserve_ammo: u32) -> Self {
        self.clip_size = clip_size;
        self.max_reserve_ammo = max_reserve_ammo;
        self
    }

    /// Интервал между выстрелами: 60 / rate_of_fire (секунды)
    pub fn time_between_shots(&self) -> f32 {
        60.0 / self.rate_of_fire
    }

    pub fn validate(&self) -> Result<(), WeaponConfigError> {
        // `!(x > 0.0)` ловит и NaN
        if !(self.base_damage > 0.0) {
            return Err(WeaponConfigError::NonPositiveDamage(self.base_damage));
        }
        if !(self.bullet_spread_degrees >= 0.0) {
            return Err(WeaponConfigError::NegativeSpread(self.bullet_spread_degrees));
        }
        if !(self.rate_of_fire > 0.0 && self.rate_of_fire.is_finite()) {
            return Err(WeaponConfigError::NonPositiveRateOfFire(self.rate_of_fire));
        }
        if !(self.weapon_range > 0.0 && self.weapon_range.is_finite()) {
            return Err(WeaponConfigError::NonPositiveRange(self.weapon_range));
        }
        if let Some(bad) = self.damage_table.multipliers().find(|m| !(*m >= 0.0)) {
            return Err(WeaponConfigError::NegativeMultiplier(bad));
        }
        Ok(())
    }

    /// Загрузка + валидация из TOML
    pub fn from_toml_str(content: &str) -> Result<Self, WeaponConfigError> {
        let config: WeaponConfig =
            toml::from_str(content).map_err(|e| WeaponConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
