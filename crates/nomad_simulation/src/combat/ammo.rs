//! Ammo state — патроны в обойме + резерв
//!
//! Инварианты:
//! - 0 ≤ loaded ≤ clip_size
//! - 0 ≤ reserve ≤ max_reserve
//!
//! Мутируется только двумя переходами: `try_consume_round` (выстрел) и
//! `reload` (резерв → обойма). Пустая обойма: нормальный исход, не ошибка.

use serde::{Deserialize, Serialize};

use super::config::WeaponConfig;

/// Результат перезарядки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadOutcome {
    /// Сколько патронов ушло из резерва в обойму (0 = no-op, обойма полна)
    pub rounds_transferred: u32,
    /// Обойма и резерв пусты: "out of ammo", состояние не менялось
    pub depleted: bool,
}

impl ReloadOutcome {
    pub fn depleted() -> Self {
        Self {
            rounds_transferred: 0,
            depleted: true,
        }
    }

    pub fn transferred(rounds: u32) -> Self {
        Self {
            rounds_transferred: rounds,
            depleted: false,
        }
    }
}

/// Loaded + reserve ammo одного оружия
///
/// Serde идёт через `AmmoSnapshot`: restore из snapshot'а clamp'ится как `with_rounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AmmoSnapshot", into = "AmmoSnapshot")]
pub struct AmmoState {
    loaded: u32,
    reserve: u32,
    clip_size: u32,
    max_reserve: u32,
}

impl AmmoState {
    /// Состояние при спавне оружия: полная обойма, резерв = max − clip
    pub fn new(clip_size: u32, max_reserve: u32) -> Self {
        Self {
            loaded: clip_size,
            reserve: max_reserve.saturating_sub(clip_size),
            clip_size,
            max_reserve,
        }
    }

    pub fn from_config(config: &WeaponConfig) -> Self {
        Self::new(config.clip_size, config.max_reserve_ammo)
    }

    /// Произвольное состояние (restore/tests), clamp в допустимые границы
    pub fn with_rounds(config: &WeaponConfig, loaded: u32, reserve: u32) -> Self {
        Self::clamped(config.clip_size, config.max_reserve_ammo, loaded, reserve)
    }

    fn clamped(clip_size: u32, max_reserve: u32, loaded: u32, reserve: u32) -> Self {
        Self {
            loaded: loaded.min(clip_size),
            reserve: reserve.min(max_reserve),
            clip_size,
            max_reserve,
        }
    }

    pub fn loaded(&self) -> u32 {
        self.loaded
    }

    pub fn reserve(&self) -> u32 {
        self.reserve
    }

    pub fn clip_size(&self) -> u32 {
        self.clip_size
    }

    pub fn max_reserve(&self) -> u32 {
        self.max_reserve
    }

    pub fn is_clip_empty(&self) -> bool {
        self.loaded == 0
    }

    /// Обойма и резерв пусты, reload уже ничего не даст
    pub fn is_depleted(&self) -> bool {
        self.loaded == 0 && self.reserve == 0
    }

    /// Списать один патрон из обоймы. `false` = обойма пуста, state не трогаем.
    pub fn try_consume_round(&mut self) -> bool {
        if self.loaded == 0 {
            return false;
        }

        self.loaded -= 1;
        true
    }

    /// Переложить патроны из резерва в обойму
    ///
    /// - Обойма и резерв пусты → `depleted = true`, без мутации
    /// - Иначе переносим `min(clip_size − loaded, reserve)` (может быть 0)
    pub fn reload(&mut self) -> ReloadOutcome {
        if self.is_depleted() {
            return ReloadOutcome::depleted();
        }

        let needed = self.clip_size.saturating_sub(self.loaded);
        let transferred = needed.min(self.reserve);

        self.loaded += transferred;
        self.reserve -= transferred;

        ReloadOutcome::transferred(transferred)
    }
}

/// Сериализованная форма `AmmoState` (поля как есть, без инвариантов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoSnapshot {
    pub loaded: u32,
    pub reserve: u32,
    pub clip_size: u32,
    pub max_reserve: u32,
}

impl From<AmmoSnapshot> for AmmoState {
    fn from(snapshot: AmmoSnapshot) -> Self {
        Self::clamped(
            snapshot.clip_size,
            snapshot.max_reserve,
            snapshot.loaded,
            snapshot.reserve,
        )
    }
}

impl From<AmmoState> for AmmoSnapshot {
    fn from(state: AmmoState) -> Self {
        Self {
            loaded: state.loaded,
            reserve: state.reserve,
            clip_size: state.clip_size,
            max_reserve: state.max_reserve,
        }
    }
}
