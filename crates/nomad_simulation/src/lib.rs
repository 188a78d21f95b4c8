//! NOMAD Simulation Core
//!
//! Hitscan weapon combat на Bevy 0.16.
//!
//! Слои:
//! - `combat` — FireController, ammo, spread, hit resolution, damage (чистое ядро)
//! - `timing` — FireScheduler abstraction + TickScheduler (ручные часы)
//! - `physics` — WorldTrace поверх Rapier коллайдеров
//! - ECS: CombatPlugin (intents → выстрелы → PointDamageEvent → Health)

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod timing;

// Re-export базовых компонентов для удобства
pub use combat::{
    spawn_weapon, CombatPlugin, DamageDealt, Dead, EntityDied, FireController, MissingOwnerPolicy,
    PhysicalSurface, PointDamageEvent, ReloadIntent, StartFireIntent, StopFireIntent, SurfaceKind, Weapon,
    WeaponConfig, WeaponSignal, WeaponSignalEvent,
};
pub use components::*;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use physics::{ColliderTraceWorld, TraceBody};
pub use timing::{FireScheduler, TickScheduler, TimerFiring, TimerHandle};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Раздаёт seeds для spread RNG каждого оружия.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Следующий seed (одинаковый порядок spawn'ов → одинаковые seeds)
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .add_plugins(CombatPlugin);

    app
}
