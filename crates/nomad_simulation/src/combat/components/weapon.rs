//! Weapon component — FireController + собственный scheduler + owner
//!
//! Архитектура:
//! - Каждое оружие владеет своим `TickScheduler` (часы оружия двигает FixedUpdate)
//! - Owner: weak reference (Entity), может исчезнуть → missing owner ветка
//! - Spawn через `spawn_weapon`: entity id нужен controller'у для trace filter

use bevy::prelude::*;

use crate::combat::config::{WeaponConfig, WeaponConfigError};
use crate::combat::fire::{FireController, OwnerView, ShotOutcome, SignalSink};
use crate::combat::hit::WorldTrace;
use crate::timing::{TickScheduler, TimerFiring};
use crate::DeterministicRng;

/// Hitscan оружие в руках owner'а
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub controller: FireController,
    pub scheduler: TickScheduler,
    /// Кто держит оружие (None = оружие без владельца)
    pub owner: Option<Entity>,
}

impl Weapon {
    pub fn new(controller: FireController, owner: Option<Entity>) -> Self {
        Self {
            controller,
            scheduler: TickScheduler::new(),
            owner,
        }
    }

    pub fn start_fire(&mut self) {
        self.controller.start_fire(&mut self.scheduler);
    }

    pub fn stop_fire(&mut self) {
        self.controller.stop_fire(&mut self.scheduler);
    }

    /// Сдвинуть часы оружия, вернуть срабатывания таймера
    pub fn advance(&mut self, delta: f32) -> Vec<TimerFiring> {
        self.scheduler.advance(delta)
    }

    /// Выполнить срабатывания (stale handles отфильтрует controller)
    pub fn fire<W, S>(
        &mut self,
        firings: &[TimerFiring],
        owner: Option<&OwnerView>,
        world: &W,
        signals: &mut S,
    ) -> Vec<ShotOutcome>
    where
        W: WorldTrace + ?Sized,
        S: SignalSink + ?Sized,
    {
        firings
            .iter()
            .filter_map(|firing| self.controller.on_timer(*firing, owner, world, signals))
            .collect()
    }
}

/// Spawn оружия: seed spread RNG берём из DeterministicRng (если есть)
pub fn spawn_weapon(
    world: &mut World,
    config: WeaponConfig,
    owner: Option<Entity>,
) -> Result<Entity, WeaponConfigError> {
    let seed = world
        .get_resource_mut::<DeterministicRng>()
        .map_or(0, |mut rng| rng.next_seed());

    let controller = FireController::new(config, seed)?;
    let entity = world.spawn_empty().id();

    world
        .entity_mut(entity)
        .insert(Weapon::new(controller.with_weapon_entity(entity), owner));

    Ok(entity)
}
