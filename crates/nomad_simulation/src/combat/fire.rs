//! FireController — cadence + ammo + spread + hit + damage для одного оружия
//!
//! State machine:
//! - Idle → `start_fire` → Firing (repeating timer каждые 60 / rate_of_fire сек)
//! - Firing → `stop_fire` → Idle (timer снят, stale callbacks игнорируются)
//!
//! Каждый тик (`on_timer` → `execute_shot`):
//! 1. Нет owner → MissingOwnerPolicy (по умолчанию reload, opt-in skip)
//! 2. Пустая обойма → ничего (без auto-reload, без эффектов)
//! 3. Spread → trace → damage → сигналы presentation слою
//!
//! Ни одна ветка не возвращает ошибку: всё это нормальные исходы тика.
//! Presentation (эффекты, звуки, camera shake) — только через `WeaponSignal`.

use bevy::prelude::*;

use super::ammo::{AmmoState, ReloadOutcome};
use super::config::{MissingOwnerPolicy, WeaponConfig, WeaponConfigError};
use super::damage::{DamageCalculator, PointDamage};
use super::hit::{HitOutcome, HitResolver, TraceFilter, WorldTrace};
use super::spread::SpreadSampler;
use super::surface::SurfaceKind;
use crate::logger;
use crate::timing::{FireScheduler, TimerFiring, TimerHandle};

/// Owner оружия глазами ядра (host вычисляет, ядро только читает)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerView {
    pub entity: Entity,
    /// Eye viewpoint (origin луча)
    pub eye_location: Vec3,
    pub eye_rotation: Quat,
    /// Controller (instigator для damage); None = без controller
    pub controller: Option<Entity>,
    /// Player → camera shake на выстрел
    pub player_controlled: bool,
}

impl OwnerView {
    pub fn new(entity: Entity, eye_location: Vec3, eye_rotation: Quat) -> Self {
        Self {
            entity,
            eye_location,
            eye_rotation,
            controller: None,
            player_controlled: false,
        }
    }

    /// Aim direction = forward eye rotation (Bevy forward = −Z)
    pub fn aim_direction(&self) -> Vec3 {
        self.eye_rotation * Vec3::NEG_Z
    }
}

/// Сигналы ядра → внешние collaborators (fire-and-forget)
#[derive(Debug, Clone, PartialEq)]
pub enum WeaponSignal {
    ApplyPointDamage(PointDamage),
    PlayFireEffect { tracer_end: Vec3 },
    PlayImpactEffect { surface: SurfaceKind, point: Vec3 },
    PlaySound(String),
    PlayCameraShake(String),
}

/// Приёмник сигналов
pub trait SignalSink {
    fn emit(&mut self, signal: WeaponSignal);
}

impl SignalSink for Vec<WeaponSignal> {
    fn emit(&mut self, signal: WeaponSignal) {
        self.push(signal);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireState {
    Idle,
    Firing,
}

/// Какая ветка тика отработала
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// Owner отсутствует, выстрел пропущен
    MissingOwner,
    /// Owner отсутствует, policy Reload → попытка reload
    Reloaded(ReloadOutcome),
    /// Обойма пуста, тик без эффектов
    ClipEmpty,
    Fired(HitOutcome),
}

/// Hitscan weapon core
#[derive(Debug, Clone)]
pub struct FireController {
    config: WeaponConfig,
    ammo: AmmoState,
    spread: SpreadSampler,
    resolver: HitResolver,
    damage: DamageCalculator,
    /// Entity самого оружия (исключается из trace)
    weapon: Option<Entity>,
    time_between_shots: f32,
    last_fire_time: Option<f32>,
    timer: Option<TimerHandle>,
}

impl FireController {
    /// Валидирует config; `seed` для spread RNG
    pub fn new(config: WeaponConfig, seed: u64) -> Result<Self, WeaponConfigError> {
        config.validate()?;

        Ok(Self {
            ammo: AmmoState::from_config(&config),
            spread: SpreadSampler::new(seed),
            resolver: HitResolver,
            damage: DamageCalculator::new(config.damage_table.clone()),
            weapon: None,
            time_between_shots: config.time_between_shots(),
            last_fire_time: None,
            timer: None,
            config,
        })
    }

    pub fn with_weapon_entity(mut self, weapon: Entity) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Restore ammo (clamp в границы config)
    pub fn with_ammo(mut self, loaded: u32, reserve: u32) -> Self {
        self.ammo = AmmoState::with_rounds(&self.config, loaded, reserve);
        self
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn ammo(&self) -> &AmmoState {
        &self.ammo
    }

    pub fn weapon_entity(&self) -> Option<Entity> {
        self.weapon
    }

    pub fn time_between_shots(&self) -> f32 {
        self.time_between_shots
    }

    pub fn last_fire_time(&self) -> Option<f32> {
        self.last_fire_time
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn state(&self) -> FireState {
        if self.timer.is_some() {
            FireState::Firing
        } else {
            FireState::Idle
        }
    }

    pub fn is_firing(&self) -> bool {
        self.state() == FireState::Firing
    }

    /// Idle → Firing. Уже Firing — no-op (без двойного расписания).
    ///
    /// Первый выстрел через `max(last_fire + time_between_shots − now, 0)`:
    /// нельзя обойти rate of fire быстрым отпусканием/нажатием.
    pub fn start_fire<S: FireScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.timer {
            if scheduler.is_active(handle) {
                return;
            }
            // Host снял таймер сам, считаем что мы в Idle
            self.timer = None;
        }

        let now = scheduler.now();
        let first_delay = self
            .last_fire_time
            .map_or(0.0, |last| (last + self.time_between_shots - now).max(0.0));

        self.timer = Some(scheduler.set_repeating(first_delay, self.time_between_shots));

        logger::log(&format!(
            "Weapon {:?}: start fire (first shot in {:.3}s, interval {:.3}s)",
            self.weapon, first_delay, self.time_between_shots
        ));
    }

    /// Firing → Idle. Уже Idle — no-op.
    pub fn stop_fire<S: FireScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        let Some(handle) = self.timer.take() else {
            return;
        };

        scheduler.clear(handle);
        logger::log(&format!("Weapon {:?}: stop fire", self.weapon));
    }

    /// Timer callback. Чужой/отменённый handle → None (выстрела нет).
    pub fn on_timer<W, S>(
        &mut self,
        firing: TimerFiring,
        owner: Option<&OwnerView>,
        world: &W,
        signals: &mut S,
    ) -> Option<ShotOutcome>
    where
        W: WorldTrace + ?Sized,
        S: SignalSink + ?Sized,
    {
        if self.timer != Some(firing.handle) {
            return None;
        }

        Some(self.execute_shot(firing.time, owner, world, signals))
    }

    /// Один выстрел (тик таймера)
    pub fn execute_shot<W, S>(
        &mut self,
        now: f32,
        owner: Option<&OwnerView>,
        world: &W,
        signals: &mut S,
    ) -> ShotOutcome
    where
        W: WorldTrace + ?Sized,
        S: SignalSink + ?Sized,
    {
        let Some(owner) = owner else {
            return match self.config.missing_owner_policy {
                MissingOwnerPolicy::SkipShot => {
                    logger::log(&format!("Weapon {:?}: no owner, shot skipped", self.weapon));
                    ShotOutcome::MissingOwner
                }
                MissingOwnerPolicy::Reload => ShotOutcome::Reloaded(self.reload(signals)),
            };
        };

        if !self.ammo.try_consume_round() {
            return ShotOutcome::ClipEmpty;
        }

        let direction = self
            .spread
            .sample_direction(owner.aim_direction(), self.config.bullet_spread_degrees);

        let mut filter = TraceFilter::new().ignore(owner.entity);
        if let Some(weapon) = self.weapon {
            filter = filter.ignore(weapon);
        }

        let hit = self.resolver.resolve(
            world,
            owner.eye_location,
            direction,
            self.config.weapon_range,
            &filter,
        );

        if hit.did_hit {
            if let Some(target) = hit.hit_actor {
                let amount = self.damage.compute_damage(self.config.base_damage, hit.surface);

                signals.emit(WeaponSignal::ApplyPointDamage(PointDamage {
                    target,
                    amount,
                    direction,
                    impact_point: hit.impact_point,
                    surface: hit.surface,
                    instigator: owner.controller,
                    causer: owner.entity,
                    damage_type: self.config.damage_type.clone(),
                }));
            }

            signals.emit(WeaponSignal::PlayImpactEffect {
                surface: hit.surface,
                point: hit.impact_point,
            });
        }

        signals.emit(WeaponSignal::PlayFireEffect {
            tracer_end: hit.tracer_end(),
        });

        if owner.player_controlled {
            if let Some(shake) = &self.config.camera_shake {
                signals.emit(WeaponSignal::PlayCameraShake(shake.clone()));
            }
        }

        self.last_fire_time = Some(now);

        if let Some(sound) = &self.config.sounds.fire {
            signals.emit(WeaponSignal::PlaySound(sound.clone()));
        }

        ShotOutcome::Fired(hit)
    }

    /// Перезарядка (вызывается независимо от fire loop)
    ///
    /// - depleted → out-of-ammo звук, состояние не меняется
    /// - перенесено > 0 → reload звук
    /// - полная обойма → тишина
    pub fn reload<S: SignalSink + ?Sized>(&mut self, signals: &mut S) -> ReloadOutcome {
        let outcome = self.ammo.reload();

        if outcome.depleted {
            logger::log_info(&format!("Weapon {:?}: out of ammo", self.weapon));
            if let Some(sound) = &self.config.sounds.out_of_ammo {
                signals.emit(WeaponSignal::PlaySound(sound.clone()));
            }
            return outcome;
        }

        if outcome.rounds_transferred > 0 {
            logger::log(&format!(
                "Weapon {:?}: reloaded {} rounds ({} / {} reserve)",
                self.weapon,
                outcome.rounds_transferred,
                self.ammo.loaded(),
                self.ammo.reserve()
            ));
            if let Some(sound) = &self.config.sounds.reload {
                signals.emit(WeaponSignal::PlaySound(sound.clone()));
            }
        }

        outcome
    }
}
