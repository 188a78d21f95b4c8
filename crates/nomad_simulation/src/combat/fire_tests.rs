//! Tests for FireController (state machine + shot pipeline).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use std::cell::RefCell;

    use crate::combat::ammo::ReloadOutcome;
    use crate::combat::config::{MissingOwnerPolicy, WeaponConfig, WeaponConfigError};
    use crate::combat::fire::{FireController, FireState, OwnerView, ShotOutcome, WeaponSignal};
    use crate::combat::hit::{TraceFilter, TraceHit, WorldTrace};
    use crate::combat::surface::SurfaceKind;
    use crate::timing::{FireScheduler, TickScheduler};

    const OWNER: u32 = 1;
    const WEAPON: u32 = 2;
    const TARGET: u32 = 3;

    /// Мок мира: одна цель на дистанции `distance` по −Z
    struct TargetWorld {
        distance: Option<f32>,
        actor: Option<Entity>,
        surface: Option<SurfaceKind>,
        filters: RefCell<Vec<TraceFilter>>,
    }

    impl TargetWorld {
        fn target(distance: f32, surface: SurfaceKind) -> Self {
            Self {
                distance: Some(distance),
                actor: Some(Entity::from_raw(TARGET)),
                surface: Some(surface),
                filters: RefCell::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self {
                distance: None,
                actor: None,
                surface: None,
                filters: RefCell::new(Vec::new()),
            }
        }
    }

    impl WorldTrace for TargetWorld {
        fn trace_first_blocking_hit(
            &self,
            origin: Vec3,
            end: Vec3,
            filter: &TraceFilter,
            _return_surface: bool,
        ) -> Option<TraceHit> {
            self.filters.borrow_mut().push(filter.clone());

            let distance = self.distance?;
            if distance > origin.distance(end) {
                return None;
            }
            if let Some(actor) = self.actor {
                if filter.is_ignored(actor) {
                    return None;
                }
            }

            Some(TraceHit {
                actor: self.actor,
                point: origin + (end - origin).normalize() * distance,
                surface: self.surface,
            })
        }
    }

    fn precise_rifle() -> WeaponConfig {
        WeaponConfig::rifle().with_spread(0.0)
    }

    fn controller(config: WeaponConfig) -> FireController {
        FireController::new(config, 42)
            .expect("valid config")
            .with_weapon_entity(Entity::from_raw(WEAPON))
    }

    fn owner() -> OwnerView {
        OwnerView::new(Entity::from_raw(OWNER), Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY)
    }

    fn player() -> OwnerView {
        OwnerView {
            controller: Some(Entity::from_raw(10)),
            player_controlled: true,
            ..owner()
        }
    }

    #[test]
    fn test_time_between_shots_derived_from_rate() {
        let weapon = controller(precise_rifle());
        assert!((weapon.time_between_shots() - 0.1).abs() < 1e-6);
        assert_eq!(weapon.state(), FireState::Idle);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = precise_rifle();
        config.weapon_range = 0.0;

        let err = FireController::new(config, 1).unwrap_err();
        assert_eq!(err, WeaponConfigError::NonPositiveRange(0.0));
    }

    #[test]
    fn test_start_fire_is_idempotent() {
        let mut scheduler = TickScheduler::new();
        let mut weapon = controller(precise_rifle());

        weapon.start_fire(&mut scheduler);
        let handle = weapon.timer_handle();
        weapon.start_fire(&mut scheduler);

        assert_eq!(weapon.state(), FireState::Firing);
        assert_eq!(weapon.timer_handle(), handle);
        assert_eq!(scheduler.active_timers(), 1);

        // 0.95 секунды → ровно 10 выстрелов (0.0, 0.1, ... 0.9), не 20
        let world = TargetWorld::empty();
        let mut signals = Vec::new();
        let fired = scheduler
            .advance(0.95)
            .into_iter()
            .filter_map(|f| weapon.on_timer(f, Some(&owner()), &world, &mut signals))
            .count();
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_stop_fire_is_idempotent() {
        let mut scheduler = TickScheduler::new();
        let mut weapon = controller(precise_rifle());

        weapon.stop_fire(&mut scheduler);
        assert_eq!(weapon.state(), FireState::Idle);

        weapon.start_fire(&mut scheduler);
        weapon.stop_fire(&mut scheduler);
        weapon.stop_fire(&mut scheduler);

        assert_eq!(weapon.state(), FireState::Idle);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_no_shot_after_stop_fire() {
        let mut scheduler = TickScheduler::new();
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld::empty();
        let mut signals = Vec::new();

        weapon.start_fire(&mut scheduler);
        let firings = scheduler.advance(0.35);
        assert_eq!(firings.len(), 4);

        // Stop посреди batch'а: оставшиеся срабатывания — stale
        let first = weapon.on_timer(firings[0], Some(&owner()), &world, &mut signals);
        assert!(first.is_some());

        weapon.stop_fire(&mut scheduler);
        for firing in &firings[1..] {
            assert!(weapon.on_timer(*firing, Some(&owner()), &world, &mut signals).is_none());
        }

        assert_eq!(weapon.ammo().loaded(), 29);
    }

    #[test]
    fn test_restart_respects_cooldown() {
        let mut scheduler = TickScheduler::new();
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld::empty();
        let mut signals = Vec::new();

        weapon.start_fire(&mut scheduler);
        for firing in scheduler.advance(0.0) {
            weapon.on_timer(firing, Some(&owner()), &world, &mut signals);
        }
        assert_eq!(weapon.last_fire_time(), Some(0.0));
        weapon.stop_fire(&mut scheduler);

        // Быстрое повторное нажатие через 30ms
        scheduler.advance(0.03);
        weapon.start_fire(&mut scheduler);

        assert!(scheduler.advance(0.06).is_empty());
        let firings = scheduler.advance(0.02);
        assert_eq!(firings.len(), 1);
        assert!((firings[0].time - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_vulnerable_hit_signal_sequence() {
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld::target(50.0, SurfaceKind::FLESH_VULNERABLE);
        let mut signals = Vec::new();

        let outcome = weapon.execute_shot(1.5, Some(&player()), &world, &mut signals);

        let ShotOutcome::Fired(hit) = outcome else {
            panic!("expected Fired, got {:?}", outcome);
        };
        assert!(hit.did_hit);
        assert_eq!(hit.hit_actor, Some(Entity::from_raw(TARGET)));

        let impact = Vec3::new(0.0, 1.6, -50.0);
        assert_eq!(signals.len(), 5, "signals: {:?}", signals);

        let WeaponSignal::ApplyPointDamage(damage) = &signals[0] else {
            panic!("expected damage first, got {:?}", signals[0]);
        };
        assert_eq!(damage.target, Entity::from_raw(TARGET));
        assert_eq!(damage.amount, 80.0);
        assert_eq!(damage.direction, Vec3::NEG_Z);
        assert_eq!(damage.causer, Entity::from_raw(OWNER));
        assert_eq!(damage.instigator, Some(Entity::from_raw(10)));
        assert_eq!(damage.damage_type.as_deref(), Some("bullet"));
        assert!(damage.impact_point.distance(impact) < 1e-4);

        assert!(matches!(
            signals[1],
            WeaponSignal::PlayImpactEffect { surface: SurfaceKind::FLESH_VULNERABLE, .. }
        ));
        assert!(matches!(signals[2], WeaponSignal::PlayFireEffect { tracer_end } if tracer_end.distance(impact) < 1e-4));
        assert_eq!(signals[3], WeaponSignal::PlayCameraShake("camera/rifle_recoil".into()));
        assert_eq!(signals[4], WeaponSignal::PlaySound("audio/rifle_fire".into()));

        assert_eq!(weapon.last_fire_time(), Some(1.5));
        assert_eq!(weapon.ammo().loaded(), 29);
    }

    #[test]
    fn test_miss_still_plays_tracer_to_max_range() {
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld::empty();
        let mut signals = Vec::new();

        let outcome = weapon.execute_shot(0.0, Some(&owner()), &world, &mut signals);
        assert!(matches!(outcome, ShotOutcome::Fired(hit) if !hit.did_hit));

        // AI owner → без camera shake
        assert_eq!(
            signals,
            vec![
                WeaponSignal::PlayFireEffect {
                    tracer_end: Vec3::new(0.0, 1.6, -2000.0)
                },
                WeaponSignal::PlaySound("audio/rifle_fire".into()),
            ]
        );
    }

    #[test]
    fn test_static_geometry_hit_has_no_damage() {
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld {
            actor: None,
            ..TargetWorld::target(20.0, SurfaceKind::DEFAULT)
        };
        let mut signals = Vec::new();

        weapon.execute_shot(0.0, Some(&owner()), &world, &mut signals);

        assert!(!signals.iter().any(|s| matches!(s, WeaponSignal::ApplyPointDamage(_))));
        assert!(signals.iter().any(|s| matches!(s, WeaponSignal::PlayImpactEffect { .. })));
    }

    #[test]
    fn test_trace_ignores_owner_and_weapon() {
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld::empty();
        let mut signals = Vec::new();

        weapon.execute_shot(0.0, Some(&owner()), &world, &mut signals);

        let filters = world.filters.borrow();
        assert_eq!(filters.len(), 1);
        assert!(filters[0].is_ignored(Entity::from_raw(OWNER)));
        assert!(filters[0].is_ignored(Entity::from_raw(WEAPON)));
    }

    #[test]
    fn test_drain_clip_then_manual_reload() {
        let mut weapon = controller(precise_rifle());
        let world = TargetWorld::target(10.0, SurfaceKind::DEFAULT);
        let mut signals = Vec::new();

        for shot in 0..30 {
            let outcome = weapon.execute_shot(shot as f32 * 0.1, Some(&owner()), &world, &mut signals);
            assert!(matches!(outcome, ShotOutcome::Fired(_)));
        }
        assert_eq!(weapon.ammo().loaded(), 0);
        assert_eq!(weapon.ammo().reserve(), 270);

        // Пустая обойма: без auto-reload и без сигналов
        signals.clear();
        for _ in 0..5 {
            assert_eq!(
                weapon.execute_shot(5.0, Some(&owner()), &world, &mut signals),
                ShotOutcome::ClipEmpty
            );
        }
        assert!(signals.is_empty());
        assert_eq!(weapon.ammo().reserve(), 270);

        let outcome = weapon.reload(&mut signals);
        assert_eq!(outcome.rounds_transferred, 30);
        assert_eq!(weapon.ammo().loaded(), 30);
        assert_eq!(weapon.ammo().reserve(), 240);
        assert_eq!(signals, vec![WeaponSignal::PlaySound("audio/rifle_reload".into())]);
    }

    #[test]
    fn test_reload_full_clip_is_silent() {
        let mut weapon = controller(precise_rifle());
        let mut signals = Vec::new();

        let outcome = weapon.reload(&mut signals);
        assert_eq!(outcome.rounds_transferred, 0);
        assert!(!outcome.depleted);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_reload_depleted_plays_out_of_ammo() {
        let mut weapon = controller(precise_rifle()).with_ammo(0, 0);
        let mut signals = Vec::new();

        let outcome = weapon.reload(&mut signals);
        assert!(outcome.depleted);
        assert_eq!(signals, vec![WeaponSignal::PlaySound("audio/dry_fire".into())]);
        assert_eq!(weapon.ammo().loaded(), 0);
    }

    #[test]
    fn test_missing_owner_skip_policy_skips_shot() {
        let mut config = precise_rifle();
        config.missing_owner_policy = MissingOwnerPolicy::SkipShot;
        let mut weapon = controller(config).with_ammo(10, 100);
        let world = TargetWorld::target(10.0, SurfaceKind::DEFAULT);
        let mut signals = Vec::new();

        let outcome = weapon.execute_shot(0.0, None, &world, &mut signals);

        assert_eq!(outcome, ShotOutcome::MissingOwner);
        assert!(signals.is_empty());
        assert_eq!(weapon.ammo().loaded(), 10);
        assert!(world.filters.borrow().is_empty());
    }

    #[test]
    fn test_missing_owner_attempts_reload_by_default() {
        let mut weapon = controller(WeaponConfig::rifle()).with_ammo(10, 100);
        let world = TargetWorld::target(10.0, SurfaceKind::DEFAULT);
        let mut signals = Vec::new();

        let outcome = weapon.execute_shot(0.0, None, &world, &mut signals);

        let ShotOutcome::Reloaded(reload) = outcome else {
            panic!("expected Reloaded, got {:?}", outcome);
        };
        assert_eq!(reload.rounds_transferred, 20);
        assert_eq!(weapon.ammo().loaded(), 30);
        assert_eq!(weapon.ammo().reserve(), 80);
        assert_eq!(signals, vec![WeaponSignal::PlaySound("audio/rifle_reload".into())]);
        // Без owner трассировки нет
        assert!(world.filters.borrow().is_empty());
        assert_eq!(weapon.last_fire_time(), None);
    }

    #[test]
    fn test_missing_owner_reload_when_depleted_plays_out_of_ammo() {
        let mut weapon = controller(WeaponConfig::rifle()).with_ammo(0, 0);
        let world = TargetWorld::empty();
        let mut signals = Vec::new();

        let outcome = weapon.execute_shot(0.0, None, &world, &mut signals);

        assert_eq!(outcome, ShotOutcome::Reloaded(ReloadOutcome::depleted()));
        assert_eq!(signals, vec![WeaponSignal::PlaySound("audio/dry_fire".into())]);
    }

    #[test]
    fn test_timer_keeps_running_through_missing_owner() {
        let mut scheduler = TickScheduler::new();
        let mut config = precise_rifle();
        config.missing_owner_policy = MissingOwnerPolicy::SkipShot;
        let mut weapon = controller(config);
        let world = TargetWorld::empty();
        let mut signals = Vec::new();

        weapon.start_fire(&mut scheduler);
        let outcomes: Vec<_> = scheduler
            .advance(0.25)
            .into_iter()
            .enumerate()
            .filter_map(|(i, f)| {
                let current = owner();
                let view = (i != 1).then_some(&current);
                weapon.on_timer(f, view, &world, &mut signals)
            })
            .collect();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1], ShotOutcome::MissingOwner);
        assert!(weapon.is_firing());
        assert_eq!(weapon.ammo().loaded(), 28);
    }

    #[test]
    fn test_spread_changes_direction_deterministically() {
        let config = WeaponConfig::rifle();
        let world = TargetWorld::empty();

        let mut first = FireController::new(config.clone(), 7).expect("valid");
        let mut second = FireController::new(config, 7).expect("valid");

        let mut a = Vec::new();
        let mut b = Vec::new();
        for _ in 0..5 {
            first.execute_shot(0.0, Some(&owner()), &world, &mut a);
            second.execute_shot(0.0, Some(&owner()), &world, &mut b);
        }

        assert_eq!(a, b);
        // С разбросом tracer не идёт ровно по −Z
        assert!(a.iter().any(|s| matches!(s,
            WeaponSignal::PlayFireEffect { tracer_end } if tracer_end.x != 0.0 || tracer_end.y != 1.6)));
    }

    #[test]
    fn test_host_cleared_timer_allows_restart() {
        let mut scheduler = TickScheduler::new();
        let mut weapon = controller(precise_rifle());

        weapon.start_fire(&mut scheduler);
        let stale = weapon.timer_handle().expect("firing");
        scheduler.clear(stale);

        weapon.start_fire(&mut scheduler);
        assert_ne!(weapon.timer_handle(), Some(stale));
        assert_eq!(scheduler.active_timers(), 1);
    }
}
