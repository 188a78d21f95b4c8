//! Headless демо NOMAD
//!
//! Rifle стреляет по манекену (vulnerable) через ECS:
//! StartFireIntent → FixedUpdate тики → PointDamageEvent → Health.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::Collider;
use nomad_simulation::{
    create_headless_app, log_error, log_info, spawn_weapon, EyeOffset, Health, PhysicalSurface, Player,
    StartFireIntent, StopFireIntent, SurfaceKind, Weapon, WeaponConfig,
};

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));
    log_info(&format!("Starting NOMAD headless simulation (seed: {})", seed));

    let shooter = app
        .world_mut()
        .spawn((
            Transform::default(),
            GlobalTransform::default(),
            EyeOffset::default(),
            Player,
            Health::new(100.0),
        ))
        .id();

    // Манекен на 10м по −Z, весь vulnerable
    let dummy = app
        .world_mut()
        .spawn((
            Collider::cuboid(0.5, 2.0, 0.5),
            GlobalTransform::from_translation(Vec3::new(0.0, 1.6, -10.0)),
            PhysicalSurface(SurfaceKind::FLESH_VULNERABLE),
            Health::new(500.0),
        ))
        .id();

    let weapon = match spawn_weapon(app.world_mut(), WeaponConfig::rifle(), Some(shooter)) {
        Ok(weapon) => weapon,
        Err(err) => {
            log_error(&format!("invalid weapon config: {err}"));
            return;
        }
    };

    app.world_mut().send_event(StartFireIntent { weapon });
    for tick in 0..120 {
        if tick == 60 {
            app.world_mut().send_event(StopFireIntent { weapon });
        }
        app.update();
    }

    let health = app.world().get::<Health>(dummy).map(|h| h.current).unwrap_or_default();
    let loaded = app
        .world()
        .get::<Weapon>(weapon)
        .map(|w| w.controller.ammo().loaded())
        .unwrap_or_default();

    log_info(&format!("Dummy HP: {:.1}, rounds loaded: {}", health, loaded));
    log_info("Simulation complete!");
}
