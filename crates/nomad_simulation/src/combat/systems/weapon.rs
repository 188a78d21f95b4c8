//! Weapon systems: intents → FireController, timer ticks → shots → events.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::combat::components::{PhysicalSurface, Weapon};
use crate::combat::fire::{OwnerView, WeaponSignal};
use crate::combat::weapon::{
    PointDamageEvent, ReloadIntent, StartFireIntent, StopFireIntent, WeaponSignalEvent,
};
use crate::components::{Controller, EyeOffset, Player};
use crate::logger;
use crate::physics::ColliderTraceWorld;

pub(super) type OwnerQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static GlobalTransform,
        Option<&'static EyeOffset>,
        Option<&'static Controller>,
        Has<Player>,
    ),
>;

/// System: обработка fire/reload intents
///
/// Порядок внутри кадра: start → stop → reload.
/// Press + release в одном кадре = без выстрела.
pub fn process_weapon_intents(
    mut start_events: EventReader<StartFireIntent>,
    mut stop_events: EventReader<StopFireIntent>,
    mut reload_events: EventReader<ReloadIntent>,
    mut weapons: Query<&mut Weapon>,
    mut signal_events: EventWriter<WeaponSignalEvent>,
    mut damage_events: EventWriter<PointDamageEvent>,
) {
    for intent in start_events.read() {
        let Ok(mut weapon) = weapons.get_mut(intent.weapon) else {
            logger::log_warning(&format!("StartFireIntent: {:?} has no Weapon", intent.weapon));
            continue;
        };
        weapon.start_fire();
    }

    for intent in stop_events.read() {
        if let Ok(mut weapon) = weapons.get_mut(intent.weapon) {
            weapon.stop_fire();
        }
    }

    for intent in reload_events.read() {
        let Ok(mut weapon) = weapons.get_mut(intent.weapon) else {
            logger::log_warning(&format!("ReloadIntent: {:?} has no Weapon", intent.weapon));
            continue;
        };

        let mut signals = Vec::new();
        weapon.controller.reload(&mut signals);
        dispatch_signals(intent.weapon, signals, &mut signal_events, &mut damage_events);
    }
}

/// System: двигаем часы оружия, выполняем выстрелы
///
/// Trace world (snapshot коллайдеров) строим лениво, только если
/// в этом тике хоть одно оружие стреляет.
pub fn tick_weapons(
    time: Res<Time>,
    mut weapons: Query<(Entity, &mut Weapon)>,
    owners: OwnerQuery,
    colliders: Query<(Entity, &Collider, &GlobalTransform, Option<&PhysicalSurface>)>,
    mut signal_events: EventWriter<WeaponSignalEvent>,
    mut damage_events: EventWriter<PointDamageEvent>,
) {
    let delta = time.delta_secs();
    let mut trace_world: Option<ColliderTraceWorld> = None;

    for (entity, mut weapon) in weapons.iter_mut() {
        let firings = weapon.advance(delta);
        if firings.is_empty() {
            continue;
        }

        let world = trace_world.get_or_insert_with(|| ColliderTraceWorld::from_query(colliders.iter()));
        let owner = weapon.owner.and_then(|owner| owner_view(owner, &owners));

        let mut signals = Vec::new();
        weapon.fire(&firings, owner.as_ref(), world, &mut signals);
        dispatch_signals(entity, signals, &mut signal_events, &mut damage_events);
    }
}

/// Eye viewpoint owner'а (owner без GlobalTransform = отсутствует)
pub(super) fn owner_view(owner: Entity, owners: &OwnerQuery) -> Option<OwnerView> {
    let (transform, eye_offset, controller, is_player) = owners.get(owner).ok()?;
    let (_scale, rotation, translation) = transform.to_scale_rotation_translation();
    let offset = eye_offset.copied().unwrap_or_default().0;

    Some(OwnerView {
        entity: owner,
        eye_location: translation + offset,
        eye_rotation: rotation,
        // Нет Controller компонента → instigator пустой
        controller: controller.map(|c| c.0),
        player_controlled: is_player,
    })
}

/// Сигналы ядра → Bevy events (damage отдельно от presentation)
pub(super) fn dispatch_signals(
    weapon: Entity,
    signals: Vec<WeaponSignal>,
    signal_events: &mut EventWriter<WeaponSignalEvent>,
    damage_events: &mut EventWriter<PointDamageEvent>,
) {
    for signal in signals {
        match signal {
            WeaponSignal::ApplyPointDamage(damage) => {
                damage_events.write(PointDamageEvent { weapon, damage });
            }
            signal => {
                signal_events.write(WeaponSignalEvent { weapon, signal });
            }
        }
    }
}
