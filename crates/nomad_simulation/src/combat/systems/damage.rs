//! Damage application (host side of ApplyPointDamage contract).

use bevy::prelude::*;

use crate::combat::weapon::PointDamageEvent;
use crate::components::Health;
use crate::logger;

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, hit markers, звуков.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Деспавн не автоматический, трупы остаются на месте.
#[derive(Component, Debug)]
pub struct Dead;

/// Система: PointDamageEvent → Health
///
/// 1. Target без Health (стены, пропсы) пропускаем
/// 2. Self-hit не применяем (trace filter должен был исключить owner)
/// 3. Применяем урон, генерируем DamageDealt / EntityDied
pub fn apply_point_damage(
    mut commands: Commands,
    mut damage_events: EventReader<PointDamageEvent>,
    mut targets: Query<&mut Health>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for event in damage_events.read() {
        let damage = &event.damage;

        if damage.target == damage.causer {
            logger::log_warning(&format!(
                "Self-hit ignored: {:?} (weapon {:?})",
                damage.causer, event.weapon
            ));
            continue;
        }

        let Ok(mut health) = targets.get_mut(damage.target) else {
            continue;
        };

        let was_alive = health.is_alive();
        health.take_damage(damage.amount);
        let died = was_alive && !health.is_alive();

        dealt_events.write(DamageDealt {
            attacker: damage.causer,
            target: damage.target,
            damage: damage.amount,
            target_died: died,
        });

        logger::log(&format!(
            "💥 {:?} hit {:?} for {:.1} (surface {:?}, HP {:.1}/{:.1})",
            damage.causer, damage.target, damage.amount, damage.surface, health.current, health.max
        ));

        if died {
            died_events.write(EntityDied {
                entity: damage.target,
                killer: Some(damage.causer),
            });
            commands.entity(damage.target).insert(Dead);

            logger::log_info(&format!("Entity {:?} killed by {:?}", damage.target, damage.causer));
        }
    }
}
