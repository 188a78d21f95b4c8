//! Hit resolution — world trace вдоль направления выстрела
//!
//! Architecture:
//! - `WorldTrace` — контракт физического движка (raycast), ядро его только вызывает
//! - `HitResolver` — строит луч origin → origin + dir × range, классифицирует поверхность
//! - Промах не ошибка: impact_point = конец луча (tracer endpoint)

use bevy::prelude::*;

use super::surface::SurfaceKind;

/// Набор actors, которых trace игнорирует (оружие + owner)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceFilter {
    ignored: Vec<Entity>,
}

impl TraceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, entity: Entity) -> Self {
        if !self.ignored.contains(&entity) {
            self.ignored.push(entity);
        }
        self
    }

    pub fn is_ignored(&self, entity: Entity) -> bool {
        self.ignored.contains(&entity)
    }

    pub fn ignored(&self) -> &[Entity] {
        &self.ignored
    }
}

/// Сырой результат trace (от физического движка)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Actor, которому принадлежит collider (None = статичная геометрия)
    pub actor: Option<Entity>,
    pub point: Vec3,
    /// None = материал не удалось определить
    pub surface: Option<SurfaceKind>,
}

/// Контракт: ближайшее blocking пересечение на отрезке origin → end
pub trait WorldTrace {
    fn trace_first_blocking_hit(
        &self,
        origin: Vec3,
        end: Vec3,
        filter: &TraceFilter,
        return_surface: bool,
    ) -> Option<TraceHit>;
}

/// Результат одного выстрела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Weak reference, ядро не владеет actor
    pub hit_actor: Option<Entity>,
    pub impact_point: Vec3,
    pub surface: SurfaceKind,
    pub did_hit: bool,
}

impl HitOutcome {
    pub fn miss(end: Vec3) -> Self {
        Self {
            hit_actor: None,
            impact_point: end,
            surface: SurfaceKind::DEFAULT,
            did_hit: false,
        }
    }

    /// Куда рисовать tracer (точка попадания или конец дальности)
    pub fn tracer_end(&self) -> Vec3 {
        self.impact_point
    }
}

/// Stateless resolver поверх `WorldTrace`
#[derive(Debug, Clone, Copy, Default)]
pub struct HitResolver;

impl HitResolver {
    pub fn resolve<W: WorldTrace + ?Sized>(
        &self,
        world: &W,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        filter: &TraceFilter,
    ) -> HitOutcome {
        let end = origin + direction * max_range;

        match world.trace_first_blocking_hit(origin, end, filter, true) {
            Some(hit) => HitOutcome {
                hit_actor: hit.actor,
                impact_point: hit.point,
                surface: hit.surface.unwrap_or(SurfaceKind::DEFAULT),
                did_hit: true,
            },
            None => HitOutcome::miss(end),
        }
    }
}
