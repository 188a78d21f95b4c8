//! Collider trace world — `WorldTrace` поверх Rapier shapes
//!
//! Архитектура:
//! - Snapshot коллайдеров (entity + shape + pose + surface) на момент тика
//! - Ray vs каждый shape через `Collider::cast_ray`, ближайший non-ignored побеждает
//! - Без broad-phase: рассчитан на headless сцены и тесты (десятки тел)

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::combat::components::PhysicalSurface;
use crate::combat::hit::{TraceFilter, TraceHit, WorldTrace};
use crate::combat::surface::SurfaceKind;

/// Отрезки короче этого не трассируем
const MIN_TRACE_LENGTH: f32 = 1e-6;

/// Одно тело в trace world
#[derive(Clone)]
pub struct TraceBody {
    pub entity: Entity,
    pub collider: Collider,
    pub translation: Vec3,
    pub rotation: Quat,
    /// None = материал не назначен
    pub surface: Option<SurfaceKind>,
}

impl TraceBody {
    pub fn new(entity: Entity, collider: Collider, translation: Vec3) -> Self {
        Self {
            entity,
            collider,
            translation,
            rotation: Quat::IDENTITY,
            surface: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_surface(mut self, surface: SurfaceKind) -> Self {
        self.surface = Some(surface);
        self
    }
}

/// Snapshot коллайдеров для trace
#[derive(Clone, Default)]
pub struct ColliderTraceWorld {
    bodies: Vec<TraceBody>,
}

impl ColliderTraceWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: TraceBody) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Snapshot из ECS query (GlobalTransform authoritative)
    pub fn from_query<'a>(
        items: impl IntoIterator<
            Item = (Entity, &'a Collider, &'a GlobalTransform, Option<&'a PhysicalSurface>),
        >,
    ) -> Self {
        let bodies = items
            .into_iter()
            .map(|(entity, collider, transform, surface)| {
                let (_scale, rotation, translation) = transform.to_scale_rotation_translation();
                TraceBody {
                    entity,
                    collider: collider.clone(),
                    translation,
                    rotation,
                    surface: surface.map(|s| s.0),
                }
            })
            .collect();

        Self { bodies }
    }
}

impl WorldTrace for ColliderTraceWorld {
    fn trace_first_blocking_hit(
        &self,
        origin: Vec3,
        end: Vec3,
        filter: &TraceFilter,
        return_surface: bool,
    ) -> Option<TraceHit> {
        let delta = end - origin;
        let length = delta.length();
        if length < MIN_TRACE_LENGTH {
            return None;
        }
        let direction = delta / length;

        self.bodies
            .iter()
            .filter(|body| !filter.is_ignored(body.entity))
            .filter_map(|body| {
                body.collider
                    .cast_ray(body.translation, body.rotation, origin, direction, length, true)
                    .map(|toi| (body, toi))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(body, toi)| TraceHit {
                actor: Some(body.entity),
                point: origin + direction * toi,
                surface: if return_surface { body.surface } else { None },
            })
    }
}
