//! Physical surface component (материал collider'а для damage multiplier)

use bevy::prelude::*;

use crate::combat::surface::SurfaceKind;

/// Материал поверхности entity. Нет компонента → SurfaceKind::DEFAULT.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicalSurface(pub SurfaceKind);

impl PhysicalSurface {
    pub fn flesh() -> Self {
        Self(SurfaceKind::FLESH_DEFAULT)
    }

    /// Голова / уязвимые зоны
    pub fn vulnerable() -> Self {
        Self(SurfaceKind::FLESH_VULNERABLE)
    }
}
