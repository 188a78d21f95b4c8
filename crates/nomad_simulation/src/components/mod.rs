//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (health, player marker, controller, eye offset)
//!
//! Weapon-специфичные компоненты (Weapon, PhysicalSurface) лежат в crate::combat::components.

pub mod actor;

// Re-exports для удобного импорта
pub use actor::*;
