//! Physics module
//!
//! Reference реализация trace контракта поверх Rapier collider shapes.
//! Полноценный physics pipeline: забота host'а, ядро видит только `WorldTrace`.

pub mod trace;

// Re-export основных типов
pub use trace::{ColliderTraceWorld, TraceBody};
