//! Timing domain — periodic callbacks для fire cadence
//!
//! Содержит:
//! - FireScheduler (контракт host scheduler'а)
//! - TickScheduler (headless реализация, ручные часы)
//! - TimerHandle / TimerFiring

pub mod scheduler;

pub use scheduler::*;
