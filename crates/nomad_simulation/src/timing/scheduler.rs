//! Periodic callback scheduler (injected into FireController)
//!
//! Architecture:
//! - `FireScheduler` — контракт host'а: register/cancel repeating timer + world clock
//! - `TickScheduler` — headless реализация с ручными часами (`advance`)
//!
//! Scheduler не вызывает callbacks сам: `advance` возвращает список срабатываний,
//! host передаёт каждое в `FireController::on_timer`. Так нет borrow-циклов
//! controller ↔ scheduler, и отменённый handle просто игнорируется.

/// Handle зарегистрированного таймера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Одно срабатывание таймера
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerFiring {
    pub handle: TimerHandle,
    /// World time момента срабатывания (секунды)
    pub time: f32,
}

/// Контракт host scheduler'а
pub trait FireScheduler {
    /// Текущее world time (секунды)
    fn now(&self) -> f32;

    /// Repeating timer: первое срабатывание через `first_delay`, далее каждые `interval`
    fn set_repeating(&mut self, first_delay: f32, interval: f32) -> TimerHandle;

    /// Отменить таймер. Неизвестный handle: no-op.
    fn clear(&mut self, handle: TimerHandle);

    fn is_active(&self, handle: TimerHandle) -> bool;
}

/// Минимальный interval (защита от бесконечного catch-up loop)
const MIN_INTERVAL: f64 = 1e-4;

/// Допуск сравнения времени (f64 накопление)
const TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct RepeatingTimer {
    handle: TimerHandle,
    next_fire: f64,
    interval: f64,
}

/// Headless scheduler с ручными часами
///
/// Время хранится в f64 (накопление тысяч `advance` без дрейфа),
/// наружу отдаётся f32 как и остальное время симуляции.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    time: f64,
    next_id: u64,
    timers: Vec<RepeatingTimer>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler с заданным стартовым временем
    pub fn starting_at(time: f32) -> Self {
        Self {
            time: time as f64,
            ..Self::default()
        }
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Сдвинуть часы на `delta` секунд
    ///
    /// Возвращает все срабатывания в хронологическом порядке. Если `delta`
    /// перекрывает несколько интервалов, таймер срабатывает несколько раз (catch-up).
    pub fn advance(&mut self, delta: f32) -> Vec<TimerFiring> {
        let target = self.time + delta.max(0.0) as f64;
        let mut fired = Vec::new();

        loop {
            let due = self
                .timers
                .iter_mut()
                .filter(|timer| timer.next_fire <= target + TIME_EPSILON)
                .min_by(|a, b| a.next_fire.total_cmp(&b.next_fire));

            let Some(timer) = due else {
                break;
            };

            let fire_time = timer.next_fire.max(self.time);
            fired.push(TimerFiring {
                handle: timer.handle,
                time: fire_time as f32,
            });
            timer.next_fire += timer.interval;
            self.time = fire_time;
        }

        self.time = target;
        fired
    }
}

impl FireScheduler for TickScheduler {
    fn now(&self) -> f32 {
        self.time as f32
    }

    fn set_repeating(&mut self, first_delay: f32, interval: f32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        self.timers.push(RepeatingTimer {
            handle,
            next_fire: self.time + first_delay.max(0.0) as f64,
            interval: (interval as f64).max(MIN_INTERVAL),
        });

        handle
    }

    fn clear(&mut self, handle: TimerHandle) {
        self.timers.retain(|timer| timer.handle != handle);
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.handle == handle)
    }
}
