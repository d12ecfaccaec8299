//! Fixed-period tick clock

use std::time::Duration;

use instant::Instant;

/// Turns elapsed wall time into whole navigation ticks
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    max_ticks: u32,
    accumulated: Duration,
    last: Option<Instant>,
}

impl TickClock {
    pub fn new(period: Duration, max_ticks: u32) -> Self {
        Self {
            period,
            max_ticks: max_ticks.max(1),
            accumulated: Duration::ZERO,
            last: None,
        }
    }

    /// Ticks due at `now`. The first call only starts the clock.
    pub fn update(&mut self, now: Instant) -> u32 {
        let elapsed = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.advance(elapsed)
    }

    /// Ticks due after `elapsed` more time.
    ///
    /// A backlog beyond the per-update limit is dropped rather than replayed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.accumulated += elapsed;
        let due = self.accumulated.as_nanos() / self.period.as_nanos();
        if due > u128::from(self.max_ticks) {
            log::trace!("dropping {} late ticks", due - u128::from(self.max_ticks));
            self.accumulated = Duration::ZERO;
            return self.max_ticks;
        }
        // due <= max_ticks, which is a u32
        let due = due as u32;
        self.accumulated -= self.period * due;
        due
    }

    /// Time until the next tick is due
    pub fn until_next(&self) -> Duration {
        self.period.saturating_sub(self.accumulated)
    }
}
