/// Fixed-interval timers for the game loop.
///
/// Each clock (physics, walk animation, sprite animation) is an
/// `IntervalTimer` polled once per loop iteration; `poll` returns how
/// many whole intervals have elapsed so a slow frame catches up instead
/// of losing ticks.
///
/// `pause`/`resume` are idempotent. Pausing banks the partial interval
/// accrued so far; resuming continues from that remainder, so paused
/// time never counts.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct IntervalTimer {
    interval: Duration,
    acc: Duration,
    mark: Instant,
    paused: bool,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        IntervalTimer {
            interval,
            acc: Duration::ZERO,
            mark: Instant::now(),
            paused: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        // Guard against a zero interval from a bad config value.
        IntervalTimer::new(Duration::from_millis(ms.max(1)))
    }

    pub fn poll(&mut self) -> u32 {
        self.advance(Instant::now())
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ── Internal, instant-injected for testability ──

    fn advance(&mut self, now: Instant) -> u32 {
        if self.paused {
            return 0;
        }
        self.acc += now.saturating_duration_since(self.mark);
        self.mark = now;
        let mut ticks = 0u32;
        while self.acc >= self.interval {
            self.acc -= self.interval;
            ticks += 1;
        }
        ticks
    }

    fn pause_at(&mut self, now: Instant) {
        if !self.paused {
            self.acc += now.saturating_duration_since(self.mark);
            self.paused = true;
        }
    }

    fn resume_at(&mut self, now: Instant) {
        if self.paused {
            self.mark = now;
            self.paused = false;
        }
    }
}
