/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Monotonic time source.
//!
//! [`Clock::delay_ms`] is the only way the crate ever blocks.  Inside the race
//! logic it is called from exactly two places, the boot self-test and the
//! reset pause, and no signal is serviced while it runs.  The poll loop also
//! uses it to pace cycles.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crate::timeline::Millis;

pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.  Never decreases.
    fn now_ms(&self) -> Millis;

    /// Block the calling context for `ms` milliseconds.
    fn delay_ms(&mut self, ms: Millis);
}

// ── SystemClock ───────────────────────────────────────────────────────────────

/// Wall clock backed by [`Instant`], with the origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }

    fn delay_ms(&mut self, ms: Millis) {
        thread::sleep(Duration::from_millis(ms));
    }
}

// ── ManualClock ───────────────────────────────────────────────────────────────

/// Simulated clock that only moves when told to.
///
/// Clones share the same time, so a test can hand one clone to the
/// controller and keep another to advance.  `delay_ms` advances time instead
/// of sleeping.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: Millis) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Jump to an absolute reading.  Going backwards is ignored.
    pub fn set(&self, ms: Millis) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }

    fn delay_ms(&mut self, ms: Millis) {
        self.advance(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now_ms(), 0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let a = ManualClock::new();
        let mut b = a.clone();

        a.advance(250);
        assert_eq!(b.now_ms(), 250);

        b.delay_ms(1_000);
        assert_eq!(a.now_ms(), 1_250);
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let c = ManualClock::starting_at(5_000);
        c.set(4_000);
        assert_eq!(c.now_ms(), 5_000);
        c.set(6_000);
        assert_eq!(c.now_ms(), 6_000);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let c = SystemClock::new();
        let a = c.now_ms();
        let b = c.now_ms();
        assert!(b >= a);
    }
}
