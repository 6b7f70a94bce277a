/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Race timeline controller.
//!
//! [`RaceController`] turns START / RESET / FAULT signals plus the passage of
//! time into lamp states.  It owns the [`RaceState`], the [`Tower`] it drives
//! and the [`Clock`] it reads.
//!
//! # Operation summary
//!
//! | Operation | Accepted in | Effect |
//! |---|---|---|
//! | [`on_start`](RaceController::on_start) | `Idle` | anchor timeline at `now`, fault lamp off |
//! | [`on_fault`](RaceController::on_fault) | `Starting`, `Running` | count fault, fault lamp on |
//! | [`on_reset`](RaceController::on_reset) | any but `Idle` | clear state, all lamps off, pause, standby lamp |
//! | [`tick`](RaceController::tick) | always | advance phase, project lamps from elapsed time |
//!
//! Out-of-phase signals are dropped without error.  There is no sequence of
//! calls that leaves the state inconsistent (see [`RaceState::is_consistent`]).
//!
//! # Blocking
//! `on_reset` blocks for [`RESET_PAUSE`] between blanking the tower and
//! lighting the standby lamp.  Nothing else is serviced during that pause.

pub mod state;

pub use state::{Phase, RaceState};

use tracing::{debug, info};

use crate::clock::Clock;
use crate::lights::{Led, LightSink, Tower};
use crate::signal::Signal;
use crate::timeline::{
    pre_start_window, start_window, Millis, PRE_START_COMPLETED, RESET_PAUSE, START_STEP_FOUR,
};

// ── RaceController ────────────────────────────────────────────────────────────

pub struct RaceController<S, C> {
    state: RaceState,
    tower: Tower<S>,
    clock: C,
}

impl<S: LightSink, C: Clock> RaceController<S, C> {
    /// Create an idle controller.
    ///
    /// `tower` is taken as-is; after the boot self-test it normally shows the
    /// standby (fault) lamp.
    pub fn new(tower: Tower<S>, clock: C) -> Self {
        Self {
            state: RaceState::default(),
            tower,
            clock,
        }
    }

    // ── Signal handlers ───────────────────────────────────────────────────────

    /// Dispatch one decoded signal to its handler.
    pub fn handle(&mut self, signal: Signal) {
        match signal {
            Signal::None => {}
            Signal::Start => self.on_start(),
            Signal::Reset => self.on_reset(),
            Signal::Fault => self.on_fault(),
        }
    }

    /// One poll cycle: dispatch `signal`, then tick at the current clock
    /// reading.
    pub fn poll(&mut self, signal: Signal) {
        self.handle(signal);
        let now = self.clock.now_ms();
        self.tick(now);
    }

    /// Begin a race attempt.  Ignored unless idle.
    pub fn on_start(&mut self) {
        if self.state.phase != Phase::Idle {
            debug!(phase = %self.state.phase, "START ignored: attempt already in progress");
            return;
        }

        let now = self.clock.now_ms();
        self.state = RaceState {
            phase: Phase::PreStart,
            sequence_start: Some(now),
            run_start: None,
            fault_count: 0,
        };
        self.tower.set(Led::Fault, false);

        info!(sequence_start = now, "START accepted, pre-start countdown running");
    }

    /// Abort or finish the attempt and return to standby.  Ignored while
    /// idle.
    ///
    /// Blocks for [`RESET_PAUSE`].
    pub fn on_reset(&mut self) {
        if self.state.phase == Phase::Idle {
            debug!("RESET ignored: already idle");
            return;
        }

        let previous = self.state;
        self.state = RaceState::default();
        self.tower.all_off();
        self.clock.delay_ms(RESET_PAUSE);
        self.tower.set(Led::Fault, true);

        info!(
            from = %previous.phase,
            faults = previous.fault_count,
            run_start = ?previous.run_start,
            "RESET, back to standby"
        );
    }

    /// Register a false start.  Only meaningful once the starting lights
    /// are running; ignored in `Idle` and `PreStart`.
    ///
    /// Sticky: from here until reset the timeline never drives the fault
    /// slot again.
    pub fn on_fault(&mut self) {
        if !self.state.phase.accepts_faults() {
            debug!(phase = %self.state.phase, "FAULT ignored outside the start sequence");
            return;
        }

        self.state.fault_count = self.state.fault_count.saturating_add(1);
        if !self.tower.is_on(Led::Fault) {
            self.tower.set(Led::Fault, true);
        }

        info!(
            phase = %self.state.phase,
            faults = self.state.fault_count,
            "FAULT registered"
        );
    }

    // ── Timeline ──────────────────────────────────────────────────────────────

    /// Advance phases and project lamp states for the clock reading `now`.
    ///
    /// Must be called every few milliseconds.  A late tick can cross several
    /// checkpoints at once; phases still advance in order.
    pub fn tick(&mut self, now: Millis) {
        let Some(elapsed) = self.state.elapsed(now) else {
            return;
        };

        if self.state.phase == Phase::PreStart && elapsed >= PRE_START_COMPLETED {
            self.state.phase = Phase::Starting;
            info!(elapsed, "pre-start complete, starting lights");
        }

        if self.state.phase == Phase::Starting && elapsed >= START_STEP_FOUR {
            self.state.phase = Phase::Running;
        }

        match self.state.phase {
            Phase::PreStart => self.project_pre_start(elapsed),
            Phase::Starting => self.project_starting(elapsed),
            Phase::Running if self.state.run_start.is_none() => self.go(now, elapsed),
            Phase::Running | Phase::Idle => {}
        }
    }

    /// Lamp test: exactly the lamp whose window contains `elapsed` is lit.
    fn project_pre_start(&mut self, elapsed: Millis) {
        for led in Led::ALL {
            self.tower.set(led, pre_start_window(led).contains(elapsed));
        }
    }

    /// Starting lights.  Green has no window here, and the fault slot is
    /// left alone once a fault has been registered.
    fn project_starting(&mut self, elapsed: Millis) {
        let fault_latched = self.state.fault_count > 0;
        for led in Led::ALL {
            if led == Led::Fault && fault_latched {
                continue;
            }
            if let Some(window) = start_window(led) {
                self.tower.set(led, window.contains(elapsed));
            }
        }
    }

    fn go(&mut self, now: Millis, elapsed: Millis) {
        self.tower.set(Led::Set, false);
        self.tower.set(Led::Go, true);
        self.state.run_start = Some(now);

        info!(
            run_start = now,
            elapsed,
            faults = self.state.fault_count,
            "GO"
        );
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn fault_count(&self) -> u32 {
        self.state.fault_count
    }

    pub fn tower(&self) -> &Tower<S> {
        &self.tower
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
