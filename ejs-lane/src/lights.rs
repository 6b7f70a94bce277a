/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lamp outputs of the light tower.
//!
//! The tower has four independently addressable lamps.  Hardware is reached
//! only through the write-only [`LightSink`] trait; the [`Tower`] wrapper
//! keeps the authoritative record of which lamps are lit, so no decision
//! ever depends on reading a pin back.

use std::fmt;

// ── Led ───────────────────────────────────────────────────────────────────────

/// One lamp of the tower, top to bottom: fault (red), ready, set (yellow),
/// go (green).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    Go,
    Set,
    Ready,
    Fault,
}

impl Led {
    /// Every lamp, in pre-start lamp-test order.
    pub const ALL: [Led; 4] = [Led::Go, Led::Set, Led::Ready, Led::Fault];

    fn index(self) -> usize {
        match self {
            Led::Go => 0,
            Led::Set => 1,
            Led::Ready => 2,
            Led::Fault => 3,
        }
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Led::Go => "go",
            Led::Set => "set",
            Led::Ready => "ready",
            Led::Fault => "fault",
        };
        f.write_str(name)
    }
}

// ── LightSink ─────────────────────────────────────────────────────────────────

/// Write-only lamp driver.
///
/// Writes must be idempotent: setting a lamp to the level it already has is
/// allowed and has no visible effect.
pub trait LightSink {
    fn set(&mut self, led: Led, on: bool);
}

/// Sink that reports every lamp change as a `tracing` event.
///
/// Used by the host binary in place of GPIO.
#[derive(Debug, Default)]
pub struct TracingLights;

impl LightSink for TracingLights {
    fn set(&mut self, led: Led, on: bool) {
        tracing::info!(led = %led, on, "lamp");
    }
}

// ── Tower ─────────────────────────────────────────────────────────────────────

/// A [`LightSink`] plus the record of what it is currently showing.
///
/// Redundant writes are skipped; they are harmless for the hardware but are
/// needless work in the poll loop.
#[derive(Debug)]
pub struct Tower<S> {
    sink: S,
    lit: [bool; 4],
}

impl<S: LightSink> Tower<S> {
    /// Takes ownership of `sink` and drives every lamp off so the record
    /// starts out matching the outputs.
    pub fn new(mut sink: S) -> Self {
        for led in Led::ALL {
            sink.set(led, false);
        }
        Self {
            sink,
            lit: [false; 4],
        }
    }

    /// Drive `led` to `on`.  No-op if it is already at that level.
    pub fn set(&mut self, led: Led, on: bool) {
        let slot = &mut self.lit[led.index()];
        if *slot == on {
            return;
        }
        *slot = on;
        self.sink.set(led, on);
    }

    pub fn is_on(&self, led: Led) -> bool {
        self.lit[led.index()]
    }

    pub fn all_off(&mut self) {
        for led in Led::ALL {
            self.set(led, false);
        }
    }

    /// Lamps currently lit, in [`Led::ALL`] order.
    pub fn lit(&self) -> Vec<Led> {
        Led::ALL.into_iter().filter(|&l| self.is_on(l)).collect()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

// ── RecordingLights ───────────────────────────────────────────────────────────

/// Sink that records every write, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingLights {
    pub writes: Vec<(Led, bool)>,
}

impl RecordingLights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level of `led` as of the last write (off if never written).
    pub fn level(&self, led: Led) -> bool {
        self.writes
            .iter()
            .rev()
            .find(|(l, _)| *l == led)
            .map(|&(_, on)| on)
            .unwrap_or(false)
    }

    /// Number of writes that switched `led` on.
    pub fn times_lit(&self, led: Led) -> usize {
        self.writes
            .iter()
            .filter(|&&(l, on)| l == led && on)
            .count()
    }
}

impl LightSink for RecordingLights {
    fn set(&mut self, led: Led, on: bool) {
        self.writes.push((led, on));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tower_drives_every_lamp_off() {
        let tower = Tower::new(RecordingLights::new());
        assert_eq!(tower.sink().writes.len(), 4);
        assert!(tower.sink().writes.iter().all(|&(_, on)| !on));
        assert!(tower.lit().is_empty());
    }

    #[test]
    fn redundant_writes_are_skipped() {
        let mut tower = Tower::new(RecordingLights::new());
        tower.set(Led::Go, true);
        tower.set(Led::Go, true);
        tower.set(Led::Go, true);
        assert_eq!(tower.sink().times_lit(Led::Go), 1);
        assert!(tower.is_on(Led::Go));
    }

    #[test]
    fn record_tracks_each_lamp_independently() {
        let mut tower = Tower::new(RecordingLights::new());
        tower.set(Led::Ready, true);
        tower.set(Led::Fault, true);
        tower.set(Led::Ready, false);

        assert_eq!(tower.lit(), vec![Led::Fault]);
        assert!(!tower.sink().level(Led::Ready));
        assert!(tower.sink().level(Led::Fault));
    }

    #[test]
    fn all_off_clears_only_lit_lamps() {
        let mut tower = Tower::new(RecordingLights::new());
        tower.set(Led::Set, true);
        let before = tower.sink().writes.len();

        tower.all_off();

        assert!(tower.lit().is_empty());
        // Only `set` was lit, so only one extra write.
        assert_eq!(tower.sink().writes.len(), before + 1);
    }

    #[test]
    fn led_display_names() {
        let names: Vec<String> = Led::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, ["go", "set", "ready", "fault"]);
    }
}
