/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The controller's entire race state.

use std::fmt;

use crate::timeline::Millis;

/// Coarse phase of a race attempt.
///
/// ```text
///  Idle ──START──► PreStart ──3500ms──► Starting ──7500ms──► Running
///   ▲                 │                    │                   │
///   └─────────────────┴───────RESET────────┴───────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Lamp-test countdown: each lamp lights in turn.
    PreStart,
    /// Starting lights: fault, ready, set, one second each.
    Starting,
    /// Green.  Terminal until reset.
    Running,
}

impl Phase {
    /// `true` while a fault signal is meaningful.
    pub fn accepts_faults(self) -> bool {
        matches!(self, Phase::Starting | Phase::Running)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::PreStart => "pre-start",
            Phase::Starting => "starting",
            Phase::Running => "running",
        };
        f.write_str(name)
    }
}

/// Mutable race record owned by [`RaceController`](super::RaceController).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaceState {
    pub phase: Phase,

    /// Clock reading when START was accepted.  Anchors every checkpoint
    /// comparison; `None` while idle.
    pub sequence_start: Option<Millis>,

    /// Clock reading when the race went green.
    pub run_start: Option<Millis>,

    /// Faults registered since the attempt began.  Only reset lowers it.
    pub fault_count: u32,
}

impl RaceState {
    /// Elapsed time on the race timeline, or `None` while idle.
    ///
    /// Saturates at zero if `now` precedes the sequence start.
    pub fn elapsed(&self, now: Millis) -> Option<Millis> {
        self.sequence_start.map(|start| now.saturating_sub(start))
    }

    /// Checks the structural invariants that hold between public operations:
    ///
    /// * idle ⇔ no sequence start
    /// * running ⇔ run start recorded
    /// * faults are only ever counted in `Starting` / `Running`
    pub fn is_consistent(&self) -> bool {
        let idle_matches_anchor = (self.phase == Phase::Idle) == self.sequence_start.is_none();
        let running_matches_go = (self.phase == Phase::Running) == self.run_start.is_some();
        let faults_in_window = self.fault_count == 0 || self.phase.accepts_faults();

        idle_matches_anchor && running_matches_go && faults_in_window
    }
}
