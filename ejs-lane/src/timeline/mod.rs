/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The fixed race timeline.
//!
//! Every LED transition of a race attempt happens at a *checkpoint*: a fixed
//! offset, in milliseconds, from the instant START was accepted.  The
//! checkpoints are derived at compile time by prefix-summing the step widths:
//!
//! ```text
//! elapsed (ms)   0 ──── 2000 ── 2300 ── 2600 ── 2900 ── 3200 ── 3500 ─── 4500 ─── 5500 ─── 6500 ─── 7500
//! PreStart       (dark)        │  go  │  set  │ ready │ fault │
//! Starting                                                       (dark) │ fault  │ ready  │  set   │
//! Running                                                                                             go ►
//! ```
//!
//! All phase logic compares `elapsed = now - sequence_start` against this
//! table.  Timing is deliberately not configurable.

pub mod window;

pub use window::Window;

use crate::lights::Led;

/// Milliseconds on the monotonic clock.
pub type Millis = u64;

// ── Step widths ───────────────────────────────────────────────────────────────

/// Dead time at the start of every attempt, and the settle delay on either
/// side of the boot self-test.
pub const SEQUENCE_DELAY: Millis = 2_000;

/// How long each LED stays lit during the pre-start lamp test.
pub const PRE_START_STEP: Millis = 300;

/// How long each LED stays lit during the starting-light sequence.
pub const START_STEP: Millis = 1_000;

/// How long each LED stays lit during the boot self-test.
pub const SELF_TEST_STEP: Millis = 300;

/// Blank interval between "all off" and the standby lamp on reset.
pub const RESET_PAUSE: Millis = 1_000;

// ── Checkpoints ───────────────────────────────────────────────────────────────

/// `N` checkpoints spaced `step` apart, the first at `base + step`.
const fn prefix_sum<const N: usize>(base: Millis, step: Millis) -> [Millis; N] {
    let mut out = [0; N];
    let mut acc = base;
    let mut i = 0;
    while i < N {
        acc += step;
        out[i] = acc;
        i += 1;
    }
    out
}

/// Pre-start checkpoints: step one … four, then "completed".
pub const PRE_START_CHECKPOINTS: [Millis; 5] = prefix_sum(SEQUENCE_DELAY, PRE_START_STEP);

pub const PRE_START_STEP_ONE: Millis = PRE_START_CHECKPOINTS[0];
pub const PRE_START_STEP_TWO: Millis = PRE_START_CHECKPOINTS[1];
pub const PRE_START_STEP_THREE: Millis = PRE_START_CHECKPOINTS[2];
pub const PRE_START_STEP_FOUR: Millis = PRE_START_CHECKPOINTS[3];

/// Elapsed time at which `PreStart` hands over to `Starting`.
pub const PRE_START_COMPLETED: Millis = PRE_START_CHECKPOINTS[4];

/// Start checkpoints, continuing on the same timeline after pre-start.
pub const START_CHECKPOINTS: [Millis; 4] = prefix_sum(PRE_START_COMPLETED, START_STEP);

pub const START_STEP_ONE: Millis = START_CHECKPOINTS[0];
pub const START_STEP_TWO: Millis = START_CHECKPOINTS[1];
pub const START_STEP_THREE: Millis = START_CHECKPOINTS[2];

/// Elapsed time at which the race goes green (`Starting` → `Running`).
pub const START_STEP_FOUR: Millis = START_CHECKPOINTS[3];

// ── Per-LED windows ───────────────────────────────────────────────────────────

/// The window during which `led` is lit in the pre-start lamp test.
///
/// go → set → ready → fault, each one `PRE_START_STEP` wide.
pub fn pre_start_window(led: Led) -> Window {
    match led {
        Led::Go => Window::new(PRE_START_STEP_ONE, PRE_START_STEP_TWO),
        Led::Set => Window::new(PRE_START_STEP_TWO, PRE_START_STEP_THREE),
        Led::Ready => Window::new(PRE_START_STEP_THREE, PRE_START_STEP_FOUR),
        Led::Fault => Window::new(PRE_START_STEP_FOUR, PRE_START_COMPLETED),
    }
}

/// The window during which `led` is lit in the starting-light sequence.
///
/// Returns `None` for [`Led::Go`]: green is driven only by entering
/// `Running`, never by the projection.
pub fn start_window(led: Led) -> Option<Window> {
    match led {
        Led::Fault => Some(Window::new(START_STEP_ONE, START_STEP_TWO)),
        Led::Ready => Some(Window::new(START_STEP_TWO, START_STEP_THREE)),
        Led::Set => Some(Window::new(START_STEP_THREE, START_STEP_FOUR)),
        Led::Go => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
