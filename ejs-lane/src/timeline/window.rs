/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Half-open time windows on the race timeline.
//!
//! A sample exactly on a boundary belongs to the *later* window, so adjacent
//! windows never light two lamps for the same instant.

use super::Millis;

/// `[start, end)` in elapsed milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: Millis,
    pub end: Millis,
}

impl Window {
    pub const fn new(start: Millis, end: Millis) -> Self {
        Self { start, end }
    }

    /// Inclusive of `start`, exclusive of `end`.
    pub const fn contains(&self, elapsed: Millis) -> bool {
        elapsed >= self.start && elapsed < self.end
    }

    /// Width in milliseconds.  Zero for an inverted window.
    pub const fn width(&self) -> Millis {
        self.end.saturating_sub(self.start)
    }
}
