/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Race signals and their wire tokens.
//!
//! The starter's box sends fixed ASCII tokens over the radio link in a
//! 32-byte, NUL-padded payload.  Decoding is exact-match after stripping the
//! padding and surrounding whitespace:
//!
//! | Token | Signal |
//! |---|---|
//! | `START` | [`Signal::Start`] |
//! | `RESET` | [`Signal::Reset`] |
//! | `FAULT` | [`Signal::Fault`] |
//! | *(empty)* | [`Signal::None`] |
//!
//! Anything else is a [`SignalError::UnknownToken`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const START_TOKEN: &str = "START";
pub const RESET_TOKEN: &str = "RESET";
pub const FAULT_TOKEN: &str = "FAULT";

/// Maximum radio payload size in bytes.
pub const MAX_PAYLOAD: usize = 32;

/// At most one signal is delivered per poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    /// Nothing received this cycle.
    #[default]
    None,
    Start,
    Reset,
    Fault,
}

impl Signal {
    /// Wire token for this signal, `None` for [`Signal::None`].
    pub fn token(self) -> Option<&'static str> {
        match self {
            Signal::None => None,
            Signal::Start => Some(START_TOKEN),
            Signal::Reset => Some(RESET_TOKEN),
            Signal::Fault => Some(FAULT_TOKEN),
        }
    }

    /// Decode a raw radio payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, SignalError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(SignalError::PayloadTooLong { len: payload.len() });
        }
        let end = payload
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(payload.len());
        let text = std::str::from_utf8(&payload[..end]).map_err(|_| SignalError::NotUtf8)?;
        text.parse()
    }
}

impl FromStr for Signal {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_matches(|c: char| c == '\0' || c.is_whitespace()) {
            "" => Ok(Signal::None),
            START_TOKEN => Ok(Signal::Start),
            RESET_TOKEN => Ok(Signal::Reset),
            FAULT_TOKEN => Ok(Signal::Fault),
            other => Err(SignalError::UnknownToken(other.to_string())),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or("NONE"))
    }
}

/// Why a payload could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("unknown signal token '{0}' (valid: START, RESET, FAULT)")]
    UnknownToken(String),

    #[error("payload is {len} bytes, radio frames carry at most 32")]
    PayloadTooLong { len: usize },

    #[error("payload is not valid UTF-8")]
    NotUtf8,
}
