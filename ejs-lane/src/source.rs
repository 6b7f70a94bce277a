/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Where signals come from.
//!
//! On the tower this is the radio receiver.  The host build offers two
//! stand-ins:
//!
//! * [`ChannelSource`] – raw token frames arriving over a `flume` channel,
//!   typically fed from stdin by [`spawn_line_reader`].
//! * [`ScriptedSource`] – a timed replay of `(offset_ms, signal)` pairs,
//!   parsed from a script file by [`parse_script`].
//!
//! Either way the poll loop sees at most one [`Signal`] per cycle.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::thread;

use anyhow::{bail, Context, Result};
use flume::{Receiver, TryRecvError};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::signal::Signal;
use crate::timeline::Millis;

pub trait SignalSource {
    /// Signal for this poll cycle.  Returns `None` once the source is closed
    /// and will never deliver anything again.
    fn poll(&mut self) -> Option<Signal>;
}

// ── ChannelSource ─────────────────────────────────────────────────────────────

/// Decodes one raw frame per poll from a channel.
///
/// Frames are radio payloads: at most [`crate::signal::MAX_PAYLOAD`] bytes,
/// NUL padded, not necessarily UTF-8.  A frame that does not decode is
/// logged and counts as an empty cycle; the source stays open.
pub struct ChannelSource {
    rx: Receiver<Vec<u8>>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<Vec<u8>>) -> Self {
        Self { rx }
    }
}

impl SignalSource for ChannelSource {
    fn poll(&mut self) -> Option<Signal> {
        match self.rx.try_recv() {
            Ok(frame) => match Signal::from_payload(&frame) {
                Ok(signal) => Some(signal),
                Err(e) => {
                    warn!(payload = %String::from_utf8_lossy(&frame).trim(), "dropping payload: {e}");
                    Some(Signal::None)
                }
            },
            Err(TryRecvError::Empty) => Some(Signal::None),
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Forward every newline-terminated frame of `reader` to a new
/// [`ChannelSource`] from a background thread.
///
/// Frames are passed on as raw bytes with the line ending stripped, so bad
/// bytes only cost one cycle.  The source closes on EOF or an I/O error.
pub fn spawn_line_reader<R>(mut reader: R) -> ChannelSource
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = flume::unbounded();
    thread::spawn(move || {
        let mut frame = Vec::new();
        loop {
            match reader.read_until(b'\n', &mut frame) {
                Ok(0) => break,
                Ok(_) => {
                    while matches!(frame.last(), Some(b'\n' | b'\r')) {
                        frame.pop();
                    }
                    if tx.send(std::mem::take(&mut frame)).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("input read failed, closing signal source: {e}");
                    break;
                }
            }
        }
        debug!("line reader finished");
    });
    ChannelSource::new(rx)
}

// ── ScriptedSource ────────────────────────────────────────────────────────────

/// Replays timed signals against a [`Clock`].
///
/// Offsets are relative to construction time.  A due signal is delivered on
/// the first poll at or after its offset; several signals due at once go out
/// on consecutive polls.  The source closes `tail` ms after the last signal.
pub struct ScriptedSource<C> {
    clock: C,
    origin: Millis,
    events: VecDeque<(Millis, Signal)>,
    end: Millis,
}

impl<C: Clock> ScriptedSource<C> {
    pub fn new(clock: C, mut events: Vec<(Millis, Signal)>, tail: Millis) -> Self {
        events.sort_by_key(|&(at, _)| at);
        let end = events.last().map(|&(at, _)| at).unwrap_or(0).saturating_add(tail);
        let origin = clock.now_ms();
        Self {
            clock,
            origin,
            events: events.into(),
            end,
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl<C: Clock> SignalSource for ScriptedSource<C> {
    fn poll(&mut self) -> Option<Signal> {
        let offset = self.clock.now_ms().saturating_sub(self.origin);

        if let Some(&(at, signal)) = self.events.front() {
            if at <= offset {
                self.events.pop_front();
                return Some(signal);
            }
            return Some(Signal::None);
        }

        if offset >= self.end {
            None
        } else {
            Some(Signal::None)
        }
    }
}

/// Parse a replay script.
///
/// One `<offset_ms> <TOKEN>` pair per line.  Blank lines and lines starting
/// with `#` are skipped.
///
/// ```text
/// # false start on the first attempt
/// 0      START
/// 4000   FAULT
/// 9000   RESET
/// ```
pub fn parse_script(text: &str) -> Result<Vec<(Millis, Signal)>> {
    let mut events = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(at), Some(token), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("line {lineno}: expected '<offset_ms> <TOKEN>', got '{line}'");
        };

        let at: Millis = at
            .parse()
            .with_context(|| format!("line {lineno}: invalid offset '{at}'"))?;
        let signal: Signal = token
            .parse()
            .with_context(|| format!("line {lineno}: invalid token"))?;

        events.push((at, signal));
    }

    Ok(events)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    // ── ChannelSource ─────────────────────────────────────────────────────────

    #[test]
    fn channel_source_decodes_frames_in_order() {
        let (tx, rx) = flume::unbounded();
        tx.send(b"START".to_vec()).unwrap();
        tx.send(b"FAULT".to_vec()).unwrap();
        drop(tx);

        let mut src = ChannelSource::new(rx);
        assert_eq!(src.poll(), Some(Signal::Start));
        assert_eq!(src.poll(), Some(Signal::Fault));
        assert_eq!(src.poll(), None);
    }

    #[test]
    fn channel_source_is_quiet_while_sender_is_idle() {
        let (_tx, rx) = flume::unbounded::<Vec<u8>>();
        let mut src = ChannelSource::new(rx);
        assert_eq!(src.poll(), Some(Signal::None));
    }

    #[test]
    fn channel_source_turns_garbage_into_an_empty_cycle() {
        let (tx, rx) = flume::unbounded();
        tx.send(b"GO GO GO".to_vec()).unwrap();
        tx.send(b"RESET".to_vec()).unwrap();
        drop(tx);

        let mut src = ChannelSource::new(rx);
        assert_eq!(src.poll(), Some(Signal::None));
        assert_eq!(src.poll(), Some(Signal::Reset));
        assert_eq!(src.poll(), None);
    }

    #[test]
    fn line_reader_forwards_until_eof() {
        let mut src = spawn_line_reader(Cursor::new("START\n\nRESET\n"));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut got = Vec::new();
        while let Some(signal) = src.poll() {
            if signal != Signal::None {
                got.push(signal);
            }
            assert!(Instant::now() < deadline, "reader never closed");
            thread::yield_now();
        }
        assert_eq!(got, vec![Signal::Start, Signal::Reset]);
    }

    #[test]
    fn channel_source_drops_oversized_frame_and_stays_open() {
        let (tx, rx) = flume::unbounded();
        tx.send(vec![b'A'; 40]).unwrap();
        tx.send(b"START\0\0\0".to_vec()).unwrap();
        drop(tx);

        let mut src = ChannelSource::new(rx);
        assert_eq!(src.poll(), Some(Signal::None));
        assert_eq!(src.poll(), Some(Signal::Start));
        assert_eq!(src.poll(), None);
    }

    #[test]
    fn line_reader_skips_invalid_utf8_and_keeps_reading() {
        let mut src = spawn_line_reader(Cursor::new(b"START\n\xff\xfe\nRESET\r\n".to_vec()));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut got = Vec::new();
        while let Some(signal) = src.poll() {
            if signal != Signal::None {
                got.push(signal);
            }
            assert!(Instant::now() < deadline, "reader never closed");
            thread::yield_now();
        }
        assert_eq!(got, vec![Signal::Start, Signal::Reset]);
    }

    // ── ScriptedSource ────────────────────────────────────────────────────────

    #[test]
    fn scripted_source_delivers_when_due() {
        let clock = ManualClock::starting_at(500);
        let mut src = ScriptedSource::new(clock.clone(), vec![(100, Signal::Start)], 50);

        assert_eq!(src.poll(), Some(Signal::None));
        clock.advance(100);
        assert_eq!(src.poll(), Some(Signal::Start));
        assert_eq!(src.poll(), Some(Signal::None), "tail still open");
        clock.advance(50);
        assert_eq!(src.poll(), None);
    }

    #[test]
    fn scripted_source_sends_one_signal_per_poll() {
        let clock = ManualClock::new();
        let events = vec![(0, Signal::Start), (0, Signal::Fault)];
        let mut src = ScriptedSource::new(clock, events, 0);

        assert_eq!(src.poll(), Some(Signal::Start));
        assert_eq!(src.poll(), Some(Signal::Fault));
        assert_eq!(src.remaining(), 0);
        assert_eq!(src.poll(), None);
    }

    #[test]
    fn scripted_source_sorts_by_offset() {
        let clock = ManualClock::new();
        let events = vec![(200, Signal::Reset), (0, Signal::Start)];
        let mut src = ScriptedSource::new(clock.clone(), events, 0);

        assert_eq!(src.poll(), Some(Signal::Start));
        clock.advance(200);
        assert_eq!(src.poll(), Some(Signal::Reset));
    }

    // ── parse_script ──────────────────────────────────────────────────────────

    #[test]
    fn parse_script_reads_pairs_and_skips_comments() {
        let text = "# header\n0 START\n\n  4000   FAULT  \n9000 RESET\n";
        let events = parse_script(text).unwrap();
        assert_eq!(
            events,
            vec![(0, Signal::Start), (4_000, Signal::Fault), (9_000, Signal::Reset)]
        );
    }

    #[test]
    fn parse_script_rejects_bad_offset() {
        let err = parse_script("soon START\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }

    #[test]
    fn parse_script_rejects_unknown_token() {
        let err = parse_script("0 START\n10 STOP\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!(format!("{err:#}").contains("STOP"));
    }

    #[test]
    fn parse_script_rejects_wrong_field_count() {
        assert!(parse_script("0\n").is_err());
        assert!(parse_script("0 START now\n").is_err());
    }
}
