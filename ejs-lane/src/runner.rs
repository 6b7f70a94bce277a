/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The cooperative poll loop.
//!
//! One execution context: each cycle takes at most one signal from the
//! source, hands it to the controller (which then ticks), and sleeps for the
//! poll interval.  Runs until the source closes.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::controller::RaceController;
use crate::lights::LightSink;
use crate::signal::Signal;
use crate::source::SignalSource;
use crate::timeline::Millis;

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub signals: u64,
}

pub fn run_lane<S, C, Src>(
    controller: &mut RaceController<S, C>,
    source: &mut Src,
    poll_interval: Millis,
) -> RunSummary
where
    S: LightSink,
    C: Clock,
    Src: SignalSource + ?Sized,
{
    let mut summary = RunSummary::default();

    while let Some(signal) = source.poll() {
        if signal != Signal::None {
            summary.signals += 1;
            debug!(%signal, phase = %controller.phase(), "signal received");
        }

        controller.poll(signal);
        summary.cycles += 1;

        controller.clock_mut().delay_ms(poll_interval);
    }

    info!(
        cycles = summary.cycles,
        signals = summary.signals,
        phase = %controller.phase(),
        "signal source closed"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::controller::Phase;
    use crate::lights::{Led, RecordingLights, Tower};
    use crate::source::ScriptedSource;
    use crate::timeline::{PRE_START_COMPLETED, START_STEP_FOUR};

    fn controller(clock: &ManualClock) -> RaceController<RecordingLights, ManualClock> {
        let mut tower = Tower::new(RecordingLights::new());
        tower.set(Led::Fault, true);
        RaceController::new(tower, clock.clone())
    }

    #[test]
    fn clean_race_goes_green_and_holds() {
        let clock = ManualClock::new();
        let mut ctl = controller(&clock);
        let mut src = ScriptedSource::new(clock.clone(), vec![(0, Signal::Start)], 10_000);

        let summary = run_lane(&mut ctl, &mut src, 2);

        assert_eq!(summary.signals, 1);
        assert_eq!(ctl.phase(), Phase::Running);
        assert_eq!(ctl.tower().lit(), vec![Led::Go]);

        let run_start = ctl.state().run_start.unwrap();
        assert!(run_start >= START_STEP_FOUR && run_start < START_STEP_FOUR + 2);
    }

    #[test]
    fn false_start_is_latched_until_reset() {
        let clock = ManualClock::new();
        let mut ctl = controller(&clock);
        let script = vec![
            (0, Signal::Start),
            (2_000, Signal::Fault), // pre-start: ignored
            (PRE_START_COMPLETED + 500, Signal::Fault),
            (9_000, Signal::Start), // duplicate: ignored
        ];
        let mut src = ScriptedSource::new(clock.clone(), script, 500);

        let summary = run_lane(&mut ctl, &mut src, 5);

        assert_eq!(summary.signals, 4);
        assert_eq!(ctl.phase(), Phase::Running);
        assert_eq!(ctl.fault_count(), 1);
        assert_eq!(ctl.tower().lit(), vec![Led::Go, Led::Fault]);
    }

    #[test]
    fn reset_returns_to_standby() {
        let clock = ManualClock::new();
        let mut ctl = controller(&clock);
        let script = vec![(0, Signal::Start), (9_000, Signal::Reset)];
        let mut src = ScriptedSource::new(clock.clone(), script, 100);

        run_lane(&mut ctl, &mut src, 5);

        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.fault_count(), 0);
        assert_eq!(ctl.tower().lit(), vec![Led::Fault]);
        assert_eq!(ctl.tower().sink().times_lit(Led::Go), 2, "lamp test + green");
    }

    #[test]
    fn closed_source_ends_the_loop_immediately() {
        let clock = ManualClock::new();
        let mut ctl = controller(&clock);
        let mut src = ScriptedSource::new(clock.clone(), vec![], 0);

        let summary = run_lane(&mut ctl, &mut src, 5);

        assert_eq!(summary, RunSummary::default());
        assert_eq!(clock.now_ms(), 0);
    }
}
