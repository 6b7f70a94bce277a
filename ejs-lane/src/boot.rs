/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Power-on lamp self-test.
//!
//! Runs once, before the controller starts polling.  Blocks throughout:
//!
//! 1. settle for [`SEQUENCE_DELAY`]
//! 2. light go, set, ready, fault in turn for [`SELF_TEST_STEP`] each
//! 3. dark for [`SEQUENCE_DELAY`]
//! 4. fault lamp on (standby)

use tracing::info;

use crate::clock::Clock;
use crate::lights::{Led, LightSink, Tower};
use crate::timeline::{SELF_TEST_STEP, SEQUENCE_DELAY};

pub fn self_test<S: LightSink, C: Clock>(tower: &mut Tower<S>, clock: &mut C) {
    info!("lamp self-test");
    tower.all_off();
    clock.delay_ms(SEQUENCE_DELAY);

    for led in Led::ALL {
        tower.set(led, true);
        clock.delay_ms(SELF_TEST_STEP);
        tower.set(led, false);
    }

    clock.delay_ms(SEQUENCE_DELAY);
    tower.set(Led::Fault, true);
    info!("self-test complete, standby");
}

/// Skip the lamp cycle and go straight to standby.
pub fn standby<S: LightSink>(tower: &mut Tower<S>) {
    tower.all_off();
    tower.set(Led::Fault, true);
}
