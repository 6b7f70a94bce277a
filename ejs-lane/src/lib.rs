/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! ejs-lane – one lane's light tower for a flyball electronic judging system
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── timeline/     – fixed checkpoint table & half-open windows
//! ├── controller/   – race state machine (Idle → PreStart → Starting → Running)
//! ├── lights        – lamp ids, write-only sink trait, lamp record
//! ├── clock         – monotonic time & the two blocking delays
//! ├── signal        – START / RESET / FAULT tokens
//! ├── source        – signal sources (channel, scripted replay)
//! ├── boot          – power-on lamp self-test
//! ├── runner        – cooperative poll loop
//! └── config/       – YAML lane configuration
//! ```

pub mod boot;
pub mod clock;
pub mod config;
pub mod controller;
pub mod lights;
pub mod runner;
pub mod signal;
pub mod source;
pub mod timeline;
