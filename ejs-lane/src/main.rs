/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, info_span, warn};

use ejs_lane::boot;
use ejs_lane::clock::SystemClock;
use ejs_lane::config::{Lane, LaneConfig};
use ejs_lane::controller::RaceController;
use ejs_lane::lights::{Tower, TracingLights};
use ejs_lane::runner::run_lane;
use ejs_lane::source::{parse_script, spawn_line_reader, ScriptedSource, SignalSource};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Light tower controller for one lane of a flyball electronic judging system.
///
/// Reads START / RESET / FAULT tokens, one per line, from stdin (or replays a
/// script) and reports lamp changes through the log.
///
/// Example:
///   echo START | ejs-lane --lane right --skip-self-test
#[derive(Debug, Parser)]
#[command(
    name = "ejs-lane",
    about = "Flyball EJS light tower – single lane controller",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML lane configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Lane served by this tower (overrides the config file).
    #[arg(short = 'l', long = "lane", value_enum)]
    lane: Option<Lane>,

    /// Poll loop period in milliseconds (overrides the config file).
    #[arg(short = 'p', long = "poll-ms")]
    poll_ms: Option<u64>,

    /// Go straight to standby without cycling the lamps.
    #[arg(long = "skip-self-test", default_value_t = false)]
    skip_self_test: bool,

    /// Replay a `<offset_ms> <TOKEN>` script instead of reading stdin.
    #[arg(short = 's', long = "script")]
    script: Option<PathBuf>,

    /// Keep polling this long after the last scripted signal.
    #[arg(long = "hold-ms", default_value_t = 1_000)]
    hold_ms: u64,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<LaneConfig> {
        let mut config = match &self.config {
            Some(path) => LaneConfig::load_from_file(path)?,
            None => {
                warn!("No configuration file provided, using default lane settings");
                LaneConfig::default()
            }
        };

        if let Some(lane) = self.lane {
            config.lane = lane;
        }
        if let Some(ms) = self.poll_ms {
            config.poll_interval_ms = ms;
        }
        if self.skip_self_test {
            config.self_test = false;
        }

        config.validate().context("Invalid command-line override")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let span = info_span!("lane", lane = %config.lane);
    let _guard = span.enter();

    info!(
        poll_interval_ms = config.poll_interval_ms,
        self_test = config.self_test,
        script = ?cli.script,
        "EJS lane controller starting up..."
    );

    // ── Source ────────────────────────────────────────────────────────────────
    let mut clock = SystemClock::new();

    // Parse the script before the self-test so a bad file fails fast.
    let script = match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot open script: {}", path.display()))?;
            let events = parse_script(&text)
                .with_context(|| format!("Failed to parse script: {}", path.display()))?;
            info!(events = events.len(), "loaded replay script");
            Some(events)
        }
        None => None,
    };

    // ── Boot ──────────────────────────────────────────────────────────────────
    let mut tower = Tower::new(TracingLights);
    if config.self_test {
        boot::self_test(&mut tower, &mut clock);
    } else {
        boot::standby(&mut tower);
    }

    // ── Poll loop ─────────────────────────────────────────────────────────────
    let mut source: Box<dyn SignalSource> = match script {
        Some(events) => Box::new(ScriptedSource::new(clock, events, cli.hold_ms)),
        None => {
            info!("reading signal tokens from stdin");
            Box::new(spawn_line_reader(io::BufReader::new(io::stdin())))
        }
    };

    let mut controller = RaceController::new(tower, clock);
    run_lane(&mut controller, source.as_mut(), config.poll_interval_ms);

    Ok(())
}
