//! IPC Debugger CLI - run a scenario file through a simulation session.
//!
//! Reads a JSON scenario (config, topology, sends), replays the sends in
//! order, then runs deadlock and bottleneck analysis and prints one JSON
//! report on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use ipc_debugger_core_rs::{
    BottleneckReport, ChannelId, DeadlockReport, Event, MessageDelivery, SessionStatistics,
    SimulationSession, SimulatorConfig, Topology,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ipc-debugger-cli")]
#[command(about = "Replay an IPC scenario and report latency, deadlocks and bottlenecks")]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the session checkpoint to this file after the run
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Also write the event log as CSV to this file
    #[arg(long)]
    events_csv: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    config: SimulatorConfig,
    topology: Topology,
    #[serde(default)]
    sends: Vec<SendStep>,
}

#[derive(Debug, Deserialize)]
struct SendStep {
    channel_id: ChannelId,
    content: String,
    #[serde(default = "default_repeat")]
    repeat: usize,
}

fn default_repeat() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct RunReport {
    deliveries: Vec<MessageDelivery>,
    deadlock: DeadlockReport,
    bottlenecks: BottleneckReport,
    statistics: SessionStatistics,
    events: Vec<Event>,
}

fn run(scenario: Scenario) -> Result<(SimulationSession, RunReport)> {
    let name = scenario.name.unwrap_or_else(|| "scenario".to_string());
    let mut session = SimulationSession::new(1, name, scenario.config)?;
    session.start();

    let topology = scenario.topology;
    let mut deliveries = Vec::new();

    for step in &scenario.sends {
        for _ in 0..step.repeat {
            match session.send_message(&topology, step.channel_id, &step.content) {
                Ok(delivery) => deliveries.push(delivery),
                Err(e) => warn!(channel_id = step.channel_id, "send skipped: {}", e),
            }
        }
    }

    let deadlock = session.detect_deadlock(&topology);
    let bottlenecks = session.analyze_bottlenecks(&topology);
    let statistics = session.statistics(&topology);
    session.stop();

    let events = session.event_log().events().to_vec();
    Ok((
        session,
        RunReport {
            deliveries,
            deadlock,
            bottlenecks,
            statistics,
            events,
        },
    ))
}

/// Logs go to stderr so stdout stays a clean JSON report
fn init_logging(debug: bool, json: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.debug, args.json_logs);

    let raw = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading {}", args.scenario.display()))?;
    let mut scenario: Scenario = serde_json::from_str(&raw).context("parsing scenario")?;
    if let Some(seed) = args.seed {
        scenario.config.rng_seed = seed;
    }

    info!(
        processes = scenario.topology.processes.len(),
        channels = scenario.topology.channels.len(),
        sends = scenario.sends.len(),
        "running scenario"
    );

    let (session, report) = run(scenario)?;

    if let Some(path) = &args.checkpoint {
        std::fs::write(path, session.save_state()?)
            .with_context(|| format!("writing checkpoint {}", path.display()))?;
        info!("checkpoint written to {}", path.display());
    }

    if let Some(path) = &args.events_csv {
        std::fs::write(path, session.event_log().to_csv()?)
            .with_context(|| format!("writing event log {}", path.display()))?;
        info!("event log written to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
