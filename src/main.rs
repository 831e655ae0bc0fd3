//! ArcWatch - marine arc-fault monitoring and diagnostic assistant
//!
//! Runs the telemetry monitor on a scheduler tick and a line-based chat
//! loop over stdin, composed as two independent tasks. Each dashboard tick
//! and each chat turn is an independent unit of work; the chat turn grounds
//! itself on the most recent monitor snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Monitor a healthy circuit and chat with the assistant
//! ARCWATCH_API_KEY=... cargo run --release
//!
//! # Simulate a severe arc with a fixed seed
//! ARCWATCH_API_KEY=... cargo run --release -- --scenario severe_arc --seed 42
//!
//! # One-shot query, no interactive loop
//! ARCWATCH_API_KEY=... cargo run --release -- --query "how is the system?"
//! ```
//!
//! # Environment Variables
//!
//! - `ARCWATCH_API_KEY`: model gateway API key (required)
//! - `ARCWATCH_CONFIG`: path to a TOML config file
//! - `RUST_LOG`: logging filter (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arcwatch::{
    ArcWatchConfig, ContextAssembler, DialogueOrchestrator, DialogueSession, FactSheet,
    HttpGateway, HttpGatewayConfig, MonitorService, MonitorSnapshot, Scenario, ToolRegistry,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "arcwatch")]
#[command(about = "Marine arc-fault telemetry monitor with a diagnostic assistant")]
#[command(version)]
struct CliArgs {
    /// Active telemetry scenario: normal, early_arc, severe_arc, motor_start
    #[arg(long, default_value = "normal")]
    scenario: String,

    /// Seed the signal source for reproducible telemetry
    #[arg(long)]
    seed: Option<u64>,

    /// Superimpose the forward-looking predictive signature on each window
    #[arg(long)]
    prediction: bool,

    /// Ask a single question and exit instead of the interactive loop
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();

    let Some(scenario) = Scenario::from_str(&args.scenario) else {
        bail!(
            "unknown scenario '{}' (expected normal, early_arc, severe_arc, or motor_start)",
            args.scenario
        );
    };

    let config = ArcWatchConfig::load().context("Failed to load configuration")?;
    info!(scenario = %scenario, "ArcWatch starting");

    // Credential failures belong at startup, not on the first query
    let api_key = std::env::var("ARCWATCH_API_KEY")
        .context("ARCWATCH_API_KEY not set; the diagnostic assistant needs a gateway key")?;

    let gateway = HttpGateway::new(HttpGatewayConfig {
        api_key,
        endpoint: config.gateway.endpoint.clone(),
        model: config.gateway.model.clone(),
        max_tokens: config.gateway.max_tokens,
        timeout_secs: config.gateway.timeout_secs,
    })
    .context("Failed to construct model gateway")?;

    let registry = Arc::new(ToolRegistry::standard());
    let assembler = ContextAssembler::new(FactSheet::reference());
    let mut orchestrator = DialogueOrchestrator::new(
        assembler,
        registry,
        Arc::new(gateway),
        config.conversation.retention_window,
    );

    // Monitor task: scheduler-driven ticks publishing the latest snapshot
    let mut monitor = match args.seed {
        Some(seed) => MonitorService::with_seed(config.signal.window_length, seed),
        None => MonitorService::new(config.signal.window_length),
    };
    let (snapshot_tx, snapshot_rx) = watch::channel(monitor.sample(scenario, args.prediction));

    let cancel = CancellationToken::new();
    let monitor_cancel = cancel.clone();
    let tick_interval = Duration::from_secs(config.monitor.tick_interval_secs);
    // Prediction mode is bounded: the trend signature is superimposed only
    // for the configured window after startup, then ticks revert to plain
    // telemetry
    let prediction_window = Duration::from_secs(config.monitor.prediction_window_secs);
    let prediction_requested = args.prediction;

    let monitor_task = tokio::spawn(async move {
        let started = std::time::Instant::now();
        let mut ticker = tokio::time::interval(tick_interval);
        loop {
            tokio::select! {
                _ = monitor_cancel.cancelled() => {
                    info!("Monitor task shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let predict = prediction_requested && started.elapsed() < prediction_window;
                    let snapshot = monitor.sample(scenario, predict);
                    info!(
                        status = %snapshot.result.status,
                        confidence = snapshot.result.confidence,
                        peak = format!("{:.2}", snapshot.window.peak_amplitude()),
                        color = snapshot.result.status.severity_color(),
                        "Monitor tick"
                    );
                    if snapshot_tx.send(snapshot).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut session = DialogueSession::new();

    if let Some(query) = args.query {
        let snapshot: MonitorSnapshot = snapshot_rx.borrow().clone();
        let answer = orchestrator
            .handle_query(&mut session, &snapshot.result, &query)
            .await;
        println!("{answer}");
    } else {
        println!("ArcWatch diagnostic assistant ready. Type a question, or Ctrl-D to exit.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received");
                    break;
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(text)) if !text.trim().is_empty() => {
                            let snapshot: MonitorSnapshot = snapshot_rx.borrow().clone();
                            let answer = orchestrator
                                .handle_query(&mut session, &snapshot.result, text.trim())
                                .await;
                            println!("{answer}");
                        }
                        Ok(Some(_)) => {}
                        Ok(None) => break,
                        Err(e) => {
                            warn!(error = %e, "Failed to read stdin");
                            break;
                        }
                    }
                }
            }
        }
    }

    cancel.cancel();
    let _ = monitor_task.await;

    let stats = orchestrator.stats();
    info!(
        queries = stats.queries_handled,
        tool_dispatches = stats.tool_dispatches,
        gateway_failures = stats.gateway_failures,
        "ArcWatch shut down"
    );

    Ok(())
}
