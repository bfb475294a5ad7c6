//! `drive`: run the location simulator along a route and report progress.
//!
//! ```text
//! drive [--route route.csv] [--config sim.json] [--speed-multiplier 20]
//!       [--trace trace.csv] [--timeout-secs 300]
//! ```
//!
//! Without `--route` a built-in route through a synthetic street grid is
//! used.  `RUST_LOG=debug` shows route and reroute events from the library
//! crates; `RUST_LOG=trace` shows every tick.

mod route;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nav_core::SimulationConfig;
use nav_output::{CsvTraceWriter, TraceObserver};
use nav_sim::{ChannelObserver, LocationEvent, ManagerBuilder};
use nav_spatial::load_route_csv;

#[derive(Debug, Parser)]
#[command(author, version, about = "Drive a simulated vehicle along a route")]
struct Args {
    /// Route CSV with `lat,lon[,expected_travel_secs]` rows
    #[arg(long)]
    route: Option<PathBuf>,

    /// JSON simulation config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the config's speed multiplier
    #[arg(long)]
    speed_multiplier: Option<f64>,

    /// Write every emitted location to this CSV file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Give up if the route is not finished after this many wall-clock seconds
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(multiplier) = args.speed_multiplier {
        config.speed_multiplier = multiplier;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let route = match &args.route {
        Some(path) => load_route_csv(path)
            .with_context(|| format!("loading route {}", path.display()))?,
        None => route::sample_route(),
    };
    info!(
        vertices = route.shape.len(),
        length_m = route.shape.total_length().round(),
        timed = route.segment_travel_secs.is_some(),
        multiplier = config.speed_multiplier,
        "route loaded"
    );

    let (events, mut rx) = ChannelObserver::new();
    let mut builder = ManagerBuilder::new(config).observer(events);
    let trace = match &args.trace {
        Some(path) => {
            let writer = CsvTraceWriter::create(path)
                .with_context(|| format!("creating trace {}", path.display()))?;
            let trace = TraceObserver::new(writer);
            builder = builder.observer(trace.clone());
            Some(trace)
        }
        None => None,
    };
    let manager = builder.build()?;

    manager.set_route(route, None)?;
    manager.start_updating()?;

    let deadline = tokio::time::sleep(Duration::from_secs(args.timeout_secs));
    tokio::pin!(deadline);
    let mut emitted = 0u64;
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(LocationEvent::Location(s)) => {
                    emitted += 1;
                    info!(
                        t = %s.timestamp,
                        at = %s.coordinate,
                        course_deg = s.course_deg.round(),
                        speed_mps = s.speed_mps,
                        "location"
                    );
                }
                Some(LocationEvent::Arrival(s)) => {
                    info!(at = %s.coordinate, "arrived");
                    break;
                }
                Some(LocationEvent::Stopped) => {}
                None => break,
            },
            _ = &mut deadline => {
                warn!(timeout_secs = args.timeout_secs, "route not finished in time");
                break;
            }
        }
    }

    let snapshot = manager.snapshot().await?;
    manager.shutdown().await?;
    info!(
        emitted,
        distance_m = snapshot.distance_traveled_m.round(),
        phase = %snapshot.phase,
        "done"
    );

    if let Some(trace) = trace {
        if let Some(e) = trace.take_error() {
            return Err(e).context("writing trace");
        }
        if let Some(path) = &args.trace {
            info!(path = %path.display(), "trace written");
        }
    }
    Ok(())
}
