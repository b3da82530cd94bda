use anyhow::Context;
use chart::bridge::ChartBridge;
use clap::Parser;
use ekgcore::arrhythmia::ArrhythmiaCatalog;
use grading::client::GradingClient;
use session::config::SessionConfig;
use session::drill::DrillSession;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod chart;
mod grading;
mod session;

#[derive(Parser)]
#[command(author, version, about = "Rust-facing EKG practice driver")]
struct Args {
    /// Run a single offline drill and emit its summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a session config from YAML
    #[arg(long)]
    session: Option<PathBuf>,
    /// Practice a named rhythm instead of a random draw
    #[arg(long)]
    arrhythmia: Option<String>,
    #[arg(long, default_value_t = 3)]
    beats: usize,
    #[arg(long, default_value_t = 5.0)]
    duration_seconds: f64,
    #[arg(long, default_value_t = 1000.0)]
    sampling_rate: f64,
    /// Seed for the drill sequence; omitted means OS entropy
    #[arg(long)]
    seed: Option<u64>,
    /// Grading endpoint override
    #[arg(long)]
    grader_url: Option<String>,
    /// Write the current chart model as JSON
    #[arg(long)]
    export: Option<PathBuf>,
    /// Keep the chart bridge alive for the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.session {
        SessionConfig::load(path)?
    } else {
        SessionConfig::from_args(
            args.beats,
            args.duration_seconds,
            args.sampling_rate,
            args.seed,
            args.grader_url,
        )
    };

    let client = Arc::new(GradingClient::new(&config.grader_url));
    let session = Arc::new(RwLock::new(DrillSession::new(
        config,
        ArrhythmiaCatalog::standard(),
    )));
    let bridge = ChartBridge::new(session.clone(), client);

    if args.offline {
        let summary = {
            let mut guard = session.write().unwrap();
            match &args.arrhythmia {
                Some(name) => guard.force_drill(name)?,
                None => guard.next_drill()?,
            }
        };

        println!(
            "Offline drill -> {} ({} samples, {} wave windows, {:.2} s)",
            summary.arrhythmia, summary.samples, summary.wave_windows, summary.duration_seconds
        );

        let metrics = session.read().unwrap().metrics();
        println!(
            "Session metrics -> traces generated: {}, gradings failed: {}",
            metrics.traces_generated, metrics.gradings_failed
        );

        bridge.publish_status("Offline practice trace ready.");

        if let Some(path) = &args.export {
            let payload = serde_json::to_string_pretty(&bridge.chart_model())
                .context("serializing chart model")?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, payload)
                .with_context(|| format!("writing chart export {}", path.display()))?;
        }

        let report = format!(
            "arrhythmia={} samples={} windows={} duration={:.2}\n",
            summary.arrhythmia, summary.samples, summary.wave_windows, summary.duration_seconds
        );
        let report_path = PathBuf::from("tools/data/practice_sessions.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        bridge.publish_status("Chart bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
