//! weldlab simulation lab CLI.
//!
//! Provides three modes of operation:
//! - `headless`: run the lab for a number of ticks and print statistics
//! - `scan`: run the lab, then score the installed equipment
//! - `info`: print crate versions, the default config and the catalog

mod error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use weldlab_core::catalog;
use weldlab_core::prelude::*;
use weldlab_health::{
    FixedAnalyzer, HealthAnalyzer, HealthBoard, HealthDisplay, HealthOverlayPlugin, HealthReport,
    HealthState, LabHealth, LabTelemetry, OfflineAnalyzer, diagnose_or_apology,
};
use weldlab_sim::{LabCommand, LabDriver, LabStats, RenderSnapshot, WeldLabSimPlugin};

use crate::error::AppError;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// weldlab robotics simulation lab.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log filter, e.g. `debug` or `weldlab_sim=trace`. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by the modes that build a lab.
#[derive(clap::Args, Clone, Default)]
struct LabArgs {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (overrides the config).
    #[arg(short, long)]
    seed: Option<u64>,

    /// Install a catalog component by name. Repeatable; defaults to the
    /// welding cell.
    #[arg(short = 'i', long = "install")]
    components: Vec<String>,

    /// Hip torque command in percent.
    #[arg(short, long)]
    torque: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lab headless and print statistics.
    Headless {
        #[command(flatten)]
        lab: LabArgs,

        /// Number of ticks to run.
        #[arg(short = 'n', long, default_value_t = 600)]
        ticks: u64,

        /// Simulated frame length in milliseconds.
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,

        /// Latch the emergency stop at this tick.
        #[arg(long)]
        estop_at: Option<u64>,

        /// Write one JSON snapshot per tick to this file.
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Run the lab, then analyze every installed component.
    Scan {
        #[command(flatten)]
        lab: LabArgs,

        /// Ticks to run before sampling telemetry.
        #[arg(short = 'n', long, default_value_t = 120)]
        ticks: u64,

        /// Analysis backend.
        #[arg(long, value_enum, default_value_t = AnalyzerKind::Offline)]
        analyzer: AnalyzerKind,

        /// Score reported by the fixed analyzer.
        #[arg(long, default_value_t = 92)]
        score: u8,

        /// Also ask the analyzer a free-text question.
        #[arg(long)]
        diagnose: Option<String>,
    },

    /// Print crate information.
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnalyzerKind {
    /// No service: every component shows the fallback record.
    Offline,
    /// Every component gets the same nominal report.
    Fixed,
}

// ---------------------------------------------------------------------------
// Lab setup
// ---------------------------------------------------------------------------

fn load_config(lab: &LabArgs) -> Result<LabConfig, AppError> {
    let mut config = match &lab.config {
        Some(path) => LabConfig::from_file(path)?,
        None => LabConfig::default(),
    };
    if let Some(seed) = lab.seed {
        config.seed = seed;
    }
    if let Some(torque) = lab.torque {
        config.controls.torque_command = torque;
    }
    Ok(config)
}

fn resolve_loadout(names: &[String]) -> Result<Loadout, AppError> {
    if names.is_empty() {
        return Ok(catalog::welding_cell());
    }
    let mut loadout = Loadout::default();
    for name in names {
        let (slot, component) =
            catalog::find(name).ok_or_else(|| AppError::UnknownComponent(name.clone()))?;
        loadout.install(slot, component);
    }
    Ok(loadout)
}

fn build_lab(config: LabConfig, loadout: &Loadout, health: Option<HealthOverlayPlugin>) -> App {
    let mut app = App::new();
    app.insert_resource(config);
    app.add_plugins(WeldLabSimPlugin);
    if let Some(health) = health {
        app.add_plugins(health);
    }
    app.finish();
    app.cleanup();

    for (slot, component) in loadout.installed() {
        app.world_mut()
            .send_event(LabCommand::Install(slot, component.clone()));
    }
    app.world_mut().send_event(LabCommand::Start);
    app
}

/// Run `ticks` lab ticks, paced by a fixed-step frame loop fed
/// `frame_ms`-long frames. `on_tick` sees the app after every tick.
fn run_ticks(
    app: &mut App,
    ticks: u64,
    frame_ms: f64,
    mut on_tick: impl FnMut(&mut App, u64) -> Result<(), AppError>,
) -> Result<(), AppError> {
    let config = app.world().resource::<LabConfig>().clone();
    let mut frames = FrameLoop::new(config.tick_dt).with_max_steps(config.max_steps_per_frame);
    let tick = Duration::try_from_secs_f64(config.tick_dt).unwrap_or(Duration::from_millis(16));
    let frame = if frame_ms > 0.0 {
        Duration::try_from_secs_f64(frame_ms / 1000.0)
            .map_or(tick, |frame| frame.max(Duration::from_nanos(1)))
    } else {
        tick
    };
    frames.start();

    let mut done = 0;
    while done < ticks {
        let steps = frames.frame(frame);
        for _ in 0..steps {
            if done == ticks {
                break;
            }
            app.update();
            done += 1;
            on_tick(app, done)?;
        }
    }
    frames.cancel();
    Ok(())
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TraceRecord<'a> {
    tick: u64,
    time: f64,
    run: &'a str,
    #[serde(flatten)]
    snapshot: RenderSnapshot,
}

fn open_trace(path: Option<&Path>) -> Result<Option<BufWriter<File>>, AppError> {
    path.map(|p| File::create(p).map(BufWriter::new))
        .transpose()
        .map_err(AppError::from)
}

fn write_trace(out: &mut impl Write, app: &App, tick: u64) -> Result<(), AppError> {
    let world = app.world();
    let record = TraceRecord {
        tick,
        time: world.resource::<SimTime>().secs_f64(),
        run: world.resource::<RunState>().label(),
        snapshot: *world.resource::<RenderSnapshot>(),
    };
    serde_json::to_writer(&mut *out, &record)?;
    out.write_all(b"\n")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_headless(
    lab: &LabArgs,
    ticks: u64,
    frame_ms: f64,
    estop_at: Option<u64>,
    trace: Option<&Path>,
) -> Result<(), AppError> {
    let config = load_config(lab)?;
    let loadout = resolve_loadout(&lab.components)?;
    info!(seed = config.seed, ticks, hz = config.tick_hz(), "headless run");

    let mut app = build_lab(config, &loadout, None);
    let mut trace = open_trace(trace)?;

    run_ticks(&mut app, ticks, frame_ms, |app, tick| {
        if estop_at == Some(tick) {
            app.world_mut().send_event(LabCommand::EmergencyStop);
        }
        if let Some(out) = trace.as_mut() {
            write_trace(out, app, tick)?;
        }
        Ok(())
    })?;
    if let Some(mut out) = trace {
        out.flush()?;
    }

    let world = app.world();
    let snapshot = world.resource::<RenderSnapshot>();
    let stats = world.resource::<LabStats>();
    println!(
        "final: theta1={:.4} theta2={:.4} particles={} state={}",
        snapshot.theta1,
        snapshot.theta2,
        snapshot.active_particles,
        world.resource::<RunState>().label()
    );
    println!(
        "stats: ticks={} joint_ticks={} spawned={} retired={} peak={} estops={}",
        stats.ticks,
        stats.joint_ticks,
        stats.particles_spawned,
        stats.particles_retired,
        stats.peak_active,
        stats.emergency_stops
    );
    if let Some(rate) = stats.spawn_rate() {
        println!("spawn rate: {rate:.3} per attempt");
    }
    Ok(())
}

fn print_board(board: &HealthBoard, loadout: &Loadout) {
    for (slot, display) in board.visible(loadout) {
        let name = loadout.get(slot).map_or("", |c| c.name.as_str());
        match display {
            HealthDisplay::Scanning => println!("{slot:<9} {name:<22} scanning"),
            HealthDisplay::Ready(r) => println!(
                "{slot:<9} {name:<22} {:>3} {:<10} {} (next calibration: {})",
                r.health_score, r.state, r.brief_analysis, r.next_calibration
            ),
        }
    }
}

/// Block until every batch the lab has started so far finishes.
fn await_batches(app: &mut App, runtime: &tokio::runtime::Runtime) -> Result<(), AppError> {
    let pending = app.world_mut().resource_mut::<LabHealth>().take_pending();
    for batch in pending {
        let summary = runtime.block_on(batch)?;
        info!(
            generation = summary.generation,
            applied = summary.applied,
            dropped = summary.dropped,
            "health batch finished"
        );
    }
    Ok(())
}

fn run_scan(
    lab: &LabArgs,
    ticks: u64,
    kind: AnalyzerKind,
    score: u8,
    diagnose: Option<&str>,
) -> Result<(), AppError> {
    let config = load_config(lab)?;
    let loadout = resolve_loadout(&lab.components)?;
    let frame_ms = config.tick_dt * 1000.0;

    let analyzer: Arc<dyn HealthAnalyzer> = match kind {
        AnalyzerKind::Offline => Arc::new(OfflineAnalyzer),
        AnalyzerKind::Fixed => Arc::new(FixedAnalyzer::new(HealthReport::new(
            score,
            HealthState::Nominal,
            "Operating within rated envelope.",
            "In 30 days",
        ))),
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let health = HealthOverlayPlugin::new(Arc::clone(&analyzer), runtime.handle().clone());
    let mut app = build_lab(config, &loadout, Some(health));
    run_ticks(&mut app, ticks, frame_ms, |_, _| Ok(()))?;
    await_batches(&mut app, &runtime)?;

    // Rescan with the readings after the last tick.
    let world = app.world();
    let sample = LabTelemetry::sample(
        world.resource::<LabDriver>(),
        world.resource::<LabControls>(),
    );
    let running = world.resource::<RunState>().is_advancing();
    app.world_mut()
        .resource_mut::<LabHealth>()
        .rescan(&loadout, &sample, running);
    await_batches(&mut app, &runtime)?;
    print_board(&app.world().resource::<LabHealth>().board(), &loadout);

    if let Some(prompt) = diagnose {
        let answer = runtime.block_on(diagnose_or_apology(analyzer.as_ref(), prompt));
        println!("\n{answer}");
    }
    Ok(())
}

/// Library crates and the versions they were built as.
const fn crate_versions() -> [(&'static str, &'static str); 5] {
    [
        ("weldlab-core", weldlab_core::VERSION),
        ("weldlab-dynamics", weldlab_dynamics::VERSION),
        ("weldlab-spatter", weldlab_spatter::VERSION),
        ("weldlab-health", weldlab_health::VERSION),
        ("weldlab-sim", weldlab_sim::VERSION),
    ]
}

fn run_info() -> Result<(), AppError> {
    println!("weldlab v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    for (name, version) in crate_versions() {
        println!("  {name:<17} {version}");
    }
    println!();
    println!("default config:");
    println!("{}", toml::to_string_pretty(&LabConfig::default())?);
    println!("catalog:");
    for (slot, component) in catalog::all() {
        let spatter = if component.emits_spatter { " (spatter)" } else { "" };
        println!(
            "  {slot:<9} {:<22} {}{spatter}",
            component.name, component.spec
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn init_logging(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let result = match cli.command {
        Some(Commands::Headless {
            lab,
            ticks,
            frame_ms,
            estop_at,
            trace,
        }) => run_headless(&lab, ticks, frame_ms, estop_at, trace.as_deref()),
        Some(Commands::Scan {
            lab,
            ticks,
            analyzer,
            score,
            diagnose,
        }) => run_scan(&lab, ticks, analyzer, score, diagnose.as_deref()),
        Some(Commands::Info) => run_info(),
        // Default: a short headless run with defaults
        None => run_headless(&LabArgs::default(), 600, 16.0, None, None),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "weldlab failed");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_headless() {
        let cli = Cli::parse_from([
            "weldlab", "headless", "-n", "10", "--seed", "3", "-i", "Servo S-90", "--estop-at",
            "5",
        ]);
        match cli.command {
            Some(Commands::Headless {
                lab,
                ticks,
                estop_at,
                ..
            }) => {
                assert_eq!(ticks, 10);
                assert_eq!(lab.seed, Some(3));
                assert_eq!(lab.components, vec!["Servo S-90".to_string()]);
                assert_eq!(estop_at, Some(5));
            }
            _ => panic!("expected headless"),
        }
    }

    #[test]
    fn unknown_component_is_an_error() {
        let err = resolve_loadout(&["Flux Capacitor".into()]).unwrap_err();
        assert!(matches!(err, AppError::UnknownComponent(_)));
    }

    #[test]
    fn default_loadout_is_welding_cell() {
        assert_eq!(resolve_loadout(&[]).unwrap(), catalog::welding_cell());
    }

    #[test]
    fn run_ticks_stops_at_requested_count() {
        let config = LabConfig::default();
        let mut app = build_lab(config, &catalog::welding_cell(), None);
        let mut seen = 0;
        run_ticks(&mut app, 25, 40.0, |_, tick| {
            seen = tick;
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, 25);
        assert_eq!(app.world().resource::<LabStats>().ticks, 25);
    }

    #[test]
    fn oversized_frame_falls_back_to_tick_length() {
        let mut app = build_lab(LabConfig::default(), &catalog::welding_cell(), None);
        for frame_ms in [1e25, f64::INFINITY, f64::NAN, -5.0] {
            let mut seen = 0;
            run_ticks(&mut app, 3, frame_ms, |_, tick| {
                seen = tick;
                Ok(())
            })
            .unwrap();
            assert_eq!(seen, 3);
        }
        assert_eq!(app.world().resource::<LabStats>().ticks, 12);
    }

    #[test]
    fn scan_lab_scans_while_ticking() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let health = HealthOverlayPlugin::new(Arc::new(OfflineAnalyzer), runtime.handle().clone());
        let loadout = catalog::welding_cell();
        let mut app = build_lab(LabConfig::default(), &loadout, Some(health));
        run_ticks(&mut app, 5, 16.0, |_, _| Ok(())).unwrap();
        await_batches(&mut app, &runtime).unwrap();

        let health = app.world().resource::<LabHealth>();
        assert_eq!(health.overlay().generation(), 1);
        let visible = health.board().visible(&loadout);
        assert_eq!(visible.len(), 4);
        assert!(visible.iter().all(|(_, d)| d.report().is_some_and(HealthReport::is_fallback)));
    }

    #[test]
    fn info_lists_every_library_crate() {
        let versions = crate_versions();
        assert_eq!(versions.map(|(name, _)| name)[3], "weldlab-health");
        assert!(versions.iter().all(|(_, v)| v.split('.').count() == 3));
    }

    #[test]
    fn trace_lines_are_json() {
        let mut app = build_lab(LabConfig::default(), &catalog::welding_cell(), None);
        app.update();
        let mut buf = Vec::new();
        write_trace(&mut buf, &app, 1).unwrap();
        let line = String::from_utf8(buf).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["tick"], 1);
        assert_eq!(value["run"], "Running");
        assert_eq!(value["tool_visible"], true);
    }

    #[test]
    fn torque_override_applies() {
        let lab = LabArgs {
            torque: Some(40.0),
            seed: Some(8),
            ..LabArgs::default()
        };
        let config = load_config(&lab).unwrap();
        assert_eq!(config.seed, 8);
        assert!((config.controls.torque_command - 40.0).abs() < f64::EPSILON);
    }
}
