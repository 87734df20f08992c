//! threads: one OS thread per actor sharing a single facility.
//!
//! Every actor arrives after a short stagger, waits for admission, occupies
//! a slot for its service time, and leaves.  The run prints a per-actor wait
//! table, the average wait and the facility's utilization, and writes the
//! same data as CSV.
//!
//! Settings come from (lowest to highest precedence) the built-in defaults,
//! an optional JSON file (`--config`), and individual flags.  Example file:
//!
//! ```json
//! {
//!   "facility": { "capacity": 4, "run_threshold": 5, "tie_break": "majority_waiting" },
//!   "sim":      { "actors": 20, "seed": 7, "service_ms": [100, 400], "b_service_factor": 2.0 }
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fc_core::{Class, FacilityConfig, TieBreak};
use fc_output::{CsvWriter, SimOutputObserver};
use fc_sim::{LogObserver, RunReport, SimBuilder, SimConfig};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "threads")]
#[command(about = "Threaded actors competing for a two-class facility", long_about = None)]
struct Args {
    /// JSON file with `facility` and `sim` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of actors (one thread each)
    #[arg(long)]
    actors: Option<usize>,

    /// Slots in the facility
    #[arg(long)]
    capacity: Option<u32>,

    /// Consecutive admissions of one class before a handover is forced
    #[arg(long)]
    threshold: Option<u32>,

    /// Global RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Empty-facility tie-break: first-woken, majority or alternate
    #[arg(long)]
    tie_break: Option<TieBreak>,

    /// Probability that an actor belongs to class A
    #[arg(long)]
    ratio: Option<f64>,

    /// Assign classes A, B, A, B, … instead of drawing them
    #[arg(long)]
    alternating: bool,

    /// Directory for actors.csv and run_summary.csv
    #[arg(long, default_value = "output/threads")]
    output: PathBuf,
}

/// Shape of the `--config` file.  Missing sections keep their defaults.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct FileConfig {
    facility: FacilityConfig,
    sim:      SimConfig,
}

fn load_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

impl Args {
    /// Defaults, overlaid by the config file, overlaid by flags.
    fn resolve(&self) -> Result<(FacilityConfig, SimConfig)> {
        let FileConfig { mut facility, mut sim } = match &self.config {
            Some(path) => load_config(path)?,
            None => FileConfig::default(),
        };

        if let Some(n) = self.actors      { sim.actors = n; }
        if let Some(s) = self.seed        { sim.seed = s; }
        if let Some(p) = self.ratio       { sim.class_a_ratio = p; }
        if self.alternating               { sim.alternating = true; }
        if let Some(c) = self.capacity    { facility.capacity = c; }
        if let Some(t) = self.threshold   { facility.run_threshold = t; }
        if let Some(tb) = self.tie_break  { facility.tie_break = tb; }

        Ok((facility, sim))
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

fn ms(d: Option<std::time::Duration>) -> String {
    d.map(|d| d.as_millis().to_string()).unwrap_or_else(|| "-".into())
}

fn print_report(report: &RunReport) {
    println!();
    println!("{:<8} {:<6} {:>10} {:>10} {:>10} {:>10}", "Actor", "Class", "Arrive ms", "Enter ms", "Leave ms", "Wait ms");
    println!("{}", "-".repeat(59));
    for r in &report.records {
        println!(
            "{:<8} {:<6} {:>10} {:>10} {:>10} {:>10}",
            r.id.0,
            r.class,
            r.arrival.as_millis(),
            ms(r.enter),
            ms(r.leave),
            ms(r.wait()),
        );
    }
    println!();

    for class in Class::ALL {
        println!(
            "Class {class}: {} admitted, max wait {} ms",
            report.admitted(class),
            ms(report.max_wait(class)),
        );
    }
    if report.abandoned() > 0 {
        println!("Abandoned: {}", report.abandoned());
    }
    println!("Handovers:    {}", report.handovers);
    println!("Average wait: {:.1} ms", report.average_wait().as_secs_f64() * 1000.0);
    println!("Wall time:    {:.3} s", report.wall.as_secs_f64());
    println!("Utilization:  {:.1} %", report.utilization() * 100.0);
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let (facility, config) = args.resolve()?;
    info!(
        actors = config.actors,
        capacity = facility.capacity,
        threshold = facility.run_threshold,
        tie_break = %facility.tie_break,
        seed = config.seed,
        "starting run",
    );

    let mut sim = SimBuilder::new(config, facility).build()?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;
    let writer = CsvWriter::new(&args.output)?;
    let mut obs = (LogObserver, SimOutputObserver::new(writer));

    let report = sim.run(&mut obs)?;
    if let Some(e) = obs.1.take_error() {
        warn!(error = %e, "output error");
    }

    print_report(&report);
    println!();
    println!("Wrote {}/actors.csv and run_summary.csv", args.output.display());
    Ok(())
}
