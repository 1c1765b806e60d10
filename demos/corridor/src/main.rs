//! corridor — runnable demo for the rust_evac evacuation simulator.
//!
//! Sixty agents start in the west half of a 20×10 hall split by a wall with
//! a two-cell doorway.  Partway through the run one door cell is bricked
//! up, forcing everyone still queueing to replan through the remaining gap.
//!
//! ```text
//! cargo run -p corridor -- [config.json] [output-dir]
//! RUST_LOG=debug cargo run -p corridor
//! ```
//!
//! Without arguments the embedded hall config is used and CSVs land in
//! `output/corridor`.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use evac_agent::AgentStatus;
use evac_core::{Cell, EvacConfig};
use evac_grid::AStarPlanner;
use evac_output::{CsvWriter, OutputWriter, SimOutputObserver};
use evac_sim::{ExitEvent, RunOutcome, SimBuilder, SimError, SimObserver, TickReport};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_OUTPUT_DIR: &str = "output/corridor";
/// Tick at which the upper door cell is closed.
const CLOSE_DOOR_AT:      u64  = 12;
const DOOR_CELL:          Cell = Cell { x: 10, y: 4 };

// Wall at x = 10 with a doorway at y = 4..=5, exits in the two east corners.
const HALL_CONFIG: &str = r#"{
    "width": 20,
    "height": 10,
    "barriers": [
        {"x": 10, "y": 0}, {"x": 10, "y": 1}, {"x": 10, "y": 2}, {"x": 10, "y": 3},
        {"x": 10, "y": 6}, {"x": 10, "y": 7}, {"x": 10, "y": 8}, {"x": 10, "y": 9}
    ],
    "exits": [{"x": 19, "y": 0}, {"x": 19, "y": 9}],
    "base_speed": 1.0,
    "panic_radius": 3.0,
    "distance_preference": 1.0,
    "panic_gain": 0.1,
    "max_panic": 2.0,
    "max_plan_retries": 5,
    "agent_count": 60,
    "spawn": {"kind": "region", "min": {"x": 0, "y": 0}, "max": {"x": 8, "y": 9}},
    "seed": 42,
    "secs_per_tick": 0.5,
    "snapshot_interval_ticks": 5,
    "max_ticks": 500
}"#;

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
    exit_rows:     usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, exit_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_exit(&mut self, event: &ExitEvent) {
        self.exit_rows += 1;
        self.inner.on_exit(event);
    }

    fn on_tick_end(&mut self, tick: evac_core::Tick, report: &TickReport) {
        self.summary_rows += 1;
        self.inner.on_tick_end(tick, report);
    }

    fn on_snapshot(
        &mut self,
        tick:   evac_core::Tick,
        agents: &evac_agent::AgentPool,
        grid:   &evac_grid::GridWorld,
    ) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(tick, agents, grid);
    }

    fn on_sim_end(&mut self, final_tick: evac_core::Tick, outcome: &RunOutcome) {
        self.inner.on_sim_end(final_tick, outcome);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_owned()));

    // 1. Load configuration.
    let config: EvacConfig = match &config_path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {path}"))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {path}"))?
        }
        None => serde_json::from_str(HALL_CONFIG).context("parsing embedded hall config")?,
    };

    println!("=== corridor — rust_evac evacuation demo ===");
    println!(
        "Grid: {}×{}  |  Agents: {}  |  Exits: {}  |  Seed: {}",
        config.width,
        config.height,
        config.agent_count,
        config.exits.len(),
        config.seed
    );
    println!(
        "Cap: {} ticks ({:.1} s per tick), snapshot every {} ticks",
        config.max_ticks, config.secs_per_tick, config.snapshot_interval_ticks
    );
    println!();

    // 2. Build sim.
    let mut sim = SimBuilder::new(config.clone(), AStarPlanner).build()?;

    // 3. Set up output.
    let writer = CsvWriter::new(&out_dir)?;
    let mut inner_obs = SimOutputObserver::new(writer, &config);
    inner_obs.record_layout(sim.grid());
    let mut obs = CountingObserver::new(inner_obs);

    // 4. Run until the door closes.
    let t0 = Instant::now();
    let lead_in = CLOSE_DOOR_AT.min(config.max_ticks);
    for _ in 0..lead_in {
        if sim.agents.is_empty() {
            break;
        }
        sim.step(&mut obs)?;
    }

    // 5. Close the upper door cell, if the embedded layout is in use.
    if config_path.is_none() && !sim.agents.is_empty() {
        let mut barriers: Vec<Cell> = sim.grid().barriers().collect();
        barriers.push(DOOR_CELL);
        match sim.replace_barriers(barriers) {
            Ok(()) => println!("Tick {}: door cell {DOOR_CELL} closed", sim.clock.current_tick),
            Err(SimError::BarrierOnAgent { agent, cell }) => {
                println!("Tick {}: door left open, {agent} is standing in {cell}", sim.clock.current_tick);
            }
            Err(e) => return Err(e.into()),
        }
    }

    // 6. Run the rest.
    let remaining_ticks = config.max_ticks - sim.clock.elapsed_ticks();
    let outcome = sim.run(remaining_ticks, &mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. Statistics.
    let stats = sim.stats();
    let stats_path = out_dir.join("stats.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&stats_path)?), &stats)?;

    println!();
    println!("Outcome: {outcome}");
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  layout.csv          : {} revisions", sim.grid().revision() + 1);
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  exit_events.csv     : {} rows", obs.exit_rows);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!("  stats.json          : {}", stats_path.display());
    println!();

    println!("{:<22} {:>10}", "Metric", "Value");
    println!("{}", "-".repeat(33));
    println!("{:<22} {:>10}", "evacuated", stats.evacuated);
    println!("{:<22} {:>10}", "remaining", stats.remaining);
    if let Some(secs) = stats.evacuation_secs {
        println!("{:<22} {:>10.1}", "evacuation time (s)", secs);
    }
    if let Some(mean) = stats.mean_travel_ticks {
        println!("{:<22} {:>10.2}", "mean travel (ticks)", mean);
    }
    if let Some(max) = stats.max_travel_ticks {
        println!("{:<22} {:>10}", "max travel (ticks)", max);
    }
    println!("{:<22} {:>10}", "peak exits per tick", stats.peak_throughput());

    // 8. Anyone left behind.
    if let RunOutcome::Incomplete { .. } = outcome {
        println!();
        println!("{:<10} {:<10} {:<10}", "Agent", "Cell", "Status");
        println!("{}", "-".repeat(30));
        for (agent, cell) in sim.agents.positions() {
            let status = match sim.agents.status[agent.index()] {
                AgentStatus::Stuck { retries, .. } => format!("stuck ({retries})"),
                other => other.as_str().to_owned(),
            };
            println!("{:<10} {:<10} {:<10}", agent.to_string(), cell.to_string(), status);
        }
    }

    Ok(())
}
