//! `crowdflow simulate`: floor-plan → tile map → scheduler → trace file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use cf_core::{Frame, SimConfig, Tick};
use cf_geometry::{ModelTransform, load_model};
use cf_planner::AStarPlanner;
use cf_sim::{SimBuilder, SimObserver, SimState, TickReport};
use cf_trace::{SimulationMeta, TraceOptions, TraceRecorder, TraceWriter};

use crate::args::{LaunchParams, SimulateArgs};
use crate::project::ProjectLayout;

/// Log a progress line every this many ticks.
const PROGRESS_INTERVAL_TICKS: u64 = 100;

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub trace_path: PathBuf,
    pub state:      SimState,
    pub final_tick: Tick,
    pub frames:     u64,
    pub removed:    usize,
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

struct ProgressObserver<W: TraceWriter> {
    inner:   TraceRecorder<W>,
    frames:  u64,
    removed: usize,
}

impl<W: TraceWriter> ProgressObserver<W> {
    fn new(inner: TraceRecorder<W>) -> Self {
        Self { inner, frames: 0, removed: 0 }
    }
}

impl<W: TraceWriter> SimObserver for ProgressObserver<W> {
    fn on_frame(&mut self, tick: Tick, frame: &Frame) {
        self.frames += 1;
        self.inner.on_frame(tick, frame);
    }

    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        self.removed += report.removed;
        if tick.0 % PROGRESS_INTERVAL_TICKS == 0 {
            info!(%tick, active = report.active, removed = self.removed, "progress");
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick, state: SimState) {
        self.inner.on_sim_end(final_tick, state);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// `grid_size` is the size of the tile map actually built, which for a
/// raster model is the mask's shape rather than the configured size.
fn meta_for(params: &LaunchParams, grid_size: (u32, u32)) -> SimulationMeta {
    SimulationMeta {
        screen_size:    params.screen_size,
        grid_size,
        cell_size:      params.cell_size,
        model_scale:    params.model_scale,
        model_delta:    params.model_delta,
        model_filename: params.model_filename.clone(),
        font_name:      params.font_name.clone(),
    }
}

pub fn run(projects_root: &Path, args: SimulateArgs) -> Result<RunSummary> {
    let params = args.launch.resolve()?;
    let layout = ProjectLayout::new(projects_root, &params.project);

    // 1. Geometry.
    let model_path = layout.model_path(&params.model_filename);
    let transform = ModelTransform::new(params.model_scale, params.model_delta);
    let geometry = load_model(&model_path, transform, params.grid_size, &args.raster.options())
        .with_context(|| format!("loading model {}", model_path.display()))?;
    let grid = geometry
        .build_tile_map(params.grid_size, params.cell_size)
        .context("building tile map")?;
    info!(
        size = ?grid.size(),
        blocked = grid.blocked_count(),
        "tile map ready"
    );

    // 2. Scheduler.
    let config = SimConfig {
        seed:           args.seed,
        removal_radius: args.removal_radius,
        max_ticks:      args.max_ticks,
    };
    let planner = AStarPlanner::new(args.corner_cutting());
    let mut sim = SimBuilder::new(config, grid, params.goal, planner)
        .spawn(params.spawn_rects.clone(), params.agents)
        .build()
        .context("building simulation")?;

    // 3. Trace.
    let simulations = layout.simulations_dir();
    fs::create_dir_all(&simulations)
        .with_context(|| format!("creating {}", simulations.display()))?;
    let trace_path = layout.trace_path(&params.simulation, args.trace_format.into());
    let options = TraceOptions { durability: args.durability() };
    let writer = cf_trace::create(&trace_path, meta_for(&params, sim.grid().size()), options)?;
    let mut obs = ProgressObserver::new(TraceRecorder::new(writer));

    // 4. Run.
    let t0 = Instant::now();
    let state = sim.run(&mut obs).context("running simulation")?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        return Err(e).with_context(|| format!("writing trace {}", trace_path.display()));
    }

    info!(
        state = ?state,
        ticks = sim.tick().0,
        remaining = sim.active_count(),
        secs = elapsed.as_secs_f64(),
        "simulation finished"
    );
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  trace   : {} ({} frames)", trace_path.display(), obs.frames);
    println!("  removed : {} agents, {} still active", obs.removed, sim.active_count());

    Ok(RunSummary {
        trace_path,
        state,
        final_tick: sim.tick(),
        frames: obs.frames,
        removed: obs.removed,
    })
}
