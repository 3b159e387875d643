//! Command-line arguments and launch-parameter resolution.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};
use serde::Deserialize;

use cf_core::config::{DEFAULT_REMOVAL_RADIUS, DEFAULT_SEED};
use cf_core::{Cell, SpawnRect};
use cf_geometry::RasterOptions;
use cf_planner::CornerCutting;
use cf_trace::{Durability, TraceFormat};

// ── Value types ───────────────────────────────────────────────────────────────

/// Two comma-separated numbers, optionally bracketed: `50,50` or `[50,50]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pair<T>(pub T, pub T);

impl<T> FromStr for Pair<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [a, b] = split_numbers::<T, 2>(value)?;
        Ok(Pair(a, b))
    }
}

impl<T> From<Pair<T>> for (T, T) {
    fn from(Pair(a, b): Pair<T>) -> Self {
        (a, b)
    }
}

/// A spawn rectangle written `x,y,w,h` or `[x,y,w,h]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectArg(pub SpawnRect);

impl FromStr for RectArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(RectArg(SpawnRect::from(split_numbers::<u32, 4>(value)?)))
    }
}

fn split_numbers<T, const N: usize>(value: &str) -> Result<[T; N], String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let inner = value.trim();
    let inner = inner
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(inner);
    let parts: Vec<T> = inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<T>().map_err(|error| format!("invalid number `{part}`: {error}"))
        })
        .collect::<Result<_, _>>()?;
    let found = parts.len();
    parts
        .try_into()
        .map_err(|_| format!("expected {N} comma-separated numbers, found {found} in `{value}`"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum TraceFormatArg {
    /// Single JSON document, compatible with older tooling.
    #[default]
    Json,
    /// One frame per line; appends are constant-time.
    Jsonl,
}

impl From<TraceFormatArg> for TraceFormat {
    fn from(value: TraceFormatArg) -> Self {
        match value {
            TraceFormatArg::Json => TraceFormat::Document,
            TraceFormatArg::Jsonl => TraceFormat::Lines,
        }
    }
}

// ── Shared ────────────────────────────────────────────────────────────────────

/// How raster floor-plans are binarised.  Replay must use the same values the
/// simulation ran with.
#[derive(Args, Debug, Clone)]
pub struct RasterArgs {
    /// Luminance at or below which a raster pixel is an obstacle.
    #[arg(long, value_name = "0-255")]
    pub raster_threshold: Option<u8>,

    /// Resize raster models to grid-size × model-scale before thresholding.
    #[arg(long)]
    pub resize_raster: bool,
}

impl RasterArgs {
    pub fn options(&self) -> RasterOptions {
        let mut options = RasterOptions::default();
        if let Some(threshold) = self.raster_threshold {
            options.threshold = threshold;
        }
        options.resize = self.resize_raster;
        options
    }
}

// ── simulate ──────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    #[command(flatten)]
    pub raster: RasterArgs,

    /// Master RNG seed for agent spawning.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Agents within this many cells of the goal leave the simulation.
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_REMOVAL_RADIUS)]
    pub removal_radius: f64,

    /// Stop after this many ticks even if agents remain.
    #[arg(long, value_name = "TICKS")]
    pub max_ticks: Option<u64>,

    /// Trace encoding, used when the simulation name has no extension.
    #[arg(long, value_enum, default_value_t = TraceFormatArg::Json)]
    pub trace_format: TraceFormatArg,

    /// Flush the trace every N frames instead of every frame.
    #[arg(long, value_name = "FRAMES", value_parser = clap::value_parser!(u32).range(1..))]
    pub batch: Option<u32>,

    /// Forbid diagonal moves that squeeze between two blocked cells.
    #[arg(long)]
    pub forbid_corner_cutting: bool,
}

impl SimulateArgs {
    pub fn durability(&self) -> Durability {
        match self.batch {
            Some(n) if n > 1 => Durability::Batched(n as usize),
            _ => Durability::PerTick,
        }
    }

    pub fn corner_cutting(&self) -> CornerCutting {
        if self.forbid_corner_cutting {
            CornerCutting::Forbid
        } else {
            CornerCutting::Allow
        }
    }
}

/// The launch parameters of a simulation.  Every one is required, either as
/// a flag or as a key of the `--params` file; flags win over the file.
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
    /// JSON file supplying any of the launch parameters below, keyed as in
    /// trace metadata (`GRID_SIZE`, `AGENTS_AMOUNT`, `goal`, ...).
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    #[arg(long, short = 'p', value_name = "NAME")]
    pub project: Option<String>,

    /// Trace name under the project's `Simulations/` directory.
    #[arg(long, short = 's', value_name = "NAME")]
    pub simulation: Option<String>,

    /// Renderer window size in pixels.
    #[arg(long, value_name = "W,H")]
    pub screen_size: Option<Pair<u32>>,

    #[arg(long, value_name = "W,H")]
    pub grid_size: Option<Pair<u32>>,

    /// Size of one grid cell in model units.
    #[arg(long, value_name = "UNITS")]
    pub cell_size: Option<u32>,

    #[arg(long, value_name = "FACTOR")]
    pub model_scale: Option<f64>,

    /// Offset added to every model position before scaling.
    #[arg(long, value_name = "DX,DY", allow_hyphen_values = true)]
    pub model_delta: Option<Pair<i32>>,

    /// Floor-plan file name under the project's `Models/` directory.
    #[arg(long, short = 'm', value_name = "FILE")]
    pub model: Option<String>,

    /// Font the renderer uses for labels.
    #[arg(long, value_name = "NAME")]
    pub font: Option<String>,

    /// Agents sampled per spawn rectangle.
    #[arg(long, short = 'a', value_name = "COUNT")]
    pub agents: Option<u32>,

    /// Spawn rectangle `x,y,w,h` in cells; repeat for several.
    #[arg(long = "spawn-rect", value_name = "X,Y,W,H")]
    pub spawn_rects: Vec<RectArg>,

    #[arg(long, short = 'g', value_name = "X,Y")]
    pub goal: Option<Pair<u32>>,
}

/// `--params` file contents.  Keys follow the trace metadata naming.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
struct ParamsFile {
    project_name:           Option<String>,
    sim_name:               Option<String>,
    screen_size:            Option<(u32, u32)>,
    grid_size:              Option<(u32, u32)>,
    grid_cell_size:         Option<u32>,
    svg_scale:              Option<f64>,
    svg_delta:              Option<(i32, i32)>,
    model_filename:         Option<String>,
    font_name:              Option<String>,
    agents_amount:          Option<u32>,
    passengers_spawn_rects: Option<Vec<SpawnRect>>,
    #[serde(alias = "goal")]
    goal:                   Option<Cell>,
}

impl ParamsFile {
    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading parameter file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing parameter file {}", path.display()))
    }
}

/// Fully resolved launch parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchParams {
    pub project:        String,
    pub simulation:     String,
    pub screen_size:    (u32, u32),
    pub grid_size:      (u32, u32),
    pub cell_size:      u32,
    pub model_scale:    f64,
    pub model_delta:    (i32, i32),
    pub model_filename: String,
    pub font_name:      String,
    pub agents:         u32,
    pub spawn_rects:    Vec<SpawnRect>,
    pub goal:           Cell,
}

fn required<T>(value: Option<T>, flag: &str, key: &str) -> Result<T> {
    value.ok_or_else(|| anyhow!("missing launch parameter --{flag} (or `{key}` in --params)"))
}

impl LaunchArgs {
    /// Merge flags over the `--params` file and check nothing is missing.
    pub fn resolve(&self) -> Result<LaunchParams> {
        let file = match &self.params {
            Some(path) => ParamsFile::read(path)?,
            None => ParamsFile::default(),
        };

        let spawn_rects = if self.spawn_rects.is_empty() {
            file.passengers_spawn_rects.unwrap_or_default()
        } else {
            self.spawn_rects.iter().map(|r| r.0).collect()
        };
        if spawn_rects.is_empty() {
            return Err(anyhow!(
                "missing launch parameter --spawn-rect (or `PASSENGERS_SPAWN_RECTS` in --params)"
            ));
        }

        Ok(LaunchParams {
            project: required(self.project.clone().or(file.project_name), "project", "PROJECT_NAME")?,
            simulation: required(self.simulation.clone().or(file.sim_name), "simulation", "SIM_NAME")?,
            screen_size: required(
                self.screen_size.map(Into::into).or(file.screen_size),
                "screen-size",
                "SCREEN_SIZE",
            )?,
            grid_size: required(
                self.grid_size.map(Into::into).or(file.grid_size),
                "grid-size",
                "GRID_SIZE",
            )?,
            cell_size: required(self.cell_size.or(file.grid_cell_size), "cell-size", "GRID_CELL_SIZE")?,
            model_scale: required(self.model_scale.or(file.svg_scale), "model-scale", "SVG_SCALE")?,
            model_delta: required(
                self.model_delta.map(Into::into).or(file.svg_delta),
                "model-delta",
                "SVG_DELTA",
            )?,
            model_filename: required(self.model.clone().or(file.model_filename), "model", "MODEL_FILENAME")?,
            font_name: required(self.font.clone().or(file.font_name), "font", "FONT_NAME")?,
            agents: required(self.agents.or(file.agents_amount), "agents", "AGENTS_AMOUNT")?,
            spawn_rects,
            goal: required(
                self.goal.map(|Pair(x, y)| Cell::new(x, y)).or(file.goal),
                "goal",
                "GOAL",
            )?,
        })
    }
}

// ── replay ────────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[arg(long, short = 'p', value_name = "NAME")]
    pub project: String,

    /// Trace name under the project's `Simulations/` directory.  Without an
    /// extension, `.jsonl` and then `.json` are tried.
    #[arg(long, short = 's', value_name = "NAME")]
    pub simulation: String,

    /// Full passes over the trace.  The first builds the heatmaps; later
    /// passes collect stuck vectors against them.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub passes: u32,

    /// Directory for the CSV export.  Default: `<project>/Analytics/<simulation>`.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub raster: RasterArgs,
}
