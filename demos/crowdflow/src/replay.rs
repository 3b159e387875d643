//! `crowdflow replay`: trace file → congestion heatmaps → CSV.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;

use cf_analysis::{CongestionAnalyzer, ExportPaths, export};
use cf_geometry::{ModelKind, ModelTransform, load_model};

use crate::args::ReplayArgs;
use crate::project::ProjectLayout;

/// What a replay produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaySummary {
    pub frames:        usize,
    pub grid_size:     (u32, u32),
    pub max_density:   u32,
    pub max_stuck:     u32,
    pub stuck_vectors: usize,
    pub export:        ExportPaths,
}

pub fn run(projects_root: &Path, args: ReplayArgs) -> Result<ReplaySummary> {
    let layout = ProjectLayout::new(projects_root, &args.project);
    let trace_path = layout.find_trace(&args.simulation)?;
    let trace = cf_trace::load(&trace_path)
        .with_context(|| format!("loading trace {}", trace_path.display()))?;
    let meta = &trace.meta;
    info!(path = %trace_path.display(), frames = trace.frame_count(), "trace loaded");

    // Rebuild the grid the run used.  `GRID_SIZE` already holds a raster
    // mask's final shape, so a raster resize targets it at scale 1.
    let model_path = layout.model_path(&meta.model_filename);
    let scale = match ModelKind::from_path(&model_path)? {
        ModelKind::Vector => meta.model_scale,
        ModelKind::Raster => 1.0,
    };
    let transform = ModelTransform::new(scale, meta.model_delta);
    let geometry = load_model(&model_path, transform, meta.grid_size, &args.raster.options())
        .with_context(|| format!("loading model {}", model_path.display()))?;
    let grid = geometry
        .build_tile_map(meta.grid_size, meta.cell_size)
        .context("building tile map")?;
    if grid.size() != meta.grid_size {
        bail!(
            "model {} gives a {:?} grid but the trace was recorded on {:?}",
            model_path.display(),
            grid.size(),
            meta.grid_size
        );
    }

    let frames = trace.frame_count();
    let mut analyzer = CongestionAnalyzer::new(trace.frames, grid.size())
        .with_context(|| format!("replaying {}", trace_path.display()))?;

    let t0 = Instant::now();
    analyzer.run_pass();
    for _ in 1..args.passes {
        for _ in 0..frames {
            analyzer.advance();
        }
    }
    let elapsed = t0.elapsed();

    let out = args.out.clone().unwrap_or_else(|| layout.analytics_dir(&args.simulation));
    let paths = export(&out, &analyzer).with_context(|| format!("exporting to {}", out.display()))?;

    let summary = ReplaySummary {
        frames,
        grid_size: grid.size(),
        max_density: analyzer.density().max(),
        max_stuck: analyzer.stuck().max(),
        stuck_vectors: analyzer.stuck_vectors().len(),
        export: paths,
    };
    println!("Replay complete in {:.3} s ({} passes)", elapsed.as_secs_f64(), args.passes);
    println!("  density       : max {}", summary.max_density);
    if summary.max_stuck == 0 {
        println!("  stuck         : no data");
    } else {
        println!("  stuck         : max {}", summary.max_stuck);
    }
    println!("  stuck vectors : {}", summary.stuck_vectors);
    println!("  written to    : {}", out.display());
    Ok(summary)
}
