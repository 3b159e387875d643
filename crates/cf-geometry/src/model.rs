//! Model-file dispatch: pick the vector or raster loader by extension and
//! turn the result into a [`TileMap`].

use std::path::Path;

use image::ImageFormat;
use tracing::info;

use crate::raster::{RasterMask, RasterOptions, load_raster};
use crate::svg::load_svg;
use crate::tile_map::{DEFAULT_PROBE_SIZE, TileMap, TileMapBuilder};
use crate::{GeometryError, GeometryResult, ModelTransform, Obstacle};

/// The two supported floor-plan encodings.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ModelKind {
    /// SVG rectangles.
    Vector,
    /// Any image format the `image` crate can decode.
    Raster,
}

impl ModelKind {
    /// Classify `path` by extension.  Unknown extensions are a
    /// configuration error.
    pub fn from_path(path: &Path) -> GeometryResult<Self> {
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            return Ok(ModelKind::Vector);
        }
        ImageFormat::from_path(path)
            .map(|_| ModelKind::Raster)
            .map_err(|_| GeometryError::UnsupportedModel(path.to_path_buf()))
    }
}

/// Loaded floor-plan geometry.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// Obstacle rectangles, rasterised on demand at any grid size.
    Vector(Vec<Obstacle>),
    /// A mask already at grid resolution.
    Raster(RasterMask),
}

impl Geometry {
    /// The grid size a tile map built from this geometry will have: the
    /// configured size for vector input, the mask's own shape for raster.
    pub fn grid_size(&self, configured: (u32, u32)) -> (u32, u32) {
        match self {
            Geometry::Vector(_) => configured,
            Geometry::Raster(mask) => (mask.width, mask.height),
        }
    }

    /// Obstacles for the renderer's map layer (empty for raster input).
    pub fn obstacles(&self) -> &[Obstacle] {
        match self {
            Geometry::Vector(obstacles) => obstacles,
            Geometry::Raster(_) => &[],
        }
    }

    /// Rasterise into a tile map with the default probe size.
    pub fn build_tile_map(&self, grid_size: (u32, u32), cell_size: u32) -> GeometryResult<TileMap> {
        self.build_tile_map_with_probe(grid_size, cell_size, DEFAULT_PROBE_SIZE)
    }

    pub fn build_tile_map_with_probe(
        &self,
        grid_size:  (u32, u32),
        cell_size:  u32,
        probe_size: u32,
    ) -> GeometryResult<TileMap> {
        match self {
            Geometry::Vector(obstacles) => Ok(TileMapBuilder::new(grid_size, cell_size)?
                .probe_size(probe_size)?
                .build(obstacles)),
            Geometry::Raster(mask) => TileMap::from_mask(mask.clone(), cell_size),
        }
    }
}

/// Load any supported model file.
///
/// `grid_size` is only used to size a raster resize (see
/// [`RasterOptions::resize`]).
pub fn load_model(
    path:      &Path,
    transform: ModelTransform,
    grid_size: (u32, u32),
    raster:    &RasterOptions,
) -> GeometryResult<Geometry> {
    let kind = ModelKind::from_path(path)?;
    let geometry = match kind {
        ModelKind::Vector => Geometry::Vector(load_svg(path, transform)?),
        ModelKind::Raster => {
            Geometry::Raster(load_raster(path, grid_size, transform.scale, raster)?)
        }
    };
    info!(
        path = %path.display(),
        kind = ?kind,
        grid = ?geometry.grid_size(grid_size),
        "loaded floor-plan model"
    );
    Ok(geometry)
}
