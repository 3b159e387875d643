//! `cf-geometry` — floor-plan geometry and occupancy grids.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`obstacle`]   | `Rect`, `Obstacle`, `Rgb`, `ModelTransform`               |
//! | [`svg`]        | `load_svg`, `parse_svg` — vector floor-plans              |
//! | [`raster`]     | `load_raster`, `RasterMask`, `RasterOptions`              |
//! | [`tile_map`]   | `TileMap`, `TileMapBuilder` (R-tree probe test)           |
//! | [`model`]      | `ModelKind`, `Geometry`, `load_model` — format dispatch   |
//! | [`error`]      | `GeometryError`, `GeometryResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Builds tile maps on Rayon's pool (same output, faster).   |

pub mod error;
pub mod model;
pub mod obstacle;
pub mod raster;
pub mod svg;
pub mod tile_map;

#[cfg(test)]
mod tests;

pub use error::{GeometryError, GeometryResult};
pub use model::{Geometry, ModelKind, load_model};
pub use obstacle::{ModelTransform, Obstacle, Rect, Rgb};
pub use raster::{Polarity, RasterMask, RasterOptions, load_raster};
pub use svg::{load_svg, parse_svg};
pub use tile_map::{DEFAULT_PROBE_SIZE, TileMap, TileMapBuilder};
