//! Raster floor-plans: an image binarised into a boolean mask at grid
//! resolution.
//!
//! The image is converted to 8-bit luminance and each pixel compared to a
//! threshold.  With the default polarity, pixels at or below the threshold
//! are "dark" and blocked.  The mask's shape becomes the grid size; the
//! configured grid size only matters when `resize` is enabled.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::{GeometryError, GeometryResult};

/// Default luminance threshold.
pub const DEFAULT_THRESHOLD: u8 = 10;

/// Which side of the threshold counts as an obstacle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Polarity {
    /// Luminance `<= threshold` is blocked (dark walls on light ground).
    #[default]
    DarkIsBlocked,
    /// Luminance `> threshold` is blocked (light walls on dark ground).
    BrightIsBlocked,
}

/// Raster binarisation options.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RasterOptions {
    pub threshold: u8,
    pub polarity:  Polarity,
    /// Resize to `grid_size * scale` before thresholding.  Off by default:
    /// the image is expected to already be at grid resolution.
    pub resize:    bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            polarity:  Polarity::default(),
            resize:    false,
        }
    }
}

/// Boolean obstacle mask, one entry per grid cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterMask {
    pub width:   u32,
    pub height:  u32,
    pub blocked: Vec<bool>,
}

impl RasterMask {
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.blocked[(y * self.width + x) as usize]
    }

    /// Threshold an already-decoded luminance image.
    pub fn from_luma(img: &GrayImage, options: &RasterOptions) -> Self {
        let (width, height) = img.dimensions();
        let blocked = img
            .pixels()
            .map(|p| {
                let dark = p.0[0] <= options.threshold;
                match options.polarity {
                    Polarity::DarkIsBlocked   => dark,
                    Polarity::BrightIsBlocked => !dark,
                }
            })
            .collect();
        Self { width, height, blocked }
    }
}

/// Decode `path` and binarise it.
///
/// `grid_size` and `scale` are only consulted when `options.resize` is set.
pub fn load_raster(
    path:      &Path,
    grid_size: (u32, u32),
    scale:     f64,
    options:   &RasterOptions,
) -> GeometryResult<RasterMask> {
    let img = image::open(path)?;
    let img = if options.resize {
        let w = (f64::from(grid_size.0) * scale).trunc() as u32;
        let h = (f64::from(grid_size.1) * scale).trunc() as u32;
        if w == 0 || h == 0 {
            return Err(GeometryError::Config(format!(
                "raster resize target {w}x{h} is empty (grid {grid_size:?}, scale {scale})"
            )));
        }
        img.resize_exact(w, h, FilterType::Triangle)
    } else {
        img
    };

    let mask = mask_from_image(&img, options);
    debug!(
        path = %path.display(),
        width = mask.width,
        height = mask.height,
        "loaded raster model"
    );
    Ok(mask)
}

fn mask_from_image(img: &DynamicImage, options: &RasterOptions) -> RasterMask {
    RasterMask::from_luma(&img.to_luma8(), options)
}
