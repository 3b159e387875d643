//! Obstacle rectangles in map coordinates.
//!
//! Map coordinates are the floor-plan's own units after the model transform
//! (shift by `delta`, then multiply by `scale`).  With the default grid cell
//! size of 10, one grid cell spans ten map units.

use std::fmt;

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned integer rectangle: origin `(x, y)` plus size `(w, h)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open overlap test:
    ///
    /// ```text
    /// a.x < b.x + b.w  &&  a.x + a.w > b.x  &&
    /// a.y < b.y + b.h  &&  a.y + a.h > b.y
    /// ```
    ///
    /// Rectangles that merely share an edge do not overlap.  Arithmetic is
    /// widened to `i64` so extreme coordinates can't wrap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (ax, ay, aw, ah) = (self.x as i64, self.y as i64, self.w as i64, self.h as i64);
        let (bx, by, bw, bh) = (other.x as i64, other.y as i64, other.w as i64, other.h as i64);
        ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
    }

    /// Lower and upper corners as `i64` pairs (R-tree envelope).
    #[inline]
    pub(crate) fn corners(&self) -> ([i64; 2], [i64; 2]) {
        let (x, y) = (self.x as i64, self.y as i64);
        ([x, y], [x + self.w as i64, y + self.h as i64])
    }
}

// ── Rgb ───────────────────────────────────────────────────────────────────────

/// An opaque fill color carried for the renderer.  Never consulted by search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `"RRGGBB"`, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// One floor-plan obstacle.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Obstacle {
    pub rect:  Rect,
    pub color: Rgb,
}

// ── ModelTransform ────────────────────────────────────────────────────────────

/// Uniform scale and offset applied to raw model coordinates.
///
/// Positions are shifted by `delta` and then scaled; sizes are only scaled.
/// Both truncate toward zero after the arithmetic.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ModelTransform {
    pub scale: f64,
    pub delta: (i32, i32),
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self { scale: 1.0, delta: (0, 0) }
    }
}

impl ModelTransform {
    pub fn new(scale: f64, delta: (i32, i32)) -> Self {
        Self { scale, delta }
    }

    /// Transform a raw `(x, y, w, h)` into a map-space [`Rect`].
    pub fn apply(&self, x: f64, y: f64, w: f64, h: f64) -> Rect {
        let s = self.scale;
        Rect {
            x: ((x + f64::from(self.delta.0)) * s).trunc() as i32,
            y: ((y + f64::from(self.delta.1)) * s).trunc() as i32,
            w: (w * s).trunc() as i32,
            h: (h * s).trunc() as i32,
        }
    }
}
