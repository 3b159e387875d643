//! Vector floor-plans: every `<rect>` element in an SVG document becomes an
//! [`Obstacle`].
//!
//! Only rectangles are read.  `x`/`y` default to 0, `width`/`height` are
//! required, and `fill` is a 6-digit hex color (missing `fill` is black).
//! Other SVG elements, transforms, and styles are ignored.

use std::path::Path;

use tracing::debug;

use crate::{GeometryError, GeometryResult, ModelTransform, Obstacle, Rgb};

/// Read and parse an SVG file.
pub fn load_svg(path: &Path, transform: ModelTransform) -> GeometryResult<Vec<Obstacle>> {
    let text = std::fs::read_to_string(path).map_err(|source| GeometryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let obstacles = parse_svg(&text, transform)?;
    debug!(path = %path.display(), obstacles = obstacles.len(), "loaded vector model");
    Ok(obstacles)
}

/// Parse SVG source text.  Obstacles are returned in document order.
pub fn parse_svg(text: &str, transform: ModelTransform) -> GeometryResult<Vec<Obstacle>> {
    let doc = roxmltree::Document::parse(text)?;

    doc.descendants()
        .filter(|n| n.is_element() && n.has_tag_name("rect"))
        .enumerate()
        .map(|(index, node)| {
            let number = |name: &'static str, default: Option<f64>| -> GeometryResult<f64> {
                match node.attribute(name).map(str::trim) {
                    None | Some("") => default.ok_or(GeometryError::MissingAttribute { index, name }),
                    Some(raw) => parse_length(raw).ok_or_else(|| GeometryError::BadNumber {
                        index,
                        name,
                        value: raw.to_owned(),
                    }),
                }
            };

            let x = number("x", Some(0.0))?;
            let y = number("y", Some(0.0))?;
            let w = number("width", None)?;
            let h = number("height", None)?;

            let color = match node.attribute("fill") {
                None => Rgb::BLACK,
                Some(raw) => Rgb::from_hex(raw).ok_or_else(|| GeometryError::BadColor {
                    index,
                    value: raw.to_owned(),
                })?,
            };

            Ok(Obstacle { rect: transform.apply(x, y, w, h), color })
        })
        .collect()
}

/// Accept plain numbers and numbers with a trailing `px`.
fn parse_length(raw: &str) -> Option<f64> {
    let n: f64 = raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()?;
    n.is_finite().then_some(n)
}
