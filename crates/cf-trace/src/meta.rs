//! Per-trace launch metadata.

use serde::{Deserialize, Serialize};

/// Everything replay needs to rebuild the exact grid the simulation ran on.
///
/// Field names on disk are the upper-case keys of the trace schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationMeta {
    #[serde(rename = "SCREEN_SIZE")]
    pub screen_size:    (u32, u32),
    #[serde(rename = "GRID_SIZE")]
    pub grid_size:      (u32, u32),
    #[serde(rename = "GRID_CELL_SIZE")]
    pub cell_size:      u32,
    #[serde(rename = "SVG_SCALE")]
    pub model_scale:    f64,
    #[serde(rename = "SVG_DELTA")]
    pub model_delta:    (i32, i32),
    #[serde(rename = "MODEL_FILENAME")]
    pub model_filename: String,
    #[serde(rename = "FONT_NAME")]
    pub font_name:      String,
}
