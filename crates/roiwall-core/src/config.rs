//! Region-table configuration.
//!
//! A region table is the fixed list of destination panels a compositor maps the
//! source onto. Tables are either built in or loaded from JSON:
//!
//! ```json
//! {
//!   "name": "edge_nightclub",
//!   "mirror": true,
//!   "canvas": { "width": 4096, "height": 1080 },
//!   "regions": [
//!     { "name": "back wall", "pixels": [0, 0, 2048, 512] },
//!     { "name": "full", "top": 1.0, "left": 0.0, "bottom": 0.0, "right": 1.0 }
//!   ]
//! }
//! ```
//!
//! `pixels` is `[x, y, w, h]` with a top-left canvas origin and requires `canvas`.
//! `mirror` is optional; when present it overrides the consuming plugin's own
//! mirroring mode.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::EngineError;
use crate::rect::{NormalizedRect, Region, RegionList};

/// Environment variable naming a JSON region table to use instead of the built-in one.
pub const REGION_TABLE_ENV: &str = "ROIWALL_REGION_TABLE";

/// A named, validated list of destination regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    pub name: String,
    /// `Some` overrides the consumer's mirroring mode; `None` keeps it.
    pub mirror: Option<bool>,
    pub regions: RegionList,
}

/// Canvas the EDGE nightclub panel layout was drawn up on.
const EDGE_CANVAS: (f32, f32) = (4096.0, 1080.0);

impl RegionTable {
    /// Seven-panel layout of the EDGE nightclub video wall on a 4096x1080 canvas.
    pub fn edge_nightclub() -> Self {
        let (cw, ch) = EDGE_CANVAS;
        let px = |x: f32, y: f32, w: f32, h: f32| {
            NormalizedRect::from_canvas_pixels(cw, ch, x, y, w, h)
        };

        // Lower band: four panels laid out left to right from x=1792.
        let lower_y = ch - 384.0;
        let regions = vec![
            Region::named("back wall", px(0.0, 0.0, 2048.0, 512.0)),
            Region::named("dj booth", px(649.0, 512.0, 750.0, 375.0)),
            Region::named("screen near bar", px(2432.0, 0.0, 1280.0, 384.0)),
            Region::named("outer wall l", px(1792.0, lower_y, 640.0, 384.0)),
            Region::named("south wall l", px(2432.0, lower_y, 512.0, 384.0)),
            Region::named("south wall r", px(2944.0, lower_y, 512.0, 384.0)),
            Region::named("outer wall r", px(3456.0, lower_y, 640.0, 384.0)),
        ];

        Self {
            name: "edge_nightclub".to_string(),
            mirror: None,
            regions: RegionList::from_trusted(regions),
        }
    }
}

#[derive(Deserialize)]
struct JsonCanvas {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRegion {
    Pixels {
        #[serde(default)]
        name: Option<String>,
        pixels: [f32; 4],
    },
    Normalized {
        #[serde(default)]
        name: Option<String>,
        top: f32,
        left: f32,
        bottom: f32,
        right: f32,
    },
}

#[derive(Deserialize)]
struct JsonRoot {
    name: String,
    #[serde(default)]
    mirror: Option<bool>,
    #[serde(default)]
    canvas: Option<JsonCanvas>,
    regions: Vec<JsonRegion>,
}

/// Parse and validate a region table. `path` is only used in error messages.
pub fn parse_region_table(path: &Path, bytes: &[u8]) -> Result<RegionTable, EngineError> {
    let invalid = |msg: String| EngineError::InvalidConfig {
        path: path.to_path_buf(),
        msg,
    };

    let root: JsonRoot = serde_json::from_slice(bytes).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if root.regions.is_empty() {
        return Err(invalid("region table has no regions".to_string()));
    }
    if let Some(c) = &root.canvas {
        if c.width == 0 || c.height == 0 {
            return Err(invalid("canvas width/height must be > 0".to_string()));
        }
    }

    let mut regions = Vec::with_capacity(root.regions.len());
    for (i, r) in root.regions.into_iter().enumerate() {
        let region = match r {
            JsonRegion::Pixels { name, pixels } => {
                let Some(canvas) = &root.canvas else {
                    return Err(invalid(format!(
                        "region {i} uses pixels but the table has no canvas"
                    )));
                };
                let [x, y, w, h] = pixels;
                let rect = NormalizedRect::from_canvas_pixels(
                    canvas.width as f32,
                    canvas.height as f32,
                    x,
                    y,
                    w,
                    h,
                );
                Region { name, rect }
            }
            JsonRegion::Normalized {
                name,
                top,
                left,
                bottom,
                right,
            } => Region {
                name,
                rect: NormalizedRect {
                    top,
                    left,
                    bottom,
                    right,
                },
            },
        };
        regions.push(region);
    }

    let regions = RegionList::new(regions).map_err(|e| invalid(e.to_string()))?;

    Ok(RegionTable {
        name: root.name,
        mirror: root.mirror,
        regions,
    })
}

/// Read and validate a region table from a JSON file.
pub fn load_region_table_from(path: impl AsRef<Path>) -> Result<RegionTable, EngineError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_region_table(path, &bytes)
}

/// The table named by [`REGION_TABLE_ENV`] if set, else the built-in EDGE layout.
pub fn resolve_region_table() -> Result<RegionTable, EngineError> {
    match std::env::var_os(REGION_TABLE_ENV) {
        Some(p) if !p.is_empty() => load_region_table_from(PathBuf::from(p)),
        _ => Ok(RegionTable::edge_nightclub()),
    }
}
