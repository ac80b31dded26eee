#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

//! roiwall core vocabulary.
//!
//! Contract-only: rects, region lists, source image descriptors, errors and the
//! region-table configuration. No GL handles live here; backends plug their own
//! texture type into [`SourceImage`].

pub mod config;
pub mod error;
pub mod image;
pub mod rect;

pub use error::EngineError;

pub use config::{
    load_region_table_from, parse_region_table, resolve_region_table, RegionTable,
    REGION_TABLE_ENV,
};
pub use image::{SourceImage, TexCoordMax};
pub use rect::{ClipRect, NormalizedRect, Region, RegionList};
