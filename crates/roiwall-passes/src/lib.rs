//! Fixed effect passes built on the glow runtime.
//!
//! Each pass owns its GL objects and must be `destroy`ed with the context that
//! created it.
#![allow(clippy::missing_safety_doc)]

pub mod edge_tracer;
pub mod luma_key;

pub use edge_tracer::{edge_tracer_vertices, EdgeTracerPass, EDGE_TRACER_COLOR};
pub use luma_key::{keyed_alpha, luma, LumaKeyPass, LUMA_KEY_FRAG};
