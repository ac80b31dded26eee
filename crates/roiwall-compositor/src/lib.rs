#![forbid(unsafe_code)]

//! Backend-agnostic region compositor.
//!
//! `plan_composite` turns a source rect and a region list into clip-space quads.
//! `RegionCompositor` owns the backing render target and drives any
//! [`RenderBackend`] through one frame, restoring the caller's framebuffer and
//! viewport on every path.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod backend;
pub mod compositor;
pub mod geometry;

pub use backend::{BackingTarget, RenderBackend, Viewport};
pub use compositor::{CompositeReport, RegionCompositor};
pub use geometry::{plan_composite, present_quad, Quad, RenderCommands, Vertex};

pub use roiwall_core::{EngineError, NormalizedRect, RegionList, SourceImage, TexCoordMax};
