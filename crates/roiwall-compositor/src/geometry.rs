//! Quad planning: source rect + destination regions -> clip-space quads.

use roiwall_core::{NormalizedRect, RegionList, TexCoordMax};

/// One corner of a quad: clip-space position and source texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Four corners in bottom-left, top-left, top-right, bottom-right order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Vertex; 4],
}

impl Quad {
    /// The s coordinate of each corner, in corner order.
    pub fn s_coords(&self) -> [f32; 4] {
        self.corners.map(|v| v.uv[0])
    }

    /// The x position of each corner, in corner order.
    pub fn x_coords(&self) -> [f32; 4] {
        self.corners.map(|v| v.pos[0])
    }
}

/// Geometry for one composite call, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderCommands {
    pub quads: Vec<Quad>,
}

impl RenderCommands {
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

/// Quad spanning `x0..x1` (clip) x `bottom..top`, sampling `s0..s1` x `t0..t1`.
///
/// `s0` is sampled at `x0`; passing `s0 > s1` mirrors the quad horizontally.
#[allow(clippy::too_many_arguments)]
fn quad(x0: f32, x1: f32, bottom: f32, top: f32, s0: f32, s1: f32, t0: f32, t1: f32) -> Quad {
    Quad {
        corners: [
            Vertex {
                pos: [x0, bottom],
                uv: [s0, t0],
            },
            Vertex {
                pos: [x0, top],
                uv: [s0, t1],
            },
            Vertex {
                pos: [x1, top],
                uv: [s1, t1],
            },
            Vertex {
                pos: [x1, bottom],
                uv: [s1, t0],
            },
        ],
    }
}

/// Plan the quads for one frame.
///
/// Non-mirrored: one quad per region sampling the whole (rescaled) source rect.
///
/// Mirrored: each region is split at its horizontal midpoint. The left half
/// samples the left half of the source rect; the right half samples the same
/// s-range reversed, so it shows a mirror image of the left half and never the
/// right half of the source rect.
///
/// The source rect is rescaled by `tex_max` for every region.
pub fn plan_composite(
    tex_max: TexCoordMax,
    source_rect: &NormalizedRect,
    regions: &RegionList,
    mirror: bool,
) -> RenderCommands {
    let per_region = if mirror { 2 } else { 1 };
    let mut quads = Vec::with_capacity(regions.len() * per_region);

    for region in regions {
        let src = source_rect.scaled(tex_max);
        let dst = region.rect.to_clip();

        if !mirror {
            quads.push(quad(
                dst.left, dst.right, dst.bottom, dst.top, src.left, src.right, src.bottom,
                src.top,
            ));
            continue;
        }

        let mid_x = dst.midpoint_x();
        let mid_s = src.midpoint_x();
        quads.push(quad(
            dst.left, mid_x, dst.bottom, dst.top, src.left, mid_s, src.bottom, src.top,
        ));
        quads.push(quad(
            mid_x, dst.right, dst.bottom, dst.top, mid_s, src.left, src.bottom, src.top,
        ));
    }

    RenderCommands { quads }
}

/// Full-canvas quad sampling a whole `0..1` texture (backing target presentation).
pub fn present_quad() -> Quad {
    quad(-1.0, 1.0, -1.0, 1.0, 0.0, 1.0, 0.0, 1.0)
}
