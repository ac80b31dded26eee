use std::fmt::Debug;

use roiwall_core::EngineError;

use crate::geometry::Quad;

/// Pixel viewport `(x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn sized(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Offscreen render target (framebuffer + color texture) owned by a compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackingTarget<T, F> {
    pub fbo: F,
    pub tex: T,
    pub width: u32,
    pub height: u32,
}

impl<T, F> BackingTarget<T, F> {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The GPU operations the compositor needs for one frame.
///
/// Implementations are called on the thread that owns the current GPU context.
/// `None` as a framebuffer means the default framebuffer (backbuffer).
pub trait RenderBackend {
    type Texture: Copy + PartialEq + Debug;
    type Framebuffer: Copy + PartialEq + Debug;

    /// The framebuffer currently bound for drawing.
    fn framebuffer_binding(&self) -> Option<Self::Framebuffer>;

    fn viewport(&self) -> Viewport;

    fn bind_framebuffer(&mut self, fbo: Option<Self::Framebuffer>);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Allocate an RGBA render target. Fails with `EngineError::AllocationFailure`.
    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<BackingTarget<Self::Texture, Self::Framebuffer>, EngineError>;

    fn delete_target(&mut self, target: BackingTarget<Self::Texture, Self::Framebuffer>);

    /// Clear the bound framebuffer to transparent black.
    fn clear(&mut self);

    /// Draw `quads` sampling `texture`. Texture, program and vertex bindings made
    /// here must be undone before returning.
    fn draw_textured_quads(&mut self, texture: Self::Texture, quads: &[Quad]);
}
