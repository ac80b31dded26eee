use std::fmt::Debug;

use roiwall_core::{EngineError, NormalizedRect, RegionList, SourceImage};

use crate::backend::{BackingTarget, RenderBackend, Viewport};
use crate::geometry::{plan_composite, present_quad};

/// What one successful composite did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeReport {
    /// Region quads drawn into the backing target.
    pub quads: usize,
    /// Whether the backing target was (re)allocated this frame.
    pub allocated: bool,
    pub target_size: (u32, u32),
}

/// Composites a source rect onto a list of destination regions.
///
/// Owns the backing render target, which is sized to the source image and
/// reallocated only when the source dimensions change.
#[derive(Debug)]
pub struct RegionCompositor<T, F> {
    target: Option<BackingTarget<T, F>>,
    allocations: u64,
}

impl<T, F> Default for RegionCompositor<T, F> {
    fn default() -> Self {
        Self {
            target: None,
            allocations: 0,
        }
    }
}

impl<T, F> RegionCompositor<T, F>
where
    T: Copy + PartialEq + Debug,
    F: Copy + PartialEq + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&BackingTarget<T, F>> {
        self.target.as_ref()
    }

    /// Total number of backing-target allocations over this compositor's life.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Render `source_rect` of `source` into every region of `regions`.
    ///
    /// The region quads are drawn into the backing target, which is then drawn
    /// onto whatever framebuffer was bound on entry. That framebuffer binding and
    /// the viewport are restored before returning, on success and on error.
    pub fn composite<B>(
        &mut self,
        backend: &mut B,
        source: &SourceImage<T>,
        source_rect: &NormalizedRect,
        regions: &RegionList,
        mirror: bool,
    ) -> Result<CompositeReport, EngineError>
    where
        B: RenderBackend<Texture = T, Framebuffer = F>,
    {
        let ambient_fbo = backend.framebuffer_binding();
        let ambient_vp = backend.viewport();

        let result = self.render(
            backend,
            source,
            source_rect,
            regions,
            mirror,
            ambient_fbo,
            ambient_vp,
        );

        backend.bind_framebuffer(ambient_fbo);
        backend.set_viewport(ambient_vp);
        result
    }

    /// Delete the backing target (host de-initialising GL).
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend<Texture = T, Framebuffer = F>,
    {
        if let Some(t) = self.target.take() {
            backend.delete_target(t);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render<B>(
        &mut self,
        backend: &mut B,
        source: &SourceImage<T>,
        source_rect: &NormalizedRect,
        regions: &RegionList,
        mirror: bool,
        ambient_fbo: Option<F>,
        ambient_vp: Viewport,
    ) -> Result<CompositeReport, EngineError>
    where
        B: RenderBackend<Texture = T, Framebuffer = F>,
    {
        source.validate()?;
        source_rect.validate()?;

        let (target, allocated) = self.ensure_target(backend, source.width, source.height)?;
        let cmds = plan_composite(source.max_coords(), source_rect, regions, mirror);

        backend.bind_framebuffer(Some(target.fbo));
        backend.set_viewport(Viewport::sized(target.width as i32, target.height as i32));
        backend.clear();
        backend.draw_textured_quads(source.texture, &cmds.quads);

        backend.bind_framebuffer(ambient_fbo);
        backend.set_viewport(ambient_vp);
        backend.draw_textured_quads(target.tex, &[present_quad()]);

        Ok(CompositeReport {
            quads: cmds.len(),
            allocated,
            target_size: target.size(),
        })
    }

    fn ensure_target<B>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<(BackingTarget<T, F>, bool), EngineError>
    where
        B: RenderBackend<Texture = T, Framebuffer = F>,
    {
        if let Some(t) = self.target {
            if t.size() == (width, height) {
                return Ok((t, false));
            }
            tracing::debug!(
                from = ?t.size(),
                to = ?(width, height),
                "source resolution changed; reallocating backing target"
            );
            backend.delete_target(t);
            self.target = None;
        }

        let t = backend.create_target(width, height)?;
        self.target = Some(t);
        self.allocations += 1;
        Ok((t, true))
    }
}
