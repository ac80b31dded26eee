use glow::HasContext;

use roiwall_compositor::{Quad, RenderBackend, Viewport};
use roiwall_core::EngineError;

use crate::quad::QuadBatch;
use crate::{
    create_render_target, delete_render_target, framebuffer_from_binding, program_from_binding,
    texture_from_binding, RenderTarget,
};

/// `RenderBackend` over a live glow context.
///
/// Borrowed per frame: the caller keeps the quad batch and sampling program
/// alive across frames and hands them in here.
pub struct GlowBackend<'a> {
    gl: &'a glow::Context,
    batch: &'a mut QuadBatch,
    program: glow::NativeProgram,
    host_fbo: Option<Option<glow::NativeFramebuffer>>,
}

impl std::fmt::Debug for GlowBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowBackend")
            .field("batch", &self.batch)
            .field("program", &self.program)
            .field("host_fbo", &self.host_fbo)
            .field("gl", &"<glow context>")
            .finish()
    }
}

impl<'a> GlowBackend<'a> {
    /// `gl` must be current on this thread for the lifetime of the backend.
    /// `program` samples `iChannel0` using `QUAD_VERT`'s attribute layout.
    pub unsafe fn new(
        gl: &'a glow::Context,
        batch: &'a mut QuadBatch,
        program: glow::NativeProgram,
    ) -> Self {
        Self {
            gl,
            batch,
            program,
            host_fbo: None,
        }
    }

    /// Treat `fbo` as the caller's framebuffer instead of querying GL for it.
    ///
    /// Hosts that pass their framebuffer explicitly (`None` = backbuffer) use this.
    pub fn with_host_framebuffer(mut self, fbo: Option<glow::NativeFramebuffer>) -> Self {
        self.host_fbo = Some(fbo);
        self
    }
}

impl RenderBackend for GlowBackend<'_> {
    type Texture = glow::NativeTexture;
    type Framebuffer = glow::NativeFramebuffer;

    fn framebuffer_binding(&self) -> Option<glow::NativeFramebuffer> {
        if let Some(host) = self.host_fbo {
            return host;
        }
        let id = unsafe { self.gl.get_parameter_i32(glow::DRAW_FRAMEBUFFER_BINDING) };
        framebuffer_from_binding(id)
    }

    fn viewport(&self) -> Viewport {
        let mut vp = [0i32; 4];
        unsafe { self.gl.get_parameter_i32_slice(glow::VIEWPORT, &mut vp) };
        Viewport {
            x: vp[0],
            y: vp[1],
            width: vp[2],
            height: vp[3],
        }
    }

    /// Draw binding only; the host's read framebuffer is left alone.
    fn bind_framebuffer(&mut self, fbo: Option<glow::NativeFramebuffer>) {
        unsafe { self.gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, fbo) };
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        unsafe {
            self.gl
                .viewport(viewport.x, viewport.y, viewport.width, viewport.height)
        };
    }

    fn create_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, EngineError> {
        let target = unsafe { create_render_target(self.gl, width, height)? };
        tracing::debug!(width, height, "allocated backing render target");
        Ok(target)
    }

    fn delete_target(&mut self, target: RenderTarget) {
        unsafe { delete_render_target(self.gl, target) };
    }

    fn clear(&mut self) {
        unsafe {
            // Clear color is context state the host may rely on.
            let mut prev = [0f32; 4];
            self.gl
                .get_parameter_f32_slice(glow::COLOR_CLEAR_VALUE, &mut prev);
            self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
            self.gl.clear_color(prev[0], prev[1], prev[2], prev[3]);
        }
    }

    /// Program, active texture unit and unit 0's 2D binding are put back afterwards.
    fn draw_textured_quads(&mut self, texture: glow::NativeTexture, quads: &[Quad]) {
        unsafe {
            let gl = self.gl;
            let prev_program = program_from_binding(gl.get_parameter_i32(glow::CURRENT_PROGRAM));
            let prev_unit = gl.get_parameter_i32(glow::ACTIVE_TEXTURE) as u32;
            gl.active_texture(glow::TEXTURE0);
            let prev_tex = texture_from_binding(gl.get_parameter_i32(glow::TEXTURE_BINDING_2D));

            gl.use_program(Some(self.program));
            if let Some(loc) = gl.get_uniform_location(self.program, "iChannel0") {
                gl.uniform_1_i32(Some(&loc), 0);
            }
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            self.batch.draw(gl, quads);

            gl.bind_texture(glow::TEXTURE_2D, prev_tex);
            gl.active_texture(prev_unit);
            gl.use_program(prev_program);
        }
    }
}
