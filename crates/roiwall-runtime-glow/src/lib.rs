//! roiwall runtime (glow/OpenGL backend)
//
// This crate intentionally contains **only** GL plumbing:
// - compile/link shaders
// - create render targets (FBO + texture)
// - upload and draw quad batches
// - `GlowBackend`, the GL implementation of the compositor's `RenderBackend`
//
// It does NOT contain plugin parameters, host ABI glue or region tables.
#![allow(clippy::missing_safety_doc)]

use std::num::NonZeroU32;

use glow::HasContext;

pub mod backend;
pub mod quad;

pub use backend::GlowBackend;
pub use quad::{triangulate, QuadBatch};

pub use roiwall_compositor::{BackingTarget, Quad, RenderBackend, Viewport};
pub use roiwall_core::EngineError;

/// Offscreen render target (FBO + color texture).
pub type RenderTarget = BackingTarget<glow::NativeTexture, glow::NativeFramebuffer>;

/// Sampling state of a backing texture. Clamped so region edges never pull
/// texels from the opposite side of the source.
pub const TARGET_TEX_PARAMS: [(u32, u32); 4] = [
    (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
    (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
    (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
    (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
];

/// Texture name from a `TEXTURE_BINDING_*` query; 0 is no texture.
pub fn texture_from_binding(id: i32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(id as u32).map(glow::NativeTexture)
}

/// Framebuffer name from a `*_FRAMEBUFFER_BINDING` query; 0 is the default framebuffer.
pub fn framebuffer_from_binding(id: i32) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(id as u32).map(glow::NativeFramebuffer)
}

/// Program name from a `CURRENT_PROGRAM` query; 0 is no program.
pub fn program_from_binding(id: i32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id as u32).map(glow::NativeProgram)
}

/// Allocate an FBO with an RGBA8 color texture of `w` x `h` (at least 1x1).
///
/// Only the draw framebuffer is touched, and it is restored along with the
/// active unit's 2D texture binding before returning.
pub unsafe fn create_render_target(
    gl: &glow::Context,
    w: u32,
    h: u32,
) -> Result<RenderTarget, EngineError> {
    let prev_fbo = framebuffer_from_binding(gl.get_parameter_i32(glow::DRAW_FRAMEBUFFER_BINDING));
    let prev_tex = texture_from_binding(gl.get_parameter_i32(glow::TEXTURE_BINDING_2D));

    let fbo = gl
        .create_framebuffer()
        .map_err(|e| EngineError::allocation(format!("create_framebuffer failed: {e:?}")))?;
    let tex = match gl.create_texture() {
        Ok(t) => t,
        Err(e) => {
            gl.delete_framebuffer(fbo);
            return Err(EngineError::allocation(format!(
                "create_texture failed: {e:?}"
            )));
        }
    };

    gl.bind_texture(glow::TEXTURE_2D, Some(tex));
    for (pname, value) in TARGET_TEX_PARAMS {
        gl.tex_parameter_i32(glow::TEXTURE_2D, pname, value as i32);
    }

    let ww = w.max(1);
    let hh = h.max(1);
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::RGBA8 as i32,
        ww as i32,
        hh as i32,
        0,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        None,
    );

    gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, Some(fbo));
    gl.framebuffer_texture_2d(
        glow::DRAW_FRAMEBUFFER,
        glow::COLOR_ATTACHMENT0,
        glow::TEXTURE_2D,
        Some(tex),
        0,
    );

    let status = gl.check_framebuffer_status(glow::DRAW_FRAMEBUFFER);
    gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, prev_fbo);
    gl.bind_texture(glow::TEXTURE_2D, prev_tex);
    if status != glow::FRAMEBUFFER_COMPLETE {
        gl.delete_framebuffer(fbo);
        gl.delete_texture(tex);
        return Err(EngineError::allocation(format!(
            "framebuffer incomplete: 0x{status:x}"
        )));
    }

    Ok(RenderTarget {
        fbo,
        tex,
        width: ww,
        height: hh,
    })
}

pub unsafe fn delete_render_target(gl: &glow::Context, target: RenderTarget) {
    gl.delete_framebuffer(target.fbo);
    gl.delete_texture(target.tex);
}

pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, EngineError> {
    let vs = gl
        .create_shader(glow::VERTEX_SHADER)
        .map_err(|e| EngineError::allocation(format!("create_shader(VS) failed: {e:?}")))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(EngineError::VertexCompile(log));
    }

    let fs = match gl.create_shader(glow::FRAGMENT_SHADER) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(vs);
            return Err(EngineError::allocation(format!(
                "create_shader(FS) failed: {e:?}"
            )));
        }
    };
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(EngineError::FragmentCompile(log));
    }

    let program = match gl.create_program() {
        Ok(p) => p,
        Err(e) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(EngineError::allocation(format!(
                "create_program failed: {e:?}"
            )));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(EngineError::Link(log));
    }

    Ok(program)
}

#[derive(Debug)]
pub struct ShaderProgram {
    pub program: glow::NativeProgram,
}

impl ShaderProgram {
    pub unsafe fn new(
        gl: &glow::Context,
        vert_src: &str,
        frag_src: &str,
    ) -> Result<Self, EngineError> {
        let program = compile_program(gl, vert_src, frag_src)?;
        Ok(Self { program })
    }

    /// Set a float uniform if the program declares it.
    pub unsafe fn set_f32(&self, gl: &glow::Context, name: &str, value: f32) {
        if let Some(loc) = gl.get_uniform_location(self.program, name) {
            gl.uniform_1_f32(Some(&loc), value);
        }
    }

    /// Point a sampler uniform at a texture unit if the program declares it.
    pub unsafe fn set_sampler(&self, gl: &glow::Context, name: &str, unit: u32) {
        if let Some(loc) = gl.get_uniform_location(self.program, name) {
            gl.uniform_1_i32(Some(&loc), unit as i32);
        }
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_program(self.program);
    }
}

/// Vertex stage shared by every textured pass: clip-space position + uv.
pub const QUAD_VERT: &str = r#"#version 330 core
layout (location = 0) in vec2 a_pos;
layout (location = 1) in vec2 a_uv;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

/// Straight texture sample from channel 0.
pub const TEX_INPUT_FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 o;
uniform sampler2D iChannel0;
void main(){ o = texture(iChannel0, v_uv); }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_texture_is_clamped_not_repeated() {
        let param = |name| {
            TARGET_TEX_PARAMS
                .iter()
                .find(|(p, _)| *p == name)
                .map(|(_, v)| *v)
        };
        assert_eq!(param(glow::TEXTURE_WRAP_S), Some(glow::CLAMP_TO_EDGE));
        assert_eq!(param(glow::TEXTURE_WRAP_T), Some(glow::CLAMP_TO_EDGE));
        assert!(TARGET_TEX_PARAMS.iter().all(|(_, v)| *v != glow::REPEAT));
        assert_eq!(param(glow::TEXTURE_MIN_FILTER), Some(glow::LINEAR));
    }

    #[test]
    fn zero_binding_means_nothing_bound() {
        assert_eq!(texture_from_binding(0), None);
        assert_eq!(framebuffer_from_binding(0), None);
        assert_eq!(program_from_binding(0), None);
    }

    #[test]
    fn nonzero_binding_round_trips_the_name() {
        let seven = NonZeroU32::new(7).unwrap();
        assert_eq!(texture_from_binding(7), Some(glow::NativeTexture(seven)));
        assert_eq!(framebuffer_from_binding(7), Some(glow::NativeFramebuffer(seven)));
        assert_eq!(program_from_binding(7), Some(glow::NativeProgram(seven)));
    }
}
