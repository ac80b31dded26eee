use glow::HasContext;

use roiwall_compositor::{plan_composite, Quad};
use roiwall_core::{EngineError, NormalizedRect, RegionList, TexCoordMax};
use roiwall_runtime_glow::{
    program_from_binding, texture_from_binding, QuadBatch, ShaderProgram, QUAD_VERT,
};

/// Below this end threshold the key is off and color passes through.
pub const KEY_OFF_BELOW: f32 = 0.01;

pub const LUMA_KEY_FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 o;
uniform sampler2D iChannel0;
uniform float uThresholdBegin;
uniform float uThresholdEnd;
void main() {
    vec4 c = texture(iChannel0, v_uv);
    if (uThresholdEnd < 0.01) {
        o = c;
        return;
    }
    float luma = 0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b;
    float a = smoothstep(uThresholdBegin + 0.0001, uThresholdEnd + 0.0001, luma);
    o = vec4(c.rgb, a * c.a);
}
"#;

/// Rec. 709 luma.
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// CPU mirror of `LUMA_KEY_FRAG`: the output alpha for one RGBA texel.
pub fn keyed_alpha(rgba: [f32; 4], begin: f32, end: f32) -> f32 {
    if end < KEY_OFF_BELOW {
        return rgba[3];
    }
    let e0 = begin + 0.0001;
    let e1 = end + 0.0001;
    let x = luma(rgba[0], rgba[1], rgba[2]);
    // GLSL smoothstep is undefined for e0 >= e1; treat it as a hard step.
    let k = if e1 <= e0 {
        if x < e0 {
            0.0
        } else {
            1.0
        }
    } else {
        let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    };
    k * rgba[3]
}

/// Keys input 0 by luminance over the whole viewport.
#[derive(Debug)]
pub struct LumaKeyPass {
    program: ShaderProgram,
    batch: QuadBatch,
}

impl LumaKeyPass {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, EngineError> {
        let program = ShaderProgram::new(gl, QUAD_VERT, LUMA_KEY_FRAG)?;
        let batch = match QuadBatch::new(gl) {
            Ok(b) => b,
            Err(e) => {
                let mut program = program;
                program.destroy(gl);
                return Err(e);
            }
        };
        Ok(Self { program, batch })
    }

    /// The single full-viewport quad, sampling `[0,sMax]x[0,tMax]`.
    pub fn quad(tex_max: TexCoordMax) -> Quad {
        let cmds = plan_composite(tex_max, &NormalizedRect::FULL, &RegionList::full(), false);
        cmds.quads[0]
    }

    /// Draw into the currently bound framebuffer.
    pub unsafe fn draw(
        &mut self,
        gl: &glow::Context,
        input: glow::NativeTexture,
        tex_max: TexCoordMax,
        threshold_begin: f32,
        threshold_end: f32,
    ) {
        let prev_program = program_from_binding(gl.get_parameter_i32(glow::CURRENT_PROGRAM));
        let prev_unit = gl.get_parameter_i32(glow::ACTIVE_TEXTURE) as u32;
        gl.active_texture(glow::TEXTURE0);
        let prev_tex = texture_from_binding(gl.get_parameter_i32(glow::TEXTURE_BINDING_2D));

        gl.use_program(Some(self.program.program));
        self.program.set_sampler(gl, "iChannel0", 0);
        self.program.set_f32(gl, "uThresholdBegin", threshold_begin);
        self.program.set_f32(gl, "uThresholdEnd", threshold_end);
        gl.bind_texture(glow::TEXTURE_2D, Some(input));

        self.batch.draw(gl, &[Self::quad(tex_max)]);

        gl.bind_texture(glow::TEXTURE_2D, prev_tex);
        gl.active_texture(prev_unit);
        gl.use_program(prev_program);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        self.batch.destroy(gl);
        self.program.destroy(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_off_below_end_threshold() {
        let px = [0.0, 0.0, 0.0, 0.7];
        assert_eq!(keyed_alpha(px, 0.0, 0.0), 0.7);
        assert_eq!(keyed_alpha(px, 0.0, 0.009), 0.7);
    }

    #[test]
    fn dark_pixels_are_keyed_out_and_bright_kept() {
        let black = [0.0, 0.0, 0.0, 1.0];
        let white = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(keyed_alpha(black, 0.2, 0.5), 0.0);
        assert!((keyed_alpha(white, 0.2, 0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn alpha_ramps_smoothly_between_thresholds() {
        let mid = 0.35 + 0.0001;
        let grey = [mid, mid, mid, 1.0];
        let a = keyed_alpha(grey, 0.2, 0.5);
        assert!((a - 0.5).abs() < 1e-3, "got {a}");
    }

    #[test]
    fn input_alpha_scales_output() {
        let white = [1.0, 1.0, 1.0, 0.5];
        assert!((keyed_alpha(white, 0.2, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn luma_weights_sum_to_one() {
        assert!((luma(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
        assert!(luma(0.0, 1.0, 0.0) > luma(1.0, 0.0, 0.0));
    }

    #[test]
    fn quad_samples_only_the_logical_image() {
        let q = LumaKeyPass::quad(TexCoordMax { s: 0.5, t: 0.25 });
        assert_eq!(q.x_coords(), [-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(q.s_coords(), [0.0, 0.0, 0.5, 0.5]);
        assert_eq!(q.corners[1].uv[1], 0.25);
    }
}
