use glow::HasContext;

use roiwall_core::EngineError;
use roiwall_runtime_glow::{program_from_binding, ShaderProgram};

/// Vertex color of the trace (alpha is set per edge).
pub const EDGE_TRACER_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// vec2 position + vec4 color.
const STRIDE: i32 = 6 * 4;

const EDGE_VERT: &str = r#"#version 330 core
layout (location = 0) in vec2 a_pos;
layout (location = 1) in vec4 a_color;
out vec4 v_color;
void main() {
    v_color = a_color;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

const EDGE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 o;
void main(){ o = v_color; }
"#;

/// Full-viewport quad as two triangles, `[x, y, r, g, b, a]` per vertex.
///
/// Left edge is opaque, right edge fully transparent.
pub fn edge_tracer_vertices() -> [[f32; 6]; 6] {
    let [r, g, b] = EDGE_TRACER_COLOR;
    let bl = [-1.0, -1.0, r, g, b, 1.0];
    let tl = [-1.0, 1.0, r, g, b, 1.0];
    let tr = [1.0, 1.0, r, g, b, 0.0];
    let br = [1.0, -1.0, r, g, b, 0.0];
    [bl, tl, tr, bl, tr, br]
}

/// Input-free pass: a red gradient fading out left to right.
#[derive(Debug)]
pub struct EdgeTracerPass {
    program: ShaderProgram,
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl EdgeTracerPass {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, EngineError> {
        let mut program = ShaderProgram::new(gl, EDGE_VERT, EDGE_FRAG)?;

        let vao = match gl.create_vertex_array() {
            Ok(v) => v,
            Err(e) => {
                program.destroy(gl);
                return Err(EngineError::allocation(format!("create_vertex_array: {e}")));
            }
        };
        let vbo = match gl.create_buffer() {
            Ok(b) => b,
            Err(e) => {
                gl.delete_vertex_array(vao);
                program.destroy(gl);
                return Err(EngineError::allocation(format!("create_buffer: {e}")));
            }
        };

        let verts = edge_tracer_vertices();
        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&verts),
            glow::STATIC_DRAW,
        );

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, STRIDE, 0);

        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, STRIDE, 2 * 4);

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok(Self { program, vao, vbo })
    }

    /// Draw into the currently bound framebuffer.
    pub unsafe fn draw(&self, gl: &glow::Context) {
        let prev_program = program_from_binding(gl.get_parameter_i32(glow::CURRENT_PROGRAM));
        gl.use_program(Some(self.program.program));
        gl.bind_vertex_array(Some(self.vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 6);
        gl.bind_vertex_array(None);
        gl.use_program(prev_program);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        self.program.destroy(gl);
    }
}
