use glow::HasContext;

use roiwall_compositor::Quad;
use roiwall_core::EngineError;

/// Bytes per vertex: vec2 position + vec2 uv.
const STRIDE: i32 = 4 * 4;

/// Expand quads (BL, TL, TR, BR) into two triangles each: BL-TL-TR, BL-TR-BR.
///
/// Each vertex is `[x, y, s, t]`.
pub fn triangulate(quads: &[Quad]) -> Vec<[f32; 4]> {
    let mut out = Vec::with_capacity(quads.len() * 6);
    for q in quads {
        let v = q.corners.map(|c| [c.pos[0], c.pos[1], c.uv[0], c.uv[1]]);
        out.extend_from_slice(&[v[0], v[1], v[2], v[0], v[2], v[3]]);
    }
    out
}

/// A VAO/VBO pair re-uploaded with each batch of quads.
#[derive(Debug)]
pub struct QuadBatch {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl QuadBatch {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, EngineError> {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| EngineError::allocation(format!("create_vertex_array: {e}")))?;
        let vbo = match gl.create_buffer() {
            Ok(b) => b,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(EngineError::allocation(format!("create_buffer: {e}")));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, STRIDE, 0);

        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, STRIDE, 2 * 4);

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok(Self { vao, vbo })
    }

    /// Upload `quads` and draw them with whatever program/textures are bound.
    pub unsafe fn draw(&mut self, gl: &glow::Context, quads: &[Quad]) {
        if quads.is_empty() {
            return;
        }
        let verts = triangulate(quads);

        gl.bind_vertex_array(Some(self.vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&verts),
            glow::DYNAMIC_DRAW,
        );
        gl.draw_arrays(glow::TRIANGLES, 0, verts.len() as i32);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}
