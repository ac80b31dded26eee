use roiwall_compositor::Viewport;
use roiwall_passes::EdgeTracerPass;

use crate::error::PluginError;
use crate::params::ParamInfo;
use crate::plugin::{InputRange, Plugin, PluginInfo, PluginKind, ProcessFrame, API_VERSION};
use crate::timing::FrameClock;

pub static EDGE_TRACER_INFO: PluginInfo = PluginInfo {
    unique_id: *b"EGTR",
    name: "Edge Tracer",
    kind: PluginKind::Effect,
    api_version: API_VERSION,
    plugin_version: (1, 0),
    description: "Red gradient for locating panel edges",
    about: "roiwall",
    inputs: InputRange::NONE,
};

/// Texture-free effect with no parameters and no inputs.
#[derive(Debug, Default)]
pub struct EdgeTracer {
    pass: Option<EdgeTracerPass>,
    clock: FrameClock,
}

impl EdgeTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for EdgeTracer {
    fn info(&self) -> &'static PluginInfo {
        &EDGE_TRACER_INFO
    }

    fn params(&self) -> &'static [ParamInfo] {
        &[]
    }

    fn set_param(&mut self, index: usize, _value: f32) -> Result<(), PluginError> {
        Err(PluginError::UnknownParam { index, count: 0 })
    }

    fn get_param(&self, index: usize) -> Result<f32, PluginError> {
        Err(PluginError::UnknownParam { index, count: 0 })
    }

    unsafe fn init_gl(
        &mut self,
        gl: &glow::Context,
        _viewport: Viewport,
    ) -> Result<(), PluginError> {
        if self.pass.is_none() {
            let pass = EdgeTracerPass::new(gl).map_err(|e| {
                tracing::error!(plugin = EDGE_TRACER_INFO.name, error = %e, "shader build failed");
                e
            })?;
            self.pass = Some(pass);
        }
        Ok(())
    }

    unsafe fn deinit_gl(&mut self, gl: &glow::Context) {
        if let Some(mut pass) = self.pass.take() {
            pass.destroy(gl);
        }
    }

    unsafe fn process(
        &mut self,
        gl: &glow::Context,
        _frame: &ProcessFrame<'_>,
    ) -> Result<(), PluginError> {
        if let Some(pass) = &self.pass {
            self.clock.tick(EDGE_TRACER_INFO.name);
            pass.draw(gl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_no_params_and_no_inputs() {
        let mut t = EdgeTracer::new();
        assert!(t.params().is_empty());
        assert!(t.set_param(0, 1.0).is_err());
        assert!(t.get_param(0).is_err());
        assert_eq!(t.input_range(), InputRange::NONE);
        // Registered as an effect even though it samples nothing.
        assert_eq!(t.info().kind, PluginKind::Effect);
    }
}
