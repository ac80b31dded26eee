use roiwall_compositor::Viewport;
use roiwall_passes::LumaKeyPass;

use crate::error::PluginError;
use crate::params::{ParamInfo, ParamValues};
use crate::plugin::{InputRange, Plugin, PluginInfo, PluginKind, ProcessFrame, API_VERSION};
use crate::timing::{FrameClock, SkipLatch};

pub const PARAM_THRESHOLD_BEGIN: usize = 0;
pub const PARAM_THRESHOLD_END: usize = 1;

pub static LUMA_KEY_PARAMS: [ParamInfo; 2] = [
    ParamInfo::new("Threshold Begin", 0.0),
    ParamInfo::new("Threshold End", 0.0),
];

pub static LUMA_KEY_INFO: PluginInfo = PluginInfo {
    unique_id: *b"LMKY",
    name: "Luma Key",
    kind: PluginKind::Effect,
    api_version: API_VERSION,
    plugin_version: (1, 0),
    description: "Keys out dark pixels by luminance",
    about: "roiwall",
    inputs: InputRange::up_to(1),
};

#[derive(Debug)]
pub struct LumaKey {
    params: ParamValues,
    pass: Option<LumaKeyPass>,
    clock: FrameClock,
    skips: SkipLatch,
}

impl Default for LumaKey {
    fn default() -> Self {
        Self::new()
    }
}

impl LumaKey {
    pub fn new() -> Self {
        Self {
            params: ParamValues::from_defaults(&LUMA_KEY_PARAMS),
            pass: None,
            clock: FrameClock::default(),
            skips: SkipLatch::default(),
        }
    }

    fn thresholds(&self) -> (f32, f32) {
        let begin = self
            .params
            .get(PARAM_THRESHOLD_BEGIN)
            .unwrap_or(LUMA_KEY_PARAMS[PARAM_THRESHOLD_BEGIN].default);
        let end = self
            .params
            .get(PARAM_THRESHOLD_END)
            .unwrap_or(LUMA_KEY_PARAMS[PARAM_THRESHOLD_END].default);
        (begin, end)
    }
}

impl Plugin for LumaKey {
    fn info(&self) -> &'static PluginInfo {
        &LUMA_KEY_INFO
    }

    fn params(&self) -> &'static [ParamInfo] {
        &LUMA_KEY_PARAMS
    }

    /// Begin may not pass End: such a Begin is dropped and the call still succeeds.
    fn set_param(&mut self, index: usize, value: f32) -> Result<(), PluginError> {
        if index == PARAM_THRESHOLD_BEGIN {
            let (_, end) = self.thresholds();
            if value > end {
                tracing::debug!(value, end, "threshold begin above end, ignored");
                return Ok(());
            }
        }
        self.params.set(index, value)
    }

    fn get_param(&self, index: usize) -> Result<f32, PluginError> {
        self.params.get(index)
    }

    unsafe fn init_gl(
        &mut self,
        gl: &glow::Context,
        _viewport: Viewport,
    ) -> Result<(), PluginError> {
        if self.pass.is_none() {
            let pass = LumaKeyPass::new(gl).map_err(|e| {
                tracing::error!(plugin = LUMA_KEY_INFO.name, error = %e, "shader build failed");
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
        frame: &ProcessFrame<'_>,
    ) -> Result<(), PluginError> {
        let (begin, end) = self.thresholds();
        let Some(pass) = self.pass.as_mut() else {
            return Ok(());
        };
        self.clock.tick(LUMA_KEY_INFO.name);

        let Some(input) = frame.inputs.first() else {
            return Ok(());
        };
        if let Err(e) = input.validate() {
            if self.skips.skip(&e) {
                tracing::warn!(plugin = LUMA_KEY_INFO.name, error = %e, "skipping frames");
            }
            return Ok(());
        }
        if let Some(skipped) = self.skips.recover() {
            tracing::info!(plugin = LUMA_KEY_INFO.name, skipped, "keying resumed");
        }
        pass.draw(gl, input.texture, input.max_coords(), begin, end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_zero() {
        let k = LumaKey::new();
        assert_eq!(k.get_param(PARAM_THRESHOLD_BEGIN).unwrap(), 0.0);
        assert_eq!(k.get_param(PARAM_THRESHOLD_END).unwrap(), 0.0);
        assert_eq!(k.params()[1].name, "Threshold End");
    }

    #[test]
    fn begin_above_end_is_ignored_but_succeeds() {
        let mut k = LumaKey::new();
        k.set_param(PARAM_THRESHOLD_END, 0.4).unwrap();
        k.set_param(PARAM_THRESHOLD_BEGIN, 0.6).unwrap();
        assert_eq!(k.get_param(PARAM_THRESHOLD_BEGIN).unwrap(), 0.0);

        k.set_param(PARAM_THRESHOLD_BEGIN, 0.3).unwrap();
        assert_eq!(k.get_param(PARAM_THRESHOLD_BEGIN).unwrap(), 0.3);
    }

    #[test]
    fn begin_equal_to_end_is_accepted() {
        let mut k = LumaKey::new();
        k.set_param(PARAM_THRESHOLD_END, 0.5).unwrap();
        k.set_param(PARAM_THRESHOLD_BEGIN, 0.5).unwrap();
        assert_eq!(k.get_param(PARAM_THRESHOLD_BEGIN).unwrap(), 0.5);
    }

    #[test]
    fn end_is_not_constrained_by_begin() {
        let mut k = LumaKey::new();
        k.set_param(PARAM_THRESHOLD_END, 0.5).unwrap();
        k.set_param(PARAM_THRESHOLD_BEGIN, 0.4).unwrap();
        k.set_param(PARAM_THRESHOLD_END, 0.1).unwrap();
        assert_eq!(k.get_param(PARAM_THRESHOLD_END).unwrap(), 0.1);
    }

    #[test]
    fn unknown_index_fails() {
        let mut k = LumaKey::new();
        assert!(k.set_param(2, 0.0).is_err());
        assert!(k.get_param(2).is_err());
    }

    #[test]
    fn accepts_at_most_one_input() {
        let k = LumaKey::new();
        assert!(k.input_range().contains(1));
        assert!(!k.input_range().contains(2));
    }
}
