use roiwall_compositor::Viewport;
use roiwall_core::SourceImage;

use crate::error::PluginError;
use crate::params::ParamInfo;

/// Host plugin API version the plugins declare.
pub const API_VERSION: (u32, u32) = (1, 6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Effect,
    Source,
}

/// Inclusive range of input textures a plugin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRange {
    pub min: usize,
    pub max: usize,
}

impl InputRange {
    pub const NONE: InputRange = InputRange { min: 0, max: 0 };

    pub const fn up_to(max: usize) -> Self {
        Self { min: 0, max }
    }

    pub fn contains(&self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

/// Static description handed to the host at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    /// Four-character code, unique across the registry.
    pub unique_id: [u8; 4],
    pub name: &'static str,
    pub kind: PluginKind,
    pub api_version: (u32, u32),
    pub plugin_version: (u32, u32),
    pub description: &'static str,
    pub about: &'static str,
    pub inputs: InputRange,
}

impl PluginInfo {
    /// The unique id as text (`"MRNA"`), lossy for non-ASCII codes.
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.unique_id).into_owned()
    }
}

/// Everything the host hands over for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ProcessFrame<'a> {
    pub inputs: &'a [SourceImage<glow::NativeTexture>],
    /// Framebuffer to draw into; `None` is the default framebuffer.
    pub host_fbo: Option<glow::NativeFramebuffer>,
}

/// The capability surface every plugin exposes to a host.
///
/// GL methods are `unsafe`: the caller guarantees `gl` is current on this
/// thread and is the same context across `init_gl`, `process` and `deinit_gl`.
pub trait Plugin: std::fmt::Debug {
    fn info(&self) -> &'static PluginInfo;

    fn params(&self) -> &'static [ParamInfo];

    fn input_range(&self) -> InputRange {
        self.info().inputs
    }

    fn set_param(&mut self, index: usize, value: f32) -> Result<(), PluginError>;

    fn get_param(&self, index: usize) -> Result<f32, PluginError>;

    /// Text the host shows next to the parameter.
    fn param_display(&self, index: usize) -> Result<String, PluginError> {
        Ok(format!("{:.3}", self.get_param(index)?))
    }

    unsafe fn init_gl(&mut self, gl: &glow::Context, viewport: Viewport)
        -> Result<(), PluginError>;

    unsafe fn deinit_gl(&mut self, gl: &glow::Context);

    /// Render one frame. A no-op until `init_gl` has succeeded.
    unsafe fn process(
        &mut self,
        gl: &glow::Context,
        frame: &ProcessFrame<'_>,
    ) -> Result<(), PluginError>;
}
