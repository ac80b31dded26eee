//! Region-mapping effects: Mirror Native and 1080p to Native.
//!
//! Both take the same four bound parameters as the source rect and composite
//! input 0 through a region table; they differ only in mirroring.

use roiwall_compositor::{RegionCompositor, Viewport};
use roiwall_core::{resolve_region_table, NormalizedRect, RegionTable};
use roiwall_runtime_glow::{GlowBackend, QuadBatch, ShaderProgram, QUAD_VERT, TEX_INPUT_FRAG};

use crate::error::PluginError;
use crate::params::{ParamInfo, ParamValues};
use crate::plugin::{InputRange, Plugin, PluginInfo, PluginKind, ProcessFrame, API_VERSION};
use crate::timing::{FrameClock, SkipLatch};

pub const PARAM_BOTTOM: usize = 0;
pub const PARAM_LEFT: usize = 1;
pub const PARAM_TOP: usize = 2;
pub const PARAM_RIGHT: usize = 3;

pub static BOUND_PARAMS: [ParamInfo; 4] = [
    ParamInfo::new("Bottom Bound", 0.0),
    ParamInfo::new("Left Bound", 0.0),
    ParamInfo::new("Top Bound", 1.0),
    ParamInfo::new("Right Bound", 1.0),
];

pub static MIRROR_NATIVE_INFO: PluginInfo = PluginInfo {
    unique_id: *b"MRNA",
    name: "Mirror Native",
    kind: PluginKind::Effect,
    api_version: API_VERSION,
    plugin_version: (1, 0),
    description: "Maps a region of the input onto every panel of the wall, mirrored",
    about: "roiwall",
    inputs: InputRange::up_to(2),
};

pub static NATIVE_FROM_1080P_INFO: PluginInfo = PluginInfo {
    unique_id: *b"HDNA",
    name: "1080p to Native",
    kind: PluginKind::Effect,
    api_version: API_VERSION,
    plugin_version: (1, 0),
    description: "Maps a region of a 1080p input onto every panel of the wall",
    about: "roiwall",
    inputs: InputRange::up_to(2),
};

#[derive(Debug)]
struct Gpu {
    compositor: RegionCompositor<glow::NativeTexture, glow::NativeFramebuffer>,
    batch: QuadBatch,
    program: ShaderProgram,
}

#[derive(Debug)]
pub struct RegionMapPlugin {
    info: &'static PluginInfo,
    params: ParamValues,
    table: RegionTable,
    default_mirror: bool,
    gpu: Option<Gpu>,
    clock: FrameClock,
    skips: SkipLatch,
}

impl RegionMapPlugin {
    /// `mirror` is the plugin's own mode; a table that sets `mirror` overrides it.
    pub fn new(info: &'static PluginInfo, table: RegionTable, mirror: bool) -> Self {
        let plugin = Self {
            info,
            params: ParamValues::from_defaults(&BOUND_PARAMS),
            table,
            default_mirror: mirror,
            gpu: None,
            clock: FrameClock::default(),
            skips: SkipLatch::default(),
        };
        plugin.log_mirror_override();
        plugin
    }

    pub fn mirror_native() -> Self {
        Self::new(&MIRROR_NATIVE_INFO, table_or_builtin(), true)
    }

    pub fn native_from_1080p() -> Self {
        Self::new(&NATIVE_FROM_1080P_INFO, table_or_builtin(), false)
    }

    /// Replace the destination regions (and the mirroring override, if the table sets one).
    pub fn with_region_table(mut self, table: RegionTable) -> Self {
        self.table = table;
        self.log_mirror_override();
        self
    }

    pub fn region_table(&self) -> &RegionTable {
        &self.table
    }

    /// Effective mirroring: the table's setting if present, else the plugin's.
    pub fn mirror(&self) -> bool {
        self.table.mirror.unwrap_or(self.default_mirror)
    }

    fn log_mirror_override(&self) {
        if let Some(m) = self.table.mirror.filter(|&m| m != self.default_mirror) {
            tracing::info!(
                plugin = self.info.name,
                table = %self.table.name,
                mirror = m,
                "region table overrides mirroring"
            );
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    /// The current bound parameters as a source rect (not validated).
    pub fn source_rect(&self) -> NormalizedRect {
        let v = |i| self.params.get(i).unwrap_or(BOUND_PARAMS[i].default);
        NormalizedRect::new(
            v(PARAM_BOTTOM),
            v(PARAM_LEFT),
            v(PARAM_TOP),
            v(PARAM_RIGHT),
        )
    }
}

fn table_or_builtin() -> RegionTable {
    match resolve_region_table() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to built-in region table");
            RegionTable::edge_nightclub()
        }
    }
}

impl Plugin for RegionMapPlugin {
    fn info(&self) -> &'static PluginInfo {
        self.info
    }

    fn params(&self) -> &'static [ParamInfo] {
        &BOUND_PARAMS
    }

    fn set_param(&mut self, index: usize, value: f32) -> Result<(), PluginError> {
        self.params.set(index, value)
    }

    fn get_param(&self, index: usize) -> Result<f32, PluginError> {
        self.params.get(index)
    }

    unsafe fn init_gl(
        &mut self,
        gl: &glow::Context,
        viewport: Viewport,
    ) -> Result<(), PluginError> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let mut program = ShaderProgram::new(gl, QUAD_VERT, TEX_INPUT_FRAG).map_err(|e| {
            tracing::error!(plugin = self.info.name, error = %e, "shader build failed");
            e
        })?;
        let batch = match QuadBatch::new(gl) {
            Ok(b) => b,
            Err(e) => {
                program.destroy(gl);
                return Err(e.into());
            }
        };
        tracing::debug!(
            plugin = self.info.name,
            table = %self.table.name,
            regions = self.table.regions.len(),
            mirror = self.mirror(),
            ?viewport,
            "init_gl"
        );
        self.gpu = Some(Gpu {
            compositor: RegionCompositor::new(),
            batch,
            program,
        });
        Ok(())
    }

    unsafe fn deinit_gl(&mut self, gl: &glow::Context) {
        let Some(Gpu {
            mut compositor,
            mut batch,
            mut program,
        }) = self.gpu.take()
        else {
            return;
        };
        {
            let mut backend = GlowBackend::new(gl, &mut batch, program.program);
            compositor.release(&mut backend);
        }
        batch.destroy(gl);
        program.destroy(gl);
    }

    unsafe fn process(
        &mut self,
        gl: &glow::Context,
        frame: &ProcessFrame<'_>,
    ) -> Result<(), PluginError> {
        let source_rect = self.source_rect();
        let mirror = self.mirror();
        let Some(Gpu {
            compositor,
            batch,
            program,
        }) = self.gpu.as_mut()
        else {
            return Ok(());
        };
        self.clock.tick(self.info.name);

        let Some(source) = frame.inputs.first() else {
            tracing::debug!(plugin = self.info.name, "no input texture, nothing to draw");
            return Ok(());
        };

        let mut backend =
            GlowBackend::new(gl, batch, program.program).with_host_framebuffer(frame.host_fbo);
        match compositor.composite(
            &mut backend,
            source,
            &source_rect,
            &self.table.regions,
            mirror,
        ) {
            Ok(report) => {
                if let Some(skipped) = self.skips.recover() {
                    tracing::info!(plugin = self.info.name, skipped, "compositing resumed");
                }
                if report.allocated {
                    tracing::debug!(
                        plugin = self.info.name,
                        size = ?report.target_size,
                        "backing target (re)allocated"
                    );
                }
            }
            // Once per run of the same failure kind.
            Err(e) if self.skips.skip(&e) => {
                if e.is_frame_skip() {
                    tracing::warn!(plugin = self.info.name, error = %e, "skipping frames");
                } else {
                    tracing::error!(plugin = self.info.name, error = %e, "composite failed");
                }
            }
            Err(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(mirror: bool) -> RegionMapPlugin {
        RegionMapPlugin::new(&MIRROR_NATIVE_INFO, RegionTable::edge_nightclub(), mirror)
    }

    #[test]
    fn bound_params_default_to_full_source() {
        let p = plugin(true);
        assert_eq!(p.params().len(), 4);
        assert_eq!(p.source_rect(), NormalizedRect::FULL);
    }

    #[test]
    fn params_map_onto_rect_fields() {
        let mut p = plugin(true);
        p.set_param(PARAM_BOTTOM, 0.1).unwrap();
        p.set_param(PARAM_LEFT, 0.2).unwrap();
        p.set_param(PARAM_TOP, 0.9).unwrap();
        p.set_param(PARAM_RIGHT, 0.5).unwrap();
        assert_eq!(p.source_rect(), NormalizedRect::new(0.1, 0.2, 0.9, 0.5));
        assert_eq!(p.get_param(PARAM_RIGHT).unwrap(), 0.5);
    }

    #[test]
    fn unknown_param_index_fails() {
        let mut p = plugin(false);
        assert!(matches!(
            p.set_param(4, 0.5),
            Err(PluginError::UnknownParam { index: 4, .. })
        ));
        assert!(p.get_param(99).is_err());
        assert!(p.param_display(4).is_err());
    }

    #[test]
    fn param_names_follow_bound_order() {
        let names: Vec<&str> = BOUND_PARAMS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["Bottom Bound", "Left Bound", "Top Bound", "Right Bound"]
        );
    }

    #[test]
    fn display_formats_value() {
        let p = plugin(true);
        assert_eq!(p.param_display(PARAM_TOP).unwrap(), "1.000");
    }

    #[test]
    fn new_plugin_is_not_initialized() {
        let p = plugin(true);
        assert!(!p.is_initialized());
        assert_eq!(p.input_range(), InputRange { min: 0, max: 2 });
    }

    fn single(mirror: Option<bool>) -> RegionTable {
        RegionTable {
            name: "single".into(),
            mirror,
            regions: roiwall_core::RegionList::full(),
        }
    }

    #[test]
    fn region_table_can_be_replaced() {
        let p = plugin(false).with_region_table(single(None));
        assert_eq!(p.region_table().regions.len(), 1);
        assert!(!p.mirror());
    }

    #[test]
    fn table_mirror_setting_overrides_plugin_default() {
        let flat = RegionMapPlugin::new(&MIRROR_NATIVE_INFO, single(Some(false)), true);
        assert!(!flat.mirror());

        let mirrored = plugin(false).with_region_table(single(Some(true)));
        assert!(mirrored.mirror());

        let unset = plugin(true).with_region_table(single(None));
        assert!(unset.mirror());
    }

    // ---- region table resolution through the environment ----

    use std::io;
    use std::sync::{Arc, Mutex};

    use roiwall_core::REGION_TABLE_ENV;

    use crate::TEST_ENV_LOCK;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap_or_else(|e| e.into_inner())).into_owned()
        }
    }

    fn with_table_env<R>(value: &std::ffi::OsStr, f: impl FnOnce() -> R) -> R {
        let _guard = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let prev = std::env::var_os(REGION_TABLE_ENV);
        std::env::set_var(REGION_TABLE_ENV, value);
        let out = f();
        match prev {
            Some(v) => std::env::set_var(REGION_TABLE_ENV, v),
            None => std::env::remove_var(REGION_TABLE_ENV),
        }
        out
    }

    #[test]
    fn bad_table_path_falls_back_to_builtin_with_warning() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .with_ansi(false)
            .finish();

        let p = with_table_env("/nonexistent/roiwall/wall.json".as_ref(), || {
            tracing::subscriber::with_default(subscriber, RegionMapPlugin::mirror_native)
        });

        assert_eq!(p.region_table(), &RegionTable::edge_nightclub());
        assert!(p.mirror());
        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("falling back to built-in region table"), "{text}");
    }

    #[test]
    fn env_table_mirror_false_turns_off_mirror_native() {
        let mut path = std::env::temp_dir();
        path.push(format!("roiwall_plugins_flat_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"name": "flat", "mirror": false,
                "regions": [{"top": 1, "left": 0, "bottom": 0, "right": 1}]}"#,
        )
        .expect("write table");

        let p = with_table_env(path.as_os_str(), RegionMapPlugin::mirror_native);
        let _ = std::fs::remove_file(&path);

        assert_eq!(p.region_table().name, "flat");
        assert!(!p.mirror());
    }
}
