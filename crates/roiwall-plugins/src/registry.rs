use crate::edge_tracer::{EdgeTracer, EDGE_TRACER_INFO};
use crate::error::PluginError;
use crate::luma_key::{LumaKey, LUMA_KEY_INFO};
use crate::plugin::{Plugin, PluginInfo};
use crate::region_map::{RegionMapPlugin, MIRROR_NATIVE_INFO, NATIVE_FROM_1080P_INFO};

/// A registered plugin: its static info and a factory for fresh instances.
#[derive(Debug, Clone, Copy)]
pub struct PluginEntry {
    pub info: &'static PluginInfo,
    pub create: fn() -> Box<dyn Plugin>,
}

fn create_mirror_native() -> Box<dyn Plugin> {
    Box::new(RegionMapPlugin::mirror_native())
}

fn create_native_from_1080p() -> Box<dyn Plugin> {
    Box::new(RegionMapPlugin::native_from_1080p())
}

fn create_luma_key() -> Box<dyn Plugin> {
    Box::new(LumaKey::new())
}

fn create_edge_tracer() -> Box<dyn Plugin> {
    Box::new(EdgeTracer::new())
}

static REGISTRY: [PluginEntry; 4] = [
    PluginEntry {
        info: &MIRROR_NATIVE_INFO,
        create: create_mirror_native,
    },
    PluginEntry {
        info: &NATIVE_FROM_1080P_INFO,
        create: create_native_from_1080p,
    },
    PluginEntry {
        info: &LUMA_KEY_INFO,
        create: create_luma_key,
    },
    PluginEntry {
        info: &EDGE_TRACER_INFO,
        create: create_edge_tracer,
    },
];

/// Every plugin this library exports, in host enumeration order.
pub fn registry() -> &'static [PluginEntry] {
    &REGISTRY
}

pub fn find_entry(unique_id: [u8; 4]) -> Option<&'static PluginEntry> {
    REGISTRY.iter().find(|e| e.info.unique_id == unique_id)
}

/// Instantiate the plugin registered under `unique_id`.
pub fn create_plugin(unique_id: [u8; 4]) -> Result<Box<dyn Plugin>, PluginError> {
    let entry = find_entry(unique_id).ok_or_else(|| {
        PluginError::UnknownPlugin(String::from_utf8_lossy(&unique_id).into_owned())
    })?;
    Ok((entry.create)())
}
