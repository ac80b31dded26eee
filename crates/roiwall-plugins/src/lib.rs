//! roiwall-plugins
//!
//! Host-facing plugins: parameter tables, plugin info, the `Plugin` capability
//! trait and a static factory registry. The host ABI itself is not here; a host
//! shim translates its calls into `Plugin` methods on the GL thread.
#![allow(clippy::missing_safety_doc)]

pub mod edge_tracer;
pub mod error;
pub mod logging;
pub mod luma_key;
pub mod params;
pub mod plugin;
pub mod region_map;
pub mod registry;
pub mod timing;

pub use edge_tracer::EdgeTracer;
pub use error::PluginError;
pub use luma_key::LumaKey;
pub use params::{ParamInfo, ParamValues};
pub use plugin::{InputRange, Plugin, PluginInfo, PluginKind, ProcessFrame};
pub use region_map::RegionMapPlugin;
pub use registry::{create_plugin, find_entry, registry, PluginEntry};

/// Serialises tests that read or write process environment variables.
#[cfg(test)]
pub(crate) static TEST_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
