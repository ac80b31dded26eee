use roiwall_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unknown parameter index {index} (plugin has {count})")]
    UnknownParam { index: usize, count: usize },

    #[error("no plugin registered with id {0:?}")]
    UnknownPlugin(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
