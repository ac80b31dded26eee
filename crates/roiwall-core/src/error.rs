use std::fmt;
use std::path::PathBuf;

/// Engine-level errors used across roiwall crates.
///
/// Contract rule: this type lives in `roiwall-core` and is re-exported by the
/// compositor and the glow runtime.
#[derive(Debug)]
pub enum EngineError {
    // ---- Configuration ----
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    InvalidConfig {
        path: PathBuf,
        msg: String,
    },

    // ---- Geometry / inputs ----
    InvalidRect(String),

    /// Source image with a zero dimension (or storage smaller than the image).
    InvalidImage {
        width: u32,
        height: u32,
    },

    // ---- Runtime-facing (backend) ----
    /// A texture, framebuffer or buffer object could not be created.
    AllocationFailure(String),
    VertexCompile(String),
    FragmentCompile(String),
    Link(String),

    // ---- Fallback ----
    Other(String),
}

impl EngineError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        EngineError::Other(s.into())
    }

    pub fn allocation<T: Into<String>>(s: T) -> Self {
        EngineError::AllocationFailure(s.into())
    }

    /// True for per-frame conditions the compositor reports and skips; the rest are setup failures.
    pub fn is_frame_skip(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidImage { .. }
                | EngineError::AllocationFailure(_)
                | EngineError::InvalidRect(_)
        )
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io { path, source } => {
                write!(f, "io error at {}: {}", path.display(), source)
            }
            EngineError::Json { path, source } => {
                write!(f, "json parse error at {}: {}", path.display(), source)
            }
            EngineError::InvalidConfig { path, msg } => {
                write!(f, "invalid config at {}: {}", path.display(), msg)
            }

            EngineError::InvalidRect(msg) => write!(f, "invalid rect: {msg}"),
            EngineError::InvalidImage { width, height } => {
                write!(f, "invalid source image ({width}x{height})")
            }

            EngineError::AllocationFailure(msg) => {
                write!(f, "backend object creation failed: {msg}")
            }
            EngineError::VertexCompile(msg) => write!(f, "vertex shader compile error: {msg}"),
            EngineError::FragmentCompile(msg) => write!(f, "fragment shader compile error: {msg}"),
            EngineError::Link(msg) => write!(f, "program link error: {msg}"),

            EngineError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
