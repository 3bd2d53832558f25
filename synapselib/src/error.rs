use std::path::PathBuf;

/// Result type returned by every fallible network operation.
pub type NetworkResult<T> = Result<T, NetworkError>;

#[derive(Debug, thiserror::Error)]
/// Errors reported by the network, its registries and its persistence layer.
pub enum NetworkError {
    /// Vector length doesn't match the layer (or prediction) it's applied to.
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch {
        expected: usize,
        got: usize
    },

    /// Activation or loss function name which is not registered.
    #[error("unknown function kind: {kind}")]
    UnknownKind {
        kind: String
    },

    #[error("invalid network topology: {0}")]
    InvalidTopology(String),

    #[error("layer index {index} is out of range, network has {len} layers")]
    IndexOutOfRange {
        index: usize,
        len: usize
    },

    /// Operation is not allowed in the current training state.
    #[error("invalid training state: {0}")]
    StateViolation(&'static str),

    /// File couldn't be read or written.
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,

        #[source]
        source: std::io::Error
    },

    /// File was read but its content is not a valid document.
    #[error("malformed document: {0}")]
    Format(String)
}

impl NetworkError {
    #[inline]
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source
        }
    }
}
