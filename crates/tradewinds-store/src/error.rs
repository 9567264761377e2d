//! Error types for the tradewinds-store crate.

/// Errors that can occur while saving or loading records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("save store I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("save record serialization failed: {source}")]
    Serialize {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A stored record could not be parsed.
    #[error("save record is corrupt: {source}")]
    Corrupt {
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
