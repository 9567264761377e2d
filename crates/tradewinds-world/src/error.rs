//! Error types for the tradewinds-world crate.

/// Errors that can occur during star map construction and queries.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A location with the same name already exists in the map.
    #[error("duplicate location: {0}")]
    DuplicateLocation(String),

    /// The named location does not exist in the map.
    #[error("unknown location: {0}")]
    UnknownLocation(String),
}
