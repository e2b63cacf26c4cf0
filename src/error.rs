//! Error types for sketch construction, layering, and context switching.

use thiserror::Error;

use crate::runtime::SketchId;

/// Errors surfaced by runtime and sketch operations.
///
/// Hook failures are deliberately absent from this enum: a failing frame or
/// event hook is caught at the tick boundary, logged, and never propagated,
/// so the drive loop keeps scheduling frames for every other sketch.
#[derive(Debug, Error)]
pub enum Error {
    /// A named host container was requested but does not exist.
    #[error("container '{0}' does not exist")]
    UnknownContainer(String),

    /// A layer index was outside the sketch's layer list.
    #[error("layer index {index} out of range ({count} layers)")]
    LayerOutOfRange {
        /// The requested index.
        index: usize,
        /// How many layers the sketch has.
        count: usize,
    },

    /// An operation needed an active sketch but none was active or supplied.
    #[error("no sketch is active and none was supplied")]
    NoActiveSketch,

    /// A sketch was activated while another one was still active.
    ///
    /// Nested activation would corrupt the shared facade state, so it is
    /// always reported, never ignored.
    #[error("sketch '{0}' is already active")]
    SketchAlreadyActive(String),

    /// A sketch id did not resolve to a known sketch.
    #[error("unknown sketch id {0:?}")]
    UnknownSketch(SketchId),

    /// The backend could not produce an image for the given source.
    #[error("backend cannot load image '{0}'")]
    ImageUnsupported(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
