//! Error and warning types for the export pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::track::TrackKind;

/// Fatal export failures. Any of these aborts the export; no partial model is returned.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExportError {
    /// A name-based cross-reference matched nothing.
    #[error("the {kind} '{name}' referenced by '{referenced_by}' does not exist")]
    ReferencedEntityNotFound {
        kind: &'static str,
        name: String,
        referenced_by: String,
    },

    /// A name-based cross-reference matched more than one candidate.
    #[error(
        "the {kind} '{name}' referenced by '{referenced_by}' is ambiguous: {matches} {kind}s share that name"
    )]
    AmbiguousReference {
        kind: &'static str,
        name: String,
        referenced_by: String,
        matches: usize,
    },

    /// A track kind without a typed container in the transformation collection.
    #[error("can't register {kind:?} animation data in transformation collection '{collection}'")]
    UnsupportedTrackKind { kind: TrackKind, collection: String },

    #[error("invalid scene frame rate: {fps}")]
    InvalidFrameRate { fps: u32 },

    /// The serialization collaborator rejected the finished model.
    #[error("model sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Conditions worth reporting that do not stop the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportWarning {
    /// The scene does not run at the recommended frame rate.
    FrameRate { expected: u32, actual: u32 },
    /// A clip names an action that no longer exists.
    MissingAction { action: String, clip: String },
}

impl std::fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportWarning::FrameRate { expected, actual } => write!(
                f,
                "it's recommended to export models with a frame rate of {expected} (current is {actual})"
            ),
            ExportWarning::MissingAction { action, clip } => write!(
                f,
                "the action '{action}' was referenced by clip '{clip}' but no longer exists"
            ),
        }
    }
}
