//! Error types for source reference operations.

use thiserror::Error;

use super::source_ref::{RelativePosition, SourceReference};

/// Errors raised by the checked source reference operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// The two references neither overlap nor touch.
    #[error("cannot merge {other} into {target}: ranges are {position:?}")]
    NotMergeable {
        target: SourceReference,
        other: SourceReference,
        position: RelativePosition,
    },
}
