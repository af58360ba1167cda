//! Foundation types for the OCL toolchain.
//!
//! This module provides the position primitives used throughout the crate:
//! - [`SourceReference`] - Line, column range and token range of a construct
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`RelativePosition`] - How two references relate on the same line
//! - [`SpanError`] - Failure of a checked merge
//!
//! This module has NO dependencies on other ocl modules.

mod error;
mod ids;
mod line_index;
mod source_ref;

pub(crate) use ids::arena_id;
pub use error::SpanError;
pub use line_index::LineIndex;
pub use source_ref::{RelativePosition, SourceReference};
