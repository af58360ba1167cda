//! Error types for model registration.

use smol_str::SmolStr;
use thiserror::Error;

use super::view::{ClassId, PropertyId};

/// Errors that can occur while registering model elements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A class with this name is already registered.
    #[error("Duplicate class: {0}")]
    DuplicateClass(SmolStr),

    /// Reference to a class handle that was never issued.
    #[error("Unknown class: #{}", .0.index())]
    UnknownClass(ClassId),

    /// Reference to a property handle that was never issued.
    #[error("Unknown property: #{}", .0.index())]
    UnknownProperty(PropertyId),

    /// Setting the base class would close a generalization cycle.
    #[error("Cyclic generalization through {0}")]
    CyclicGeneralization(SmolStr),
}

pub type ModelResult<T> = Result<T, ModelError>;
