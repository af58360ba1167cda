//! Host model seam.
//!
//! Constraints are attached to classes of a structural model and navigate its
//! properties and operations. The expression layer only consumes a handful of
//! capabilities from that model, captured by [`ModelView`]:
//!
//! - look up a class by handle or by name
//! - walk a class's single-parent ancestor chain
//! - resolve a property's declared value type and multiplicity
//! - resolve an operation's parameter list and its `return` parameter
//!
//! [`ModelIndex`] is an in-memory implementation for hosts that do not bring
//! their own model store.

mod error;
mod index;
mod view;

pub use error::{ModelError, ModelResult};
pub use index::ModelIndex;
pub use view::{
    Ancestors, ClassCategory, ClassId, ClassInfo, MAX_ANCESTOR_DEPTH, ModelView, Multiplicity,
    OperationId, OperationInfo, ParameterInfo, PropertyId, PropertyInfo, RETURN_PARAMETER,
    ValueType,
};
