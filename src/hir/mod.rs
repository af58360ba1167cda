//! High-level IR (HIR) - the typed OCL expression tree.
//!
//! This module types and assembles constraint expressions against a host
//! model. A grammar (not part of this crate) drives an [`ExpressionBuilder`]
//! bottom-up; every node gets its [`DataType`] once, at construction.
//!
//! ## Key Types
//!
//! - [`BuiltInType`] / [`DataType`] : Value types, primitives unified with model classes
//! - [`PropertySelector`] / [`MultiplicityMapping`] : What a call resolves to
//! - [`BuiltInDescr`] : Static registry of built-in operations and operators
//! - [`Expression`] / [`OclNode`] : The arena-backed tree
//! - [`Diagnostic`] : Problems anchored at merged source spans
//!
//! ## Construction
//!
//! ```text
//! Tokens (parser)
//!     │
//!     ▼
//! ExpressionBuilder         ← leaves, then composite nodes
//!     │   consults DataType, BuiltInDescr, ModelView
//!     ▼
//! Expression                ← immutable tree + declarations
//!     │
//!     ▼
//! DiagnosticCollector       ← ILLEGAL tokens, invalid calls
//! ```

mod builder;
mod builtins;
mod diagnostics;
mod nodes;
mod selector;
mod types;

pub use builder::ExpressionBuilder;
pub use builtins::{BuiltInDescr, OPERATIONS, OPERATORS, ResultAdjustment};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use nodes::{
    AttributeCallExp, ConditionKind, DateTimeValue, DeclId, Declaration, EnumLiteral, Expression,
    IfExp, IterationCallExp, LetExp, LiteralExp, NodeId, NodeKind, OclArena, OclNode,
    OperationCallExp, PropertyCall,
};
pub use selector::{MultiplicityMapping, PropertySelector, SelectorCategory, SelectorTarget};
pub use types::{BuiltInType, DataType};
