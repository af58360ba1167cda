//! # ocl-base
//!
//! Core library for typing OCL constraint expressions against a structural
//! model: tokenizer, source spans, value types and the typed expression tree.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir       → DataType, built-in registry, OclNode tree, diagnostics
//!   ↓
//! model     → ModelView capability, in-memory ModelIndex
//!   ↓
//! parser    → Logos tokenizer, TokenKind lexeme tables
//!   ↓
//! base      → Primitives (SourceReference, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → model → hir)
// ============================================================================

/// Foundation types: SourceReference and its merge algebra
pub mod base;

/// Tokenizer options and extra primitive type names
pub mod config;

/// Parser front end: Logos tokenizer, token kinds
pub mod parser;

/// Host model capability and an in-memory implementation
pub mod model;

/// High-level IR: typed OCL expression tree
pub mod hir;

// Re-export commonly needed items
pub use base::{RelativePosition, SourceReference, SpanError};
pub use config::OclOptions;
pub use hir::{BuiltInType, DataType, Diagnostic, Expression, ExpressionBuilder};
pub use model::{ModelIndex, ModelView};
pub use parser::{Token, TokenKind, tokenize};
