//! Diagnostics anchored at merged source spans.
//!
//! Nothing in the tokenizer or the builder fails; problems surface as ILLEGAL
//! tokens and nodes typed [`BuiltInType::Invalid`]. This module turns those
//! into reportable diagnostics.

use std::fmt;

use super::nodes::{Expression, NodeId, NodeKind};
use super::types::BuiltInType;
use crate::base::SourceReference;
use crate::config::{DEFAULT_DENOTATION_LIMIT, OclOptions};
use crate::parser::{Token, TokenKind};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A diagnostic message with the source references it concerns.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<&'static str>,
    pub message: String,
    /// Sorted, pairwise separated; empty when the position is unknown
    pub refs: Vec<SourceReference>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, refs: Vec<SourceReference>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            refs,
        }
    }

    pub fn warning(message: impl Into<String>, refs: Vec<SourceReference>) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            refs,
        }
    }

    /// Error anchored at the span of an expression node.
    pub fn at_node(expression: &Expression, node: NodeId, message: impl Into<String>) -> Self {
        Self::error(message, expression.span_of(node).to_vec())
    }

    /// Error for an unrecognized character sequence, its payload cut at `limit`
    pub fn illegal_token(token: &Token, limit: usize) -> Self {
        Self::error(
            format!("unexpected {}", token.denotation_with_limit(limit)),
            vec![token.source_ref],
        )
        .with_code(codes::ILLEGAL_CHARACTER)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// First reference of the span, where the diagnostic is reported
    pub fn primary_ref(&self) -> Option<&SourceReference> {
        self.refs.first()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        if let Some(first) = self.primary_ref() {
            write!(f, " at {first}")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes.
pub mod codes {
    /// Unrecognized character sequence.
    pub const ILLEGAL_CHARACTER: &str = "E0001";
    /// Name that resolves to no property, operation or built-in.
    pub const UNRESOLVED_CALL: &str = "E0002";
    /// Operand types that fit no operator signature.
    pub const TYPE_MISMATCH: &str = "E0003";
    /// Enumeration value that names no model property.
    pub const UNKNOWN_LITERAL: &str = "E0004";
    /// Package name left over from an incomplete qualified name.
    pub const DANGLING_PACKAGE: &str = "W0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics for one constraint.
#[derive(Clone, Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    denotation_limit: usize,
}

impl Default for DiagnosticCollector {
    fn default() -> Self {
        Self {
            diagnostics: Vec::new(),
            denotation_limit: DEFAULT_DENOTATION_LIMIT,
        }
    }
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector whose messages follow the denotation limit of `options`
    pub fn with_options(options: &OclOptions) -> Self {
        Self {
            diagnostics: Vec::new(),
            denotation_limit: options.denotation_limit,
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report every ILLEGAL token of a stream.
    pub fn lexical(&mut self, tokens: &[Token]) {
        for token in tokens.iter().filter(|t| t.is(TokenKind::ILLEGAL)) {
            self.add(Diagnostic::illegal_token(token, self.denotation_limit));
        }
    }

    /// Report unresolved calls, unknown literals and leftover package
    /// literals of a tree.
    ///
    /// Only the innermost invalid call is reported; calls whose receiver or
    /// arguments are already invalid inherit the type without a new message.
    pub fn expression(&mut self, expression: &Expression) {
        for (id, node) in expression.arena.nodes() {
            match &node.kind {
                NodeKind::Literal(_) if node.data_type.is(BuiltInType::Invalid) => {
                    self.add(
                        Diagnostic::at_node(expression, id, "value does not resolve to the model")
                            .with_code(codes::UNKNOWN_LITERAL),
                    );
                }
                NodeKind::Literal(literal) if node.data_type.is(BuiltInType::Package) => {
                    self.add(
                        Diagnostic::warning(
                            format!("'{literal}' is a package, not a value"),
                            expression.span_of(id).to_vec(),
                        )
                        .with_code(codes::DANGLING_PACKAGE),
                    );
                }
                NodeKind::AttributeCall(_) | NodeKind::OperationCall(_) => {
                    let Some(call) = node.kind.as_call() else {
                        continue;
                    };
                    if call.selector.is_valid() {
                        continue;
                    }
                    let receiver = expression.node(call.receiver);
                    let arguments_valid = match &node.kind {
                        NodeKind::OperationCall(exp) => exp
                            .arguments
                            .iter()
                            .all(|&a| !expression.node(a).data_type.is(BuiltInType::Invalid)),
                        _ => true,
                    };
                    if receiver.data_type.is(BuiltInType::Invalid) || !arguments_valid {
                        continue;
                    }
                    let is_operator = TokenKind::from_lexeme(&call.selector.name).is_some();
                    let (message, code) = if is_operator {
                        (
                            format!(
                                "operator '{}' does not apply to {}",
                                call.selector.name, receiver.data_type
                            ),
                            codes::TYPE_MISMATCH,
                        )
                    } else {
                        (
                            format!(
                                "'{}' is not defined for {}",
                                call.selector.name, receiver.data_type
                            ),
                            codes::UNRESOLVED_CALL,
                        )
                    };
                    self.add(Diagnostic::at_node(expression, id, message).with_code(code));
                }
                _ => {}
            }
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}
