//! Options shared by the tokenizer and the expression builder

use smol_str::SmolStr;

use crate::hir::BuiltInType;

/// Default payload length shown by [`Token::denotation`](crate::parser::Token::denotation)
pub const DEFAULT_DENOTATION_LIMIT: usize = 15;

/// Options for tokenizing constraint text and typing its nodes
#[derive(Debug, Clone)]
pub struct OclOptions {
    /// Maximum number of payload characters in a token denotation
    pub denotation_limit: usize,
    /// Emit COMMENT tokens (false = drop comments from the stream)
    pub emit_comments: bool,
    /// Extra model class names mapped to built-in types, consulted after the
    /// fixed primitive wrapper table
    pub primitive_types: Vec<(SmolStr, BuiltInType)>,
}

impl Default for OclOptions {
    fn default() -> Self {
        Self {
            denotation_limit: DEFAULT_DENOTATION_LIMIT,
            emit_comments: true,
            primitive_types: Vec::new(),
        }
    }
}

impl OclOptions {
    /// Register an additional primitive wrapper class name
    pub fn with_primitive_type(mut self, name: impl Into<SmolStr>, ty: BuiltInType) -> Self {
        self.primitive_types.push((name.into(), ty));
        self
    }

    /// Look up a class name among the extra primitive wrappers
    pub fn primitive_type(&self, name: &str) -> Option<BuiltInType> {
        self.primitive_types
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, ty)| ty)
    }
}
