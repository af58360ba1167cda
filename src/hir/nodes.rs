//! The typed OCL expression tree.
//!
//! Nodes live in an [`OclArena`] and refer to each other through [`NodeId`]
//! handles; declarations live in the same arena under [`DeclId`]. A `let` or
//! iterator call owns its declarations while each declaration points back at
//! its owner, so both directions are plain handles.
//!
//! Every node carries its [`DataType`], assigned once when the node is built,
//! and the merged [`SourceReference`]s of the text it came from.

use std::fmt;

use smol_str::SmolStr;

use super::builtins::BuiltInDescr;
use super::selector::{MultiplicityMapping, PropertySelector};
use super::types::{BuiltInType, DataType};
use crate::base::{SourceReference, arena_id};
use crate::model::{ClassId, PropertyId};

arena_id!(
    /// Handle of a node in an [`OclArena`]
    NodeId
);
arena_id!(
    /// Handle of a declaration in an [`OclArena`]
    DeclId
);

/// Value of a date-time literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateTimeValue {
    /// The evaluation time
    Current,
    /// A literal date or date-time, as written
    Explicit(SmolStr),
}

/// An enumeration or code list value.
///
/// Values declared in the model point at the property that represents them.
/// Values of code lists are often not modeled; they carry just their name and
/// the enumeration class they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumLiteral {
    pub name: SmolStr,
    pub property: Option<PropertyId>,
    pub enumeration: ClassId,
    pub enumeration_name: SmolStr,
}

impl EnumLiteral {
    /// Whether this value was declared in the model
    pub fn is_modeled(&self) -> bool {
        self.property.is_some()
    }

    /// Same value of the same enumeration, whether modeled or not
    pub fn same_literal(&self, other: &EnumLiteral) -> bool {
        self.enumeration == other.enumeration && self.name == other.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralExp {
    Real(f64),
    Integer(i64),
    String(SmolStr),
    Boolean(bool),
    DateTime(DateTimeValue),
    /// `null`
    OclVoid,
    /// A model class used as a value
    Class { class: ClassId, name: SmolStr },
    Enumeration(EnumLiteral),
    /// Intermediate step of a qualified name; never part of a finished tree
    Package(SmolStr),
}

impl fmt::Display for LiteralExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(value) => write!(f, "{value:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "'{value}'"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::DateTime(DateTimeValue::Current) => f.write_str("now"),
            Self::DateTime(DateTimeValue::Explicit(text)) => write!(f, "#{text}#"),
            Self::OclVoid => f.write_str("null"),
            Self::Class { name, .. } => f.write_str(name),
            Self::Enumeration(literal) => {
                write!(f, "{}::{}", literal.enumeration_name, literal.name)
            }
            Self::Package(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfExp {
    pub condition: NodeId,
    pub then_branch: NodeId,
    pub else_branch: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetExp {
    pub declarations: Vec<DeclId>,
    pub body: NodeId,
}

/// Parts shared by all call nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCall {
    pub receiver: NodeId,
    pub selector: PropertySelector,
    pub mapping: MultiplicityMapping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCallExp {
    pub call: PropertyCall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCallExp {
    pub call: PropertyCall,
    pub arguments: Vec<NodeId>,
    /// Descriptor of a built-in operation or operator
    pub builtin: Option<&'static BuiltInDescr>,
}

/// A built-in call binding iterator variables; its single argument is the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationCallExp {
    pub operation: OperationCallExp,
    pub iterators: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Variable(DeclId),
    Literal(LiteralExp),
    If(IfExp),
    Let(LetExp),
    AttributeCall(AttributeCallExp),
    OperationCall(OperationCallExp),
    IterationCall(IterationCallExp),
}

impl NodeKind {
    /// Call parts of attribute, operation and iteration calls
    pub fn as_call(&self) -> Option<&PropertyCall> {
        match self {
            Self::AttributeCall(exp) => Some(&exp.call),
            Self::OperationCall(exp) => Some(&exp.call),
            Self::IterationCall(exp) => Some(&exp.operation.call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OclNode {
    pub data_type: DataType,
    /// Sorted, pairwise separated
    pub source_refs: Vec<SourceReference>,
    pub kind: NodeKind,
}

/// A variable binding introduced by `self`, the environment, `let` or an
/// iterator
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: SmolStr,
    pub data_type: DataType,
    pub initializer: Option<NodeId>,
    /// Next declaration outward in scope
    pub outer: Option<DeclId>,
    /// The `let` or iteration node owning this declaration
    pub owner: Option<NodeId>,
    /// Synthesized, not written in the text
    pub implicit: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OclArena {
    nodes: Vec<OclNode>,
    declarations: Vec<Declaration>,
}

impl OclArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc_node(&mut self, node: OclNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn alloc_declaration(&mut self, declaration: Declaration) -> DeclId {
        let id = DeclId::new(self.declarations.len());
        self.declarations.push(declaration);
        id
    }

    pub fn node(&self, id: NodeId) -> &OclNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut OclNode {
        &mut self.nodes[id.index()]
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.index()]
    }

    pub(crate) fn declaration_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.declarations[id.index()]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &OclNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i), node))
    }

    pub fn declarations(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId::new(i), decl))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether a node conceptually yields a collection
    pub fn is_multiple(&self, id: NodeId) -> bool {
        match &self.node(id).kind {
            NodeKind::Variable(decl) => self
                .declaration(*decl)
                .initializer
                .is_some_and(|init| self.is_multiple(init)),
            NodeKind::Literal(_) => false,
            NodeKind::If(exp) => {
                self.is_multiple(exp.then_branch) || self.is_multiple(exp.else_branch)
            }
            NodeKind::Let(exp) => self.is_multiple(exp.body),
            NodeKind::AttributeCall(AttributeCallExp { call })
            | NodeKind::OperationCall(OperationCallExp { call, .. })
            | NodeKind::IterationCall(IterationCallExp {
                operation: OperationCallExp { call, .. },
                ..
            }) => call.mapping.yields_many(self.is_multiple(call.receiver)),
        }
    }

    pub fn is_built_in_type(&self, id: NodeId) -> bool {
        self.node(id).data_type.is_built_in()
    }

    fn write_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node(id).kind {
            NodeKind::Variable(decl) => f.write_str(&self.declaration(*decl).name),
            NodeKind::Literal(literal) => write!(f, "{literal}"),
            NodeKind::If(exp) => {
                f.write_str("if ")?;
                self.write_node(exp.condition, f)?;
                f.write_str(" then ")?;
                self.write_node(exp.then_branch, f)?;
                f.write_str(" else ")?;
                self.write_node(exp.else_branch, f)?;
                f.write_str(" endif")
            }
            NodeKind::Let(exp) => {
                f.write_str("let ")?;
                for (i, decl) in exp.declarations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let decl = self.declaration(*decl);
                    write!(f, "{} : {}", decl.name, decl.data_type)?;
                    if let Some(init) = decl.initializer {
                        f.write_str(" = ")?;
                        self.write_node(init, f)?;
                    }
                }
                f.write_str(" in ")?;
                self.write_node(exp.body, f)
            }
            NodeKind::AttributeCall(exp) => {
                self.write_node(exp.call.receiver, f)?;
                write!(f, ".{}", exp.call.selector)
            }
            NodeKind::OperationCall(exp) => self.write_operation(exp, &[], f),
            NodeKind::IterationCall(exp) => self.write_operation(&exp.operation, &exp.iterators, f),
        }
    }

    fn write_operation(
        &self,
        exp: &OperationCallExp,
        iterators: &[DeclId],
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if let Some(descr) = exp.builtin.filter(|d| d.symbolic) {
            f.write_str("(")?;
            if descr.is_binary_operator() {
                self.write_node(exp.call.receiver, f)?;
                write!(f, " {} ", descr.name)?;
                self.write_node(exp.arguments[0], f)?;
            } else if descr.name == "not" {
                f.write_str("not ")?;
                self.write_node(exp.call.receiver, f)?;
            } else {
                f.write_str(descr.name)?;
                self.write_node(exp.call.receiver, f)?;
            }
            return f.write_str(")");
        }

        self.write_node(exp.call.receiver, f)?;
        let sep = if exp.call.selector.uses_arrow() { "->" } else { "." };
        write!(f, "{sep}{}(", exp.call.selector)?;
        if !iterators.is_empty() {
            for (i, decl) in iterators.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&self.declaration(*decl).name)?;
            }
            f.write_str(" | ")?;
        }
        for (i, arg) in exp.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.write_node(*arg, f)?;
        }
        f.write_str(")")
    }
}

/// Kind of constraint an expression states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Invariant,
    Derive,
    Init,
}

impl ConditionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Invariant => "inv",
            Self::Derive => "derive",
            Self::Init => "init",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A finished constraint expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub name: SmolStr,
    pub condition: ConditionKind,
    pub root: NodeId,
    pub self_decl: DeclId,
    pub environment: Vec<DeclId>,
    pub arena: OclArena,
}

impl Expression {
    pub fn node(&self, id: NodeId) -> &OclNode {
        self.arena.node(id)
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        self.arena.declaration(id)
    }

    pub fn root_node(&self) -> &OclNode {
        self.arena.node(self.root)
    }

    pub fn data_type(&self) -> &DataType {
        &self.root_node().data_type
    }

    pub fn is_multiple(&self) -> bool {
        self.arena.is_multiple(self.root)
    }

    pub fn is_built_in_type(&self) -> bool {
        self.arena.is_built_in_type(self.root)
    }

    /// Find the nearest declaration named `name`, walking outward from `from`.
    pub fn lookup(&self, name: &str, from: DeclId) -> Option<DeclId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let decl = self.arena.declaration(id);
            if decl.name == name {
                return Some(id);
            }
            current = decl.outer;
        }
        None
    }

    /// Source references covered by a node and everything below it
    pub fn span_of(&self, id: NodeId) -> &[SourceReference] {
        &self.arena.node(id).source_refs
    }

    /// Whether any node still has an invalid type
    pub fn has_invalid_nodes(&self) -> bool {
        self.arena
            .nodes()
            .any(|(_, node)| node.data_type.is(BuiltInType::Invalid))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: ", self.condition, self.name)?;
        self.arena.write_node(self.root, f)
    }
}
