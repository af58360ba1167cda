//! Bottom-up construction of [`Expression`] trees.
//!
//! A grammar drives an [`ExpressionBuilder`] while it walks the token stream:
//! leaves first, then the nodes combining them. Each constructor computes the
//! new node's [`DataType`] from its already-built constituents and folds the
//! constituents' source spans into the new node.
//!
//! Resolution never fails. Names that do not resolve produce call nodes with
//! an invalid selector typed [`BuiltInType::Invalid`], and type names without
//! a model class become name-only placeholders.

use smol_str::SmolStr;

use super::builtins::BuiltInDescr;
use super::nodes::{
    AttributeCallExp, ConditionKind, DateTimeValue, DeclId, Declaration, EnumLiteral, Expression,
    IfExp, IterationCallExp, LetExp, LiteralExp, NodeId, NodeKind, OclArena, OclNode,
    OperationCallExp, PropertyCall,
};
use super::selector::{MultiplicityMapping, PropertySelector, SelectorCategory};
use super::types::{BuiltInType, DataType};
use crate::base::SourceReference;
use crate::config::OclOptions;
use crate::model::{ClassId, ModelView, OperationId, PropertyId};
use crate::parser::{NumberValue, Token, TokenKind, TokenValue};

/// Node spans are merged by token index so whitespace between tokens does not
/// split them.
const MERGE_BY_TOKEN: bool = true;

pub struct ExpressionBuilder<'m, M: ModelView + ?Sized> {
    model: &'m M,
    options: OclOptions,
    name: SmolStr,
    condition: ConditionKind,
    arena: OclArena,
    self_decl: DeclId,
    environment: Vec<DeclId>,
    /// Innermost visible declaration
    scope: DeclId,
    implicit_count: usize,
}

impl<'m, M: ModelView + ?Sized> ExpressionBuilder<'m, M> {
    /// Start an expression whose `self` is an instance of `context`.
    pub fn new(
        model: &'m M,
        name: impl Into<SmolStr>,
        condition: ConditionKind,
        context: ClassId,
    ) -> Self {
        Self::with_options(model, name, condition, context, OclOptions::default())
    }

    pub fn with_options(
        model: &'m M,
        name: impl Into<SmolStr>,
        condition: ConditionKind,
        context: ClassId,
        options: OclOptions,
    ) -> Self {
        let mut arena = OclArena::new();
        let self_decl = arena.alloc_declaration(Declaration {
            name: "self".into(),
            data_type: DataType::from_class_with(model, context, &options),
            initializer: None,
            outer: None,
            owner: None,
            implicit: true,
        });
        Self {
            model,
            options,
            name: name.into(),
            condition,
            arena,
            self_decl,
            environment: Vec::new(),
            scope: self_decl,
            implicit_count: 0,
        }
    }

    pub fn model(&self) -> &'m M {
        self.model
    }

    pub fn options(&self) -> &OclOptions {
        &self.options
    }

    pub fn node(&self, id: NodeId) -> &OclNode {
        self.arena.node(id)
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        self.arena.declaration(id)
    }

    pub fn type_of(&self, id: NodeId) -> &DataType {
        &self.arena.node(id).data_type
    }

    pub fn is_multiple(&self, id: NodeId) -> bool {
        self.arena.is_multiple(id)
    }

    pub fn self_declaration(&self) -> DeclId {
        self.self_decl
    }

    /// Innermost declaration currently in scope
    pub fn scope(&self) -> DeclId {
        self.scope
    }

    /// Nearest visible declaration named `name`
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        let mut current = Some(self.scope);
        while let Some(id) = current {
            let decl = self.arena.declaration(id);
            if decl.name == name {
                return Some(id);
            }
            current = decl.outer;
        }
        None
    }

    /// Least common supertype of two nodes' types
    pub fn common_type(&self, a: NodeId, b: NodeId) -> Option<DataType> {
        self.type_of(a).common_super_type(self.type_of(b), self.model)
    }

    /// Type named by a model type name: its class if registered, else a
    /// name-only placeholder
    pub fn type_named(&self, name: &str) -> DataType {
        self.value_type(name, self.model.class_by_name(name))
    }

    fn value_type(&self, name: &str, class: Option<ClassId>) -> DataType {
        match class {
            Some(class) => DataType::from_class_with(self.model, class, &self.options),
            None => DataType::from_name_with(name, &self.options),
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Declare a variable supplied by the caller's environment; visible to
    /// everything built afterwards
    pub fn add_environment(&mut self, name: impl Into<SmolStr>, data_type: DataType) -> DeclId {
        let id = self.push_declaration(name.into(), data_type, None, true);
        self.environment.push(id);
        id
    }

    /// Open a named declaration; it stays in scope until the `let` or
    /// iteration node owning it is built
    pub fn declare(
        &mut self,
        name: impl Into<SmolStr>,
        data_type: DataType,
        initializer: Option<NodeId>,
    ) -> DeclId {
        self.push_declaration(name.into(), data_type, initializer, false)
    }

    /// Open a declaration with a synthesized name
    pub fn declare_implicit(&mut self, data_type: DataType) -> DeclId {
        let name = SmolStr::from(format!("_it{}", self.implicit_count));
        self.implicit_count += 1;
        self.push_declaration(name, data_type, None, true)
    }

    /// Open the iterator variable of an iteration over `receiver`, implicit
    /// when no name is written
    pub fn declare_iterator(&mut self, receiver: NodeId, name: Option<&str>) -> DeclId {
        let data_type = self.type_of(receiver).clone();
        match name {
            Some(name) => self.declare(name, data_type, None),
            None => self.declare_implicit(data_type),
        }
    }

    fn push_declaration(
        &mut self,
        name: SmolStr,
        data_type: DataType,
        initializer: Option<NodeId>,
        implicit: bool,
    ) -> DeclId {
        let id = self.arena.alloc_declaration(Declaration {
            name,
            data_type,
            initializer,
            outer: Some(self.scope),
            owner: None,
            implicit,
        });
        self.scope = id;
        id
    }

    /// Attach declarations to their owning node and drop them from scope
    fn close_scope(&mut self, declarations: &[DeclId], owner: NodeId) {
        for &decl in declarations {
            self.arena.declaration_mut(decl).owner = Some(owner);
        }
        if let Some(outer) = declarations
            .first()
            .and_then(|&first| self.arena.declaration(first).outer)
        {
            self.scope = outer;
        }
    }

    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    fn push(&mut self, data_type: DataType, kind: NodeKind, children: &[NodeId]) -> NodeId {
        let mut source_refs = Vec::new();
        for &child in children {
            SourceReference::merge_all(
                &mut source_refs,
                &self.arena.node(child).source_refs,
                MERGE_BY_TOKEN,
            );
        }
        self.arena.alloc_node(OclNode {
            data_type,
            source_refs,
            kind,
        })
    }

    fn literal(&mut self, data_type: DataType, literal: LiteralExp) -> NodeId {
        self.push(data_type, NodeKind::Literal(literal), &[])
    }

    pub fn variable(&mut self, decl: DeclId) -> NodeId {
        let data_type = self.arena.declaration(decl).data_type.clone();
        self.push(data_type, NodeKind::Variable(decl), &[])
    }

    pub fn self_variable(&mut self) -> NodeId {
        self.variable(self.self_decl)
    }

    pub fn real_literal(&mut self, value: f64) -> NodeId {
        self.literal(DataType::built_in(BuiltInType::Real), LiteralExp::Real(value))
    }

    pub fn integer_literal(&mut self, value: i64) -> NodeId {
        self.literal(DataType::built_in(BuiltInType::Integer), LiteralExp::Integer(value))
    }

    /// INTEGER literal for integral numbers that fit, REAL otherwise
    pub fn number_literal(&mut self, number: &NumberValue) -> NodeId {
        match number.literal.parse::<i64>() {
            Ok(value) if number.is_integer => self.integer_literal(value),
            _ => self.real_literal(number.value),
        }
    }

    pub fn string_literal(&mut self, value: impl Into<SmolStr>) -> NodeId {
        self.literal(
            DataType::built_in(BuiltInType::String),
            LiteralExp::String(value.into()),
        )
    }

    pub fn boolean_literal(&mut self, value: bool) -> NodeId {
        self.literal(DataType::built_in(BuiltInType::Boolean), LiteralExp::Boolean(value))
    }

    pub fn date_time_literal(&mut self, value: DateTimeValue) -> NodeId {
        self.literal(DataType::built_in(BuiltInType::Date), LiteralExp::DateTime(value))
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.literal(DataType::built_in(BuiltInType::OclVoid), LiteralExp::OclVoid)
    }

    /// A model class used as a value
    pub fn class_literal(&mut self, class: ClassId) -> NodeId {
        let data_type = DataType::class_value(self.model, class);
        let name = SmolStr::from(data_type.name());
        self.literal(data_type, LiteralExp::Class { class, name })
    }

    /// A value declared in the model as a property of its enumeration
    pub fn enum_literal(&mut self, property: PropertyId) -> NodeId {
        let model = self.model;
        let Some(info) = model.property(property) else {
            tracing::trace!("unknown enumeration value #{}", property.index());
            return self.literal(DataType::built_in(BuiltInType::Invalid), LiteralExp::OclVoid);
        };
        let literal = EnumLiteral {
            name: info.name.clone(),
            property: Some(property),
            enumeration: info.owner,
            enumeration_name: model.class_name(info.owner).unwrap_or_default().into(),
        };
        let data_type = DataType::from_class_with(model, info.owner, &self.options);
        self.literal(data_type, LiteralExp::Enumeration(literal))
    }

    /// A value of `enumeration` that the model does not declare
    pub fn bare_enum_literal(&mut self, enumeration: ClassId, name: impl Into<SmolStr>) -> NodeId {
        let model = self.model;
        let literal = EnumLiteral {
            name: name.into(),
            property: None,
            enumeration,
            enumeration_name: model.class_name(enumeration).unwrap_or_default().into(),
        };
        let data_type = DataType::from_class_with(model, enumeration, &self.options);
        self.literal(data_type, LiteralExp::Enumeration(literal))
    }

    pub fn package_literal(&mut self, name: impl Into<SmolStr>) -> NodeId {
        let name = name.into();
        self.literal(DataType::package(name.clone()), LiteralExp::Package(name))
    }

    /// Literal for a NUMBER or TEXT token, spanning that token
    pub fn literal_from_token(&mut self, token: &Token) -> Option<NodeId> {
        let node = match token.value.as_ref()? {
            TokenValue::Number(number) => self.number_literal(number),
            TokenValue::Text(text) => self.string_literal(text.clone()),
            _ => return None,
        };
        self.add_token(node, token);
        Some(node)
    }

    // ------------------------------------------------------------------
    // Composite nodes
    // ------------------------------------------------------------------

    /// Conditional with a result type computed by the caller, normally
    /// [`common_type`](Self::common_type) of the branches
    pub fn if_exp(
        &mut self,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
        data_type: DataType,
    ) -> NodeId {
        self.push(
            data_type,
            NodeKind::If(IfExp {
                condition,
                then_branch,
                else_branch,
            }),
            &[condition, then_branch, else_branch],
        )
    }

    /// Close the given `let` declarations over `body`
    pub fn let_exp(&mut self, declarations: Vec<DeclId>, body: NodeId) -> NodeId {
        let data_type = self.type_of(body).clone();
        let children: Vec<NodeId> = declarations
            .iter()
            .filter_map(|&d| self.arena.declaration(d).initializer)
            .chain(std::iter::once(body))
            .collect();
        let owned = declarations.clone();
        let node = self.push(
            data_type,
            NodeKind::Let(LetExp { declarations, body }),
            &children,
        );
        self.close_scope(&owned, node);
        node
    }

    /// Navigate a model attribute or association role
    pub fn attribute_call(&mut self, receiver: NodeId, property: PropertyId) -> NodeId {
        let model = self.model;
        let Some(info) = model.property(property) else {
            tracing::trace!("unknown property #{}", property.index());
            return self.invalid_attribute(receiver, "?");
        };

        let data_type = self
            .value_type(&info.value_type.name, info.value_type.class)
            .with_metadata_type(info.metadata_type);
        let mapping = if info.multiplicity.is_single() {
            MultiplicityMapping::OneToOne
        } else {
            MultiplicityMapping::OneToMany
        };
        let call = PropertyCall {
            receiver,
            selector: PropertySelector::property(info.name.clone(), property),
            mapping,
        };
        self.push(data_type, NodeKind::AttributeCall(AttributeCallExp { call }), &[receiver])
    }

    /// Navigate by name from the receiver's class
    pub fn attribute_call_by_name(&mut self, receiver: NodeId, name: &str) -> NodeId {
        let found = self
            .type_of(receiver)
            .class()
            .and_then(|class| self.model.find_property(class, name));
        match found {
            Some(property) => self.attribute_call(receiver, property),
            None => {
                tracing::trace!("no property {} on {}", name, self.type_of(receiver));
                self.invalid_attribute(receiver, name)
            }
        }
    }

    /// Call an operation declared in the model
    pub fn uml_operation_call(
        &mut self,
        receiver: NodeId,
        operation: OperationId,
        arguments: Vec<NodeId>,
    ) -> NodeId {
        let model = self.model;
        let Some(info) = model.operation(operation) else {
            tracing::trace!("unknown operation #{}", operation.index());
            return self.invalid_call(receiver, "?", arguments);
        };

        let data_type = match info.return_parameter() {
            Some(ret) => self.type_named(&ret.type_name),
            None => DataType::built_in(BuiltInType::Void),
        };
        let call = PropertyCall {
            receiver,
            selector: PropertySelector::operation(info.name.clone(), operation),
            mapping: MultiplicityMapping::OneToOne,
        };
        self.push_operation(data_type, call, arguments, None)
    }

    /// Call a resolved built-in operation or operator
    ///
    /// Iterator operations are built by [`Self::iteration_call`] only; passing
    /// one here yields an invalid call.
    pub fn builtin_call(
        &mut self,
        receiver: NodeId,
        descr: &'static BuiltInDescr,
        arguments: Vec<NodeId>,
    ) -> NodeId {
        if descr.is_iterator() {
            tracing::trace!("{} needs iterator variables", descr.name);
            return self.invalid_call(receiver, descr.name, arguments);
        }
        let receiver_type = self.type_of(receiver).clone();
        let argument_types: Vec<DataType> =
            arguments.iter().map(|&a| self.type_of(a).clone()).collect();
        let data_type = descr.result_type(&receiver_type, &argument_types, self.model);

        let category = if receiver_type.is(BuiltInType::Class) {
            SelectorCategory::ClassOperation
        } else if descr.arrow {
            SelectorCategory::SetOperation
        } else if receiver_type.is_built_in() {
            SelectorCategory::BaseOperation
        } else {
            SelectorCategory::SyntheticUmlOperation
        };
        let call = PropertyCall {
            receiver,
            selector: PropertySelector::new(category, descr.name),
            mapping: descr.mapping,
        };
        self.push_operation(data_type, call, arguments, Some(descr))
    }

    /// Close an iterator call over `iterators` with the given body
    pub fn iteration_call(
        &mut self,
        receiver: NodeId,
        descr: &'static BuiltInDescr,
        iterators: Vec<DeclId>,
        body: NodeId,
    ) -> NodeId {
        let receiver_type = self.type_of(receiver).clone();
        let body_type = self.type_of(body).clone();
        let data_type = descr.result_type(&receiver_type, &[body_type], self.model);
        let operation = OperationCallExp {
            call: PropertyCall {
                receiver,
                selector: PropertySelector::new(SelectorCategory::IteratorOperation, descr.name),
                mapping: descr.mapping,
            },
            arguments: vec![body],
            builtin: Some(descr),
        };
        let owned = iterators.clone();
        let node = self.push(
            data_type,
            NodeKind::IterationCall(IterationCallExp {
                operation,
                iterators,
            }),
            &[receiver, body],
        );
        self.close_scope(&owned, node);
        node
    }

    /// Apply an operator; unary operators take no arguments
    pub fn operator_call(
        &mut self,
        symbol: &str,
        receiver: NodeId,
        arguments: Vec<NodeId>,
    ) -> NodeId {
        let argument_types: Vec<DataType> =
            arguments.iter().map(|&a| self.type_of(a).clone()).collect();
        match BuiltInDescr::find_operator(symbol, self.type_of(receiver), &argument_types) {
            Some(descr) => self.builtin_call(receiver, descr, arguments),
            None => self.invalid_call(receiver, symbol, arguments),
        }
    }

    /// Resolve a call by name: a model operation for `.` on model objects,
    /// then the built-in operations that bind no iterator variables
    pub fn operation_call_by_name(
        &mut self,
        receiver: NodeId,
        name: &str,
        arguments: Vec<NodeId>,
        arrow: bool,
    ) -> NodeId {
        let receiver_type = self.type_of(receiver).clone();
        if !arrow && !receiver_type.is(BuiltInType::Class) {
            if let Some(operation) = receiver_type
                .class()
                .and_then(|class| self.model.find_operation(class, name))
            {
                return self.uml_operation_call(receiver, operation, arguments);
            }
        }

        let argument_types: Vec<DataType> =
            arguments.iter().map(|&a| self.type_of(a).clone()).collect();
        match BuiltInDescr::find_operation(name, &receiver_type, &argument_types, arrow)
            .filter(|descr| !descr.is_iterator())
        {
            Some(descr) => self.builtin_call(receiver, descr, arguments),
            None => self.invalid_call(receiver, name, arguments),
        }
    }

    /// Placeholder for a call that did not resolve
    pub fn invalid_call(
        &mut self,
        receiver: NodeId,
        name: impl Into<SmolStr>,
        arguments: Vec<NodeId>,
    ) -> NodeId {
        let call = PropertyCall {
            receiver,
            selector: PropertySelector::new(SelectorCategory::Invalid, name),
            mapping: MultiplicityMapping::OneToOne,
        };
        self.push_operation(DataType::built_in(BuiltInType::Invalid), call, arguments, None)
    }

    fn invalid_attribute(&mut self, receiver: NodeId, name: &str) -> NodeId {
        let call = PropertyCall {
            receiver,
            selector: PropertySelector::new(SelectorCategory::Invalid, name),
            mapping: MultiplicityMapping::OneToOne,
        };
        self.push(
            DataType::built_in(BuiltInType::Invalid),
            NodeKind::AttributeCall(AttributeCallExp { call }),
            &[receiver],
        )
    }

    fn push_operation(
        &mut self,
        data_type: DataType,
        call: PropertyCall,
        arguments: Vec<NodeId>,
        builtin: Option<&'static BuiltInDescr>,
    ) -> NodeId {
        let children: Vec<NodeId> = std::iter::once(call.receiver)
            .chain(arguments.iter().copied())
            .collect();
        self.push(
            data_type,
            NodeKind::OperationCall(OperationCallExp {
                call,
                arguments,
                builtin,
            }),
            &children,
        )
    }

    // ------------------------------------------------------------------
    // Spans
    // ------------------------------------------------------------------

    /// Fold references into a node's span
    pub fn add_source_refs(&mut self, node: NodeId, refs: &[SourceReference]) {
        SourceReference::merge_all(
            &mut self.arena.node_mut(node).source_refs,
            refs,
            MERGE_BY_TOKEN,
        );
    }

    /// Extend a node's span by one token (a keyword, operator or bracket)
    pub fn add_token(&mut self, node: NodeId, token: &Token) {
        if token.is(TokenKind::END_OF_TEXT) {
            return;
        }
        self.add_source_refs(node, std::slice::from_ref(&token.source_ref));
    }

    /// Fold the spans of other nodes into a node's span
    pub fn inherit_source_refs(&mut self, node: NodeId, from: &[NodeId]) {
        for &other in from {
            let refs = self.arena.node(other).source_refs.clone();
            self.add_source_refs(node, &refs);
        }
    }

    pub fn finish(self, root: NodeId) -> Expression {
        Expression {
            name: self.name,
            condition: self.condition,
            root,
            self_decl: self.self_decl,
            environment: self.environment,
            arena: self.arena,
        }
    }
}
