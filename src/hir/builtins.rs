//! Registry of built-in operations and operators.
//!
//! Two closed tables describe every admissible built-in call: named
//! operations (`size`, `forAll`, `oclAsType`, ...) and symbolic operators
//! (`and`, `+`, `<=`, ...). A grammar resolves a call by looking up the first
//! descriptor whose name, syntax, arity, receiver type and argument types fit.
//! Entries are ordered so exact numeric matches precede widened ones.

use super::selector::MultiplicityMapping;
use super::types::{BuiltInType, DataType};
use crate::model::ModelView;

use BuiltInType::{Boolean, Class, Date, Integer, Real, String, UmlType};
use MultiplicityMapping::{ManyToMany, ManyToOne, OneToMany, OneToOne};

/// Post-resolution adjustment of a descriptor's nominal result type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultAdjustment {
    /// Use the nominal result type as is
    None,
    /// Instance type of the receiver's class
    ReceiverClassInstance,
    /// Any object
    GenericObject,
    /// Instance type of the class literal passed as first argument
    ArgumentClassInstance,
    /// The nominal built-in, carried by the model's wrapper class for it
    ReverseUmlLookup,
    /// The metadata class attached to the receiver's type
    MetadataType,
}

/// Signature of one built-in operation or operator
#[derive(Debug, PartialEq, Eq)]
pub struct BuiltInDescr {
    pub name: &'static str,
    /// Required receiver type; `None` accepts any receiver
    pub receiver: Option<BuiltInType>,
    /// Required argument types; `None` entries accept anything
    pub args: &'static [Option<BuiltInType>],
    /// Number of iterator variables bound by the call
    pub bound_variables: usize,
    /// Called with `->` rather than `.`
    pub arrow: bool,
    /// Comes from the operator table
    pub symbolic: bool,
    pub mapping: MultiplicityMapping,
    pub result: BuiltInType,
    pub adjustment: ResultAdjustment,
}

#[allow(clippy::too_many_arguments)]
const fn operation(
    name: &'static str,
    receiver: Option<BuiltInType>,
    args: &'static [Option<BuiltInType>],
    bound_variables: usize,
    arrow: bool,
    mapping: MultiplicityMapping,
    result: BuiltInType,
    adjustment: ResultAdjustment,
) -> BuiltInDescr {
    BuiltInDescr {
        name,
        receiver,
        args,
        bound_variables,
        arrow,
        symbolic: false,
        mapping,
        result,
        adjustment,
    }
}

const fn operator(
    name: &'static str,
    receiver: Option<BuiltInType>,
    args: &'static [Option<BuiltInType>],
    result: BuiltInType,
) -> BuiltInDescr {
    BuiltInDescr {
        name,
        receiver,
        args,
        bound_variables: 0,
        arrow: false,
        symbolic: true,
        mapping: OneToOne,
        result,
        adjustment: ResultAdjustment::None,
    }
}

/// Named built-in operations
pub static OPERATIONS: &[BuiltInDescr] = &[
    operation("size", Some(String), &[], 0, false, OneToOne, Integer, ResultAdjustment::None),
    operation("size", None, &[], 0, true, ManyToOne, Integer, ResultAdjustment::None),
    operation("isEmpty", None, &[], 0, true, ManyToOne, Boolean, ResultAdjustment::None),
    operation("notEmpty", None, &[], 0, true, ManyToOne, Boolean, ResultAdjustment::None),
    operation(
        "exists",
        None,
        &[Some(Boolean)],
        1,
        true,
        ManyToOne,
        Boolean,
        ResultAdjustment::None,
    ),
    operation(
        "forAll",
        None,
        &[Some(Boolean)],
        1,
        true,
        ManyToOne,
        Boolean,
        ResultAdjustment::None,
    ),
    operation("isUnique", None, &[None], 1, true, ManyToOne, Boolean, ResultAdjustment::None),
    operation(
        "select",
        None,
        &[Some(Boolean)],
        1,
        true,
        ManyToMany,
        UmlType,
        ResultAdjustment::ReceiverClassInstance,
    ),
    operation(
        "substring",
        Some(String),
        &[Some(Integer), Some(Integer)],
        0,
        false,
        OneToOne,
        String,
        ResultAdjustment::ReverseUmlLookup,
    ),
    operation(
        "concat",
        Some(String),
        &[Some(String)],
        0,
        false,
        OneToOne,
        String,
        ResultAdjustment::ReverseUmlLookup,
    ),
    operation(
        "matches",
        Some(String),
        &[Some(String)],
        0,
        false,
        OneToOne,
        Boolean,
        ResultAdjustment::None,
    ),
    operation(
        "oclIsKindOf",
        None,
        &[Some(Class)],
        0,
        false,
        OneToOne,
        Boolean,
        ResultAdjustment::None,
    ),
    operation(
        "oclIsTypeOf",
        None,
        &[Some(Class)],
        0,
        false,
        OneToOne,
        Boolean,
        ResultAdjustment::None,
    ),
    operation(
        "oclAsType",
        None,
        &[Some(Class)],
        0,
        false,
        OneToOne,
        UmlType,
        ResultAdjustment::ArgumentClassInstance,
    ),
    operation(
        "propertyMetadata",
        None,
        &[],
        0,
        false,
        OneToOne,
        UmlType,
        ResultAdjustment::MetadataType,
    ),
    operation(
        "allInstances",
        Some(Class),
        &[],
        0,
        false,
        OneToMany,
        UmlType,
        ResultAdjustment::ReceiverClassInstance,
    ),
];

/// Symbolic and boolean operators; unary forms have no arguments
pub static OPERATORS: &[BuiltInDescr] = &[
    // Boolean connectives
    operator("and", Some(Boolean), &[Some(Boolean)], Boolean),
    operator("or", Some(Boolean), &[Some(Boolean)], Boolean),
    operator("xor", Some(Boolean), &[Some(Boolean)], Boolean),
    operator("implies", Some(Boolean), &[Some(Boolean)], Boolean),
    operator("not", Some(Boolean), &[], Boolean),
    // Unary minus
    operator("-", Some(Integer), &[], Integer),
    operator("-", Some(Real), &[], Real),
    // Binary arithmetic
    operator("+", Some(Integer), &[Some(Integer)], Integer),
    operator("+", Some(Integer), &[Some(Real)], Real),
    operator("+", Some(Real), &[Some(Integer)], Real),
    operator("+", Some(Real), &[Some(Real)], Real),
    operator("-", Some(Integer), &[Some(Integer)], Integer),
    operator("-", Some(Integer), &[Some(Real)], Real),
    operator("-", Some(Real), &[Some(Integer)], Real),
    operator("-", Some(Real), &[Some(Real)], Real),
    operator("*", Some(Integer), &[Some(Integer)], Integer),
    operator("*", Some(Integer), &[Some(Real)], Real),
    operator("*", Some(Real), &[Some(Integer)], Real),
    operator("*", Some(Real), &[Some(Real)], Real),
    operator("/", Some(Real), &[Some(Real)], Real),
    // Equality
    operator("=", None, &[None], Boolean),
    operator("<>", None, &[None], Boolean),
    // Relational
    operator("<", Some(Real), &[Some(Real)], Boolean),
    operator(">", Some(Real), &[Some(Real)], Boolean),
    operator("<=", Some(Real), &[Some(Real)], Boolean),
    operator(">=", Some(Real), &[Some(Real)], Boolean),
    operator("<", Some(Date), &[Some(Date)], Boolean),
    operator(">", Some(Date), &[Some(Date)], Boolean),
    operator("<=", Some(Date), &[Some(Date)], Boolean),
    operator(">=", Some(Date), &[Some(Date)], Boolean),
];

fn accepts(required: Option<BuiltInType>, actual: &DataType, is_argument: bool) -> bool {
    match required {
        None => true,
        Some(ty) => {
            actual.built_in_type().conforms_to(ty)
                || (is_argument && actual.is(BuiltInType::OclVoid))
        }
    }
}

impl BuiltInDescr {
    /// Check receiver and argument shape against this signature
    pub fn applies_to(&self, receiver: &DataType, args: &[DataType]) -> bool {
        self.args.len() == args.len()
            && accepts(self.receiver, receiver, false)
            && self
                .args
                .iter()
                .zip(args)
                .all(|(&required, actual)| accepts(required, actual, true))
    }

    /// Find a named operation for the given call shape
    pub fn find_operation(
        name: &str,
        receiver: &DataType,
        args: &[DataType],
        arrow: bool,
    ) -> Option<&'static BuiltInDescr> {
        let found = OPERATIONS
            .iter()
            .find(|d| d.name == name && d.arrow == arrow && d.applies_to(receiver, args));
        if found.is_none() {
            tracing::trace!(
                "no built-in operation {}{}({} args) on {}",
                if arrow { "->" } else { "." },
                name,
                args.len(),
                receiver
            );
        }
        found
    }

    /// Find an operator; unary operators take an empty argument slice
    pub fn find_operator(
        symbol: &str,
        receiver: &DataType,
        args: &[DataType],
    ) -> Option<&'static BuiltInDescr> {
        let found = OPERATORS
            .iter()
            .find(|d| d.name == symbol && d.applies_to(receiver, args));
        if found.is_none() {
            tracing::trace!(
                "no operator {} on {} with {} operands",
                symbol,
                receiver,
                args.len() + 1
            );
        }
        found
    }

    /// Whether a named operation of this name exists at all
    pub fn is_operation_name(name: &str) -> bool {
        OPERATIONS.iter().any(|d| d.name == name)
    }

    /// Whether the call binds iterator variables and so needs a body
    pub fn is_iterator(&self) -> bool {
        self.bound_variables > 0
    }

    /// Whether this call is a binary infix operator
    pub fn is_binary_operator(&self) -> bool {
        self.symbolic && self.args.len() == 1
    }

    /// Result type of a resolved call, after the descriptor's adjustment
    pub fn result_type<M: ModelView + ?Sized>(
        &self,
        receiver: &DataType,
        args: &[DataType],
        model: &M,
    ) -> DataType {
        let generic_object = || DataType::built_in(BuiltInType::Any);
        match self.adjustment {
            ResultAdjustment::None => DataType::built_in(self.result),
            ResultAdjustment::GenericObject => generic_object(),
            ResultAdjustment::ReceiverClassInstance => match receiver.class() {
                Some(class) => DataType::from_class(model, class),
                None if receiver.is(BuiltInType::Class) => generic_object(),
                // A collection of plain values selects values of the same type
                None => receiver.clone(),
            },
            ResultAdjustment::ArgumentClassInstance => args
                .first()
                .filter(|a| a.is(BuiltInType::Class))
                .and_then(DataType::class)
                .map(|class| DataType::from_class(model, class))
                .unwrap_or_else(generic_object),
            ResultAdjustment::ReverseUmlLookup => self
                .result
                .wrapper_class_name()
                .and_then(|name| model.class_by_name(name).map(|class| (name, class)))
                .map(|(name, class)| DataType::built_in_wrapped(self.result, class, name.into()))
                .unwrap_or_else(|| DataType::built_in(self.result)),
            ResultAdjustment::MetadataType => receiver
                .metadata_type()
                .map(|class| DataType::from_class(model, class))
                .unwrap_or_else(generic_object),
        }
    }
}
