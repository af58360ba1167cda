//! What a call node resolves to, and how it changes cardinality.

use std::fmt;

use smol_str::SmolStr;

use crate::model::{OperationId, PropertyId};

/// Cardinality propagation of a call from receiver to result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiplicityMapping {
    /// Scalar to scalar; a multiple receiver stays multiple
    OneToOne,
    /// Scalar to collection
    OneToMany,
    /// Collection to scalar (size, exists, ...)
    ManyToOne,
    /// Collection to collection (select, ...)
    ManyToMany,
}

impl MultiplicityMapping {
    /// Whether the result is a collection, given the receiver's multiplicity
    pub fn yields_many(self, receiver_multiple: bool) -> bool {
        match self {
            Self::OneToMany | Self::ManyToMany => true,
            Self::OneToOne => receiver_multiple,
            Self::ManyToOne => false,
        }
    }
}

/// Kind of entity a call selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorCategory {
    UmlProperty,
    UmlOperation,
    /// Built-in called with dot syntax on a model-typed receiver
    SyntheticUmlOperation,
    /// Built-in on a built-in-typed receiver (`s.size()`, `a + b`)
    BaseOperation,
    /// Built-in called with arrow syntax (`c->isEmpty()`)
    SetOperation,
    /// Built-in binding iterator variables (`c->forAll(x | ...)`)
    IteratorOperation,
    /// Built-in on a class literal (`Road.allInstances()`)
    ClassOperation,
    Invalid,
}

/// The model element a selector resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorTarget {
    Property(PropertyId),
    Operation(OperationId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertySelector {
    pub category: SelectorCategory,
    pub name: SmolStr,
    pub target: Option<SelectorTarget>,
}

impl PropertySelector {
    pub fn new(category: SelectorCategory, name: impl Into<SmolStr>) -> Self {
        Self {
            category,
            name: name.into(),
            target: None,
        }
    }

    pub fn property(name: impl Into<SmolStr>, property: PropertyId) -> Self {
        Self {
            category: SelectorCategory::UmlProperty,
            name: name.into(),
            target: Some(SelectorTarget::Property(property)),
        }
    }

    pub fn operation(name: impl Into<SmolStr>, operation: OperationId) -> Self {
        Self {
            category: SelectorCategory::UmlOperation,
            name: name.into(),
            target: Some(SelectorTarget::Operation(operation)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.category != SelectorCategory::Invalid
    }

    /// Built-in categories use arrow syntax when rendered
    pub fn uses_arrow(&self) -> bool {
        matches!(
            self.category,
            SelectorCategory::SetOperation | SelectorCategory::IteratorOperation
        )
    }
}

impl fmt::Display for PropertySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
