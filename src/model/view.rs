//! Model handles, element records and the [`ModelView`] capability trait.

use smol_str::SmolStr;

use crate::base::arena_id;

/// Name of the synthetic parameter carrying an operation's result type
pub const RETURN_PARAMETER: &str = "return";

/// Upper bound on ancestor chain walks; deeper chains mean a cyclic model
pub const MAX_ANCESTOR_DEPTH: usize = 256;

arena_id!(
    /// Handle of a model class
    ClassId
);
arena_id!(
    /// Handle of a class property (attribute or association role)
    PropertyId
);
arena_id!(
    /// Handle of a class operation
    OperationId
);

/// Stereotype-like category of a model class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassCategory {
    #[default]
    ObjectType,
    FeatureType,
    DataType,
    Union,
    Enumeration,
    CodeList,
    Basic,
    Unknown,
}

impl ClassCategory {
    /// Enumerations and code lists are typed as ENUMERATION values.
    pub fn is_enumeration_like(self) -> bool {
        matches!(self, Self::Enumeration | Self::CodeList)
    }
}

/// Cardinality of a property; `upper == None` means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    pub const ONE: Multiplicity = Multiplicity {
        lower: 1,
        upper: Some(1),
    };
    pub const OPTIONAL: Multiplicity = Multiplicity {
        lower: 0,
        upper: Some(1),
    };
    pub const MANY: Multiplicity = Multiplicity {
        lower: 0,
        upper: None,
    };

    pub fn new(lower: u32, upper: Option<u32>) -> Self {
        Self { lower, upper }
    }

    /// At most one value
    pub fn is_single(&self) -> bool {
        self.upper.is_some_and(|upper| upper <= 1)
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::ONE
    }
}

/// Declared value type of a property: always a name, sometimes a resolved class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueType {
    pub name: SmolStr,
    pub class: Option<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub id: ClassId,
    pub name: SmolStr,
    pub category: ClassCategory,
    /// Single-parent generalization
    pub base_class: Option<ClassId>,
    pub properties: Vec<PropertyId>,
    pub operations: Vec<OperationId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub id: PropertyId,
    pub name: SmolStr,
    pub owner: ClassId,
    pub value_type: ValueType,
    pub multiplicity: Multiplicity,
    /// Class describing metadata attached to values of this property
    pub metadata_type: Option<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: SmolStr,
    pub type_name: SmolStr,
}

impl ParameterInfo {
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// The synthetic parameter carrying the operation's result type
    pub fn returns(type_name: impl Into<SmolStr>) -> Self {
        Self::new(RETURN_PARAMETER, type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    pub id: OperationId,
    pub name: SmolStr,
    pub owner: ClassId,
    pub parameters: Vec<ParameterInfo>,
}

impl OperationInfo {
    pub fn return_parameter(&self) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.name == RETURN_PARAMETER)
    }

    /// Parameters other than the `return` parameter, in declaration order
    pub fn arguments(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.parameters.iter().filter(|p| p.name != RETURN_PARAMETER)
    }
}

/// Read access to the host model.
///
/// Lookups return `None` for unknown handles and names; callers fall back to
/// name-only placeholders rather than failing.
pub trait ModelView {
    fn class(&self, id: ClassId) -> Option<&ClassInfo>;

    fn class_by_name(&self, name: &str) -> Option<ClassId>;

    fn property(&self, id: PropertyId) -> Option<&PropertyInfo>;

    fn operation(&self, id: OperationId) -> Option<&OperationInfo>;

    fn base_class(&self, id: ClassId) -> Option<ClassId> {
        self.class(id).and_then(|c| c.base_class)
    }

    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.class(id).map(|c| c.name.as_str())
    }

    /// Find a property by name on a class or its ancestors, nearest first.
    fn find_property(&self, class: ClassId, name: &str) -> Option<PropertyId> {
        std::iter::once(class)
            .chain(Ancestors::new(self, class))
            .filter_map(|c| self.class(c))
            .flat_map(|c| c.properties.iter().copied())
            .find(|&p| self.property(p).is_some_and(|info| info.name == name))
    }

    /// Find an operation by name on a class or its ancestors, nearest first.
    fn find_operation(&self, class: ClassId, name: &str) -> Option<OperationId> {
        std::iter::once(class)
            .chain(Ancestors::new(self, class))
            .filter_map(|c| self.class(c))
            .flat_map(|c| c.operations.iter().copied())
            .find(|&o| self.operation(o).is_some_and(|info| info.name == name))
    }
}

/// Iterator over the proper ancestors of a class, nearest first
pub struct Ancestors<'m, M: ModelView + ?Sized> {
    model: &'m M,
    next: Option<ClassId>,
    depth: usize,
}

impl<'m, M: ModelView + ?Sized> Ancestors<'m, M> {
    pub fn new(model: &'m M, class: ClassId) -> Self {
        Self {
            model,
            next: model.base_class(class),
            depth: 0,
        }
    }
}

impl<M: ModelView + ?Sized> Iterator for Ancestors<'_, M> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        if self.depth >= MAX_ANCESTOR_DEPTH {
            tracing::warn!(
                "ancestor chain exceeds {} levels - possible generalization cycle",
                MAX_ANCESTOR_DEPTH
            );
            self.next = None;
            return None;
        }
        self.depth += 1;
        self.next = self.model.base_class(current);
        Some(current)
    }
}
