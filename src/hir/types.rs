//! Value types of OCL expressions.
//!
//! Built-in primitive types and model classes share one representation,
//! [`DataType`]. The type lattice is deliberately small: nominal subtyping
//! along a class's single-parent ancestor chain plus the one numeric widening
//! INTEGER → REAL.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::config::OclOptions;
use crate::model::{Ancestors, ClassId, ModelView};

/// Type tag of a [`DataType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInType {
    Real,
    Integer,
    String,
    Boolean,
    Date,
    /// A model class used as a value (the type of a class literal)
    Class,
    Enumeration,
    Package,
    Any,
    /// The type of `null`
    OclVoid,
    Invalid,
    Void,
    /// An opaque model class
    UmlType,
}

impl BuiltInType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Real => "Real",
            Self::Integer => "Integer",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Date => "DateTime",
            Self::Class => "Class",
            Self::Enumeration => "Enumeration",
            Self::Package => "Package",
            Self::Any => "OclAny",
            Self::OclVoid => "OclVoid",
            Self::Invalid => "OclInvalid",
            Self::Void => "Void",
            Self::UmlType => "UmlType",
        }
    }

    /// Everything except model-derived types counts as built-in.
    pub fn is_built_in(self) -> bool {
        !matches!(self, Self::UmlType | Self::Enumeration)
    }

    /// Tag-level subtyping: equality plus INTEGER → REAL.
    pub fn conforms_to(self, other: BuiltInType) -> bool {
        self == other || (self == Self::Integer && other == Self::Real)
    }

    /// Model class name conventionally wrapping this primitive, if any
    pub fn wrapper_class_name(self) -> Option<&'static str> {
        PRIMITIVE_WRAPPERS
            .iter()
            .find(|&&(_, ty)| ty == self)
            .map(|&(name, _)| name)
    }
}

impl fmt::Display for BuiltInType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Class names of common primitive wrappers and the built-in they denote.
/// The first entry per type is its canonical wrapper.
const PRIMITIVE_WRAPPERS: &[(&str, BuiltInType)] = &[
    ("CharacterString", BuiltInType::String),
    ("String", BuiltInType::String),
    ("URI", BuiltInType::String),
    ("Integer", BuiltInType::Integer),
    ("Real", BuiltInType::Real),
    ("Decimal", BuiltInType::Real),
    ("Number", BuiltInType::Real),
    ("Measure", BuiltInType::Real),
    ("Boolean", BuiltInType::Boolean),
    ("Date", BuiltInType::Date),
    ("DateTime", BuiltInType::Date),
];

static WRAPPER_BY_NAME: LazyLock<FxHashMap<&'static str, BuiltInType>> =
    LazyLock::new(|| PRIMITIVE_WRAPPERS.iter().copied().collect());

fn primitive_for(name: &str, options: Option<&OclOptions>) -> Option<BuiltInType> {
    WRAPPER_BY_NAME
        .get(name)
        .copied()
        .or_else(|| options.and_then(|o| o.primitive_type(name)))
}

/// The type of an OCL value
///
/// Created once per node and never changed afterwards. Equality is
/// structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    name: SmolStr,
    built_in: BuiltInType,
    class: Option<ClassId>,
    metadata_type: Option<ClassId>,
}

impl DataType {
    /// A pure built-in type
    pub fn built_in(ty: BuiltInType) -> Self {
        Self {
            name: ty.name().into(),
            built_in: ty,
            class: None,
            metadata_type: None,
        }
    }

    /// Instance type of a model class.
    ///
    /// Enumerations and code lists become ENUMERATION. Other classes are
    /// probed against the primitive wrapper table, first by their own name and
    /// then along the ancestor chain; unrecognized classes are UMLTYPE.
    pub fn from_class<M: ModelView + ?Sized>(model: &M, class: ClassId) -> Self {
        Self::resolve_class(model, class, None)
    }

    /// Like [`from_class`](Self::from_class), also consulting the extra
    /// primitive names of `options`
    pub fn from_class_with<M: ModelView + ?Sized>(
        model: &M,
        class: ClassId,
        options: &OclOptions,
    ) -> Self {
        Self::resolve_class(model, class, Some(options))
    }

    fn resolve_class<M: ModelView + ?Sized>(
        model: &M,
        class: ClassId,
        options: Option<&OclOptions>,
    ) -> Self {
        let Some(info) = model.class(class) else {
            tracing::trace!("unknown class handle #{}, typing as invalid", class.index());
            return Self::built_in(BuiltInType::Invalid);
        };

        let built_in = if info.category.is_enumeration_like() {
            BuiltInType::Enumeration
        } else if let Some(ty) = primitive_for(&info.name, options) {
            ty
        } else {
            tracing::trace!("class {} is not a primitive wrapper, walking ancestors", info.name);
            Ancestors::new(model, class)
                .filter_map(|a| model.class_name(a))
                .find_map(|name| primitive_for(name, options))
                .unwrap_or(BuiltInType::UmlType)
        };

        Self {
            name: info.name.clone(),
            built_in,
            class: Some(class),
            metadata_type: None,
        }
    }

    /// Type named by a bare type name: a primitive wrapper or a name-only
    /// UMLTYPE placeholder
    pub fn from_name(name: &str) -> Self {
        Self::resolve_name(name, None)
    }

    pub fn from_name_with(name: &str, options: &OclOptions) -> Self {
        Self::resolve_name(name, Some(options))
    }

    fn resolve_name(name: &str, options: Option<&OclOptions>) -> Self {
        let built_in = primitive_for(name, options).unwrap_or_else(|| {
            tracing::trace!("type name {} unresolved, using name-only placeholder", name);
            BuiltInType::UmlType
        });
        Self {
            name: name.into(),
            built_in,
            class: None,
            metadata_type: None,
        }
    }

    /// Type of a class literal: the class itself used as a value
    pub fn class_value<M: ModelView + ?Sized>(model: &M, class: ClassId) -> Self {
        let name = model.class_name(class).unwrap_or("?");
        Self {
            name: name.into(),
            built_in: BuiltInType::Class,
            class: Some(class),
            metadata_type: None,
        }
    }

    /// Type of a transient package literal
    pub fn package(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            built_in: BuiltInType::Package,
            class: None,
            metadata_type: None,
        }
    }

    /// A built-in tag carried by a specific wrapper class
    pub(crate) fn built_in_wrapped(ty: BuiltInType, class: ClassId, name: SmolStr) -> Self {
        Self {
            name,
            built_in: ty,
            class: Some(class),
            metadata_type: None,
        }
    }

    /// Attach the class describing metadata of values of this type
    pub fn with_metadata_type(mut self, metadata_type: Option<ClassId>) -> Self {
        self.metadata_type = metadata_type;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn built_in_type(&self) -> BuiltInType {
        self.built_in
    }

    /// Owning model class, if this type was derived from one
    pub fn class(&self) -> Option<ClassId> {
        self.class
    }

    pub fn metadata_type(&self) -> Option<ClassId> {
        self.metadata_type
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in.is_built_in()
    }

    pub fn is(&self, ty: BuiltInType) -> bool {
        self.built_in == ty
    }

    /// Same model type: the same class, or for name-only placeholders the
    /// same name
    fn same_model_type(&self, other: &DataType) -> bool {
        match (self.class, other.class) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name == other.name,
            _ => false,
        }
    }

    /// Subtype test.
    ///
    /// Built-ins conform by tag with INTEGER → REAL as the only widening.
    /// Model types need equal tags and either the same class or `other`'s
    /// class on this type's ancestor chain.
    pub fn is_sub_type_of<M: ModelView + ?Sized>(&self, other: &DataType, model: &M) -> bool {
        match (self.is_built_in(), other.is_built_in()) {
            (true, true) => self.built_in.conforms_to(other.built_in),
            (false, false) => {
                if self.built_in != other.built_in {
                    return false;
                }
                if self.same_model_type(other) {
                    return true;
                }
                match (self.class, other.class) {
                    (Some(sub), Some(sup)) => Ancestors::new(model, sub).any(|a| a == sup),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Least common supertype, or `None` if the types do not unify.
    ///
    /// OCLVOID unifies with anything. For model types the first shared class
    /// is taken from the ancestor chains, each starting at the class itself,
    /// scanning this type's chain in the outer loop.
    pub fn common_super_type<M: ModelView + ?Sized>(
        &self,
        other: &DataType,
        model: &M,
    ) -> Option<DataType> {
        if self.built_in == BuiltInType::OclVoid {
            return Some(other.clone());
        }
        if other.built_in == BuiltInType::OclVoid {
            return Some(self.clone());
        }

        match (self.is_built_in(), other.is_built_in()) {
            (true, true) => {
                if self.built_in == other.built_in {
                    Some(self.clone())
                } else if self.is_numeric() && other.is_numeric() {
                    Some(DataType::built_in(BuiltInType::Real))
                } else {
                    None
                }
            }
            (false, false) => {
                if self.built_in != other.built_in {
                    return None;
                }
                if self.same_model_type(other) {
                    return Some(self.clone());
                }
                let (this_class, other_class) = (self.class?, other.class?);
                let this_chain =
                    std::iter::once(this_class).chain(Ancestors::new(model, this_class));
                for this_anc in this_chain {
                    for other_anc in
                        std::iter::once(other_class).chain(Ancestors::new(model, other_class))
                    {
                        if this_anc == other_anc {
                            return Some(if this_anc == this_class {
                                self.clone()
                            } else if other_anc == other_class {
                                other.clone()
                            } else {
                                DataType::from_class(model, this_anc)
                            });
                        }
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self.built_in, BuiltInType::Integer | BuiltInType::Real)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
