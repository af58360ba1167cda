//! In-memory model store.
//!
//! Elements live in arenas addressed by their handles; class names are indexed
//! in an `IndexMap` so iteration follows registration order.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::error::{ModelError, ModelResult};
use super::view::{
    Ancestors, ClassCategory, ClassId, ClassInfo, ModelView, Multiplicity, OperationId,
    OperationInfo, ParameterInfo, PropertyId, PropertyInfo, ValueType,
};

#[derive(Debug, Default, Clone)]
pub struct ModelIndex {
    classes: Vec<ClassInfo>,
    properties: Vec<PropertyInfo>,
    operations: Vec<OperationInfo>,
    classes_by_name: IndexMap<SmolStr, ClassId>,
}

impl ModelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(
        &mut self,
        name: impl Into<SmolStr>,
        category: ClassCategory,
    ) -> ModelResult<ClassId> {
        let name = name.into();
        if self.classes_by_name.contains_key(&name) {
            return Err(ModelError::DuplicateClass(name));
        }

        let id = ClassId::new(self.classes.len());
        self.classes.push(ClassInfo {
            id,
            name: name.clone(),
            category,
            base_class: None,
            properties: Vec::new(),
            operations: Vec::new(),
        });
        self.classes_by_name.insert(name, id);
        Ok(id)
    }

    /// Register `base` as the single supertype of `class`.
    pub fn set_base_class(&mut self, class: ClassId, base: ClassId) -> ModelResult<()> {
        self.check_class(class)?;
        self.check_class(base)?;
        if base == class || Ancestors::new(&*self, base).any(|a| a == class) {
            let name = self.classes[class.index()].name.clone();
            return Err(ModelError::CyclicGeneralization(name));
        }
        self.classes[class.index()].base_class = Some(base);
        Ok(())
    }

    /// Add a property whose value type is given by name.
    ///
    /// The name is resolved against the classes registered so far; unknown
    /// names stay name-only.
    pub fn add_property(
        &mut self,
        owner: ClassId,
        name: impl Into<SmolStr>,
        type_name: impl Into<SmolStr>,
        multiplicity: Multiplicity,
    ) -> ModelResult<PropertyId> {
        self.check_class(owner)?;
        let type_name = type_name.into();
        let class = self.class_by_name(&type_name);
        self.push_property(owner, name.into(), ValueType { name: type_name, class }, multiplicity)
    }

    /// Add a property typed by a registered class.
    pub fn add_class_property(
        &mut self,
        owner: ClassId,
        name: impl Into<SmolStr>,
        value_class: ClassId,
        multiplicity: Multiplicity,
    ) -> ModelResult<PropertyId> {
        self.check_class(owner)?;
        self.check_class(value_class)?;
        let value_type = ValueType {
            name: self.classes[value_class.index()].name.clone(),
            class: Some(value_class),
        };
        self.push_property(owner, name.into(), value_type, multiplicity)
    }

    fn push_property(
        &mut self,
        owner: ClassId,
        name: SmolStr,
        value_type: ValueType,
        multiplicity: Multiplicity,
    ) -> ModelResult<PropertyId> {
        let id = PropertyId::new(self.properties.len());
        self.properties.push(PropertyInfo {
            id,
            name,
            owner,
            value_type,
            multiplicity,
            metadata_type: None,
        });
        self.classes[owner.index()].properties.push(id);
        Ok(id)
    }

    pub fn set_metadata_type(
        &mut self,
        property: PropertyId,
        metadata: ClassId,
    ) -> ModelResult<()> {
        self.check_class(metadata)?;
        let prop = self
            .properties
            .get_mut(property.index())
            .ok_or(ModelError::UnknownProperty(property))?;
        prop.metadata_type = Some(metadata);
        Ok(())
    }

    /// Add an operation; its result type travels as a `return` parameter.
    pub fn add_operation(
        &mut self,
        owner: ClassId,
        name: impl Into<SmolStr>,
        parameters: Vec<ParameterInfo>,
    ) -> ModelResult<OperationId> {
        self.check_class(owner)?;
        let id = OperationId::new(self.operations.len());
        self.operations.push(OperationInfo {
            id,
            name: name.into(),
            owner,
            parameters,
        });
        self.classes[owner.index()].operations.push(id);
        Ok(id)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes_by_name
            .values()
            .map(|id| &self.classes[id.index()])
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn check_class(&self, id: ClassId) -> ModelResult<()> {
        if id.index() < self.classes.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownClass(id))
        }
    }
}

impl ModelView for ModelIndex {
    fn class(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.index())
    }

    fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes_by_name.get(name).copied()
    }

    fn property(&self, id: PropertyId) -> Option<&PropertyInfo> {
        self.properties.get(id.index())
    }

    fn operation(&self, id: OperationId) -> Option<&OperationInfo> {
        self.operations.get(id.index())
    }
}
