//! A small road model shared by the integration tests.
//!
//! ```text
//! A ← B ← C              feature types, single inheritance
//! Road                   name [1], lanes [*], colour [0..1], category [1],
//!                        sections : Road [*], length() : Real
//! Colour                 enumeration {red, green}
//! RoadCategory           code list, values not modeled
//! CharacterString        primitive wrapper
//! ```

use ocl::model::{
    ClassCategory, ClassId, ModelIndex, Multiplicity, OperationId, ParameterInfo, PropertyId,
};

pub struct RoadModel {
    pub model: ModelIndex,
    pub a: ClassId,
    pub b: ClassId,
    pub c: ClassId,
    pub road: ClassId,
    pub colour: ClassId,
    pub category: ClassId,
    pub metadata: ClassId,
    pub red: PropertyId,
    pub name: PropertyId,
    pub lanes: PropertyId,
    pub sections: PropertyId,
    pub length: OperationId,
}

pub fn road_model() -> RoadModel {
    let mut model = ModelIndex::new();

    let a = model.add_class("A", ClassCategory::FeatureType).unwrap();
    let b = model.add_class("B", ClassCategory::FeatureType).unwrap();
    let c = model.add_class("C", ClassCategory::FeatureType).unwrap();
    model.set_base_class(b, a).unwrap();
    model.set_base_class(c, b).unwrap();

    model.add_class("CharacterString", ClassCategory::Basic).unwrap();
    let metadata = model.add_class("Lineage", ClassCategory::DataType).unwrap();

    let colour = model.add_class("Colour", ClassCategory::Enumeration).unwrap();
    let red = model
        .add_class_property(colour, "red", colour, Multiplicity::ONE)
        .unwrap();
    model
        .add_class_property(colour, "green", colour, Multiplicity::ONE)
        .unwrap();
    let category = model.add_class("RoadCategory", ClassCategory::CodeList).unwrap();

    let road = model.add_class("Road", ClassCategory::FeatureType).unwrap();
    let name = model
        .add_property(road, "name", "CharacterString", Multiplicity::ONE)
        .unwrap();
    model.set_metadata_type(name, metadata).unwrap();
    let lanes = model
        .add_property(road, "lanes", "Integer", Multiplicity::MANY)
        .unwrap();
    model
        .add_property(road, "colour", "Colour", Multiplicity::OPTIONAL)
        .unwrap();
    model
        .add_property(road, "category", "RoadCategory", Multiplicity::ONE)
        .unwrap();
    let sections = model
        .add_class_property(road, "sections", road, Multiplicity::MANY)
        .unwrap();
    let length = model
        .add_operation(road, "length", vec![ParameterInfo::returns("Real")])
        .unwrap();

    RoadModel {
        model,
        a,
        b,
        c,
        road,
        colour,
        category,
        metadata,
        red,
        name,
        lanes,
        sections,
        length,
    }
}
