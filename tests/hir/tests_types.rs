#![allow(clippy::unwrap_used)]

use ocl::config::OclOptions;
use ocl::hir::{BuiltInType, DataType};
use ocl::model::{ClassCategory, ClassId, ModelIndex};
use rstest::rstest;

use crate::helpers::model_fixtures::road_model;

const BUILT_INS: [BuiltInType; 11] = [
    BuiltInType::Real,
    BuiltInType::Integer,
    BuiltInType::String,
    BuiltInType::Boolean,
    BuiltInType::Date,
    BuiltInType::Class,
    BuiltInType::Package,
    BuiltInType::Any,
    BuiltInType::OclVoid,
    BuiltInType::Invalid,
    BuiltInType::Void,
];

#[test]
fn test_every_built_in_is_its_own_subtype() {
    let model = ModelIndex::new();
    for ty in BUILT_INS {
        let t = DataType::built_in(ty);
        assert!(t.is_built_in(), "{ty}");
        assert!(t.is_sub_type_of(&t, &model), "{ty}");
    }
}

#[test]
fn test_integer_widens_to_real_only() {
    let model = ModelIndex::new();
    let int = DataType::built_in(BuiltInType::Integer);
    let real = DataType::built_in(BuiltInType::Real);
    assert!(int.is_sub_type_of(&real, &model));
    assert!(!real.is_sub_type_of(&int, &model));
    for ty in BUILT_INS
        .into_iter()
        .filter(|&t| t != BuiltInType::Integer && t != BuiltInType::Real)
    {
        assert!(!int.is_sub_type_of(&DataType::built_in(ty), &model), "{ty}");
    }
}

#[rstest]
#[case(BuiltInType::Integer, BuiltInType::Real, Some(BuiltInType::Real))]
#[case(BuiltInType::Real, BuiltInType::Integer, Some(BuiltInType::Real))]
#[case(BuiltInType::Integer, BuiltInType::Integer, Some(BuiltInType::Integer))]
#[case(BuiltInType::String, BuiltInType::Boolean, None)]
#[case(BuiltInType::Date, BuiltInType::Integer, None)]
#[case(BuiltInType::OclVoid, BuiltInType::String, Some(BuiltInType::String))]
#[case(BuiltInType::Boolean, BuiltInType::OclVoid, Some(BuiltInType::Boolean))]
fn test_common_super_type_of_built_ins(
    #[case] a: BuiltInType,
    #[case] b: BuiltInType,
    #[case] expected: Option<BuiltInType>,
) {
    let model = ModelIndex::new();
    let result = DataType::built_in(a).common_super_type(&DataType::built_in(b), &model);
    assert_eq!(result.map(|t| t.built_in_type()), expected);
}

#[test]
fn test_void_unifies_with_everything() {
    let fx = road_model();
    let void = DataType::built_in(BuiltInType::OclVoid);
    let candidates = [
        DataType::from_class(&fx.model, fx.road),
        DataType::from_class(&fx.model, fx.colour),
        DataType::from_name("GM_Curve"),
        DataType::built_in(BuiltInType::Date),
    ];
    for other in candidates {
        assert_eq!(void.common_super_type(&other, &fx.model), Some(other));
    }
}

#[test]
fn test_class_hierarchy_subtyping() {
    let fx = road_model();
    let a = DataType::from_class(&fx.model, fx.a);
    let b = DataType::from_class(&fx.model, fx.b);
    let c = DataType::from_class(&fx.model, fx.c);

    assert!(c.is_sub_type_of(&a, &fx.model));
    assert!(c.is_sub_type_of(&b, &fx.model));
    assert!(!a.is_sub_type_of(&c, &fx.model));
    assert!(c.is_sub_type_of(&c, &fx.model));
    assert_eq!(a.built_in_type(), BuiltInType::UmlType);
    assert!(!a.is_built_in());
}

#[test]
fn test_class_hierarchy_common_super_type() {
    let fx = road_model();
    let a = DataType::from_class(&fx.model, fx.a);
    let b = DataType::from_class(&fx.model, fx.b);
    let c = DataType::from_class(&fx.model, fx.c);
    let road = DataType::from_class(&fx.model, fx.road);

    assert_eq!(b.common_super_type(&c, &fx.model), Some(b.clone()));
    assert_eq!(c.common_super_type(&b, &fx.model), Some(b.clone()));
    assert_eq!(c.common_super_type(&a, &fx.model), Some(a.clone()));
    assert_eq!(road.common_super_type(&c, &fx.model), None);
}

#[test]
fn test_enumeration_and_code_list_types() {
    let fx = road_model();
    let colour = DataType::from_class(&fx.model, fx.colour);
    let category = DataType::from_class(&fx.model, fx.category);
    assert!(colour.is(BuiltInType::Enumeration));
    assert!(category.is(BuiltInType::Enumeration));
    // Same tag, different classes
    assert!(!colour.is_sub_type_of(&category, &fx.model));
    assert_eq!(colour.common_super_type(&category, &fx.model), None);
}

#[test]
fn test_model_and_built_in_types_do_not_unify() {
    let fx = road_model();
    let road = DataType::from_class(&fx.model, fx.road);
    let string = DataType::built_in(BuiltInType::String);
    assert_eq!(road.common_super_type(&string, &fx.model), None);
    assert!(!string.is_sub_type_of(&road, &fx.model));
}

#[rstest]
#[case("CharacterString", BuiltInType::String)]
#[case("URI", BuiltInType::String)]
#[case("Integer", BuiltInType::Integer)]
#[case("Decimal", BuiltInType::Real)]
#[case("Measure", BuiltInType::Real)]
#[case("Boolean", BuiltInType::Boolean)]
#[case("DateTime", BuiltInType::Date)]
#[case("GM_Surface", BuiltInType::UmlType)]
fn test_type_from_name(#[case] name: &str, #[case] expected: BuiltInType) {
    let ty = DataType::from_name(name);
    assert_eq!(ty.built_in_type(), expected);
    assert_eq!(ty.name(), name);
    assert_eq!(ty.class(), None);
}

#[test]
fn test_extra_primitive_names_apply_to_classes() {
    let mut fx = road_model();
    let angle = fx
        .model
        .add_class("Angle", ocl::model::ClassCategory::Basic)
        .unwrap();
    let options = OclOptions::default().with_primitive_type("Angle", BuiltInType::Real);
    assert!(DataType::from_class_with(&fx.model, angle, &options).is(BuiltInType::Real));
    assert!(DataType::from_class(&fx.model, angle).is(BuiltInType::UmlType));
}

#[test]
fn test_class_value_type() {
    let fx = road_model();
    let literal = DataType::class_value(&fx.model, fx.road);
    assert!(literal.is(BuiltInType::Class));
    assert_eq!(literal.class(), Some(fx.road));
    assert_eq!(literal.to_string(), "Road");
    assert_ne!(literal, DataType::from_class(&fx.model, fx.road));
}

#[test]
fn test_common_super_type_of_siblings_and_cousins() {
    //     A
    //    / \
    //   B   F
    //  / \   \
    // D   E   G
    let mut model = ModelIndex::new();
    let mut class = |name: &str, base: Option<ClassId>| {
        let id = model.add_class(name, ClassCategory::FeatureType).unwrap();
        if let Some(base) = base {
            model.set_base_class(id, base).unwrap();
        }
        id
    };
    let a = class("A", None);
    let b = class("B", Some(a));
    let d = class("D", Some(b));
    let e = class("E", Some(b));
    let f = class("F", Some(a));
    let g = class("G", Some(f));
    let ty = |id| DataType::from_class(&model, id);

    assert_eq!(ty(d).common_super_type(&ty(e), &model), Some(ty(b)));
    assert_eq!(ty(e).common_super_type(&ty(d), &model), Some(ty(b)));
    assert_eq!(ty(d).common_super_type(&ty(g), &model), Some(ty(a)));
    assert_eq!(ty(g).common_super_type(&ty(e), &model), Some(ty(a)));
    assert_eq!(ty(d).common_super_type(&ty(f), &model), Some(ty(a)));
    assert_eq!(ty(b).common_super_type(&ty(g), &model), Some(ty(a)));
}
