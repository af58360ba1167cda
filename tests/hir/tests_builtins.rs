#![allow(clippy::unwrap_used)]

use ocl::hir::{
    BuiltInDescr, BuiltInType, DataType, MultiplicityMapping, OPERATIONS, OPERATORS,
    ResultAdjustment,
};
use rstest::rstest;

use crate::helpers::model_fixtures::road_model;

fn ty(t: BuiltInType) -> DataType {
    DataType::built_in(t)
}

#[rstest]
#[case("and", BuiltInType::Boolean, BuiltInType::Boolean, BuiltInType::Boolean)]
#[case("implies", BuiltInType::Boolean, BuiltInType::Boolean, BuiltInType::Boolean)]
#[case("+", BuiltInType::Integer, BuiltInType::Integer, BuiltInType::Integer)]
#[case("*", BuiltInType::Integer, BuiltInType::Real, BuiltInType::Real)]
#[case("-", BuiltInType::Real, BuiltInType::Real, BuiltInType::Real)]
#[case("/", BuiltInType::Integer, BuiltInType::Integer, BuiltInType::Real)]
#[case("=", BuiltInType::String, BuiltInType::String, BuiltInType::Boolean)]
#[case("<>", BuiltInType::Date, BuiltInType::OclVoid, BuiltInType::Boolean)]
#[case(">=", BuiltInType::Integer, BuiltInType::Integer, BuiltInType::Boolean)]
#[case("<", BuiltInType::Date, BuiltInType::Date, BuiltInType::Boolean)]
fn test_binary_operator_results(
    #[case] symbol: &str,
    #[case] left: BuiltInType,
    #[case] right: BuiltInType,
    #[case] result: BuiltInType,
) {
    let fx = road_model();
    let descr = BuiltInDescr::find_operator(symbol, &ty(left), &[ty(right)]).unwrap();
    assert!(descr.is_binary_operator());
    assert_eq!(
        descr.result_type(&ty(left), &[ty(right)], &fx.model).built_in_type(),
        result
    );
}

#[rstest]
#[case("and", BuiltInType::Integer, BuiltInType::Boolean)]
#[case("+", BuiltInType::String, BuiltInType::String)]
#[case("<=", BuiltInType::Boolean, BuiltInType::Boolean)]
#[case("<", BuiltInType::Date, BuiltInType::Integer)]
fn test_operator_rejects_operands(
    #[case] symbol: &str,
    #[case] left: BuiltInType,
    #[case] right: BuiltInType,
) {
    assert!(BuiltInDescr::find_operator(symbol, &ty(left), &[ty(right)]).is_none());
}

#[test]
fn test_unary_operators() {
    let not = BuiltInDescr::find_operator("not", &ty(BuiltInType::Boolean), &[]).unwrap();
    assert_eq!(not.result, BuiltInType::Boolean);
    let neg = BuiltInDescr::find_operator("-", &ty(BuiltInType::Integer), &[]).unwrap();
    assert_eq!(neg.result, BuiltInType::Integer);
    assert!(BuiltInDescr::find_operator("not", &ty(BuiltInType::Integer), &[]).is_none());
}

#[test]
fn test_operation_table_covers_names() {
    for name in [
        "size",
        "isEmpty",
        "notEmpty",
        "exists",
        "forAll",
        "isUnique",
        "select",
        "substring",
        "concat",
        "matches",
        "oclIsKindOf",
        "oclIsTypeOf",
        "oclAsType",
        "propertyMetadata",
        "allInstances",
    ] {
        assert!(BuiltInDescr::is_operation_name(name), "{name}");
    }
    assert!(!BuiltInDescr::is_operation_name("collect"));
    assert!(OPERATIONS.iter().all(|d| !d.symbolic));
    assert!(OPERATORS.iter().all(|d| d.symbolic && !d.arrow));
}

#[test]
fn test_select_keeps_receiver_class() {
    let fx = road_model();
    let roads = DataType::from_class(&fx.model, fx.road);
    let descr = BuiltInDescr::find_operation(
        "select",
        &roads,
        &[ty(BuiltInType::Boolean)],
        true,
    )
    .unwrap();
    assert_eq!(descr.mapping, MultiplicityMapping::ManyToMany);
    assert_eq!(descr.adjustment, ResultAdjustment::ReceiverClassInstance);
    let result = descr.result_type(&roads, &[ty(BuiltInType::Boolean)], &fx.model);
    assert_eq!(result, roads);
}

#[test]
fn test_property_metadata_uses_attached_class() {
    let fx = road_model();
    let name_type = DataType::from_name("CharacterString").with_metadata_type(Some(fx.metadata));
    let descr = BuiltInDescr::find_operation("propertyMetadata", &name_type, &[], false).unwrap();
    let result = descr.result_type(&name_type, &[], &fx.model);
    assert_eq!(result.class(), Some(fx.metadata));
    assert_eq!(result.name(), "Lineage");
}

#[test]
fn test_type_tests_need_class_argument() {
    let fx = road_model();
    let road = DataType::from_class(&fx.model, fx.road);
    let class_arg = DataType::class_value(&fx.model, fx.c);
    assert!(BuiltInDescr::find_operation("oclIsKindOf", &road, &[class_arg], false).is_some());
    assert!(
        BuiltInDescr::find_operation("oclIsKindOf", &road, &[ty(BuiltInType::String)], false)
            .is_none()
    );
}
