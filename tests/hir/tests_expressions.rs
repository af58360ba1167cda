#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use ocl::base::SourceReference;
use ocl::hir::{
    BuiltInDescr, BuiltInType, ConditionKind, DataType, DateTimeValue, ExpressionBuilder,
    LiteralExp, MultiplicityMapping, NodeId, NodeKind, SelectorCategory, SelectorTarget,
};
use ocl::model::ModelIndex;
use ocl::parser::tokenize;

use crate::helpers::model_fixtures::{RoadModel, road_model};
use crate::helpers::source_fixtures::FOR_ALL;

fn builder(fx: &RoadModel) -> ExpressionBuilder<'_, ModelIndex> {
    ExpressionBuilder::new(&fx.model, "c1", ConditionKind::Invariant, fx.road)
}

fn mapping_of(b: &ExpressionBuilder<'_, ModelIndex>, node: NodeId) -> MultiplicityMapping {
    b.node(node).kind.as_call().unwrap().mapping
}

#[test]
fn test_single_valued_attribute_is_one_to_one() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let name = b.attribute_call(s, fx.name);

    assert_eq!(mapping_of(&b, name), MultiplicityMapping::OneToOne);
    assert!(!b.is_multiple(name));
    assert!(b.type_of(name).is(BuiltInType::String));
    let call = b.node(name).kind.as_call().unwrap();
    assert_eq!(call.selector.category, SelectorCategory::UmlProperty);
    assert_eq!(call.selector.target, Some(SelectorTarget::Property(fx.name)));
}

#[test]
fn test_many_valued_attribute_is_one_to_many() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let lanes = b.attribute_call(s, fx.lanes);

    assert_eq!(mapping_of(&b, lanes), MultiplicityMapping::OneToMany);
    assert!(b.is_multiple(lanes));
}

#[test]
fn test_navigation_from_collection_stays_multiple() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let sections = b.attribute_call(s, fx.sections);
    let names = b.attribute_call(sections, fx.name);

    assert_eq!(mapping_of(&b, names), MultiplicityMapping::OneToOne);
    assert!(b.is_multiple(names));
    let count = b.operation_call_by_name(names, "size", vec![], true);
    assert!(!b.is_multiple(count));
}

#[test]
fn test_for_all_with_spans() {
    let fx = road_model();
    let tokens = tokenize(FOR_ALL);
    let mut b = builder(&fx);

    let s = b.self_variable();
    b.add_token(s, &tokens[0]);
    let lanes = b.attribute_call_by_name(s, "lanes");
    b.add_token(lanes, &tokens[1]);
    b.add_token(lanes, &tokens[2]);

    let l = b.declare_iterator(lanes, Some("l"));
    let v = b.variable(l);
    b.add_token(v, &tokens[8]);
    let zero = b.literal_from_token(&tokens[10]).unwrap();
    let positive = b.operator_call(">", v, vec![zero]);
    b.add_token(positive, &tokens[9]);
    assert_eq!(b.lookup("l"), Some(l));

    let boolean = DataType::built_in(BuiltInType::Boolean);
    let descr =
        BuiltInDescr::find_operation("forAll", b.type_of(lanes), &[boolean], true).unwrap();
    let all = b.iteration_call(lanes, descr, vec![l], positive);
    for i in [3, 4, 5, 6, 7, 11] {
        b.add_token(all, &tokens[i]);
    }
    assert_eq!(b.lookup("l"), None);
    assert_eq!(b.declaration(l).owner, Some(all));

    let expr = b.finish(all);
    assert!(expr.data_type().is(BuiltInType::Boolean));
    assert!(!expr.is_multiple());
    assert!(expr.is_built_in_type());
    assert!(expr.declaration(l).data_type.is(BuiltInType::Integer));
    assert_eq!(
        expr.span_of(all),
        &[SourceReference::new(0, 0, 28, 0, 11)]
    );
    assert_eq!(expr.span_of(positive), &[SourceReference::new(0, 23, 27, 8, 10)]);
    assert_eq!(
        expr.to_string(),
        "inv c1: self.lanes->forAll(l | (l > 0))"
    );
}

#[test]
fn test_implicit_iterator() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let sections = b.attribute_call(s, fx.sections);
    let it = b.declare_iterator(sections, None);
    assert!(b.declaration(it).implicit);

    let v = b.variable(it);
    let lanes = b.attribute_call(v, fx.lanes);
    let non_empty = b.operation_call_by_name(lanes, "notEmpty", vec![], true);
    let descr = BuiltInDescr::find_operation(
        "select",
        b.type_of(sections),
        &[DataType::built_in(BuiltInType::Boolean)],
        true,
    )
    .unwrap();
    let selected = b.iteration_call(sections, descr, vec![it], non_empty);

    assert!(b.is_multiple(selected));
    assert_eq!(b.type_of(selected).class(), Some(fx.road));
    let call = b.node(selected).kind.as_call().unwrap();
    assert_eq!(call.selector.category, SelectorCategory::IteratorOperation);
}

#[test]
fn test_let_binding_and_scope_lookup() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let lanes = b.attribute_call(s, fx.lanes);
    let ls = b.declare("ls", b.type_of(lanes).clone(), Some(lanes));
    let var = b.variable(ls);
    assert!(b.is_multiple(var));

    let size = b.operation_call_by_name(var, "size", vec![], true);
    let one = b.integer_literal(1);
    let body = b.operator_call(">", size, vec![one]);
    let root = b.let_exp(vec![ls], body);
    let expr = b.finish(root);

    assert!(expr.data_type().is(BuiltInType::Boolean));
    assert_eq!(expr.lookup("ls", ls), Some(ls));
    assert_eq!(expr.lookup("self", ls), Some(expr.self_decl));
    assert_eq!(expr.lookup("other", ls), None);
    assert_eq!(expr.declaration(ls).outer, Some(expr.self_decl));
    assert_eq!(
        expr.to_string(),
        "inv c1: let ls : Integer = self.lanes in (ls->size() > 1)"
    );
}

#[test]
fn test_environment_declarations_visible() {
    let fx = road_model();
    let mut b = builder(&fx);
    let limit = b.add_environment("limit", DataType::built_in(BuiltInType::Integer));
    assert_eq!(b.lookup("limit"), Some(limit));
    assert_eq!(b.lookup("self"), Some(b.self_declaration()));

    let v = b.variable(limit);
    let expr = b.finish(v);
    assert_eq!(expr.environment, vec![limit]);
    assert_eq!(expr.lookup("self", limit), Some(expr.self_decl));
}

#[test]
fn test_if_expression_common_type() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let colour = b.attribute_call_by_name(s, "colour");
    let null = b.null_literal();
    let cond = b.operator_call("=", colour, vec![null]);
    let zero = b.integer_literal(0);
    let half = b.real_literal(1.5);
    let ty = b.common_type(zero, half).unwrap();
    let node = b.if_exp(cond, zero, half, ty);

    assert!(b.type_of(cond).is(BuiltInType::Boolean));
    assert!(b.type_of(node).is(BuiltInType::Real));
    assert!(!b.is_multiple(node));
}

#[test]
fn test_if_is_multiple_when_a_branch_is() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let cond = b.boolean_literal(true);
    let lanes = b.attribute_call(s, fx.lanes);
    let other = b.attribute_call(s, fx.lanes);
    let ty = b.common_type(lanes, other).unwrap();
    let node = b.if_exp(cond, lanes, other, ty);
    assert!(b.is_multiple(node));
}

#[test]
fn test_modeled_and_bare_enum_literals() {
    let fx = road_model();
    let mut b = builder(&fx);
    let modeled = b.enum_literal(fx.red);
    let bare = b.bare_enum_literal(fx.colour, "red");
    let code = b.bare_enum_literal(fx.category, "motorway");

    let literal = |node: NodeId| match &b.node(node).kind {
        NodeKind::Literal(LiteralExp::Enumeration(l)) => l.clone(),
        other => panic!("expected enumeration literal, got {other:?}"),
    };
    let (m, r, c) = (literal(modeled), literal(bare), literal(code));
    assert!(m.same_literal(&r));
    assert!(m.is_modeled());
    assert!(!r.is_modeled());
    assert!(!c.same_literal(&r));
    assert_eq!(b.type_of(modeled), b.type_of(bare));
    assert!(b.type_of(code).is(BuiltInType::Enumeration));
    assert_eq!(b.type_of(code).class(), Some(fx.category));

    let s = b.self_variable();
    let colour = b.attribute_call_by_name(s, "colour");
    let eq = b.operator_call("=", colour, vec![modeled]);
    assert!(b.type_of(eq).is(BuiltInType::Boolean));
    let expr = b.finish(eq);
    assert_eq!(expr.to_string(), "inv c1: (self.colour = Colour::red)");
}

#[test]
fn test_uml_operation_call() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let length = b.uml_operation_call(s, fx.length, vec![]);
    assert!(b.type_of(length).is(BuiltInType::Real));
    assert_eq!(mapping_of(&b, length), MultiplicityMapping::OneToOne);
    let by_name = b.operation_call_by_name(s, "length", vec![], false);
    assert_eq!(b.type_of(by_name), b.type_of(length));
}

#[test]
fn test_cast_along_hierarchy() {
    let fx = road_model();
    let mut b = ExpressionBuilder::new(&fx.model, "c2", ConditionKind::Derive, fx.a);
    let s = b.self_variable();
    let target = b.class_literal(fx.c);
    let cast = b.operation_call_by_name(s, "oclAsType", vec![target], false);
    assert_eq!(b.type_of(cast).class(), Some(fx.c));
    let call = b.node(cast).kind.as_call().unwrap();
    assert_eq!(call.selector.category, SelectorCategory::SyntheticUmlOperation);

    let expr = b.finish(cast);
    assert_eq!(expr.to_string(), "derive c2: self.oclAsType(C)");
}

#[test]
fn test_class_literal_all_instances() {
    let fx = road_model();
    let mut b = builder(&fx);
    let roads = b.class_literal(fx.road);
    let all = b.operation_call_by_name(roads, "allInstances", vec![], false);
    let count = b.operation_call_by_name(all, "size", vec![], true);
    assert!(b.is_multiple(all));
    assert!(!b.is_multiple(count));
    assert!(b.type_of(count).is(BuiltInType::Integer));
}

#[test]
fn test_metadata_type_threads_through_attribute() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let name = b.attribute_call(s, fx.name);
    assert_eq!(b.type_of(name).metadata_type(), Some(fx.metadata));
    let meta = b.operation_call_by_name(name, "propertyMetadata", vec![], false);
    assert_eq!(b.type_of(meta).class(), Some(fx.metadata));
}

#[test]
fn test_string_operation_keeps_wrapper_class() {
    let fx = road_model();
    let mut b = builder(&fx);
    let s = b.self_variable();
    let name = b.attribute_call(s, fx.name);
    let suffix = b.string_literal("-N");
    let joined = b.operation_call_by_name(name, "concat", vec![suffix], false);
    assert!(b.type_of(joined).is(BuiltInType::String));
    assert_eq!(b.type_of(joined).name(), "CharacterString");
    let call = b.node(joined).kind.as_call().unwrap();
    assert_eq!(call.selector.category, SelectorCategory::BaseOperation);
}

#[test]
fn test_date_comparison() {
    let fx = road_model();
    let mut b = builder(&fx);
    let now = b.date_time_literal(DateTimeValue::Current);
    let opened = b.date_time_literal(DateTimeValue::Explicit("2020-01-01".into()));
    let cmp = b.operator_call("<", opened, vec![now]);
    assert!(b.type_of(cmp).is(BuiltInType::Boolean));
    let expr = b.finish(cmp);
    assert_eq!(expr.to_string(), "inv c1: (#2020-01-01# < now)");
}
