use std::cmp::Ordering;

use mirage_builder::ClassBuilder;
use mirage_model::{ElementId, ElementKind, ModelContext, NoTypeKind, PrimitiveKind, TypeMirror};
use mirage_types::{
    compare_specificity, direct_supertypes, erasure, is_assignable, is_same_type, is_subtype,
    most_specific, overrides, supertype_closure, unboxed_type, Types,
};
use pretty_assertions::assert_eq;

fn named(ctx: &ModelContext, name: &str) -> TypeMirror {
    ctx.declared_type_named(name, &[]).unwrap()
}

fn generic(ctx: &ModelContext, name: &str, args: &[&str]) -> TypeMirror {
    let args: Vec<_> = args.iter().map(|arg| named(ctx, arg)).collect();
    ctx.declared_type_named(name, &args).unwrap()
}

fn display(types: &[TypeMirror]) -> Vec<String> {
    types.iter().map(ToString::to_string).collect()
}

fn member(ctx: &ModelContext, owner: &str, name: &str) -> ElementId {
    let owner = ctx.require_type_element(owner).unwrap();
    ctx.enclosed_elements(owner)
        .unwrap()
        .iter()
        .copied()
        .find(|id| ctx.simple_name(*id).unwrap() == name)
        .unwrap()
}

#[test]
fn every_shape_but_wildcards_is_the_same_type_as_itself() {
    let ctx = ModelContext::with_minimal_jdk();
    let list = ctx.require_type_element("java.util.List").unwrap();
    let e = ctx.as_type(ctx.type_parameters(list).unwrap()[0]).unwrap();
    let shapes = [
        ctx.primitive_type(PrimitiveKind::Int),
        named(&ctx, "java.lang.String"),
        generic(&ctx, "java.util.List", &["java.lang.String"]),
        ctx.array_type(ctx.primitive_type(PrimitiveKind::Long)).unwrap(),
        e,
        ctx.null_type(),
        ctx.no_type(NoTypeKind::Void),
        ctx.no_type(NoTypeKind::None),
    ];
    for ty in &shapes {
        assert!(is_same_type(&ctx, ty, ty).unwrap(), "{ty}");
    }

    let number = named(&ctx, "java.lang.Number");
    let wildcard = ctx.wildcard_type(Some(number.clone()), None).unwrap();
    let twin = ctx.wildcard_type(Some(number), None).unwrap();
    assert!(!is_same_type(&ctx, &wildcard, &wildcard).unwrap());
    assert!(!is_same_type(&ctx, &wildcard, &twin).unwrap());
    assert!(!is_same_type(&ctx, &ctx.no_type(NoTypeKind::Void), &ctx.no_type(NoTypeKind::None)).unwrap());
}

#[test]
fn declared_sameness_ignores_type_arguments() {
    let ctx = ModelContext::with_minimal_jdk();
    let strings = generic(&ctx, "java.util.List", &["java.lang.String"]);
    let integers = generic(&ctx, "java.util.List", &["java.lang.Integer"]);

    assert!(is_same_type(&ctx, &strings, &integers).unwrap());
    assert_ne!(strings, integers);
    assert!(!is_same_type(&ctx, &strings, &named(&ctx, "java.util.Collection")).unwrap());
}

#[test]
fn executable_types_cannot_be_compared() {
    let ctx = ModelContext::with_minimal_jdk();
    let value_of = member(&ctx, "java.lang.Integer", "valueOf");
    let exec = ctx.executable_type(value_of).unwrap();
    let err = is_same_type(&ctx, &exec, &exec).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn numeric_widening() {
    let ctx = ModelContext::with_minimal_jdk();
    let p = |kind| ctx.primitive_type(kind);
    assert!(is_subtype(&ctx, &p(PrimitiveKind::Byte), &p(PrimitiveKind::Int)).unwrap());
    assert!(is_subtype(&ctx, &p(PrimitiveKind::Int), &p(PrimitiveKind::Long)).unwrap());
    assert!(is_subtype(&ctx, &p(PrimitiveKind::Long), &p(PrimitiveKind::Double)).unwrap());
    assert!(is_subtype(&ctx, &p(PrimitiveKind::Char), &p(PrimitiveKind::Int)).unwrap());
    assert!(!is_subtype(&ctx, &p(PrimitiveKind::Double), &p(PrimitiveKind::Int)).unwrap());
    assert!(!is_subtype(&ctx, &p(PrimitiveKind::Int), &p(PrimitiveKind::Char)).unwrap());
    assert!(!is_subtype(&ctx, &p(PrimitiveKind::Boolean), &p(PrimitiveKind::Int)).unwrap());
    assert!(!is_subtype(&ctx, &p(PrimitiveKind::Int), &named(&ctx, "java.lang.Integer")).unwrap());
}

#[test]
fn built_class_hierarchy() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut b = ClassBuilder::top_level(&ctx, "com.example.B", ElementKind::Class).unwrap();
    b.superclass_named("java.lang.Object").unwrap();
    let b = b.finish().unwrap();
    let mut a = ClassBuilder::top_level(&ctx, "com.example.A", ElementKind::Class).unwrap();
    a.superclass_named("com.example.B").unwrap();
    let a = a.finish().unwrap();

    let (a, b) = (ctx.as_type(a).unwrap(), ctx.as_type(b).unwrap());
    let object = ctx.root_type().unwrap();
    assert_eq!(display(&direct_supertypes(&ctx, &a).unwrap()), vec!["com.example.B"]);
    assert!(is_subtype(&ctx, &a, &object).unwrap());
    assert!(is_subtype(&ctx, &a, &b).unwrap());
    assert!(!is_subtype(&ctx, &b, &a).unwrap());
    assert!(is_assignable(&ctx, &a, &b).unwrap());
    assert!(!is_assignable(&ctx, &b, &a).unwrap());
    assert_eq!(
        display(&supertype_closure(&ctx, &a).unwrap()),
        vec!["com.example.B", "java.lang.Object"]
    );
}

#[test]
fn reflective_supertypes_are_instantiated() {
    let ctx = ModelContext::with_minimal_jdk();
    let strings = generic(&ctx, "java.util.ArrayList", &["java.lang.String"]);

    assert_eq!(
        display(&direct_supertypes(&ctx, &strings).unwrap()),
        vec![
            "java.lang.Object",
            "java.util.List<java.lang.String>",
            "java.lang.Cloneable",
            "java.io.Serializable",
        ]
    );
    assert_eq!(
        display(&supertype_closure(&ctx, &strings).unwrap()),
        vec![
            "java.lang.Object",
            "java.util.List<java.lang.String>",
            "java.util.Collection<java.lang.String>",
            "java.lang.Iterable<java.lang.String>",
            "java.lang.Cloneable",
            "java.io.Serializable",
        ]
    );

    let raw = named(&ctx, "java.util.ArrayList");
    assert_eq!(
        display(&direct_supertypes(&ctx, &raw).unwrap())[1],
        "java.util.List"
    );

    let err = direct_supertypes(&ctx, &ctx.primitive_type(PrimitiveKind::Int)).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn declared_subtyping() {
    let ctx = ModelContext::with_minimal_jdk();
    let integer = named(&ctx, "java.lang.Integer");
    let number = named(&ctx, "java.lang.Number");
    let object = ctx.root_type().unwrap();

    assert!(is_subtype(&ctx, &integer, &number).unwrap());
    assert!(is_subtype(&ctx, &integer, &named(&ctx, "java.lang.Comparable")).unwrap());
    assert!(!is_subtype(&ctx, &number, &integer).unwrap());
    assert!(is_subtype(&ctx, &named(&ctx, "java.lang.Cloneable"), &object).unwrap());
    assert!(is_subtype(
        &ctx,
        &generic(&ctx, "java.util.ArrayList", &["java.lang.String"]),
        &generic(&ctx, "java.lang.Iterable", &["java.lang.Integer"]),
    )
    .unwrap());
    assert!(is_subtype(&ctx, &ctx.null_type(), &integer).unwrap());
    assert!(!is_subtype(&ctx, &integer, &ctx.null_type()).unwrap());
}

#[test]
fn arrays_and_null() {
    let ctx = ModelContext::with_minimal_jdk();
    let int = ctx.primitive_type(PrimitiveKind::Int);
    let ints = ctx.array_type(int.clone()).unwrap();
    let strings = ctx.array_type(named(&ctx, "java.lang.String")).unwrap();
    let objects = ctx.array_type(ctx.root_type().unwrap()).unwrap();
    let object = ctx.root_type().unwrap();
    let string = named(&ctx, "java.lang.String");

    assert!(is_subtype(&ctx, &ints, &object).unwrap());
    assert!(!is_subtype(&ctx, &ints, &string).unwrap());
    assert!(!is_subtype(&ctx, &strings, &objects).unwrap());
    assert!(is_assignable(&ctx, &strings, &objects).unwrap());
    assert!(!is_assignable(&ctx, &objects, &strings).unwrap());

    let null = ctx.null_type();
    assert!(is_assignable(&ctx, &null, &string).unwrap());
    assert!(is_assignable(&ctx, &null, &ints).unwrap());
    assert!(!is_assignable(&ctx, &null, &int).unwrap());
}

#[test]
fn type_variables_go_through_their_bounds() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut holder = ClassBuilder::top_level(&ctx, "com.example.Holder", ElementKind::Class).unwrap();
    holder.superclass_named("Object").unwrap();
    let t = holder.add_type_parameter("T", &["Number"]).unwrap();
    let u = holder.add_type_parameter("U", &["Number"]).unwrap();
    holder.finish().unwrap();

    let (t, u) = (ctx.as_type(t).unwrap(), ctx.as_type(u).unwrap());
    let number = named(&ctx, "java.lang.Number");
    let integer = named(&ctx, "java.lang.Integer");

    assert!(is_subtype(&ctx, &t, &number).unwrap());
    assert!(is_subtype(&ctx, &t, &ctx.root_type().unwrap()).unwrap());
    assert!(!is_subtype(&ctx, &t, &integer).unwrap());
    assert!(is_assignable(&ctx, &integer, &t).unwrap());
    assert!(!is_assignable(&ctx, &named(&ctx, "java.lang.String"), &t).unwrap());
    // Type variables with identical bounds count as the same type.
    assert!(is_same_type(&ctx, &t, &u).unwrap());

    assert_eq!(erasure(&ctx, &t).unwrap(), number);
}

#[test]
fn lower_bounds_do_not_restrict_assignment() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut holder = ClassBuilder::top_level(&ctx, "com.example.Sink", ElementKind::Class).unwrap();
    holder.superclass_named("Object").unwrap();
    let t = holder.add_type_parameter("T", &["Number"]).unwrap();
    holder.finish().unwrap();

    let number = named(&ctx, "java.lang.Number");
    let bounded_below = ctx.type_variable(t, Some(number.clone())).unwrap();
    assert_eq!(ctx.lower_bound(&bounded_below).unwrap(), number);

    assert!(is_assignable(&ctx, &named(&ctx, "java.lang.Integer"), &bounded_below).unwrap());
    assert!(is_assignable(&ctx, &number, &bounded_below).unwrap());
    assert!(!is_assignable(&ctx, &ctx.root_type().unwrap(), &bounded_below).unwrap());
    assert!(!is_assignable(&ctx, &named(&ctx, "java.lang.String"), &bounded_below).unwrap());
}

#[test]
fn most_specific_method() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut calls = ClassBuilder::top_level(&ctx, "com.example.Calls", ElementKind::Class).unwrap();
    calls.superclass_named("Object").unwrap();
    let f_integer = calls.method("f").unwrap().param("value", "Integer").unwrap().finish().unwrap();
    let f_object = calls.method("f").unwrap().param("value", "Object").unwrap().finish().unwrap();
    let f_string = calls.method("f").unwrap().param("value", "String").unwrap().finish().unwrap();
    let g = calls
        .method("g")
        .unwrap()
        .param("a", "Object")
        .unwrap()
        .param("b", "Object")
        .unwrap()
        .finish()
        .unwrap();
    calls.finish().unwrap();

    assert_eq!(compare_specificity(&ctx, f_integer, f_object).unwrap(), Ordering::Less);
    assert_eq!(compare_specificity(&ctx, f_object, f_integer).unwrap(), Ordering::Greater);
    assert_eq!(compare_specificity(&ctx, f_integer, f_string).unwrap(), Ordering::Equal);
    assert_eq!(compare_specificity(&ctx, f_integer, f_integer).unwrap(), Ordering::Equal);
    assert!(compare_specificity(&ctx, f_integer, g).unwrap_err().is_invalid_argument());

    assert_eq!(most_specific(&ctx, &[f_object, f_integer]).unwrap(), Some(f_integer));
    assert_eq!(most_specific(&ctx, &[f_integer, f_string]).unwrap(), Some(f_integer));
    assert_eq!(most_specific(&ctx, &[]).unwrap(), None);
}

#[test]
fn overriding_allows_covariant_returns() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut base = ClassBuilder::top_level(&ctx, "com.example.Base", ElementKind::Class).unwrap();
    base.superclass_named("Object").unwrap();
    let base_get = base
        .method("get")
        .unwrap()
        .param("key", "Object")
        .unwrap()
        .returns("Object")
        .unwrap()
        .finish()
        .unwrap();
    base.finish().unwrap();

    let mut derived = ClassBuilder::top_level(&ctx, "com.example.Derived", ElementKind::Class).unwrap();
    derived.superclass_named("com.example.Base").unwrap();
    let derived_get = derived
        .method("get")
        .unwrap()
        .param("key", "Object")
        .unwrap()
        .returns("String")
        .unwrap()
        .finish()
        .unwrap();
    let derived_put = derived
        .method("put")
        .unwrap()
        .param("key", "Object")
        .unwrap()
        .returns("String")
        .unwrap()
        .finish()
        .unwrap();
    let derived = derived.finish().unwrap();

    assert!(overrides(&ctx, derived_get, base_get, derived).unwrap());
    assert!(!overrides(&ctx, base_get, derived_get, derived).unwrap());
    assert!(!overrides(&ctx, derived_put, base_get, derived).unwrap());
    assert!(overrides(&ctx, derived_get, base_get, derived_get).unwrap_err().is_invalid_argument());
}

#[test]
fn erasure_and_boxing() {
    let ctx = ModelContext::with_minimal_jdk();
    let types = Types::new(&ctx);

    let strings = generic(&ctx, "java.util.List", &["java.lang.String"]);
    assert_eq!(types.erasure(&strings).unwrap().to_string(), "java.util.List");
    let list = ctx.require_type_element("java.util.List").unwrap();
    let e = ctx.as_type(ctx.type_parameters(list).unwrap()[0]).unwrap();
    assert_eq!(types.erasure(&e).unwrap().to_string(), "java.lang.Object");
    let enum_type = ctx.require_type_element("java.lang.Enum").unwrap();
    let self_bound = ctx.as_type(ctx.type_parameters(enum_type).unwrap()[0]).unwrap();
    assert_eq!(types.erasure(&self_bound).unwrap().to_string(), "java.lang.Enum");
    let matrix = ctx.array_type(strings).unwrap();
    assert_eq!(types.erasure(&matrix).unwrap().to_string(), "java.util.List[]");

    let integer = ctx.require_type_element("java.lang.Integer").unwrap();
    assert_eq!(types.boxed_class(PrimitiveKind::Int).unwrap(), integer);
    assert_eq!(
        unboxed_type(&ctx, &ctx.as_type(integer).unwrap()).unwrap(),
        ctx.primitive_type(PrimitiveKind::Int)
    );
    assert!(types
        .unboxed_type(&named(&ctx, "java.lang.String"))
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn facade_reports_unimplemented_queries() {
    let ctx = ModelContext::with_minimal_jdk();
    let types = Types::new(&ctx);
    let string = named(&ctx, "java.lang.String");
    let value_of = member(&ctx, "java.lang.Integer", "valueOf");

    assert!(types.capture(&string).unwrap_err().is_unsupported());
    assert!(types.contains(&string, &string).unwrap_err().is_unsupported());
    assert!(types.as_member_of(&string, value_of).unwrap_err().is_unsupported());
    assert!(types.is_subsignature(value_of, value_of).unwrap_err().is_unsupported());

    assert!(types.is_same_type(&string, &string).unwrap());
    assert_eq!(types.as_element(&string), ctx.type_element("java.lang.String").unwrap());
    assert!(types
        .wildcard_type(Some(string.clone()), Some(string))
        .unwrap_err()
        .is_invalid_argument());
}
