use mirage_builder::{resolve_type, ClassBuilder, TypeParamScope};
use mirage_model::{
    AnnotationValue, ConstValue, ElementKind, ElementView, Modifier, ModelContext, ModelError,
    Name, NestingKind, PrimitiveKind, TypeKind,
};
use pretty_assertions::assert_eq;

#[test]
fn class_with_one_field_round_trips() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut foo = ClassBuilder::top_level(&ctx, "com.example.Foo", ElementKind::Class).unwrap();
    foo.add_modifier(Modifier::Public);
    foo.superclass_named("java.lang.Object").unwrap();
    foo.field("x")
        .unwrap()
        .of_type("int")
        .unwrap()
        .with_modifier(Modifier::Private)
        .finish()
        .unwrap();
    let id = foo.finish().unwrap();

    let enclosed = ctx.enclosed_elements(id).unwrap();
    assert_eq!(enclosed.len(), 1);
    let x = enclosed[0];
    assert_eq!(ctx.kind(x).unwrap(), ElementKind::Field);
    assert_eq!(ctx.simple_name(x).unwrap(), "x");
    assert_eq!(ctx.variable_type(x).unwrap().kind(), TypeKind::Primitive(PrimitiveKind::Int));
    assert_eq!(ctx.enclosing_element(x).unwrap(), Some(id));

    let ty = ctx.as_type(id).unwrap();
    assert_eq!(ty, ctx.as_type(id).unwrap());
    assert_eq!(ty.to_string(), "com.example.Foo");
    assert_eq!(ctx.superclass(id).unwrap().to_string(), "java.lang.Object");
    assert_eq!(ctx.type_element("com.example.Foo").unwrap(), Some(id));
    assert_eq!(ctx.package_of(id).unwrap(), ctx.package_element("com.example"));
    assert!(ctx.modifiers(id).unwrap().contains(Modifier::Public));
}

#[test]
fn classes_need_a_superclass() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut orphan = ClassBuilder::top_level(&ctx, "com.example.Orphan", ElementKind::Class).unwrap();
    assert!(orphan.finish().unwrap_err().is_invalid_state());
    assert!(!ctx.element(orphan.id()).unwrap().is_complete());

    orphan.superclass_named("Object").unwrap();
    let id = orphan.finish().unwrap();
    assert_eq!(ctx.superclass(id).unwrap().to_string(), "java.lang.Object");
    assert!(orphan.finish().unwrap_err().is_invalid_state());

    let marker = ClassBuilder::top_level(&ctx, "com.example.Marker", ElementKind::Interface).unwrap();
    let marker = marker.finish().unwrap();
    assert_eq!(ctx.superclass(marker).unwrap().kind(), TypeKind::None);
}

#[test]
fn discarded_builders_free_their_name() {
    let ctx = ModelContext::with_minimal_jdk();
    let draft = ClassBuilder::top_level(&ctx, "com.example.Draft", ElementKind::Class).unwrap();
    let stale = draft.id();
    assert_eq!(ctx.type_element("com.example.Draft").unwrap(), Some(stale));
    draft.discard().unwrap();
    assert_eq!(ctx.type_element("com.example.Draft").unwrap(), None);

    let mut again = ClassBuilder::top_level(&ctx, "com.example.Draft", ElementKind::Class).unwrap();
    again.superclass_named("Object").unwrap();
    let id = again.finish().unwrap();
    assert_ne!(id, stale);
    assert_eq!(ctx.type_element("com.example.Draft").unwrap(), Some(id));
}

#[test]
fn classes_need_an_enclosing_element() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut floating = ClassBuilder::new(&ctx, "com.example.Floating", ElementKind::Class).unwrap();
    floating.superclass_named("Object").unwrap();
    assert!(floating.finish().unwrap_err().is_invalid_state());

    let mut anchored = ClassBuilder::new(&ctx, "com.example.Anchored", ElementKind::Class).unwrap();
    anchored.superclass_named("Object").unwrap();
    anchored.enclosed_by(ctx.package_element("com.example"));
    let id = anchored.finish().unwrap();
    assert_eq!(ctx.enclosing_element(id).unwrap(), Some(ctx.package_element("com.example")));
}

#[test]
fn resolves_textual_type_references() {
    let ctx = ModelContext::with_minimal_jdk();
    let scope = TypeParamScope::new();
    let resolve = |text: &str| resolve_type(&ctx, &scope, text).map(|ty| ty.to_string());

    assert_eq!(resolve("int").unwrap(), "int");
    assert_eq!(resolve("void").unwrap(), "void");
    assert_eq!(resolve("String").unwrap(), "java.lang.String");
    assert_eq!(resolve("java.util.List<String>").unwrap(), "java.util.List<java.lang.String>");
    assert_eq!(
        resolve("java.util.Map<String, ? extends Number>").unwrap(),
        "java.util.Map<java.lang.String,? extends java.lang.Number>"
    );
    assert_eq!(resolve("java.util.List<? super Integer>").unwrap(), "java.util.List<? super java.lang.Integer>");
    assert_eq!(resolve("int[]").unwrap(), "int[]");
    assert_eq!(resolve("[int").unwrap(), "int[]");
    assert_eq!(resolve("String...").unwrap(), "java.lang.String[]");
    assert_eq!(resolve("long[][]").unwrap(), "long[][]");

    assert!(matches!(resolve("com.example.Missing"), Err(ModelError::InvalidReference(_))));
    assert!(matches!(resolve("java.util.List<String"), Err(ModelError::InvalidReference(_))));
    assert!(matches!(resolve("? between Number"), Err(ModelError::InvalidReference(_))));
    assert!(resolve("  ").unwrap_err().is_invalid_argument());
    assert!(resolve("java.util.List<int>").unwrap_err().is_invalid_argument());
    assert!(resolve("void[]").unwrap_err().is_invalid_argument());
}

#[test]
fn generic_classes_see_their_own_type_parameters() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut boxed = ClassBuilder::top_level(&ctx, "com.example.Box", ElementKind::Class).unwrap();
    boxed.superclass_named("Object").unwrap();
    let t = boxed.add_type_parameter("T", &["Comparable<T>"]).unwrap();
    assert!(boxed.add_type_parameter("T", &[]).unwrap_err().is_invalid_argument());

    boxed.field("value").unwrap().of_type("T").unwrap().finish().unwrap();
    let get = boxed.method("get").unwrap().returns("T").unwrap().finish().unwrap();
    let set = boxed
        .method("set")
        .unwrap()
        .param("value", "T")
        .unwrap()
        .finish()
        .unwrap();
    let first = boxed
        .method("first")
        .unwrap()
        .with_modifier(Modifier::Static)
        .type_parameter("R", &[])
        .unwrap()
        .param("values", "java.util.List<? extends R>")
        .unwrap()
        .returns("R")
        .unwrap()
        .finish()
        .unwrap();

    let id = boxed.finish().unwrap();
    assert_eq!(ctx.as_type(id).unwrap().to_string(), "com.example.Box<T>");
    assert_eq!(ctx.type_parameters(id).unwrap().to_vec(), vec![t]);
    assert_eq!(ctx.bounds(t).unwrap()[0].to_string(), "java.lang.Comparable<T>");
    assert_eq!(ctx.upper_bound(&ctx.as_type(t).unwrap()).unwrap().to_string(), "java.lang.Comparable<T>");
    assert_eq!(ctx.generic_element(t).unwrap(), id);
    assert_eq!(ctx.executable_type(get).unwrap().to_string(), "()T");
    assert_eq!(ctx.executable_type(set).unwrap().to_string(), "(T)void");
    assert_eq!(
        ctx.executable_type(first).unwrap().to_string(),
        "<R>(java.util.List<? extends R>)R"
    );
    let value = ctx.parameters(set).unwrap()[0];
    assert_eq!(ctx.kind(value).unwrap(), ElementKind::Parameter);
    assert_eq!(ctx.enclosing_element(value).unwrap(), Some(set));
}

#[test]
fn failed_bounds_leave_the_builder_unchanged() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut generic = ClassBuilder::top_level(&ctx, "com.example.G", ElementKind::Class).unwrap();
    generic.superclass_named("Object").unwrap();

    let err = generic.add_type_parameter("T", &["NoSuchType"]).unwrap_err();
    assert!(matches!(err, ModelError::InvalidReference(_)));
    assert_eq!(generic.as_type().unwrap().to_string(), "com.example.G");
    assert!(generic.resolve_type("T").is_err());

    let t = generic.add_type_parameter("T", &["Number"]).unwrap();
    assert_eq!(generic.as_type().unwrap().to_string(), "com.example.G<T>");
    let id = generic.finish().unwrap();
    assert_eq!(ctx.type_parameters(id).unwrap().to_vec(), vec![t]);
    assert_eq!(ctx.as_type(id).unwrap().to_string(), "com.example.G<T>");
    assert_eq!(ctx.bounds(t).unwrap()[0].to_string(), "java.lang.Number");
}

#[test]
fn failed_method_bounds_keep_the_class_usable() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut util = ClassBuilder::top_level(&ctx, "com.example.Util", ElementKind::Class).unwrap();
    util.superclass_named("Object").unwrap();
    assert!(util.method("pick").unwrap().type_parameter("R", &["Missing"]).is_err());

    let pick = util
        .method("pick")
        .unwrap()
        .type_parameter("R", &["Comparable<R>"])
        .unwrap()
        .param("value", "R")
        .unwrap()
        .returns("R")
        .unwrap()
        .finish()
        .unwrap();
    let id = util.finish().unwrap();
    assert_eq!(ctx.enclosed_elements(id).unwrap().to_vec(), vec![pick]);
    assert_eq!(ctx.executable_type(pick).unwrap().to_string(), "<R>(R)R");
}

#[test]
fn nested_builders_share_the_outer_scope() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut outer = ClassBuilder::top_level(&ctx, "com.example.Outer", ElementKind::Class).unwrap();
    outer.superclass_named("Object").unwrap();
    outer.add_type_parameter("E", &[]).unwrap();

    let mut inner = outer.nested("Inner", ElementKind::Class).unwrap();
    inner.superclass_named("Object").unwrap();
    let item = inner.field("item").unwrap().of_type("E").unwrap().finish().unwrap();
    let inner = inner.finish().unwrap();
    let outer = outer.finish().unwrap();

    assert_eq!(ctx.enclosed_elements(outer).unwrap().to_vec(), vec![inner]);
    assert_eq!(ctx.enclosing_element(inner).unwrap(), Some(outer));
    assert_eq!(ctx.nesting_kind(inner).unwrap(), NestingKind::Member);
    assert_eq!(ctx.qualified_name(inner).unwrap(), Some(Name::new("com.example.Outer.Inner")));
    assert_eq!(ctx.binary_name(inner).unwrap(), "com.example.Outer$Inner");
    assert_eq!(ctx.type_element("com.example.Outer.Inner").unwrap(), Some(inner));
    assert_eq!(ctx.variable_type(item).unwrap().to_string(), "E");
    assert_eq!(ctx.as_type(inner).unwrap().to_string(), "com.example.Outer<E>.Inner");
}

#[test]
fn unfinished_nested_builders_block_the_outer_one() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut outer = ClassBuilder::top_level(&ctx, "com.example.Host", ElementKind::Class).unwrap();
    outer.superclass_named("Object").unwrap();
    let abandoned = outer.nested("Draft", ElementKind::Interface).unwrap();

    assert!(outer.finish().unwrap_err().is_invalid_state());

    outer.discard_nested(abandoned).unwrap();
    assert_eq!(ctx.type_element("com.example.Host.Draft").unwrap(), None);
    let host = outer.finish().unwrap();
    assert!(ctx.enclosed_elements(host).unwrap().is_empty());
}

#[test]
fn only_own_nested_builders_can_be_discarded() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut first = ClassBuilder::top_level(&ctx, "com.example.First", ElementKind::Class).unwrap();
    let mut second = ClassBuilder::top_level(&ctx, "com.example.Second", ElementKind::Class).unwrap();
    let inner = first.nested("Inner", ElementKind::Class).unwrap();
    assert!(second
        .discard_nested(inner)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn builders_can_reference_each_other_before_finishing() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut node = ClassBuilder::top_level(&ctx, "com.example.Node", ElementKind::Class).unwrap();
    let mut leaf = ClassBuilder::top_level(&ctx, "com.example.Leaf", ElementKind::Class).unwrap();
    node.superclass_named("Object").unwrap();
    leaf.superclass_named("com.example.Node").unwrap();
    node.field("first").unwrap().of_type("com.example.Leaf").unwrap().finish().unwrap();
    node.method("children")
        .unwrap()
        .returns("java.util.List<com.example.Leaf>")
        .unwrap()
        .finish()
        .unwrap();

    let leaf_id = leaf.finish().unwrap();
    let node_id = node.finish().unwrap();

    assert_eq!(ctx.superclass(leaf_id).unwrap().element(), Some(node_id));
    let members = ctx.enclosed_elements(node_id).unwrap();
    assert_eq!(ctx.variable_type(members[0]).unwrap().element(), Some(leaf_id));
    assert_eq!(
        ctx.return_type(members[1]).unwrap().to_string(),
        "java.util.List<com.example.Leaf>"
    );
}

#[test]
fn enums_extend_enum_of_themselves() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut color = ClassBuilder::top_level(&ctx, "com.example.Color", ElementKind::Enum).unwrap();
    let red = color.enum_constant("RED").unwrap().finish().unwrap();
    color.enum_constant("GREEN").unwrap().finish().unwrap();
    let id = color.finish().unwrap();

    assert_eq!(ctx.superclass(id).unwrap().to_string(), "java.lang.Enum<com.example.Color>");
    assert_eq!(ctx.kind(red).unwrap(), ElementKind::EnumConstant);
    assert_eq!(ctx.variable_type(red).unwrap(), ctx.as_type(id).unwrap());
    let modifiers = ctx.modifiers(red).unwrap();
    assert!(modifiers.contains(Modifier::Static) && modifiers.contains(Modifier::Final));
    assert_eq!(ctx.enclosed_elements(id).unwrap().len(), 2);

    let mut plain = ClassBuilder::top_level(&ctx, "com.example.Plain", ElementKind::Class).unwrap();
    assert!(plain.enum_constant("NOPE").unwrap_err().is_invalid_argument());
}

#[test]
fn interface_and_annotation_members() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut shape = ClassBuilder::top_level(&ctx, "com.example.Shape", ElementKind::Interface).unwrap();
    assert!(shape.constructor().unwrap_err().is_invalid_argument());
    let area = shape.method("area").unwrap().returns("double").unwrap().finish().unwrap();
    shape.finish().unwrap();
    assert!(ctx.modifiers(area).unwrap().contains(Modifier::Abstract));

    let mut tag = ClassBuilder::top_level(&ctx, "com.example.Tag", ElementKind::AnnotationType).unwrap();
    tag.add_interface_named("java.lang.annotation.Annotation").unwrap();
    tag.method("value")
        .unwrap()
        .returns("String")
        .unwrap()
        .default_value(AnnotationValue::from(ConstValue::String("none".to_string())))
        .finish()
        .unwrap();
    let tag = tag.finish().unwrap();

    let mirror = ctx
        .annotation_mirror(tag, Vec::<(&str, AnnotationValue)>::new())
        .unwrap();
    let values = ctx.element_values_with_defaults(&mirror).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].1.as_str(), Some("none"));

    let mut holder = ClassBuilder::top_level(&ctx, "com.example.Tagged", ElementKind::Class).unwrap();
    holder.superclass_named("Object").unwrap();
    holder
        .annotate_named("com.example.Tag", [("value", AnnotationValue::from(ConstValue::String("x".to_string())))])
        .unwrap();
    let misplaced = holder
        .method("value")
        .unwrap()
        .default_value(AnnotationValue::from(ConstValue::Int(1)))
        .finish();
    assert!(misplaced.unwrap_err().is_invalid_state());
    let holder = holder.finish().unwrap();
    assert_eq!(ctx.annotation_mirrors(holder).unwrap().len(), 1);
}

#[test]
fn executables_check_their_shape() {
    let ctx = ModelContext::with_minimal_jdk();
    let mut fmt = ClassBuilder::top_level(&ctx, "com.example.Formatter", ElementKind::Class).unwrap();
    fmt.superclass_named("Object").unwrap();

    assert!(fmt
        .constructor()
        .unwrap()
        .returns("int")
        .unwrap_err()
        .is_invalid_argument());
    let ctor = fmt.constructor().unwrap().param("pattern", "String").unwrap().finish().unwrap();
    assert_eq!(ctx.return_type(ctor).unwrap().kind(), TypeKind::Void);
    assert_eq!(ctx.simple_name(ctor).unwrap(), "<init>");

    let format = fmt
        .method("format")
        .unwrap()
        .param("args", "Object...")
        .unwrap()
        .varargs()
        .returns("String")
        .unwrap()
        .finish()
        .unwrap();
    assert!(ctx.is_varargs(format).unwrap());
    assert_eq!(ctx.executable_type(format).unwrap().to_string(), "(java.lang.Object[])java.lang.String");

    let broken = fmt.method("broken").unwrap().param("count", "int").unwrap().varargs().finish();
    assert!(broken.unwrap_err().is_invalid_state());
    assert!(fmt
        .method("bad")
        .unwrap()
        .param("nothing", "void")
        .unwrap_err()
        .is_invalid_argument());

    let id = fmt.finish().unwrap();
    assert_eq!(ctx.enclosed_elements(id).unwrap().to_vec(), vec![ctor, format]);
}

#[test]
fn element_views_place_existing_elements() {
    let ctx = ModelContext::with_minimal_jdk();
    let string = ctx.require_type_element("java.lang.String").unwrap();
    let mut holder = ClassBuilder::top_level(&ctx, "com.example.Holder", ElementKind::Class).unwrap();
    holder.superclass_named("Object").unwrap();
    let view = holder
        .add_element_view(ElementView::new(string).with_simple_name("Text"))
        .unwrap();
    let id = holder.finish().unwrap();

    assert_eq!(ctx.enclosed_elements(id).unwrap().to_vec(), vec![view]);
    assert_eq!(ctx.simple_name(view).unwrap(), "Text");
    assert_eq!(ctx.enclosing_element(view).unwrap(), Some(id));
    assert_eq!(ctx.qualified_name(view).unwrap(), Some(Name::new("com.example.Holder.Text")));
    assert_eq!(ctx.superclass(view).unwrap(), ctx.superclass(string).unwrap());
    assert_eq!(ctx.kind(view).unwrap(), ElementKind::Class);
}
