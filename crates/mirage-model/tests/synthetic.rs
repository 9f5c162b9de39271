use mirage_model::{
    ElementKind, Modifier, Modifiers, ModelContext, NestingKind, PrimitiveKind, TypeDefinition,
    TypeKind, VariableDefinition,
};
use pretty_assertions::assert_eq;

fn public() -> Modifiers {
    Modifiers::EMPTY.with(Modifier::Public)
}

#[test]
fn reserved_types_answer_defaults_until_defined() {
    let ctx = ModelContext::with_minimal_jdk();
    let foo = ctx.reserve_type("com.example.Foo", ElementKind::Class).unwrap();

    assert_eq!(ctx.type_element("com.example.Foo").unwrap(), Some(foo));
    assert!(ctx.enclosed_elements(foo).unwrap().is_empty());
    assert_eq!(ctx.superclass(foo).unwrap().kind(), TypeKind::None);
    assert_eq!(ctx.enclosing_element(foo).unwrap(), None);
    assert!(ctx.modifiers(foo).unwrap().is_empty());
    assert!(!ctx.element(foo).unwrap().is_complete());

    // Forward references work before the type is defined.
    assert_eq!(ctx.as_type(foo).unwrap().to_string(), "com.example.Foo");
}

#[test]
fn defined_types_expose_their_definition() {
    let ctx = ModelContext::with_minimal_jdk();
    let package = ctx.package_element("com.example");
    let foo = ctx.reserve_type("com.example.Foo", ElementKind::Class).unwrap();
    let x = ctx.reserve_member(ElementKind::Field, "x").unwrap();
    ctx.define_variable(
        x,
        VariableDefinition {
            modifiers: Modifiers::EMPTY.with(Modifier::Private),
            enclosing: foo,
            ty: ctx.primitive_type(PrimitiveKind::Int),
            constant: None,
            annotations: Vec::new(),
        },
    )
    .unwrap();

    let object = ctx.root_type().unwrap();
    let ty = ctx
        .define_type(
            foo,
            TypeDefinition {
                modifiers: public(),
                enclosing: package,
                nesting: NestingKind::TopLevel,
                superclass: object.clone(),
                interfaces: Vec::new(),
                type_parameters: Vec::new(),
                enclosed: vec![x],
                annotations: Vec::new(),
                as_type: None,
            },
        )
        .unwrap();

    assert!(ty.same_instance(&ctx.as_type(foo).unwrap()));
    assert_eq!(ctx.superclass(foo).unwrap(), object);
    assert_eq!(ctx.enclosed_elements(foo).unwrap().to_vec(), vec![x]);
    assert_eq!(ctx.variable_type(x).unwrap().kind(), TypeKind::Primitive(PrimitiveKind::Int));
    assert_eq!(ctx.enclosing_element(x).unwrap(), Some(foo));
    assert_eq!(ctx.package_of(x).unwrap(), package);
    assert_eq!(ctx.binary_name(foo).unwrap(), "com.example.Foo");
}

#[test]
fn definitions_are_final() {
    let ctx = ModelContext::with_minimal_jdk();
    let package = ctx.package_element("com.example");
    let bar = ctx.reserve_type("com.example.Bar", ElementKind::Interface).unwrap();
    let definition = TypeDefinition {
        modifiers: public(),
        enclosing: package,
        nesting: NestingKind::TopLevel,
        superclass: ctx.no_type(mirage_model::NoTypeKind::None),
        interfaces: Vec::new(),
        type_parameters: Vec::new(),
        enclosed: Vec::new(),
        annotations: Vec::new(),
        as_type: None,
    };

    ctx.define_type(bar, definition.clone()).unwrap();
    assert!(ctx.define_type(bar, definition).unwrap_err().is_invalid_state());

    let other = ctx.package_element("com.other");
    assert!(ctx.set_enclosing_element(bar, other).unwrap_err().is_invalid_state());
    ctx.set_enclosing_element(bar, package).unwrap();
}

#[test]
fn reserving_an_existing_name_fails() {
    let ctx = ModelContext::with_minimal_jdk();
    let err = ctx.reserve_type("java.lang.String", ElementKind::Class).unwrap_err();
    assert!(err.is_invalid_argument());

    ctx.reserve_type("com.example.Once", ElementKind::Class).unwrap();
    assert!(ctx
        .reserve_type("com.example.Once", ElementKind::Class)
        .unwrap_err()
        .is_invalid_argument());
    assert!(ctx.reserve_type(" ", ElementKind::Class).unwrap_err().is_invalid_argument());
    assert!(ctx
        .reserve_type("com.example.Field", ElementKind::Field)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn reflective_elements_cannot_be_redefined() {
    let ctx = ModelContext::with_minimal_jdk();
    let string = ctx.require_type_element("java.lang.String").unwrap();
    let err = ctx.set_enclosing_element(string, string).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn synthetic_type_parameters_default_to_the_root_bound() {
    let ctx = ModelContext::with_minimal_jdk();
    let boxed = ctx.reserve_type("com.example.Box", ElementKind::Class).unwrap();
    let t = ctx.reserve_type_parameter("T", boxed).unwrap();
    let var = ctx.as_type(t).unwrap();

    assert_eq!(var.to_string(), "T");
    assert_eq!(ctx.upper_bound(&var).unwrap().to_string(), "java.lang.Object");

    let number = ctx.declared_type_named("java.lang.Number", &[]).unwrap();
    ctx.define_type_parameter(t, vec![number.clone()]).unwrap();
    assert_eq!(ctx.upper_bound(&var).unwrap(), number);
    assert_eq!(ctx.generic_element(t).unwrap(), boxed);

    let lower = ctx.type_variable(t, Some(number)).unwrap();
    assert_eq!(ctx.lower_bound(&lower).unwrap().to_string(), "java.lang.Number");
    assert!(!lower.same_instance(&var));
}
