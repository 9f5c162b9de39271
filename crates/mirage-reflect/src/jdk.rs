//! A minimal set of JDK descriptors, enough for relation queries over core library types.

use crate::annotation::{AnnotationValue, ConstValue};
use crate::flags::*;
use crate::generic::{BaseType, GenericType};
use crate::info::{ClassInfo, FieldInfo, MethodInfo, ParameterInfo};
use crate::provider::MapTypeProvider;

const PUBLIC_ABSTRACT: u16 = ACC_PUBLIC | ACC_ABSTRACT;
const PUBLIC_INTERFACE: u16 = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
const PUBLIC_ANNOTATION: u16 = PUBLIC_INTERFACE | ACC_ANNOTATION;
const CONSTANT: u16 = ACC_PUBLIC | ACC_STATIC | ACC_FINAL;

fn class(name: &str, flags: u16, signature: &str) -> ClassInfo {
    ClassInfo::from_signature(name, flags, signature).expect("built-in class signature is valid")
}

fn method(name: &str, flags: u16, signature: &str) -> MethodInfo {
    MethodInfo::from_signature(name, flags, signature).expect("built-in method signature is valid")
}

fn ctor(signature: &str) -> MethodInfo {
    method("<init>", ACC_PUBLIC, signature)
}

fn object() -> GenericType {
    GenericType::class("java.lang.Object")
}

fn boxed(name: &str, primitive: BaseType, numeric: bool) -> ClassInfo {
    let binary = format!("java.lang.{name}");
    let superclass = if numeric { "Ljava/lang/Number;" } else { "Ljava/lang/Object;" };
    let internal = binary.replace('.', "/");
    let sig = format!("{superclass}Ljava/io/Serializable;Ljava/lang/Comparable<L{internal};>;");
    let prim = GenericType::Primitive(primitive);
    class(&binary, ACC_PUBLIC | ACC_FINAL, &sig)
        .field(FieldInfo::new(
            "TYPE",
            CONSTANT,
            GenericType::parameterized("java.lang.Class", vec![GenericType::class(binary.clone())]),
        ))
        .constructor(MethodInfo::new("<init>", ACC_PUBLIC).param(ParameterInfo::new("value", prim.clone())))
        .method(
            MethodInfo::new("valueOf", ACC_PUBLIC | ACC_STATIC)
                .param(ParameterInfo::new("value", prim.clone()))
                .returns(GenericType::class(binary.clone())),
        )
        .method(MethodInfo::new(format!("{}Value", primitive.keyword()), ACC_PUBLIC).returns(prim))
}

/// Descriptors for `java.lang.Object`, `String`, the primitive boxes, `Comparable`,
/// `Iterable`, the core collection interfaces, `Enum` and a few annotation types.
pub fn minimal_jdk() -> MapTypeProvider {
    let mut jdk = MapTypeProvider::new();

    jdk.insert(
        ClassInfo::new("java.lang.Object", ACC_PUBLIC)
            .constructor(ctor("()V"))
            .method(method("equals", ACC_PUBLIC, "(Ljava/lang/Object;)Z"))
            .method(method("hashCode", ACC_PUBLIC | ACC_NATIVE, "()I"))
            .method(method("toString", ACC_PUBLIC, "()Ljava/lang/String;"))
            .method(method("getClass", ACC_PUBLIC | ACC_FINAL | ACC_NATIVE, "()Ljava/lang/Class<*>;")),
    );
    jdk.insert(class(
        "java.lang.Class",
        ACC_PUBLIC | ACC_FINAL,
        "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/io/Serializable;",
    ));
    jdk.insert(ClassInfo::new("java.io.Serializable", PUBLIC_INTERFACE));
    jdk.insert(ClassInfo::new("java.lang.Cloneable", PUBLIC_INTERFACE));
    jdk.insert(
        class(
            "java.lang.Comparable",
            PUBLIC_INTERFACE,
            "<T:Ljava/lang/Object;>Ljava/lang/Object;",
        )
        .method(method("compareTo", PUBLIC_ABSTRACT, "(TT;)I")),
    );
    jdk.insert(
        ClassInfo::new("java.lang.CharSequence", PUBLIC_INTERFACE)
            .method(method("length", PUBLIC_ABSTRACT, "()I"))
            .method(method("charAt", PUBLIC_ABSTRACT, "(I)C")),
    );
    jdk.insert(
        class(
            "java.lang.String",
            ACC_PUBLIC | ACC_FINAL,
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;Ljava/lang/CharSequence;",
        )
        .constructor(ctor("()V"))
        .method(method("length", ACC_PUBLIC, "()I"))
        .method(method("charAt", ACC_PUBLIC, "(I)C"))
        .method(method("compareTo", ACC_PUBLIC, "(Ljava/lang/String;)I"))
        .method(method("isEmpty", ACC_PUBLIC, "()Z")),
    );
    jdk.insert(
        class(
            "java.lang.Number",
            PUBLIC_ABSTRACT,
            "Ljava/lang/Object;Ljava/io/Serializable;",
        )
        .constructor(ctor("()V"))
        .method(method("intValue", PUBLIC_ABSTRACT, "()I"))
        .method(method("longValue", PUBLIC_ABSTRACT, "()J"))
        .method(method("doubleValue", PUBLIC_ABSTRACT, "()D")),
    );

    jdk.insert(boxed("Boolean", BaseType::Boolean, false));
    jdk.insert(boxed("Character", BaseType::Char, false));
    jdk.insert(boxed("Byte", BaseType::Byte, true));
    jdk.insert(boxed("Short", BaseType::Short, true));
    jdk.insert(
        boxed("Integer", BaseType::Int, true)
            .field(
                FieldInfo::new("MAX_VALUE", CONSTANT, GenericType::Primitive(BaseType::Int))
                    .with_constant(ConstValue::Int(i32::MAX)),
            )
            .field(
                FieldInfo::new("MIN_VALUE", CONSTANT, GenericType::Primitive(BaseType::Int))
                    .with_constant(ConstValue::Int(i32::MIN)),
            ),
    );
    jdk.insert(boxed("Long", BaseType::Long, true));
    jdk.insert(boxed("Float", BaseType::Float, true));
    jdk.insert(boxed("Double", BaseType::Double, true));
    jdk.insert(ClassInfo::new("java.lang.Void", ACC_PUBLIC | ACC_FINAL).extends(object()));

    jdk.insert(
        class(
            "java.util.Iterator",
            PUBLIC_INTERFACE,
            "<E:Ljava/lang/Object;>Ljava/lang/Object;",
        )
        .method(method("hasNext", PUBLIC_ABSTRACT, "()Z"))
        .method(method("next", PUBLIC_ABSTRACT, "()TE;")),
    );
    jdk.insert(
        class(
            "java.lang.Iterable",
            PUBLIC_INTERFACE,
            "<T:Ljava/lang/Object;>Ljava/lang/Object;",
        )
        .method(method("iterator", PUBLIC_ABSTRACT, "()Ljava/util/Iterator<TT;>;")),
    );
    jdk.insert(
        class(
            "java.util.Collection",
            PUBLIC_INTERFACE,
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;",
        )
        .method(method("size", PUBLIC_ABSTRACT, "()I"))
        .method(method("add", PUBLIC_ABSTRACT, "(TE;)Z")),
    );
    jdk.insert(
        class(
            "java.util.List",
            PUBLIC_INTERFACE,
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;",
        )
        .method(method("get", PUBLIC_ABSTRACT, "(I)TE;")),
    );
    jdk.insert(
        class(
            "java.util.ArrayList",
            ACC_PUBLIC,
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        )
        .constructor(ctor("()V"))
        .constructor(ctor("(I)V"))
        .method(method("size", ACC_PUBLIC, "()I"))
        .method(method("add", ACC_PUBLIC, "(TE;)Z"))
        .method(method("get", ACC_PUBLIC, "(I)TE;")),
    );
    jdk.insert(
        class(
            "java.util.Map",
            PUBLIC_INTERFACE,
            "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;",
        )
        .method(method("get", PUBLIC_ABSTRACT, "(Ljava/lang/Object;)TV;"))
        .method(method("put", PUBLIC_ABSTRACT, "(TK;TV;)TV;"))
        .nested("java.util.Map$Entry"),
    );
    jdk.insert(
        class(
            "java.util.Map$Entry",
            PUBLIC_INTERFACE | ACC_STATIC,
            "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;",
        )
        .declared_in("java.util.Map")
        .method(method("getKey", PUBLIC_ABSTRACT, "()TK;"))
        .method(method("getValue", PUBLIC_ABSTRACT, "()TV;")),
    );

    jdk.insert(
        class(
            "java.lang.Enum",
            PUBLIC_ABSTRACT,
            "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
        )
        .method(method("name", ACC_PUBLIC | ACC_FINAL, "()Ljava/lang/String;"))
        .method(method("ordinal", ACC_PUBLIC | ACC_FINAL, "()I")),
    );
    jdk.insert(ClassInfo::new("java.lang.annotation.Annotation", PUBLIC_INTERFACE));

    let policy = GenericType::class("java.lang.annotation.RetentionPolicy");
    let mut retention_policy = class(
        "java.lang.annotation.RetentionPolicy",
        ACC_PUBLIC | ACC_FINAL | ACC_ENUM,
        "Ljava/lang/Enum<Ljava/lang/annotation/RetentionPolicy;>;",
    );
    for constant in ["SOURCE", "CLASS", "RUNTIME"] {
        retention_policy = retention_policy.field(FieldInfo::new(
            constant,
            CONSTANT | ACC_ENUM,
            policy.clone(),
        ));
    }
    jdk.insert(retention_policy);

    let annotation_iface = GenericType::class("java.lang.annotation.Annotation");
    jdk.insert(
        ClassInfo::new("java.lang.annotation.Retention", PUBLIC_ANNOTATION)
            .implements(annotation_iface.clone())
            .method(MethodInfo::new("value", PUBLIC_ABSTRACT).returns(policy)),
    );
    jdk.insert(
        ClassInfo::new("java.lang.Override", PUBLIC_ANNOTATION).implements(annotation_iface.clone()),
    );
    jdk.insert(
        ClassInfo::new("java.lang.Deprecated", PUBLIC_ANNOTATION)
            .implements(annotation_iface)
            .method(
                MethodInfo::new("since", PUBLIC_ABSTRACT)
                    .returns(GenericType::class("java.lang.String"))
                    .with_default(AnnotationValue::Const(ConstValue::String(String::new()))),
            )
            .method(
                MethodInfo::new("forRemoval", PUBLIC_ABSTRACT)
                    .returns(GenericType::Primitive(BaseType::Boolean))
                    .with_default(AnnotationValue::Const(ConstValue::Boolean(false))),
            ),
    );

    jdk
}
