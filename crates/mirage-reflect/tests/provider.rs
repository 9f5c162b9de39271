use std::io::Write;
use std::sync::Arc;

use mirage_reflect::flags::{ACC_INTERFACE, ACC_PUBLIC};
use mirage_reflect::{
    lookup_qualified, minimal_jdk, ChainedProvider, ClassInfo, GenericType, JsonTypeProvider,
    MapTypeProvider, TypeProvider,
};

use pretty_assertions::assert_eq;

#[test]
fn qualified_lookup_retries_nested_binary_names() {
    let jdk = minimal_jdk();

    let entry = lookup_qualified(&jdk, "java.util.Map.Entry", true).expect("Map.Entry resolves");
    assert_eq!(entry.binary_name, "java.util.Map$Entry");

    assert!(lookup_qualified(&jdk, "java.util.Map.Entry", false).is_none());
    assert!(lookup_qualified(&jdk, "java.util.Missing", true).is_none());
}

#[test]
fn chained_provider_prefers_earlier_providers() {
    let shadow = MapTypeProvider::new().with(
        ClassInfo::new("java.lang.String", ACC_PUBLIC).extends(GenericType::class("java.lang.Object")),
    );
    let chain = ChainedProvider::new()
        .push(Arc::new(shadow))
        .push(Arc::new(minimal_jdk()));

    let string = chain.lookup_type("java.lang.String").unwrap();
    assert!(string.interfaces.is_empty());
    assert!(chain.lookup_type("java.lang.Integer").is_some());
}

#[test]
fn json_pack_round_trips_through_a_file() {
    let pack = vec![
        ClassInfo::new("com.example.Greeter", ACC_PUBLIC | ACC_INTERFACE),
        ClassInfo::new("com.example.Impl", ACC_PUBLIC)
            .extends(GenericType::class("java.lang.Object"))
            .implements(GenericType::class("com.example.Greeter")),
    ];
    let json = serde_json::to_string(&pack).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let provider = JsonTypeProvider::load(file.path()).unwrap();
    assert_eq!(provider.len(), 2);
    let implementation = provider.lookup_type("com.example.Impl").unwrap();
    assert_eq!(implementation.as_ref(), &pack[1]);
}

#[test]
fn json_pack_accepts_minimal_objects() {
    let provider = JsonTypeProvider::from_json_str(
        r#"[{"binary_name": "com.example.Empty", "superclass": {"class": "java.lang.Object"}}]"#,
    )
    .unwrap();
    let empty = provider.lookup_type("com.example.Empty").unwrap();
    assert_eq!(empty.superclass, Some(GenericType::class("java.lang.Object")));
    assert!(empty.methods.is_empty());

    assert!(JsonTypeProvider::from_json_str("{").is_err());
}
