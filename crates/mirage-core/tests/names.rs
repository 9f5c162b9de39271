use mirage_core::{IdentifierSanitizer, ModelError, Name, NameTable, SanitizeError};
use pretty_assertions::assert_eq;

#[test]
fn qualified_names_split_on_the_last_dot() {
    let name = Name::new("java.util.Map.Entry");
    assert_eq!(name.simple(), "Entry");
    assert_eq!(name.qualifier(), Some(Name::new("java.util.Map")));
    assert_eq!(Name::new("Object").qualifier(), None);
    assert_eq!(Name::new("Object").simple(), "Object");
}

#[test]
fn child_skips_the_separator_for_the_unnamed_package() {
    assert_eq!(Name::default().child("Foo"), "Foo");
    assert_eq!(Name::new("com.example").child("Foo").as_str(), "com.example.Foo");
}

#[test]
fn names_and_strings_compare_both_ways() {
    let name = Name::from("java.lang.String".to_string());
    assert!(name.content_equals("java.lang.String"));
    assert!("java.lang.String" == name);
    assert_eq!(name.to_string(), "java.lang.String");
    assert_eq!(format!("{name:?}"), "Name(\"java.lang.String\")");
}

#[test]
fn table_tokens_follow_text_equality() {
    let mut table = NameTable::new();
    assert!(table.is_empty());
    let a = table.intern("java.util.List");
    let b = table.intern("java.util.List");
    let c = table.intern("java.util.Set");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("java.util.Set"), Some(c));
    assert_eq!(table.get("java.util.Map"), None);
    assert_eq!(table.resolve(c), "java.util.Set");
    assert_eq!(table.name(a), Name::new("java.util.List"));
}

#[test]
fn sanitizer_keeps_earlier_mappings_after_a_conflict() {
    let mut sanitizer = IdentifierSanitizer::new();
    assert_eq!(sanitizer.sanitize("enum").unwrap(), "enum_");
    assert!(matches!(
        sanitizer.sanitize("enum_"),
        Err(SanitizeError::Conflict { .. })
    ));
    assert_eq!(sanitizer.sanitize("enum").unwrap(), "enum_");
    assert_eq!(sanitizer.sanitize("größe").unwrap(), "größe");
}

#[test]
fn error_helpers_classify_variants() {
    let err = ModelError::invalid_argument("negative index");
    assert!(err.is_invalid_argument());
    assert!(!err.is_unsupported());
    assert_eq!(err.to_string(), "invalid argument: negative index");
    assert!(ModelError::invalid_state("no superclass").is_invalid_state());
    assert_eq!(
        ModelError::NotFound(Name::new("a.B")).to_string(),
        "no type named `a.B`"
    );
}
