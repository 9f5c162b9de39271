use mirage_model::{ModelContext, PrimitiveKind};
use mirage_types::{is_assignable, is_primitive_widening, is_same_type, is_subtype};
use proptest::prelude::*;

fn primitive() -> impl Strategy<Value = PrimitiveKind> {
    proptest::sample::select(PrimitiveKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn widening_is_a_strict_partial_order(a in primitive(), b in primitive(), c in primitive()) {
        prop_assert!(!is_primitive_widening(a, a));
        prop_assert!(!(is_primitive_widening(a, b) && is_primitive_widening(b, a)));
        if is_primitive_widening(a, b) && is_primitive_widening(b, c) {
            prop_assert!(is_primitive_widening(a, c));
        }
    }

    #[test]
    fn primitive_subtyping_is_identity_or_widening(a in primitive(), b in primitive()) {
        let ctx = ModelContext::with_minimal_jdk();
        let (ta, tb) = (ctx.primitive_type(a), ctx.primitive_type(b));
        prop_assert_eq!(is_same_type(&ctx, &ta, &tb).unwrap(), a == b);
        prop_assert_eq!(
            is_subtype(&ctx, &ta, &tb).unwrap(),
            a == b || is_primitive_widening(a, b)
        );
        prop_assert_eq!(
            is_assignable(&ctx, &ta, &tb).unwrap(),
            is_subtype(&ctx, &ta, &tb).unwrap()
        );
    }

    #[test]
    fn boolean_never_converts(k in primitive()) {
        prop_assume!(k != PrimitiveKind::Boolean);
        prop_assert!(!is_primitive_widening(PrimitiveKind::Boolean, k));
        prop_assert!(!is_primitive_widening(k, PrimitiveKind::Boolean));
    }

    #[test]
    fn primitive_mirrors_are_singletons(k in primitive()) {
        let ctx = ModelContext::with_minimal_jdk();
        prop_assert!(ctx.primitive_type(k).same_instance(&ctx.primitive_type(k)));
    }
}
