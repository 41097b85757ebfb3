//! Property-based tests for strata-validator.

use proptest::prelude::*;
use serde_json::json;
use strata_validator::prelude::{
    ErrorBag, FieldError, Schema, Value, Violation, array, keys, number, object, string, validate,
};

fn profile_schema() -> impl Schema {
    object().keys(keys! {
        "name" => string().required().trim().lowercase().min(1),
        "age" => number().parse_string().round().min(0.0),
        "tags" => array().item(string().trim()).max(4),
    })
}

// ============================================================================
// IDEMPOTENCE: a successful result validates again unchanged
// ============================================================================

proptest! {
    #[test]
    fn successful_validation_is_idempotent(
        name in "[ a-zA-Z]{0,12}",
        age in prop_oneof![
            (0u32..120).prop_map(|n| json!(n)),
            (0u32..120).prop_map(|n| json!(n.to_string())),
            (-5.0f64..5.0).prop_map(|n| json!(n)),
        ],
        tags in prop::collection::vec("[ a-z]{0,5}", 0..6),
    ) {
        let schema = profile_schema();
        let input = json!({"name": name, "age": age, "tags": tags});

        let first = validate(&schema, input).unwrap();
        prop_assume!(first.is_valid());

        let second = validate(&schema, first.value.clone()).unwrap();
        prop_assert!(second.is_valid(), "{}", second.errors);
        prop_assert_eq!(second.value, first.value);
    }

    #[test]
    fn validation_is_deterministic(input in "[ -~]{0,20}") {
        let schema = profile_schema();
        let document = json!({"name": input.clone(), "age": input.clone(), "tags": [input]});
        let first = validate(&schema, document.clone()).unwrap();
        let second = validate(&schema, document).unwrap();
        prop_assert_eq!(first.errors.to_strings(), second.errors.to_strings());
    }
}

// ============================================================================
// STRING LENGTH COUNTS CHARACTERS
// ============================================================================

proptest! {
    #[test]
    fn exact_length_matches_char_count(s in "\\PC{0,16}", n in 0usize..16) {
        let outcome = validate(&string().length(n), s.as_str()).unwrap();
        prop_assert_eq!(outcome.is_valid(), s.chars().count() == n);
    }

    #[test]
    fn min_and_max_bracket_char_count(s in "\\PC{0,16}") {
        let len = s.chars().count();
        prop_assert!(validate(&string().min(len).max(len), s.as_str()).unwrap().is_valid());
        let too_long = validate(&string().max(len.saturating_sub(1)), s.as_str()).unwrap();
        prop_assert_eq!(too_long.is_valid(), len == 0);
    }
}

// ============================================================================
// ERROR BAG
// ============================================================================

proptest! {
    #[test]
    fn bag_deduplicates_by_field_and_message(
        entries in prop::collection::vec(("[a-c]", "[x-z]"), 0..20),
    ) {
        let mut bag = ErrorBag::new();
        for (field, message) in &entries {
            bag.add(FieldError::new(field.as_str(), Violation::custom(message.clone())));
            bag.add(FieldError::new(field.as_str(), Violation::custom(message.clone())));
        }
        let mut unique: Vec<String> = entries
            .iter()
            .map(|(field, message)| format!("{field} {message}"))
            .collect();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(bag.to_strings(), unique);
    }

    #[test]
    fn rendered_errors_are_sorted(values in prop::collection::vec(-10i32..10, 0..12)) {
        let schema = array().item(number().min(0.0).integer());
        let outcome = validate(&schema, Value::from(values)).unwrap();
        let rendered = outcome.errors.to_strings();
        let mut sorted = rendered.clone();
        sorted.sort();
        prop_assert_eq!(rendered, sorted);
    }
}
