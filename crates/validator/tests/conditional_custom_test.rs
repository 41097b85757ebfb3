//! `when` branches and registry-backed custom validators.

use pretty_assertions::assert_eq;
use serde_json::json;
use strata_validator::prelude::*;

fn account_schema() -> ObjectSchema {
    object().keys(keys! {
        "kind" => string().required().lowercase().priority(1),
        "code" => string().when("kind", "business", string().required().length(8)),
        "age" => number().when("kind", "person", number().min(18.0)),
    })
}

// ============================================================================
// WHEN
// ============================================================================

#[test]
fn branch_errors_are_annotated_with_the_condition() {
    let outcome = validate(&account_schema(), json!({"kind": "BUSINESS", "code": "123"})).unwrap();
    assert_eq!(
        outcome.errors.to_strings(),
        vec!["code must have exactly 8 characters when kind = business"]
    );
}

#[test]
fn branch_does_not_run_when_the_value_differs() {
    let outcome = validate(&account_schema(), json!({"kind": "person", "code": "123", "age": 30})).unwrap();
    assert!(outcome.is_valid());

    let outcome = validate(&account_schema(), json!({"kind": "person", "age": 12})).unwrap();
    assert_eq!(outcome.errors.to_strings(), vec!["age must be >= 18 when kind = person"]);
}

#[test]
fn branch_does_not_run_when_the_reference_is_missing() {
    let schema = object().keys(keys! {
        "code" => string().when("kind", "business", string().length(8)),
    });
    assert!(validate(&schema, json!({"code": "123"})).unwrap().is_valid());
}

#[test]
fn template_is_cleared_after_the_branch() {
    let schema = object().keys(keys! {
        "kind" => string().priority(1),
        "code" => string()
            .when("kind", "business", string().min(8))
            .max(2),
        "name" => string().required(),
    });
    let outcome = validate(&schema, json!({"kind": "business", "code": "123"})).unwrap();
    assert_eq!(
        outcome.errors.to_strings(),
        vec![
            "code cannot have more than 2 characters",
            "code must have at least 8 characters when kind = business",
            "name is required",
        ]
    );
}

#[test]
fn reference_value_is_not_expanded_as_a_template() {
    let schema = object().keys(keys! {
        "kind" => string().priority(1),
        "code" => string().when("kind", "{message}", string().min(8)),
    });
    let outcome = validate(&schema, json!({"kind": "{message}", "code": "123"})).unwrap();
    assert_eq!(
        outcome.errors.to_strings(),
        vec!["code must have at least 8 characters when kind = {message}"]
    );
}

#[test]
fn branch_can_rewrite_the_value() {
    let schema = object().keys(keys! {
        "currency" => string().priority(1),
        "amount" => number().when("currency", "JPY", number().round()),
    });
    let outcome = validate(&schema, json!({"currency": "JPY", "amount": 10.6})).unwrap();
    assert_eq!(outcome.value, Value::from(json!({"currency": "JPY", "amount": 11})));
}

#[test]
fn condition_compares_non_string_values() {
    let schema = object().keys(keys! {
        "gift" => boolean(),
        "message" => string().when("gift", true, string().required().max(5)),
    });
    let outcome = validate(&schema, json!({"gift": true, "message": "too long"})).unwrap();
    assert_eq!(
        outcome.errors.to_strings(),
        vec!["message cannot have more than 5 characters when gift = true"]
    );
    assert!(validate(&schema, json!({"gift": false, "message": "too long"})).unwrap().is_valid());
}

// ============================================================================
// CUSTOM VALIDATORS
// ============================================================================

fn slug_engine() -> Engine {
    Engine::builder()
        .register("slug", |ctx, _args| {
            let ok = ctx
                .value()
                .as_str()
                .is_some_and(|s| s.chars().all(|c| c.is_ascii_lowercase() || c == '-'));
            if !ok {
                ctx.report_message("must be a slug");
            }
        })
        .register("divisible_by", |ctx, args| {
            let divisor = args.first().and_then(Value::as_f64).unwrap_or(1.0);
            if ctx.value().as_f64().is_some_and(|n| n % divisor != 0.0) {
                ctx.report(Violation::custom(format!("must be divisible by {divisor}")));
            }
        })
        .build()
}

#[test]
fn custom_validators_receive_context_and_arguments() {
    let schema = object().keys(keys! {
        "slug" => string().custom("slug", []),
        "pack" => number().custom("divisible_by", [Value::from(6)]),
    });
    let outcome = slug_engine()
        .validate(&schema, json!({"slug": "Hello World", "pack": 20}))
        .unwrap();
    assert_eq!(
        outcome.errors.to_strings(),
        vec!["pack must be divisible by 6", "slug must be a slug"]
    );
}

#[test]
fn registries_are_independent() {
    let schema = string().custom("slug", []);
    assert!(slug_engine().validate(&schema, "ok-slug").unwrap().is_valid());
    assert_eq!(
        Engine::new().validate(&schema, "ok-slug"),
        Err(ConfigError::unknown_validator("slug"))
    );
}

#[test]
fn unknown_validator_halts_the_whole_validation() {
    let schema = object().keys(keys! {
        "a" => string().custom("missing", []),
        "b" => string().required(),
    });
    let result = slug_engine().validate(&schema, json!({"a": "x"}));
    assert!(matches!(
        result,
        Err(ConfigError::UnknownValidator { ref name }) if name == "missing"
    ));
}

#[test]
fn unknown_validator_inside_array_items_is_fatal() {
    let schema = array().item(string().custom("missing", []));
    let result = Engine::new().validate(&schema, json!(["x"]));
    assert!(result.is_err());
}

#[test]
fn custom_validator_can_read_references() {
    let engine = Engine::builder()
        .register("matches", |ctx, args| {
            let Some(other) = args.first().and_then(Value::as_str) else {
                return;
            };
            if ctx.reference(other) != Some(ctx.value()) {
                let message = format!("must match {other}");
                ctx.report_message(message);
            }
        })
        .build();
    let schema = object().keys(keys! {
        "password" => string().required(),
        "confirm" => string().required().custom("matches", [Value::from("password")]),
    });
    let outcome = engine
        .validate(&schema, json!({"password": "hunter22", "confirm": "hunter2"}))
        .unwrap();
    assert_eq!(outcome.errors.to_strings(), vec!["confirm must match password"]);
}
