//! Rendered and serialized error output.

use serde_json::json;
use strata_validator::prelude::*;

fn signup_schema() -> ObjectSchema {
    object()
        .keys(keys! {
            "email" => string().required().trim().lowercase().max(40),
            "password" => string().required().min(12),
            "age" => number().parse_string().integer().min(13.0),
            "plan" => string().default("free").valid(["free", "pro", "team"]),
            "seats" => number().when("plan", "team", number().required().min(2.0)),
            "invites" => array().max(3).item(object().keys(keys! {
                "email" => string().required(),
                "role" => string().invalid(["owner"]),
            })),
        })
        .without(["card", "invoice"])
}

fn invalid_signup() -> serde_json::Value {
    json!({
        "password": "short",
        "age": "12.5",
        "plan": "team",
        "seats": 1,
        "invites": [
            {"email": "a@example.com", "role": "owner"},
            {"role": "admin"},
        ],
        "card": "4242",
        "invoice": true,
    })
}

#[test]
fn rendered_error_list() {
    let outcome = validate(&signup_schema(), invalid_signup()).unwrap();
    insta::assert_snapshot!(outcome.errors.to_strings().join("\n"), @r"
    age must be >= 13
    age must be an integer
    contains forbidden keys [card, invoice]
    email is required
    invites.0.role cannot be any of [owner]
    invites.1.email is required
    password must have at least 12 characters
    seats must be >= 2 when plan = team
    ");
}

#[test]
fn display_joins_in_sorted_order() {
    let schema = object().keys(keys! {
        "b" => string().required(),
        "a" => number().required(),
    });
    let outcome = validate(&schema, json!({})).unwrap();
    insta::assert_snapshot!(outcome.errors.to_string(), @"[a is required; b is required]");
}

#[test]
fn serialized_as_sorted_string_array() {
    let outcome = validate(&signup_schema(), json!({"email": "x@example.com"})).unwrap();
    insta::assert_json_snapshot!(outcome.errors, @r#"
    [
      "password is required"
    ]
    "#);
}

#[test]
fn error_kinds_have_stable_codes() {
    let outcome = validate(&signup_schema(), invalid_signup()).unwrap();
    let mut codes: Vec<(String, &str)> = outcome
        .errors
        .sorted()
        .into_iter()
        .map(|error| (error.field.clone(), error.code()))
        .collect();
    codes.dedup();
    insta::assert_debug_snapshot!(codes, @r#"
    [
        (
            "age",
            "range_bound",
        ),
        (
            "age",
            "type_mismatch",
        ),
        (
            "",
            "forbidden_keys",
        ),
        (
            "email",
            "required",
        ),
        (
            "invites.0.role",
            "membership",
        ),
        (
            "invites.1.email",
            "required",
        ),
        (
            "password",
            "length_bound",
        ),
        (
            "seats",
            "range_bound",
        ),
    ]
    "#);
}

#[test]
fn valid_document_is_returned_transformed() {
    let outcome = validate(
        &signup_schema(),
        json!({"email": " Ada@Example.COM ", "password": "correct horse battery", "age": "36"}),
    )
    .unwrap();
    assert!(outcome.is_valid());
    insta::assert_json_snapshot!(serde_json::Value::from(outcome.value), @r#"
    {
      "age": 36,
      "email": "ada@example.com",
      "password": "correct horse battery",
      "plan": "free"
    }
    "#);
}
