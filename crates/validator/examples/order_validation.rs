//! Validating an order document with strata-validator.
//!
//! Run: `RUST_LOG=trace cargo run -p strata-validator --example order_validation`

use std::num::NonZeroUsize;

use serde_json::json;
use strata_validator::prelude::*;

const MAX_ERRORS: NonZeroUsize = NonZeroUsize::new(20).unwrap();

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let engine = Engine::builder()
        .register("sku", |ctx, _args| {
            let ok = ctx
                .value()
                .as_str()
                .is_some_and(|s| s.len() > 4 && s.starts_with("SKU-"));
            if !ok {
                ctx.report_message("must look like SKU-xxxx");
            }
        })
        .max_errors(MAX_ERRORS)
        .build();

    let schema = order_schema();

    println!("=== Valid order ===\n");
    let valid = json!({
        "id": "ord_1001",
        "currency": "eur",
        "lines": [
            {"sku": " sku-1 ", "ordered": "2", "shipped": 2},
            {"sku": "sku-2", "ordered": 1},
        ],
    });
    report(&engine, &schema, valid);

    println!("\n=== Invalid order ===\n");
    let invalid = json!({
        "id": "ord 1002",
        "currency": "GBP",
        "lines": [
            {"sku": "x", "ordered": 0, "shipped": 1},
            {"ordered": 2, "shipped": 3},
        ],
        "gift": true,
    });
    report(&engine, &schema, invalid);
}

fn order_schema() -> ObjectSchema {
    object().keys(keys! {
        "id" => string().required().token(),
        "currency" => string().required().uppercase().valid(["EUR", "USD"]).priority(10),
        "lines" => array().required().min(1).item(object().keys(keys! {
            "sku" => string().required().trim().uppercase().custom("sku", []),
            "ordered" => number().required().parse_string().integer().min(1.0).priority(1),
            "shipped" => number().greater_than_or_equal_to_field("ordered"),
        })),
        "gift" => boolean().default(false),
        "message" => string().when("gift", true, string().required().max(140)),
    })
}

fn report(engine: &Engine, schema: &ObjectSchema, input: serde_json::Value) {
    match engine.validate(schema, input) {
        Ok(outcome) if outcome.is_valid() => {
            let value = serde_json::Value::from(outcome.value);
            println!("valid: {value:#}");
        }
        Ok(outcome) => {
            for line in outcome.errors.to_strings() {
                println!("  - {line}");
            }
        }
        Err(error) => println!("schema error: {error}"),
    }
}
