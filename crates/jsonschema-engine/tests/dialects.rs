use std::sync::Arc;

use jsonschema_engine::{
    ids, DisallowUnknownDialectRegistry, Draft, SchemaError, UnknownKeywordPolicy,
};
use serde_json::{json, Value};
use test_case::test_case;

fn build_with_meta(meta_iri: &str, meta: Value, schema: &Value) -> Result<jsonschema_engine::Validator, SchemaError> {
    jsonschema_engine::options()
        .with_resource(meta_iri, meta)
        .build(schema)
}

#[test_case(Draft::Draft4, false)]
#[test_case(Draft::Draft6, true)]
#[test_case(Draft::Draft7, true)]
#[test_case(Draft::Draft202012, true)]
fn integers_with_zero_fraction(draft: Draft, expected: bool) {
    let validator = jsonschema_engine::options()
        .with_draft(draft)
        .build(&json!({"type": "integer"}))
        .expect("Valid schema");
    assert_eq!(validator.is_valid(&json!(1.0)), expected);
    assert!(validator.is_valid(&json!(1)));
}

#[test_case(Draft::Draft7, true)]
#[test_case(Draft::Draft201909, false)]
#[test_case(Draft::Draft202012, false)]
fn ref_siblings(draft: Draft, expected: bool) {
    let schema = json!({
        "$ref": "#/definitions/count",
        "definitions": {"count": {"type": "integer"}},
        "maximum": 0
    });
    let validator = jsonschema_engine::options()
        .with_draft(draft)
        .build(&schema)
        .expect("Valid schema");
    assert_eq!(validator.is_valid(&json!(5)), expected);
}

#[test_case(&json!({"type": "string", "nullable": true}), &json!(null), true)]
#[test_case(&json!({"type": "string"}), &json!(null), false)]
#[test_case(&json!({"type": "string", "nullable": true}), &json!(1), false)]
#[test_case(&json!({"type": "integer"}), &json!(1.0), false; "draft 4 integers")]
#[test_case(&json!({"format": "ipv4"}), &json!("127.0.0"), false; "formats assert")]
fn openapi30(schema: &Value, instance: &Value, expected: bool) {
    assert_eq!(jsonschema_engine::openapi30::is_valid(schema, instance), expected);
}

#[test]
fn nullable_is_ignored_outside_openapi() {
    let schema = json!({"type": "string", "nullable": true});
    assert!(!jsonschema_engine::is_valid(&schema, &json!(null)));
}

#[test]
fn openapi31_discriminator() {
    let schema = json!({
        "oneOf": [{"$ref": "#/$defs/Cat"}, {"$ref": "#/$defs/Dog"}],
        "discriminator": {"propertyName": "kind"},
        "$defs": {
            "Cat": {"properties": {"kind": {"const": "Cat"}, "lives": {"type": "integer"}}},
            "Dog": {"properties": {"kind": {"const": "Dog"}, "bark": {"type": "string"}}}
        }
    });
    let validator = jsonschema_engine::openapi31::options()
        .with_discriminator(true)
        .build(&schema)
        .expect("Valid schema");
    assert!(validator.is_valid(&json!({"kind": "Cat", "lives": 9})));
    let instance = json!({"kind": "Dog", "bark": 1});
    let messages: Vec<String> = validator
        .iter_errors(&instance)
        .map(|error| error.to_string())
        .collect();
    assert_eq!(
        messages,
        [
            "must be valid to one and only one schema, but none are valid",
            "must be of type string"
        ]
    );
    // Without the discriminator every branch is reported
    let plain = jsonschema_engine::openapi31::new(&schema).expect("Valid schema");
    assert_eq!(plain.iter_errors(&instance).count(), 3);
}

#[test]
fn format_assertion_vocabulary() {
    let meta_iri = "https://example.com/meta/format-assertion";
    let meta = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": meta_iri,
        "$vocabulary": {
            "https://json-schema.org/draft/2020-12/vocab/core": true,
            "https://json-schema.org/draft/2020-12/vocab/applicator": true,
            "https://json-schema.org/draft/2020-12/vocab/format-assertion": false
        }
    });
    let schema = json!({"$schema": meta_iri, "format": "ipv4"});
    let validator = build_with_meta(meta_iri, meta, &schema).expect("Valid schema");
    assert!(!validator.is_valid(&json!("not an address")));
    assert!(validator.is_valid(&json!("127.0.0.1")));
}

#[test]
fn vocabularies_narrow_keywords() {
    let meta_iri = "https://example.com/meta/no-validation";
    let meta = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": meta_iri,
        "$vocabulary": {
            "https://json-schema.org/draft/2020-12/vocab/core": true,
            "https://json-schema.org/draft/2020-12/vocab/applicator": true
        }
    });
    let schema = json!({"$schema": meta_iri, "properties": {"a": {"minimum": 5}}});
    let validator = build_with_meta(meta_iri, meta, &schema).expect("Valid schema");
    // `minimum` belongs to the validation vocabulary
    assert!(validator.is_valid(&json!({"a": 1})));
}

#[test_case(true, false; "required")]
#[test_case(false, true; "optional")]
fn unknown_vocabularies(required: bool, builds: bool) {
    let meta_iri = if required {
        "https://example.com/meta/unknown-required"
    } else {
        "https://example.com/meta/unknown-optional"
    };
    let meta = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": meta_iri,
        "$vocabulary": {
            "https://json-schema.org/draft/2020-12/vocab/core": true,
            "https://example.com/vocab/unknown": required
        }
    });
    let schema = json!({"$schema": meta_iri});
    assert_eq!(build_with_meta(meta_iri, meta, &schema).is_ok(), builds);
}

#[test]
fn unknown_dialects_are_rejected_by_strict_registry() {
    let result = jsonschema_engine::options()
        .with_dialect_registry(Arc::new(DisallowUnknownDialectRegistry::new()))
        .build(&json!({"$schema": "https://example.com/meta/anything"}));
    assert!(result.is_err());
    let result = jsonschema_engine::options()
        .with_dialect_registry(Arc::new(DisallowUnknownDialectRegistry::new()))
        .build(&json!({"$schema": ids::DRAFT_7}));
    assert!(result.is_ok());
}

#[test]
fn unknown_keyword_policies() {
    let schema = json!({"x-internal": true, "type": "string"});
    let validator = jsonschema_engine::options()
        .with_annotation_collection(true)
        .build(&schema)
        .expect("Valid schema");
    let instance = json!("a");
    let evaluation = validator.evaluate(&instance);
    let keywords: Vec<&str> = evaluation.annotations().map(|a| a.keyword()).collect();
    assert_eq!(keywords, ["x-internal"]);

    let validator = jsonschema_engine::options()
        .with_annotation_collection(true)
        .with_unknown_keyword_policy(UnknownKeywordPolicy::Ignore)
        .build(&schema)
        .expect("Valid schema");
    assert_eq!(validator.evaluate(&json!("a")).annotations().count(), 0);

    let error = jsonschema_engine::options()
        .with_unknown_keyword_policy(UnknownKeywordPolicy::Strict)
        .build(&schema)
        .expect_err("Unknown keyword");
    assert_eq!(
        error.to_string(),
        "Unknown keyword 'x-internal' at json-schema:///#/x-internal"
    );
}

#[test]
fn meta_schemas_resolve_offline() {
    let schema = json!({"$ref": "http://json-schema.org/draft-07/schema#"});
    let validator = jsonschema_engine::validator_for(&schema).expect("Valid schema");
    assert!(validator.is_valid(&json!({"type": "string"})));
    assert!(!validator.is_valid(&json!({"type": 1})));
}

#[test]
fn schema_validation_against_meta_schema() {
    let error = jsonschema_engine::options()
        .should_validate_schema(true)
        .build(&json!({"type": 1}))
        .expect_err("Invalid schema");
    assert!(matches!(error, SchemaError::InvalidSchema { .. }));
}
