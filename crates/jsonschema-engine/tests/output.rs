use serde_json::{json, Value};
use test_case::test_case;

#[test_case(&json!({"type": "string"}), &json!("a"), true)]
#[test_case(&json!({"type": "string"}), &json!(1), false)]
#[test_case(&json!(false), &json!(null), false)]
#[test_case(&json!(true), &json!(null), true)]
fn flag(schema: &Value, instance: &Value, valid: bool) {
    let validator = jsonschema_engine::validator_for(schema).expect("Valid schema");
    let output = validator.apply(instance).flag();
    assert_eq!(
        serde_json::to_value(output).expect("Serializable"),
        json!({"valid": valid})
    );
}

#[test_case{
    &json!({"allOf": [{"type": "array"}, {"maxLength": 4}]}),
    &json!("some string"),
    &json!({
        "valid": false,
        "details": [
            {
                "valid": false,
                "evaluationPath": "/allOf/0",
                "schemaLocation": "json-schema:///#/allOf/0",
                "instanceLocation": "",
                "errors": {"type": "must be of type array"}
            },
            {
                "valid": false,
                "evaluationPath": "/allOf/1",
                "schemaLocation": "json-schema:///#/allOf/1",
                "instanceLocation": "",
                "errors": {"maxLength": "must be at most 4 characters long"}
            }
        ]
    }); "invalid allOf"
}]
#[test_case{
    &json!({"items": {"minimum": 2}}),
    &json!([1, 2, 0]),
    &json!({
        "valid": false,
        "details": [
            {
                "valid": false,
                "evaluationPath": "/items",
                "schemaLocation": "json-schema:///#/items",
                "instanceLocation": "/0",
                "errors": {"minimum": "must have a minimum value of 2"}
            },
            {
                "valid": false,
                "evaluationPath": "/items",
                "schemaLocation": "json-schema:///#/items",
                "instanceLocation": "/2",
                "errors": {"minimum": "must have a minimum value of 2"}
            },
            {
                "valid": false,
                "evaluationPath": "",
                "schemaLocation": "json-schema:///#",
                "instanceLocation": "",
                "droppedAnnotations": {"items": true}
            }
        ]
    }); "errors per instance location"
}]
#[test_case{
    &json!({"$ref": "#/$defs/name", "$defs": {"name": {"type": "string"}}}),
    &json!(1),
    &json!({
        "valid": false,
        "details": [
            {
                "valid": false,
                "evaluationPath": "/$ref",
                "schemaLocation": "json-schema:///#/$defs/name",
                "instanceLocation": "",
                "errors": {"type": "must be of type string"}
            }
        ]
    }); "references"
}]
fn list_errors(schema: &Value, instance: &Value, expected: &Value) {
    let validator = jsonschema_engine::validator_for(schema).expect("Valid schema");
    let output = validator.apply(instance).list();
    assert_eq!(&serde_json::to_value(output).expect("Serializable"), expected);
}

#[test]
fn list_annotations() {
    let schema = json!({
        "allOf": [
            {"type": "string", "description": "first"},
            {"maxLength": 20, "description": "second"}
        ]
    });
    let validator = jsonschema_engine::validator_for(&schema).expect("Valid schema");
    let output = validator.apply(&json!("some string")).list();
    assert_eq!(
        serde_json::to_value(output).expect("Serializable"),
        json!({
            "valid": true,
            "details": [
                {
                    "valid": true,
                    "evaluationPath": "/allOf/0",
                    "schemaLocation": "json-schema:///#/allOf/0",
                    "instanceLocation": "",
                    "annotations": {"description": "first"}
                },
                {
                    "valid": true,
                    "evaluationPath": "/allOf/1",
                    "schemaLocation": "json-schema:///#/allOf/1",
                    "instanceLocation": "",
                    "annotations": {"description": "second"}
                }
            ]
        })
    );
}

#[test]
fn list_drops_annotations_of_failed_schemas() {
    let schema = json!({
        "oneOf": [
            {"title": "integer", "type": "integer"},
            {"title": "number", "type": "number"}
        ]
    });
    let validator = jsonschema_engine::validator_for(&schema).expect("Valid schema");
    let output = validator.apply(&json!(1.5)).list();
    assert!(output.is_valid());
    let dropped: Vec<_> = output
        .details()
        .iter()
        .filter_map(|unit| unit.dropped_annotations())
        .collect();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].get("title"), Some(&json!("integer")));
    let kept: Vec<_> = output
        .details()
        .iter()
        .filter(|unit| unit.is_valid())
        .filter_map(|unit| unit.annotations())
        .collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].get("title"), Some(&json!("number")));
}
