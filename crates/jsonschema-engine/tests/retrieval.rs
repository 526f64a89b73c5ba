use std::{io::Write, sync::Arc};

use jsonschema_engine::{Retrieve, SchemaError};
use serde_json::{json, Value};
use url::Url;

#[test]
#[cfg(feature = "resolve-http")]
fn remote_references_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/integer.json")
        .with_header("content-type", "application/json")
        .with_body(r#"{"type": "integer"}"#)
        .expect(1)
        .create();
    let schema = json!({
        "properties": {
            "a": {"$ref": format!("{}/integer.json", server.url())},
            "b": {"$ref": format!("{}/integer.json", server.url())}
        }
    });
    let validator = jsonschema_engine::validator_for(&schema).expect("Valid schema");
    assert!(validator.is_valid(&json!({"a": 1, "b": 2})));
    assert!(!validator.is_valid(&json!({"a": "1"})));
    // The document is retrieved once
    mock.assert();
}

#[test]
#[cfg(feature = "resolve-file")]
fn remote_references_from_files() {
    let dir = tempfile::tempdir().expect("Temporary directory");
    let path = dir.path().join("name.json");
    let mut file = std::fs::File::create(&path).expect("Writable file");
    write!(file, r#"{{"type": "string", "minLength": 1}}"#).expect("Writable file");
    let iri = Url::from_file_path(&path).expect("Absolute path");
    let schema = json!({"properties": {"name": {"$ref": iri.as_str()}}});
    let validator = jsonschema_engine::validator_for(&schema).expect("Valid schema");
    assert!(validator.is_valid(&json!({"name": "x"})));
    assert!(!validator.is_valid(&json!({"name": ""})));
}

#[test]
fn relative_references_use_the_resource_base() {
    let schema = json!({
        "$id": "https://example.com/schemas/root.json",
        "properties": {"item": {"$ref": "item.json"}}
    });
    let validator = jsonschema_engine::options()
        .with_resource("https://example.com/schemas/item.json", json!({"type": "boolean"}))
        .build(&schema)
        .expect("Valid schema");
    assert!(validator.is_valid(&json!({"item": true})));
    let instance = json!({"item": 1});
    let error = validator.iter_errors(&instance).next().expect("An error");
    assert_eq!(
        error.schema_location.to_string(),
        "https://example.com/schemas/item.json#/type"
    );
    assert_eq!(error.evaluation_path.as_pointer(), "/properties/item/$ref/type");
}

#[derive(Debug)]
struct InMemory;

impl Retrieve for InMemory {
    fn retrieve(&self, iri: &Url) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        match iri.path() {
            "/positive.json" => Ok(json!({"exclusiveMinimum": 0})),
            _ => Err(format!("'{iri}' not found").into()),
        }
    }
}

#[test]
fn custom_retriever() {
    let schema = json!({"$ref": "https://numbers.example/positive.json"});
    let validator = jsonschema_engine::options()
        .with_retriever(InMemory)
        .build(&schema)
        .expect("Valid schema");
    assert!(validator.is_valid(&json!(1)));
    assert!(!validator.is_valid(&json!(0)));
}

#[test]
fn unresolvable_references() {
    let schema = json!({"$ref": "https://example.invalid/missing.json"});
    let error = jsonschema_engine::options()
        .with_retriever(InMemory)
        .build(&schema)
        .expect_err("Unresolvable reference");
    assert!(matches!(error, SchemaError::Unresolvable { .. }));
    assert!(error
        .to_string()
        .starts_with("Reference 'https://example.invalid/missing.json' at json-schema:///#/$ref can not be resolved"));
}

#[test]
fn validators_are_shared_between_threads() {
    let validator = Arc::new(
        jsonschema_engine::validator_for(&json!({"items": {"type": "integer"}}))
            .expect("Valid schema"),
    );
    let handles: Vec<_> = (0..4)
        .map(|idx| {
            let validator = Arc::clone(&validator);
            std::thread::spawn(move || validator.is_valid(&json!([idx, idx + 1])))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("Thread panicked"));
    }
}
