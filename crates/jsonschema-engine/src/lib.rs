//! A JSON Schema validation engine.
//!
//! Schemas are compiled once into a [`Validator`] bound to a dialect: a draft (4, 6, 7,
//! 2019-09, 2020-12) or one of the OpenAPI 3.0 and 3.1 schema dialects, possibly narrowed or
//! extended by `$vocabulary`. A validator can then evaluate any number of instances, from any
//! number of threads.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use serde_json::json;
//!
//! let schema = json!({"type": "object", "required": ["name"]});
//! let validator = jsonschema_engine::validator_for(&schema)?;
//!
//! assert!(validator.is_valid(&json!({"name": "Alice"})));
//! for error in validator.iter_errors(&json!({})) {
//!     eprintln!("{} at '{}'", error, error.instance_location);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every error carries three locations:
//!
//! - `instance_location`: a JSON pointer into the instance.
//! - `evaluation_path`: the keywords that were followed to reach the failing one, including
//!   `$ref` hops.
//! - `schema_location`: the absolute IRI and pointer where the failing keyword is defined.
//!
//! # Output
//!
//! [`Validator::apply`] renders the result in the `flag` and `list` output formats, and
//! [`Validator::evaluate`] gives access to errors, annotations and the per-schema results.
//!
//! # Configuration
//!
//! [`ValidationOptions`] is built with [`options`] and covers the dialect, reference
//! retrieval, formats, custom keywords, messages and more. Per-call overrides go through
//! [`ExecutionConfig`].
pub(crate) mod compiler;
mod context;
mod ecma;
pub mod error;
mod keywords;
mod messages;
mod node;
mod options;
pub mod output;
pub mod paths;
pub mod primitive_type;
mod regex_engine;
mod retriever;
mod validator;
mod walk;

pub use context::{Annotation, ExecutionConfig, ResultsIndex};
pub use error::{ConfigurationError, ErrorIterator, SchemaError, ValidationError, ValidationErrorKind};
pub use jsonschema_dialect::{
    ids, DefaultDialectRegistry, Dialect, DialectRegistry, DisallowUnknownDialectRegistry, Draft,
    KeywordKind, Retrieve, Vocabulary,
};
pub use keywords::custom::Keyword;
pub use messages::{MessageSource, ResourceBundleMessageSource, DEFAULT_LOCALE};
pub use options::{UnknownKeywordPolicy, ValidationOptions};
pub use output::{FlagOutput, ListOutput, Output, OutputUnit};
pub use regex_engine::RegexEngine;
pub use retriever::DefaultRetriever;
pub use validator::{Evaluation, Validator};
pub use walk::{KeywordWalkListener, WalkEvent, WalkFlow};

use serde_json::Value;

/// Validate `instance` against `schema` and get a `true` if the instance is valid and `false`
/// otherwise. The dialect is detected from `$schema`, Draft 2020-12 is the default.
///
/// ```rust
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// assert!(jsonschema_engine::is_valid(&schema, &json!("foo")));
/// assert!(!jsonschema_engine::is_valid(&schema, &json!("foo bar")));
/// ```
///
/// # Panics
///
/// This function panics if the schema is invalid.
#[must_use]
#[inline]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    validator_for(schema)
        .expect("Invalid schema")
        .is_valid(instance)
}

/// Create a validator for `schema`, picking the dialect from its `$schema` keyword.
///
/// # Errors
///
/// Returns an error if the schema is invalid or a reference can not be resolved.
pub fn validator_for(schema: &Value) -> Result<Validator, SchemaError> {
    Validator::new(schema)
}

/// Create a builder for configuring validators.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use jsonschema_engine::Draft;
/// use serde_json::json;
///
/// let validator = jsonschema_engine::options()
///     .with_draft(Draft::Draft7)
///     .should_validate_formats(false)
///     .build(&json!({"format": "ipv4"}))?;
/// assert!(validator.is_valid(&json!("not an address")));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn options() -> ValidationOptions {
    Validator::options()
}

/// Functionality specific to JSON Schema Draft 4.
pub mod draft4 {
    use super::{Draft, SchemaError, ValidationOptions, Validator, Value};

    /// Create a new JSON Schema validator using Draft 4.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::draft4::new(&json!({"minimum": 5}))?;
    /// assert!(validator.is_valid(&json!(42)));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not valid under Draft 4.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// Validate an instance against a schema using Draft 4 without keeping the validator.
    ///
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder pre-configured for Draft 4.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_draft(Draft::Draft4);
        options
    }
}

/// Functionality specific to JSON Schema Draft 6.
pub mod draft6 {
    use super::{Draft, SchemaError, ValidationOptions, Validator, Value};

    /// Create a new JSON Schema validator using Draft 6.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::draft6::new(&json!({"const": 5}))?;
    /// assert!(validator.is_valid(&json!(42)));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not valid under Draft 6.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// Validate an instance against a schema using Draft 6 without keeping the validator.
    ///
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder pre-configured for Draft 6.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_draft(Draft::Draft6);
        options
    }
}

/// Functionality specific to JSON Schema Draft 7.
pub mod draft7 {
    use super::{Draft, SchemaError, ValidationOptions, Validator, Value};

    /// Create a new JSON Schema validator using Draft 7.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::draft7::new(&json!({"if": {"type": "integer"}, "then": {"minimum": 5}}))?;
    /// assert!(validator.is_valid(&json!(42)));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not valid under Draft 7.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// Validate an instance against a schema using Draft 7 without keeping the validator.
    ///
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder pre-configured for Draft 7.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_draft(Draft::Draft7);
        options
    }
}

/// Functionality specific to JSON Schema Draft 2019-09.
pub mod draft201909 {
    use super::{Draft, SchemaError, ValidationOptions, Validator, Value};

    /// Create a new JSON Schema validator using Draft 2019-09.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::draft201909::new(&json!({"dependentRequired": {"a": ["b"]}}))?;
    /// assert!(validator.is_valid(&json!(42)));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not valid under Draft 2019-09.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// Validate an instance against a schema using Draft 2019-09 without keeping the validator.
    ///
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder pre-configured for Draft 2019-09.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_draft(Draft::Draft201909);
        options
    }
}

/// Functionality specific to JSON Schema Draft 2020-12.
pub mod draft202012 {
    use super::{Draft, SchemaError, ValidationOptions, Validator, Value};

    /// Create a new JSON Schema validator using Draft 2020-12.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::draft202012::new(&json!({"prefixItems": [{"type": "integer"}]}))?;
    /// assert!(validator.is_valid(&json!(42)));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not valid under Draft 2020-12.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// Validate an instance against a schema using Draft 2020-12 without keeping the validator.
    ///
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder pre-configured for Draft 2020-12.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_draft(Draft::Draft202012);
        options
    }
}

/// Schema objects of OpenAPI 3.0 documents.
pub mod openapi30 {
    use super::{ids, SchemaError, ValidationOptions, Validator, Value};

    /// Create a validator for an OpenAPI 3.0 schema object.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not a valid OpenAPI 3.0 schema object.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder using the OpenAPI 3.0 schema dialect.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_dialect(ids::OPENAPI_3_0);
        options
    }
}

/// Schema objects of OpenAPI 3.1 documents.
pub mod openapi31 {
    use super::{ids, SchemaError, ValidationOptions, Validator, Value};

    /// Create a validator for an OpenAPI 3.1 schema object.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not a valid OpenAPI 3.1 schema object.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        options().build(schema)
    }
    /// # Panics
    ///
    /// This function panics if the schema is invalid.
    #[must_use]
    pub fn is_valid(schema: &Value, instance: &Value) -> bool {
        new(schema).expect("Invalid schema").is_valid(instance)
    }
    /// A [`ValidationOptions`] builder using the OpenAPI 3.1 schema dialect.
    #[must_use]
    pub fn options() -> ValidationOptions {
        let mut options = crate::options();
        options.with_dialect(ids::OPENAPI_3_1);
        options
    }
}

#[cfg(test)]
pub(crate) mod tests_util {
    use super::Validator;
    use crate::ValidationError;
    use serde_json::Value;

    pub(crate) fn is_not_valid_with(validator: &Validator, instance: &Value) {
        assert!(
            !validator.is_valid(instance),
            "{instance} should not be valid (via is_valid)"
        );
        assert!(
            validator.validate(instance).is_err(),
            "{instance} should not be valid (via validate)"
        );
        assert!(
            !validator.apply(instance).flag().is_valid(),
            "{instance} should not be valid (via apply)"
        );
    }

    pub(crate) fn is_not_valid(schema: &Value, instance: &Value) {
        let validator = crate::validator_for(schema).expect("Invalid schema");
        is_not_valid_with(&validator, instance);
    }

    pub(crate) fn is_not_valid_with_draft(draft: crate::Draft, schema: &Value, instance: &Value) {
        let validator = crate::options()
            .with_draft(draft)
            .build(schema)
            .expect("Invalid schema");
        is_not_valid_with(&validator, instance);
    }

    pub(crate) fn expect_errors(schema: &Value, instance: &Value, errors: &[&str]) {
        assert_eq!(
            crate::validator_for(schema)
                .expect("Should be a valid schema")
                .validate(instance)
                .expect_err(format!("{instance} should not be valid").as_str())
                .map(|e| e.to_string())
                .collect::<Vec<String>>(),
            errors
        );
    }

    pub(crate) fn is_valid_with(validator: &Validator, instance: &Value) {
        if let Err(mut errors) = validator.validate(instance) {
            let first = errors.next().expect("Errors iterator is empty");
            panic!(
                "{instance} should be valid (via validate). Error: {first} at {}",
                first.instance_location
            );
        }
        assert!(
            validator.is_valid(instance),
            "{instance} should be valid (via is_valid)"
        );
        assert!(
            validator.apply(instance).flag().is_valid(),
            "{instance} should be valid (via apply)"
        );
    }

    pub(crate) fn is_valid(schema: &Value, instance: &Value) {
        let validator = crate::validator_for(schema).expect("Invalid schema");
        is_valid_with(&validator, instance);
    }

    pub(crate) fn is_valid_with_draft(draft: crate::Draft, schema: &Value, instance: &Value) {
        let validator = crate::options()
            .with_draft(draft)
            .build(schema)
            .expect("Invalid schema");
        is_valid_with(&validator, instance);
    }

    pub(crate) fn validate(schema: &Value, instance: &Value) -> ValidationError<'static> {
        let validator = crate::validator_for(schema).expect("Invalid schema");
        validator
            .validate(instance)
            .expect_err("Should be an error")
            .next()
            .expect("Should be an error")
            .into_owned()
    }

    pub(crate) fn assert_schema_location(schema: &Value, instance: &Value, expected: &str) {
        let error = validate(schema, instance);
        assert_eq!(error.schema_location.fragment().as_pointer(), expected);
    }

    pub(crate) fn assert_evaluation_path(schema: &Value, instance: &Value, expected: &str) {
        let error = validate(schema, instance);
        assert_eq!(error.evaluation_path.as_pointer(), expected);
    }
}

#[cfg(test)]
mod tests {
    use super::Draft;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(crate::is_valid ; "autodetect")]
    #[test_case(crate::draft4::is_valid ; "draft4")]
    #[test_case(crate::draft6::is_valid ; "draft6")]
    #[test_case(crate::draft7::is_valid ; "draft7")]
    #[test_case(crate::draft201909::is_valid ; "draft201909")]
    #[test_case(crate::draft202012::is_valid ; "draft202012")]
    #[test_case(crate::openapi30::is_valid ; "openapi30")]
    #[test_case(crate::openapi31::is_valid ; "openapi31")]
    fn is_valid_per_dialect(is_valid: fn(&Value, &Value) -> bool) {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0}
            },
            "required": ["name"]
        });
        assert!(is_valid(&schema, &json!({"name": "John", "age": 30})));
        assert!(!is_valid(&schema, &json!({"age": -5})));
        assert!(!is_valid(&schema, &json!({"name": "John", "age": "thirty"})));
    }

    #[test_case(Draft::Draft4, "http://json-schema.org/draft-04/schema#")]
    #[test_case(Draft::Draft6, "http://json-schema.org/draft-06/schema#")]
    #[test_case(Draft::Draft7, "http://json-schema.org/draft-07/schema#")]
    #[test_case(Draft::Draft201909, "https://json-schema.org/draft/2019-09/schema")]
    #[test_case(Draft::Draft202012, "https://json-schema.org/draft/2020-12/schema")]
    fn dialect_from_schema_keyword(draft: Draft, meta_schema: &str) {
        // `const` only exists since Draft 6
        let schema = json!({"$schema": meta_schema, "const": 1});
        let expected = draft == Draft::Draft4;
        assert_eq!(crate::is_valid(&schema, &json!(2)), expected);
    }

    #[test]
    fn invalid_schema() {
        let error = crate::validator_for(&json!({"minLength": "a"})).expect_err("Invalid schema");
        assert_eq!(
            error.to_string(),
            "Invalid 'minLength' at json-schema:///#/minLength: \"a\" is not a non-negative integer"
        );
    }
}
