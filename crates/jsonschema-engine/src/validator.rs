//! Building a JSON Schema validator.
//! The schema is compiled once into a tree of keyword validators. Every evaluation walks that
//! tree with its own [`ExecutionContext`], so a [`Validator`] can be shared between threads.
use std::sync::Arc;

use serde_json::Value;

use crate::{
    context::{Annotation, AnnotationStore, ExecutionConfig, ExecutionContext, Halt, ResultsIndex, Settings},
    error::{ErrorIterator, SchemaError, ValidationError},
    node::{Scope, SchemaTree},
    output::Output,
    paths::Location,
    ValidationOptions,
};

/// A keyword compiled for one occurrence in a schema.
///
/// Errors and annotations go to the execution context. `Err(Halt)` means the evaluation stops
/// and must be propagated as is.
pub(crate) trait Validate: Send + Sync {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt>;
}

pub(crate) type BoxedValidator = Box<dyn Validate + Send + Sync>;

/// A compiled JSON Schema validator.
///
/// It holds the compiled schema tree and the options it was built with.
#[derive(Debug)]
pub struct Validator {
    tree: SchemaTree,
    config: Arc<ValidationOptions>,
}

impl Validator {
    pub(crate) fn from_parts(tree: SchemaTree, config: Arc<ValidationOptions>) -> Validator {
        Validator { tree, config }
    }
    /// Create a default [`ValidationOptions`] for configuring JSON Schema validation.
    ///
    /// ```rust
    /// # use jsonschema_engine::Draft;
    /// # let schema = serde_json::json!({});
    /// let validator = jsonschema_engine::Validator::options()
    ///     .with_draft(Draft::Draft7)
    ///     .build(&schema);
    /// ```
    #[must_use]
    pub fn options() -> ValidationOptions {
        ValidationOptions::default()
    }
    /// Create a validator using the default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema can not be compiled.
    pub fn new(schema: &Value) -> Result<Validator, SchemaError> {
        Self::options().build(schema)
    }
    /// Run validation against `instance` and return an iterator over [`ValidationError`] in the
    /// error case.
    #[inline]
    pub fn validate<'i>(&self, instance: &'i Value) -> Result<(), ErrorIterator<'i>> {
        self.validate_with(instance, &ExecutionConfig::default())
    }
    /// Same as [`Validator::validate`] with per-call overrides of the configuration.
    pub fn validate_with<'i>(
        &self,
        instance: &'i Value,
        config: &ExecutionConfig,
    ) -> Result<(), ErrorIterator<'i>> {
        let (errors, _, _) = self.execute(instance, config, false);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Box::new(errors.into_iter()))
        }
    }
    /// All errors of `instance`, in evaluation order.
    #[must_use]
    pub fn iter_errors<'i>(&self, instance: &'i Value) -> ErrorIterator<'i> {
        let (errors, _, _) = self.execute(instance, &ExecutionConfig::default(), false);
        Box::new(errors.into_iter())
    }
    /// Run validation against `instance` but return a boolean result instead of an iterator.
    /// The evaluation stops at the first error.
    #[must_use]
    #[inline]
    pub fn is_valid(&self, instance: &Value) -> bool {
        let config = ExecutionConfig::new().fail_fast(true);
        self.execute(instance, &config, false).0.is_empty()
    }
    /// Evaluate `instance` and keep everything the evaluation produced.
    ///
    /// ```rust
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::options()
    ///     .with_annotation_collection(true)
    ///     .build(&json!({"properties": {"name": {"title": "Name"}}}))
    ///     .expect("A valid schema");
    /// let instance = json!({"name": "Alice"});
    /// let evaluation = validator.evaluate(&instance);
    /// assert!(evaluation.is_valid());
    /// let keywords: Vec<&str> = evaluation.annotations().map(|a| a.keyword()).collect();
    /// assert_eq!(keywords, ["title", "properties"]);
    /// ```
    #[must_use]
    pub fn evaluate<'i>(&self, instance: &'i Value) -> Evaluation<'i> {
        self.evaluate_with(instance, &ExecutionConfig::default())
    }
    /// Same as [`Validator::evaluate`] with per-call overrides of the configuration.
    #[must_use]
    pub fn evaluate_with<'i>(&self, instance: &'i Value, config: &ExecutionConfig) -> Evaluation<'i> {
        let (errors, annotations, results) = self.execute(instance, config, false);
        Evaluation::new(errors, annotations, results)
    }
    /// Evaluate `instance` with the configured [`crate::KeywordWalkListener`] notified around
    /// every keyword.
    #[must_use]
    pub fn walk<'i>(&self, instance: &'i Value) -> Evaluation<'i> {
        let (errors, annotations, results) =
            self.execute(instance, &ExecutionConfig::default(), true);
        Evaluation::new(errors, annotations, results)
    }
    /// Apply the schema and return an [`Output`], which renders the result in one of the
    /// standard output formats.
    ///
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::validator_for(&json!({"type": "string"}))?;
    /// let output = validator.apply(&json!(42)).flag();
    /// assert_eq!(serde_json::to_value(output)?, json!({"valid": false}));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub const fn apply<'a, 'b>(&'a self, instance: &'b Value) -> Output<'a, 'b> {
        Output::new(self, instance)
    }
    /// The [`ValidationOptions`] that were used to build this validator.
    #[must_use]
    pub fn config(&self) -> Arc<ValidationOptions> {
        Arc::clone(&self.config)
    }

    fn execute<'i>(
        &self,
        instance: &'i Value,
        config: &ExecutionConfig,
        walking: bool,
    ) -> (Vec<ValidationError<'i>>, AnnotationStore, ResultsIndex) {
        let options = &*self.config;
        let settings = Settings {
            fail_fast: config.fail_fast.unwrap_or(options.fail_fast),
            annotation_collection: config
                .annotation_collection
                .unwrap_or(options.annotation_collection),
            format_assertions: config.format_assertions,
            read_only: config.read_only,
            write_only: config.write_only,
            locale: config.locale.as_deref().unwrap_or(&options.locale),
            messages: &*options.messages,
            listener: if walking {
                options.walk_listener.as_deref()
            } else {
                None
            },
        };
        let mut ctx = ExecutionContext::new(&self.tree, settings);
        let root = Location::new();
        // A halt only means the first error is already recorded
        let _ = ctx.evaluate(self.tree.root(), instance, &root, &root);
        ctx.finish()
    }
}

/// Everything one evaluation produced: errors, annotations and the validity of every
/// evaluated schema.
#[derive(Debug)]
pub struct Evaluation<'i> {
    errors: Vec<ValidationError<'i>>,
    annotations: Vec<Annotation>,
    results: ResultsIndex,
}

impl<'i> Evaluation<'i> {
    fn new(
        errors: Vec<ValidationError<'i>>,
        annotations: AnnotationStore,
        results: ResultsIndex,
    ) -> Self {
        Evaluation {
            errors,
            annotations: annotations.into_vec(),
            results,
        }
    }
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
    #[must_use]
    pub fn errors(&self) -> &[ValidationError<'i>] {
        &self.errors
    }
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError<'i>> {
        self.errors
    }
    /// Annotations of the schemas that were valid.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|annotation| self.is_retained(annotation))
    }
    /// Annotations recorded by schemas that failed.
    pub fn dropped_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(|annotation| !self.is_retained(annotation))
    }
    #[must_use]
    pub fn results(&self) -> &ResultsIndex {
        &self.results
    }
    fn is_retained(&self, annotation: &Annotation) -> bool {
        self.results
            .is_valid(annotation.instance_location(), annotation.evaluation_path())
    }
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, ExecutionConfig, ValidationError};
    use serde_json::json;

    #[test]
    fn only_keyword() {
        let schema = json!({"type": "string"});
        let validator = crate::validator_for(&schema).expect("Valid schema");
        assert!(validator.validate(&json!("AB")).is_ok());
        assert!(validator.validate(&json!(1)).is_err());
    }

    #[test]
    fn wrong_schema_type() {
        let schema = json!([1]);
        assert!(crate::validator_for(&schema).is_err());
    }

    #[test]
    fn multiple_errors() {
        let schema = json!({"minProperties": 2, "propertyNames": {"minLength": 3}});
        let validator = crate::validator_for(&schema).expect("Valid schema");
        let instance = json!({"a": 3});
        let errors: Vec<ValidationError> = validator.iter_errors(&instance).collect();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].to_string(), "must have at least 2 properties");
        assert_eq!(errors[1].to_string(), "property name 'a' is not valid");
        assert_eq!(errors[2].to_string(), "must be at least 3 characters long");
    }

    #[test]
    fn fail_fast_stops_at_first_error() {
        let schema = json!({"minProperties": 2, "propertyNames": {"minLength": 3}});
        let validator = crate::options()
            .fail_fast(true)
            .build(&schema)
            .expect("Valid schema");
        assert_eq!(validator.iter_errors(&json!({"a": 3})).count(), 1);
        let config = ExecutionConfig::new().fail_fast(false);
        let instance = json!({"a": 3});
        let errors = validator
            .validate_with(&instance, &config)
            .expect_err("Invalid instance");
        assert_eq!(errors.count(), 3);
    }

    #[test]
    fn repeated_evaluations_are_identical() {
        let schema = json!({
            "properties": {"a": {"type": "integer"}, "b": {"enum": [1, 2]}},
            "required": ["c"]
        });
        let validator = crate::validator_for(&schema).expect("Valid schema");
        let instance = json!({"a": "x", "b": 3});
        let first: Vec<String> = validator.iter_errors(&instance).map(|e| e.to_string()).collect();
        let second: Vec<String> = validator.iter_errors(&instance).map(|e| e.to_string()).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn dropped_annotations() {
        let schema = json!({
            "anyOf": [
                {"title": "number", "type": "number"},
                {"title": "string", "type": "string"}
            ]
        });
        let validator = crate::options()
            .with_annotation_collection(true)
            .build(&schema)
            .expect("Valid schema");
        let instance = json!("text");
        let evaluation = validator.evaluate(&instance);
        assert!(evaluation.is_valid());
        let kept: Vec<_> = evaluation.annotations().map(|a| a.value().clone()).collect();
        let dropped: Vec<_> = evaluation
            .dropped_annotations()
            .map(|a| a.value().clone())
            .collect();
        assert_eq!(kept, [json!("string")]);
        assert_eq!(dropped, [json!("number")]);
    }

    #[test]
    fn validator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::Validator>();
        tests_util::is_valid(&json!({"type": "null"}), &json!(null));
    }
}
