//! Per-evaluation state.
use std::{borrow::Cow, mem, sync::Arc};

use ahash::AHashMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{ValidationError, ValidationErrorKind},
    messages::{self, MessageSource},
    node::{NodeId, ResourceId, SchemaTree, Scope},
    paths::{Location, SchemaLocation},
    walk::{KeywordWalkListener, WalkEvent, WalkFlow},
};

/// Returned by validators to stop the evaluation after the first error in fail-fast mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Halt;

/// Overrides of the validator configuration for a single evaluation.
///
/// ```rust
/// use jsonschema_engine::ExecutionConfig;
/// use serde_json::json;
///
/// let validator = jsonschema_engine::validator_for(&json!({"format": "email"}))
///     .expect("Valid schema");
/// let config = ExecutionConfig::new().with_format_assertions(true);
/// assert!(validator.validate_with(&json!("not an email"), &config).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    pub(crate) locale: Option<String>,
    pub(crate) fail_fast: Option<bool>,
    pub(crate) format_assertions: Option<bool>,
    pub(crate) annotation_collection: Option<bool>,
    pub(crate) read_only: bool,
    pub(crate) write_only: bool,
}

impl ExecutionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Render messages in this locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
    /// Stop at the first error.
    #[must_use]
    pub fn fail_fast(mut self, yes: bool) -> Self {
        self.fail_fast = Some(yes);
        self
    }
    /// Make `format` assert (or only annotate) regardless of the dialect.
    #[must_use]
    pub fn with_format_assertions(mut self, yes: bool) -> Self {
        self.format_assertions = Some(yes);
        self
    }
    /// Collect annotations of every keyword, not only the ones `unevaluated*` needs.
    #[must_use]
    pub fn with_annotation_collection(mut self, yes: bool) -> Self {
        self.annotation_collection = Some(yes);
        self
    }
    /// The instance is written, e.g. a request body: `readOnly: true` values are errors and
    /// missing `readOnly` properties are not required.
    #[must_use]
    pub fn with_read_only(mut self, yes: bool) -> Self {
        self.read_only = yes;
        self
    }
    /// The instance is read, e.g. a response body: `writeOnly: true` values are errors and
    /// missing `writeOnly` properties are not required.
    #[must_use]
    pub fn with_write_only(mut self, yes: bool) -> Self {
        self.write_only = yes;
        self
    }
}

/// A value attached to an instance location by a keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    keyword: Arc<str>,
    schema_location: SchemaLocation,
    evaluation_path: Location,
    instance_location: Location,
    value: Value,
}

impl Annotation {
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
    #[must_use]
    pub fn schema_location(&self) -> &SchemaLocation {
        &self.schema_location
    }
    #[must_use]
    pub fn evaluation_path(&self) -> &Location {
        &self.evaluation_path
    }
    #[must_use]
    pub fn instance_location(&self) -> &Location {
        &self.instance_location
    }
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Annotations in recording order, indexed by instance location.
#[derive(Debug, Default)]
pub(crate) struct AnnotationStore {
    items: Vec<Annotation>,
    by_location: AHashMap<Location, Vec<usize>>,
}

impl AnnotationStore {
    fn push(&mut self, annotation: Annotation) {
        self.by_location
            .entry(annotation.instance_location.clone())
            .or_default()
            .push(self.items.len());
        self.items.push(annotation);
    }
    pub(crate) fn at<'s>(&'s self, location: &Location) -> impl Iterator<Item = &'s Annotation> {
        self.by_location
            .get(location)
            .into_iter()
            .flatten()
            .map(move |idx| &self.items[*idx])
    }
    pub(crate) fn into_vec(self) -> Vec<Annotation> {
        self.items
    }
}

#[derive(Debug, Clone)]
struct Failure {
    schema_location: SchemaLocation,
    evaluation_path: Location,
}

/// Failed schema evaluations per instance location.
///
/// Only failures are stored. An evaluation path is valid at an instance location unless a
/// schema evaluated at that location, on that path or on one of its ancestors, failed.
#[derive(Debug, Default, Clone)]
pub struct ResultsIndex {
    failures: AHashMap<Location, Vec<Failure>>,
}

impl ResultsIndex {
    pub(crate) fn record_failure(
        &mut self,
        instance_location: &Location,
        schema_location: &SchemaLocation,
        evaluation_path: &Location,
    ) {
        self.failures
            .entry(instance_location.clone())
            .or_default()
            .push(Failure {
                schema_location: schema_location.clone(),
                evaluation_path: evaluation_path.clone(),
            });
    }
    /// Whether every evaluation recorded at `instance_location` on `evaluation_path` or on one
    /// of its prefixes succeeded.
    #[must_use]
    pub fn is_valid(&self, instance_location: &Location, evaluation_path: &Location) -> bool {
        self.failures.get(instance_location).map_or(true, |failures| {
            !failures
                .iter()
                .any(|failure| evaluation_path.starts_with(&failure.evaluation_path))
        })
    }
    /// Schema locations of the schemas that failed at `instance_location`.
    pub fn failed_schemas<'s>(
        &'s self,
        instance_location: &Location,
    ) -> impl Iterator<Item = &'s SchemaLocation> {
        self.failures
            .get(instance_location)
            .into_iter()
            .flatten()
            .map(|failure| &failure.schema_location)
    }
}

/// Settings resolved from the validator configuration and the per-call overrides.
#[derive(Clone, Copy)]
pub(crate) struct Settings<'v> {
    pub(crate) fail_fast: bool,
    pub(crate) annotation_collection: bool,
    pub(crate) format_assertions: Option<bool>,
    pub(crate) read_only: bool,
    pub(crate) write_only: bool,
    pub(crate) locale: &'v str,
    pub(crate) messages: &'v dyn MessageSource,
    pub(crate) listener: Option<&'v dyn KeywordWalkListener>,
}

/// Mutable state of one evaluation. Never shared between evaluations.
pub(crate) struct ExecutionContext<'v, 'i> {
    pub(crate) tree: &'v SchemaTree,
    settings: Settings<'v>,
    pub(crate) errors: Vec<ValidationError<'i>>,
    pub(crate) annotations: AnnotationStore,
    pub(crate) results: ResultsIndex,
    dynamic_scope: Vec<ResourceId>,
}

impl<'v, 'i> ExecutionContext<'v, 'i> {
    pub(crate) fn new(tree: &'v SchemaTree, settings: Settings<'v>) -> Self {
        Self {
            tree,
            settings,
            errors: Vec::new(),
            annotations: AnnotationStore::default(),
            results: ResultsIndex::default(),
            dynamic_scope: Vec::new(),
        }
    }

    pub(crate) fn evaluate(
        &mut self,
        node: NodeId,
        instance: &'i Value,
        instance_location: &Location,
        evaluation_path: &Location,
    ) -> Result<(), Halt> {
        let tree = self.tree;
        tree.node(node)
            .evaluate(instance, instance_location, evaluation_path, self)
    }

    /// Evaluate a value that is not part of the instance, e.g. a property name.
    ///
    /// Only the errors are kept.
    pub(crate) fn evaluate_detached(
        &self,
        node: NodeId,
        value: &Value,
        instance_location: &Location,
        evaluation_path: &Location,
    ) -> Vec<ValidationError<'static>> {
        let mut detached = ExecutionContext {
            tree: self.tree,
            settings: self.settings,
            errors: Vec::new(),
            annotations: AnnotationStore::default(),
            results: ResultsIndex::default(),
            dynamic_scope: self.dynamic_scope.clone(),
        };
        let _ = detached.evaluate(node, value, instance_location, evaluation_path);
        detached
            .errors
            .into_iter()
            .map(ValidationError::into_owned)
            .collect()
    }

    /// Run `evaluation` with its own error list and return the errors it produced.
    ///
    /// A fail-fast halt inside the branch only ends the branch.
    pub(crate) fn branch(
        &mut self,
        evaluation: impl FnOnce(&mut Self) -> Result<(), Halt>,
    ) -> Vec<ValidationError<'i>> {
        let outer = mem::take(&mut self.errors);
        let _ = evaluation(self);
        mem::replace(&mut self.errors, outer)
    }

    pub(crate) fn report(
        &mut self,
        scope: &Scope<'_>,
        instance: &'i Value,
        kind: ValidationErrorKind,
    ) -> Result<(), Halt> {
        self.report_at(scope, instance, scope.instance_location.clone(), kind)
    }

    pub(crate) fn report_at(
        &mut self,
        scope: &Scope<'_>,
        instance: &'i Value,
        instance_location: Location,
        kind: ValidationErrorKind,
    ) -> Result<(), Halt> {
        let message = messages::render(
            self.settings.messages,
            kind.message_key(),
            self.settings.locale,
            &kind.arguments(),
        );
        self.errors.push(ValidationError {
            instance: Cow::Borrowed(instance),
            kind,
            keyword: Arc::clone(&scope.keyword.name),
            instance_location,
            evaluation_path: scope.path.clone(),
            schema_location: scope.keyword.schema_location.clone(),
            schema: Arc::clone(&scope.keyword.value),
            message,
        });
        self.halt_if_failing_fast()
    }

    /// Append errors collected in a branch.
    pub(crate) fn extend(&mut self, errors: Vec<ValidationError<'i>>) -> Result<(), Halt> {
        if errors.is_empty() {
            return Ok(());
        }
        self.errors.extend(errors);
        self.halt_if_failing_fast()
    }

    fn halt_if_failing_fast(&self) -> Result<(), Halt> {
        if self.settings.fail_fast {
            tracing::trace!("halting evaluation after the first error");
            Err(Halt)
        } else {
            Ok(())
        }
    }

    /// Whether applicators record which parts of the instance they evaluated.
    pub(crate) fn tracks_evaluated(&self) -> bool {
        self.settings.annotation_collection || self.tree.has_unevaluated()
    }

    /// Record an annotation of an applicator keyword.
    pub(crate) fn annotate_evaluated(&mut self, scope: &Scope<'_>, value: impl FnOnce() -> Value) {
        if self.tracks_evaluated() {
            self.push_annotation(scope, value());
        }
    }

    /// Record an annotation of a keyword that only exists for its annotation.
    pub(crate) fn annotate(&mut self, scope: &Scope<'_>, value: impl FnOnce() -> Value) {
        if self.settings.annotation_collection {
            self.push_annotation(scope, value());
        }
    }

    fn push_annotation(&mut self, scope: &Scope<'_>, value: Value) {
        self.annotations.push(Annotation {
            keyword: Arc::clone(&scope.keyword.name),
            schema_location: scope.keyword.schema_location.clone(),
            evaluation_path: scope.path.clone(),
            instance_location: scope.instance_location.clone(),
            value,
        });
    }

    pub(crate) fn read_only(&self) -> bool {
        self.settings.read_only
    }

    pub(crate) fn write_only(&self) -> bool {
        self.settings.write_only
    }

    /// Effective format assertion flag for a keyword compiled with `default` as its behavior.
    pub(crate) fn asserts_formats(&self, default: bool) -> bool {
        self.settings.format_assertions.unwrap_or(default)
    }

    pub(crate) fn enter_resource(&mut self, resource: ResourceId) -> bool {
        if self.dynamic_scope.last() == Some(&resource) {
            false
        } else {
            self.dynamic_scope.push(resource);
            true
        }
    }

    pub(crate) fn leave_resource(&mut self) {
        self.dynamic_scope.pop();
    }

    /// Resources of the current dynamic scope, innermost first.
    pub(crate) fn dynamic_scope(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.dynamic_scope.iter().rev().copied()
    }

    pub(crate) fn walk_start(&self, event: &WalkEvent<'_>) -> WalkFlow {
        self.settings
            .listener
            .map_or(WalkFlow::Continue, |listener| listener.on_walk_start(event))
    }

    pub(crate) fn walk_end(&self, event: &WalkEvent<'_>, since: usize) {
        if let Some(listener) = self.settings.listener {
            listener.on_walk_end(event, &self.errors[since..]);
        }
    }

    pub(crate) fn is_walking(&self) -> bool {
        self.settings.listener.is_some()
    }

    pub(crate) fn finish(self) -> (Vec<ValidationError<'i>>, AnnotationStore, ResultsIndex) {
        (self.errors, self.annotations, self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn location(pointer: &str) -> Location {
        Location::from_pointer(pointer)
    }

    #[test_case("/a", "", "/allOf/0", "/allOf/0/properties", false; "failed ancestor")]
    #[test_case("/a", "", "/allOf/0", "/allOf/1/properties", true; "sibling branch")]
    #[test_case("/a", "/a", "/allOf/0", "/allOf/0", false; "same path")]
    #[test_case("/a", "/b", "/allOf/0", "/allOf/0", true; "other location")]
    #[test_case("/a", "", "/allOf/0/properties", "/allOf/0", true; "failure below the path")]
    fn results_index(
        failed_at: &str,
        queried_at: &str,
        failed_path: &str,
        queried_path: &str,
        expected: bool,
    ) {
        let mut results = ResultsIndex::default();
        let schema_location = SchemaLocation::new("json-schema:///".into(), location(failed_path));
        results.record_failure(&location(failed_at), &schema_location, &location(failed_path));
        let queried_at = if queried_at.is_empty() {
            location(failed_at)
        } else {
            location(queried_at)
        };
        assert_eq!(
            results.is_valid(&queried_at, &location(queried_path)),
            expected
        );
    }

    #[test]
    fn annotations_by_location() {
        let mut store = AnnotationStore::default();
        for (pointer, value) in [("/a", 1), ("", 2), ("/a", 3)] {
            store.push(Annotation {
                keyword: "title".into(),
                schema_location: SchemaLocation::new("json-schema:///".into(), Location::new()),
                evaluation_path: Location::new(),
                instance_location: location(pointer),
                value: Value::from(value),
            });
        }
        let values: Vec<&Value> = store.at(&location("/a")).map(Annotation::value).collect();
        assert_eq!(values, [&Value::from(1), &Value::from(3)]);
        assert_eq!(store.into_vec().len(), 3);
    }
}
