//! `unevaluatedProperties` applies to the properties no adjacent keyword evaluated.
//!
//! Adjacent keywords, including the ones reached through applicators and references, record
//! the properties they evaluated as annotations. Only annotations of subschemas that passed
//! count.
use ahash::AHashSet;
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

const EVALUATING: [&str; 4] = [
    "properties",
    "patternProperties",
    "additionalProperties",
    "unevaluatedProperties",
];

pub(crate) struct UnevaluatedPropertiesValidator {
    node: NodeId,
    forbidden: bool,
}

/// Names of the properties at the current location evaluated below `scope.node_path`.
fn evaluated_properties(ctx: &ExecutionContext<'_, '_>, scope: &Scope<'_>) -> AHashSet<String> {
    let mut evaluated = AHashSet::new();
    for annotation in ctx.annotations.at(scope.instance_location) {
        if !EVALUATING.contains(&annotation.keyword())
            || !annotation.evaluation_path().starts_with(scope.node_path)
            || !ctx
                .results
                .is_valid(scope.instance_location, annotation.evaluation_path())
        {
            continue;
        }
        if let Value::Array(names) = annotation.value() {
            evaluated.extend(names.iter().filter_map(Value::as_str).map(str::to_string));
        }
    }
    evaluated
}

impl Validate for UnevaluatedPropertiesValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        let evaluated = evaluated_properties(ctx, scope);
        let unevaluated = item.iter().filter(|(name, _)| !evaluated.contains(*name));
        if self.forbidden {
            let unexpected: Vec<String> = unevaluated.map(|(name, _)| name.clone()).collect();
            if unexpected.is_empty() {
                return Ok(());
            }
            return ctx.report(
                scope,
                instance,
                ValidationErrorKind::UnevaluatedProperties { unexpected },
            );
        }
        let mut matched = Vec::new();
        for (name, value) in unevaluated {
            let instance_location = scope.instance_location.join(name.as_str());
            ctx.evaluate(self.node, value, &instance_location, scope.path)?;
            matched.push(Value::String(name.clone()));
        }
        ctx.annotate_evaluated(scope, || Value::Array(matched));
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let forbidden = schema == &Value::Bool(false);
    Some(ctx.keyword_subschema().map(|node| {
        Box::new(UnevaluatedPropertiesValidator { node, forbidden }) as BoxedValidator
    }))
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, Draft};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"properties": {"a": {}}, "unevaluatedProperties": false}), &json!({"a": 1}))]
    #[test_case(&json!({"allOf": [{"properties": {"a": {}}}], "unevaluatedProperties": false}), &json!({"a": 1}))]
    #[test_case(&json!({"$ref": "#/$defs/a", "unevaluatedProperties": false, "$defs": {"a": {"properties": {"a": {}}}}}), &json!({"a": 1}))]
    #[test_case(&json!({"if": {"properties": {"a": {"const": 1}}}, "then": {"properties": {"b": {}}}, "unevaluatedProperties": false}), &json!({"a": 1, "b": 2}))]
    #[test_case(&json!({"patternProperties": {"^x": {}}, "unevaluatedProperties": {"type": "integer"}}), &json!({"xa": "s", "b": 1}))]
    #[test_case(&json!({"unevaluatedProperties": false}), &json!([1]))]
    fn unevaluated_properties_are_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"unevaluatedProperties": false}), &json!({"a": 1}))]
    #[test_case(&json!({"anyOf": [{"properties": {"a": {"type": "string"}}}, true], "unevaluatedProperties": false}), &json!({"a": 1}))]
    #[test_case(&json!({"not": {"not": {"properties": {"a": {}}}}, "unevaluatedProperties": false}), &json!({"a": 1}))]
    #[test_case(&json!({"properties": {"a": {}}, "unevaluatedProperties": {"type": "integer"}}), &json!({"a": 1, "b": "x"}))]
    fn unevaluated_properties_are_not_valid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test]
    fn nested_schemas_do_not_leak() {
        let schema = json!({
            "properties": {"inner": {"properties": {"a": {}}}},
            "unevaluatedProperties": false
        });
        tests_util::is_not_valid(&schema, &json!({"inner": {}, "a": 1}));
    }

    #[test]
    fn message() {
        tests_util::expect_errors(
            &json!({"properties": {"a": {}}, "unevaluatedProperties": false}),
            &json!({"a": 1, "b": 2, "c": 3}),
            &["property 'b', 'c' is not evaluated and the schema does not allow unevaluated properties"],
        );
    }

    #[test]
    fn keyword_order_does_not_matter() {
        let schema: Value = serde_json::from_str(
            r#"{"unevaluatedProperties": false, "properties": {"a": {}}}"#,
        )
        .expect("Valid JSON");
        tests_util::is_valid(&schema, &json!({"a": 1}));
    }

    #[test]
    fn not_a_keyword_before_2019_09() {
        tests_util::is_valid_with_draft(
            Draft::Draft7,
            &json!({"unevaluatedProperties": false}),
            &json!({"a": 1}),
        );
    }
}
