use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::SchemaError,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    paths::LocationSegment,
    regex_engine::Regex,
    validator::{BoxedValidator, Validate},
};

pub(crate) struct PatternPropertiesValidator {
    patterns: Vec<(Regex, NodeId)>,
}

impl Validate for PatternPropertiesValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        let mut matched = Vec::new();
        for (name, value) in item {
            let mut is_matched = false;
            for (regex, node) in &self.patterns {
                if regex.is_match(name) {
                    let instance_location = scope.instance_location.join(name.as_str());
                    let path = scope.path.join(regex.as_str());
                    ctx.evaluate(*node, value, &instance_location, &path)?;
                    is_matched = true;
                }
            }
            if is_matched {
                matched.push(Value::String(name.clone()));
            }
        }
        ctx.annotate_evaluated(scope, || Value::Array(matched));
        Ok(())
    }
}

/// Compiled patterns of a `patternProperties` value, with their subschemas.
pub(crate) fn compile_patterns(
    ctx: &mut compiler::Context<'_, '_>,
    schema: &Value,
) -> Result<Vec<(Regex, NodeId)>, SchemaError> {
    let Value::Object(map) = schema else {
        return Err(ctx.invalid(format!("{schema} is not of type \"object\"")));
    };
    let mut patterns = Vec::with_capacity(map.len());
    for pattern in map.keys() {
        let regex = ctx.regex(pattern)?;
        let node = ctx.subschema([
            LocationSegment::Property("patternProperties"),
            LocationSegment::Property(pattern),
        ])?;
        patterns.push((regex, node));
    }
    Ok(patterns)
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(
        compile_patterns(ctx, schema)
            .map(|patterns| Box::new(PatternPropertiesValidator { patterns }) as BoxedValidator),
    )
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn schema() -> Value {
        json!({"patternProperties": {"^x-": {"type": "string"}, "id$": {"type": "integer"}}})
    }

    #[test_case(&json!({"x-a": "b", "other": 1}))]
    #[test_case(&json!({"user_id": 5}))]
    #[test_case(&json!([1]))]
    fn pattern_properties_are_valid(instance: &Value) {
        tests_util::is_valid(&schema(), instance);
    }

    #[test]
    fn every_matching_pattern_applies() {
        tests_util::expect_errors(
            &schema(),
            &json!({"x-id": "7"}),
            &["must be of type integer"],
        );
    }

    #[test]
    fn locations() {
        let error = tests_util::validate(&schema(), &json!({"x-a": 1}));
        assert_eq!(error.instance_location.as_pointer(), "/x-a");
        assert_eq!(error.evaluation_path.as_pointer(), "/patternProperties/^x-/type");
    }
}
