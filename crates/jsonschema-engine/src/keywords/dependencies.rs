//! `dependencies` and `dependentSchemas`.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    keywords::{required, required::DependentRequiredValidator, CompilationResult},
    node::{NodeId, Scope},
    paths::LocationSegment,
    validator::{BoxedValidator, Validate},
};

/// Schemas applied to the whole object when a property is present.
pub(crate) struct DependentSchemasValidator {
    schemas: Vec<(String, NodeId)>,
    required: Option<DependentRequiredValidator>,
}

impl Validate for DependentSchemasValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        if let Some(required) = &self.required {
            required.validate(instance, scope, ctx)?;
        }
        for (property, node) in &self.schemas {
            if item.contains_key(property) {
                let path = scope.path.join(property.as_str());
                ctx.evaluate(*node, instance, scope.instance_location, &path)?;
            }
        }
        Ok(())
    }
}

fn compile_impl(
    ctx: &mut compiler::Context<'_, '_>,
    schema: &Value,
    allow_arrays: bool,
) -> Result<DependentSchemasValidator, crate::error::SchemaError> {
    let Value::Object(map) = schema else {
        return Err(ctx.invalid(format!("{schema} is not of type \"object\"")));
    };
    let keyword = ctx.keyword();
    let mut schemas = Vec::new();
    let mut dependencies = Vec::new();
    for (property, value) in map {
        if allow_arrays && value.is_array() {
            dependencies.push((property.clone(), required::string_array(ctx, value)?));
        } else {
            let node = ctx.subschema([
                LocationSegment::Property(keyword),
                LocationSegment::Property(property),
            ])?;
            schemas.push((property.clone(), node));
        }
    }
    Ok(DependentSchemasValidator {
        schemas,
        required: (!dependencies.is_empty()).then(|| DependentRequiredValidator::new(dependencies)),
    })
}

#[inline]
pub(crate) fn compile_dependencies(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(compile_impl(ctx, schema, true).map(|validator| Box::new(validator) as BoxedValidator))
}

#[inline]
pub(crate) fn compile_dependent_schemas(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(compile_impl(ctx, schema, false).map(|validator| Box::new(validator) as BoxedValidator))
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, Draft};
    use serde_json::{json, Value};
    use test_case::test_case;

    fn dependencies() -> Value {
        json!({
            "dependencies": {
                "bar": ["foo"],
                "quux": {"properties": {"foo": {"type": "integer"}}}
            }
        })
    }

    #[test_case(&json!({}))]
    #[test_case(&json!({"bar": 1, "foo": 2}))]
    #[test_case(&json!({"quux": 1, "foo": 2}))]
    #[test_case(&json!(["bar"]))]
    fn dependencies_are_valid(instance: &Value) {
        tests_util::is_valid_with_draft(Draft::Draft7, &dependencies(), instance);
    }

    #[test_case(&json!({"bar": 1}))]
    #[test_case(&json!({"quux": 1, "foo": "x"}))]
    fn dependencies_are_not_valid(instance: &Value) {
        tests_util::is_not_valid_with_draft(Draft::Draft7, &dependencies(), instance);
    }

    #[test]
    fn dependent_schemas() {
        let schema = json!({"dependentSchemas": {"a": {"required": ["b"]}}});
        tests_util::is_valid(&schema, &json!({"b": 1}));
        tests_util::is_not_valid(&schema, &json!({"a": 1}));
        tests_util::assert_evaluation_path(&schema, &json!({"a": 1}), "/dependentSchemas/a/required");
        tests_util::assert_schema_location(&schema, &json!({"a": 1}), "/dependentSchemas/a/required");
    }

    #[test]
    fn array_form_is_rejected_in_dependent_schemas() {
        assert!(crate::validator_for(&json!({"dependentSchemas": {"a": ["b"]}})).is_err());
    }
}
