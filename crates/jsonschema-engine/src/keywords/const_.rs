use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::{helpers, CompilationResult},
    node::Scope,
    validator::Validate,
};

pub(crate) struct ConstValidator {
    value: Value,
}

impl Validate for ConstValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        if helpers::equal(instance, &self.value) {
            Ok(())
        } else {
            ctx.report(
                scope,
                instance,
                ValidationErrorKind::Constant {
                    expected_value: self.value.clone(),
                },
            )
        }
    }
}

#[inline]
pub(crate) fn compile(
    _: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(Ok(Box::new(ConstValidator {
        value: schema.clone(),
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"const": 2}), &json!(2.0))]
    #[test_case(&json!({"const": null}), &json!(null))]
    #[test_case(&json!({"const": {"a": [true]}}), &json!({"a": [true]}))]
    fn const_is_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"const": 2}), &json!("2"))]
    #[test_case(&json!({"const": false}), &json!(0))]
    #[test_case(&json!({"const": {"a": 1}}), &json!({"a": 1, "b": 2}))]
    fn const_is_not_valid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test]
    fn message() {
        tests_util::expect_errors(
            &json!({"const": "a"}),
            &json!("b"),
            &["must be the constant value \"a\""],
        );
    }

    #[test]
    fn draft4_has_no_const() {
        tests_util::is_valid_with_draft(crate::Draft::Draft4, &json!({"const": 1}), &json!(2));
    }
}
