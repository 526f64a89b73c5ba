use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct NotValidator {
    node: NodeId,
}

impl Validate for NotValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let errors = ctx.branch(|ctx| ctx.evaluate(self.node, instance, scope.instance_location, scope.path));
        if errors.is_empty() {
            ctx.report(
                scope,
                instance,
                ValidationErrorKind::Not {
                    schema: (*scope.keyword.value).clone(),
                },
            )
        } else {
            Ok(())
        }
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    _: &Value,
) -> Option<CompilationResult> {
    Some(
        ctx.keyword_subschema()
            .map(|node| Box::new(NotValidator { node }) as BoxedValidator),
    )
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"not": {"type": "integer"}}), &json!("a"))]
    #[test_case(&json!({"not": false}), &json!(1))]
    #[test_case(&json!({"not": {"not": {"type": "integer"}}}), &json!(1))]
    fn not_is_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test]
    fn message() {
        tests_util::expect_errors(
            &json!({"not": {"type": "integer"}}),
            &json!(1),
            &["must not be valid to the schema {\"type\":\"integer\"}"],
        );
    }
}
