//! `if` with its `then` and `else` siblings.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::SchemaError,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    paths::LocationSegment,
    validator::{BoxedValidator, Validate},
};

pub(crate) struct IfThenElseValidator {
    condition: NodeId,
    then_node: Option<NodeId>,
    else_node: Option<NodeId>,
}

impl Validate for IfThenElseValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let errors = ctx.branch(|ctx| {
            ctx.evaluate(self.condition, instance, scope.instance_location, scope.path)
        });
        let (node, keyword) = if errors.is_empty() {
            (self.then_node, "then")
        } else {
            (self.else_node, "else")
        };
        match node {
            Some(node) => ctx.evaluate(
                node,
                instance,
                scope.instance_location,
                &scope.node_path.join(keyword),
            ),
            None => Ok(()),
        }
    }
}

fn sibling(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    keyword: &'static str,
) -> Result<Option<NodeId>, SchemaError> {
    if parent.contains_key(keyword) {
        ctx.subschema([LocationSegment::Property(keyword)]).map(Some)
    } else {
        Ok(None)
    }
}

fn compile_impl(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
) -> Result<IfThenElseValidator, SchemaError> {
    Ok(IfThenElseValidator {
        condition: ctx.keyword_subschema()?,
        then_node: sibling(ctx, parent, "then")?,
        else_node: sibling(ctx, parent, "else")?,
    })
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    _: &Value,
) -> Option<CompilationResult> {
    Some(compile_impl(ctx, parent).map(|validator| Box::new(validator) as BoxedValidator))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn schema() -> Value {
        json!({
            "if": {"type": "integer"},
            "then": {"minimum": 10},
            "else": {"type": "string"}
        })
    }

    #[test_case(&json!(10))]
    #[test_case(&json!("a"))]
    fn if_then_else_is_valid(instance: &Value) {
        tests_util::is_valid(&schema(), instance);
    }

    #[test_case(&json!(5), "/then/minimum")]
    #[test_case(&json!(null), "/else/type")]
    fn failing_branch_path(instance: &Value, expected: &str) {
        tests_util::assert_evaluation_path(&schema(), instance, expected);
        tests_util::assert_schema_location(&schema(), instance, expected);
    }

    #[test]
    fn condition_errors_are_not_reported() {
        tests_util::is_valid(&json!({"if": {"type": "integer"}}), &json!("a"));
    }

    #[test]
    fn then_without_if_does_nothing() {
        tests_util::is_valid(&json!({"then": false, "else": false}), &json!(1));
    }
}
