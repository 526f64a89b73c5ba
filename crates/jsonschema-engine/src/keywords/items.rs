//! `items` and `prefixItems`.
use jsonschema_dialect::Draft;
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    keywords::{helpers, CompilationResult},
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

/// One schema per position: `prefixItems`, or `items` as an array before 2020-12.
pub(crate) struct PrefixItemsValidator {
    nodes: Vec<NodeId>,
}

impl Validate for PrefixItemsValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Array(items) = instance else {
            return Ok(());
        };
        for (idx, (item, node)) in items.iter().zip(&self.nodes).enumerate() {
            let instance_location = scope.instance_location.join(idx);
            ctx.evaluate(*node, item, &instance_location, &scope.path.join(idx))?;
        }
        let evaluated = items.len().min(self.nodes.len());
        if evaluated > 0 {
            ctx.annotate_evaluated(scope, || {
                if evaluated == items.len() {
                    Value::Bool(true)
                } else {
                    Value::from(evaluated - 1)
                }
            });
        }
        Ok(())
    }
}

/// A single schema for every item after `skip`.
pub(crate) struct ItemsValidator {
    node: NodeId,
    skip: usize,
}

impl Validate for ItemsValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Array(items) = instance else {
            return Ok(());
        };
        for (idx, item) in items.iter().enumerate().skip(self.skip) {
            let instance_location = scope.instance_location.join(idx);
            ctx.evaluate(self.node, item, &instance_location, scope.path)?;
        }
        if items.len() > self.skip {
            ctx.annotate_evaluated(scope, || Value::Bool(true));
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    if ctx.draft() < Draft::Draft202012 && schema.is_array() {
        return Some(
            helpers::schema_array(ctx, "items", schema)
                .map(|nodes| Box::new(PrefixItemsValidator { nodes }) as BoxedValidator),
        );
    }
    let skip = if ctx.draft() == Draft::Draft202012 {
        parent
            .get("prefixItems")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    } else {
        0
    };
    Some(
        ctx.keyword_subschema()
            .map(|node| Box::new(ItemsValidator { node, skip }) as BoxedValidator),
    )
}

#[inline]
pub(crate) fn compile_prefix_items(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(
        helpers::schema_array(ctx, "prefixItems", schema)
            .map(|nodes| Box::new(PrefixItemsValidator { nodes }) as BoxedValidator),
    )
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, Draft};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, 2]))]
    #[test_case(&json!({"items": false}), &json!([]))]
    #[test_case(&json!({"prefixItems": [{"type": "string"}], "items": {"type": "integer"}}), &json!(["a", 1]))]
    #[test_case(&json!({"prefixItems": [{"type": "string"}]}), &json!(["a", 1, null]))]
    fn items_are_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, "2"]))]
    #[test_case(&json!({"items": false}), &json!([1]))]
    #[test_case(&json!({"prefixItems": [{"type": "string"}], "items": {"type": "integer"}}), &json!(["a", "b"]))]
    #[test_case(&json!({"prefixItems": [], "unevaluatedItems": false}), &json!([1]))]
    fn items_are_not_valid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test]
    fn array_form_before_2020_12() {
        let schema = json!({"items": [{"type": "integer"}, {"type": "string"}]});
        tests_util::is_valid_with_draft(Draft::Draft7, &schema, &json!([1, "a", null]));
        tests_util::is_not_valid_with_draft(Draft::Draft7, &schema, &json!(["a"]));
        tests_util::is_not_valid_with_draft(Draft::Draft201909, &schema, &json!([1, 2]));
    }

    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, "2"]), "/items/type", "/1")]
    #[test_case(&json!({"prefixItems": [{}, {"type": "integer"}]}), &json!([1, "2"]), "/prefixItems/1/type", "/1")]
    fn locations(schema: &Value, instance: &Value, path: &str, instance_location: &str) {
        let error = tests_util::validate(schema, instance);
        assert_eq!(error.evaluation_path.as_pointer(), path);
        assert_eq!(error.instance_location.as_pointer(), instance_location);
    }

    #[test]
    fn prefix_annotation() {
        let validator = crate::options()
            .with_annotation_collection(true)
            .build(&json!({"prefixItems": [{}, {}]}))
            .expect("Valid schema");
        let annotated = |instance: Value| {
            validator
                .evaluate(&instance)
                .annotations()
                .map(|annotation| annotation.value().clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(annotated(json!([1, 2, 3])), [json!(1)]);
        assert_eq!(annotated(json!([1])), [json!(true)]);
    }

    #[test]
    fn empty_prefix_evaluates_nothing() {
        let validator = crate::options()
            .with_annotation_collection(true)
            .build(&json!({"prefixItems": []}))
            .expect("Valid schema");
        let instance = json!([1, 2]);
        let evaluation = validator.evaluate(&instance);
        assert!(evaluation.is_valid());
        assert_eq!(evaluation.annotations().count(), 0);
        tests_util::is_valid_with_draft(Draft::Draft7, &json!({"items": []}), &instance);
    }
}
