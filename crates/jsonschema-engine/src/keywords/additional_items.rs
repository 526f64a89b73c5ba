use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct AdditionalItemsValidator {
    node: NodeId,
    /// Number of positional `items` schemas.
    limit: usize,
    forbidden: bool,
}

impl Validate for AdditionalItemsValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Array(items) = instance else {
            return Ok(());
        };
        if items.len() <= self.limit {
            return Ok(());
        }
        if self.forbidden {
            return ctx.report(
                scope,
                instance,
                ValidationErrorKind::AdditionalItems { limit: self.limit },
            );
        }
        for (idx, item) in items.iter().enumerate().skip(self.limit) {
            let instance_location = scope.instance_location.join(idx);
            ctx.evaluate(self.node, item, &instance_location, scope.path)?;
        }
        ctx.annotate_evaluated(scope, || Value::Bool(true));
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    // Without positional `items` every item is already covered
    let Some(Value::Array(items)) = parent.get("items") else {
        return None;
    };
    let limit = items.len();
    let forbidden = schema == &Value::Bool(false);
    Some(ctx.keyword_subschema().map(|node| {
        Box::new(AdditionalItemsValidator {
            node,
            limit,
            forbidden,
        }) as BoxedValidator
    }))
}
