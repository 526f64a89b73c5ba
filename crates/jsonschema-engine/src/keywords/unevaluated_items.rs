//! `unevaluatedItems` applies to the array items no adjacent keyword evaluated.
use jsonschema_dialect::Draft;
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

/// Items covered by the annotations of adjacent keywords.
enum Evaluated {
    All,
    Some(Vec<bool>),
}

impl Evaluated {
    fn contains(&self, idx: usize) -> bool {
        match self {
            Evaluated::All => true,
            Evaluated::Some(flags) => flags.get(idx).copied().unwrap_or(false),
        }
    }
}

pub(crate) struct UnevaluatedItemsValidator {
    node: NodeId,
    forbidden: bool,
    /// `contains` marks items as evaluated since 2020-12.
    with_contains: bool,
}

impl UnevaluatedItemsValidator {
    fn evaluated(&self, ctx: &ExecutionContext<'_, '_>, scope: &Scope<'_>, len: usize) -> Evaluated {
        let mut flags = vec![false; len];
        for annotation in ctx.annotations.at(scope.instance_location) {
            if !annotation.evaluation_path().starts_with(scope.node_path)
                || !ctx
                    .results
                    .is_valid(scope.instance_location, annotation.evaluation_path())
            {
                continue;
            }
            match (annotation.keyword(), annotation.value()) {
                (
                    "items" | "prefixItems" | "additionalItems" | "unevaluatedItems",
                    Value::Bool(true),
                ) => return Evaluated::All,
                ("contains", Value::Bool(true)) if self.with_contains => return Evaluated::All,
                ("items" | "prefixItems", Value::Number(largest)) => {
                    let end = largest.as_u64().map_or(0, |largest| largest as usize + 1);
                    for flag in flags.iter_mut().take(end) {
                        *flag = true;
                    }
                }
                ("contains", Value::Array(indices)) if self.with_contains => {
                    for idx in indices.iter().filter_map(Value::as_u64) {
                        if let Some(flag) = flags.get_mut(idx as usize) {
                            *flag = true;
                        }
                    }
                }
                _ => {}
            }
        }
        Evaluated::Some(flags)
    }
}

impl Validate for UnevaluatedItemsValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Array(items) = instance else {
            return Ok(());
        };
        let evaluated = self.evaluated(ctx, scope, items.len());
        let unevaluated = items
            .iter()
            .enumerate()
            .filter(|(idx, _)| !evaluated.contains(*idx));
        if self.forbidden {
            let unexpected: Vec<usize> = unevaluated.map(|(idx, _)| idx).collect();
            if unexpected.is_empty() {
                return Ok(());
            }
            return ctx.report(
                scope,
                instance,
                ValidationErrorKind::UnevaluatedItems { unexpected },
            );
        }
        let mut applied = false;
        for (idx, item) in unevaluated {
            let instance_location = scope.instance_location.join(idx);
            ctx.evaluate(self.node, item, &instance_location, scope.path)?;
            applied = true;
        }
        if applied {
            ctx.annotate_evaluated(scope, || Value::Bool(true));
        }
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
    let with_contains = ctx.draft() >= Draft::Draft202012;
    Some(ctx.keyword_subschema().map(|node| {
        Box::new(UnevaluatedItemsValidator {
            node,
            forbidden,
            with_contains,
        }) as BoxedValidator
    }))
}
