//! `contains`, with the `minContains` and `maxContains` bounds of its schema.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{SchemaError, ValidationErrorKind},
    keywords::{helpers, CompilationResult},
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct ContainsValidator {
    node: NodeId,
    min_contains: Option<u64>,
    max_contains: Option<u64>,
}

impl Validate for ContainsValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Array(items) = instance else {
            return Ok(());
        };
        let mut matched = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            let instance_location = scope.instance_location.join(idx);
            let errors = ctx.branch(|ctx| ctx.evaluate(self.node, item, &instance_location, scope.path));
            if errors.is_empty() {
                matched.push(idx);
                let enough = matched.len() as u64 >= self.min_contains.unwrap_or(1);
                if enough && self.max_contains.is_none() && !ctx.tracks_evaluated() {
                    break;
                }
            }
        }
        let count = matched.len();
        let kind = match (self.min_contains, self.max_contains) {
            (Some(limit), _) if (count as u64) < limit => {
                Some(ValidationErrorKind::MinContains { limit, matched: count })
            }
            (None, _) if count == 0 => Some(ValidationErrorKind::Contains),
            (_, Some(limit)) if count as u64 > limit => {
                Some(ValidationErrorKind::MaxContains { limit, matched: count })
            }
            _ => None,
        };
        if let Some(kind) = kind {
            return ctx.report(scope, instance, kind);
        }
        ctx.annotate_evaluated(scope, || {
            if count == items.len() {
                Value::Bool(true)
            } else {
                Value::Array(matched.into_iter().map(Value::from).collect())
            }
        });
        Ok(())
    }
}

fn bound(
    ctx: &compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    keyword: &str,
) -> Result<Option<u64>, SchemaError> {
    if ctx.dialect().keyword(keyword).is_none() {
        return Ok(None);
    }
    parent
        .get(keyword)
        .map(|value| helpers::non_negative_integer(ctx, value))
        .transpose()
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    _: &Value,
) -> Option<CompilationResult> {
    let bounds = bound(ctx, parent, "minContains")
        .and_then(|min| Ok((min, bound(ctx, parent, "maxContains")?)));
    let (min_contains, max_contains) = match bounds {
        Ok(bounds) => bounds,
        Err(error) => return Some(Err(error)),
    };
    Some(ctx.keyword_subschema().map(|node| {
        Box::new(ContainsValidator {
            node,
            min_contains,
            max_contains,
        }) as BoxedValidator
    }))
}
