//! `minimum`, `maximum`, `exclusiveMinimum` and `exclusiveMaximum`.
use jsonschema_dialect::Draft;
use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::Scope,
    validator::Validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
}

/// The limit keeps the representation of the schema number, so comparisons never cast.
#[derive(Debug, Clone, Copy)]
enum Limit {
    U64(u64),
    I64(i64),
    F64(f64),
}

impl Limit {
    fn from_number(number: &Number) -> Option<Limit> {
        if let Some(limit) = number.as_u64() {
            Some(Limit::U64(limit))
        } else if let Some(limit) = number.as_i64() {
            Some(Limit::I64(limit))
        } else {
            number.as_f64().map(Limit::F64)
        }
    }
}

macro_rules! compare {
    ($method:ident, $item:expr, $limit:expr) => {
        match $limit {
            Limit::U64(limit) => NumCmp::$method($item, limit),
            Limit::I64(limit) => NumCmp::$method($item, limit),
            Limit::F64(limit) => NumCmp::$method($item, limit),
        }
    };
}

fn satisfies<T>(item: T, bound: Bound, limit: Limit) -> bool
where
    T: NumCmp<u64> + NumCmp<i64> + NumCmp<f64> + Copy,
{
    match bound {
        Bound::Minimum => !compare!(num_lt, item, limit),
        Bound::Maximum => !compare!(num_gt, item, limit),
        Bound::ExclusiveMinimum => compare!(num_gt, item, limit),
        Bound::ExclusiveMaximum => compare!(num_lt, item, limit),
    }
}

pub(crate) struct LimitValidator {
    bound: Bound,
    limit: Limit,
    limit_value: Value,
}

impl LimitValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Value::Number(item) = instance else {
            return true;
        };
        if let Some(item) = item.as_u64() {
            satisfies(item, self.bound, self.limit)
        } else if let Some(item) = item.as_i64() {
            satisfies(item, self.bound, self.limit)
        } else {
            item.as_f64()
                .map_or(true, |item| satisfies(item, self.bound, self.limit))
        }
    }
}

impl Validate for LimitValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        if self.is_valid(instance) {
            return Ok(());
        }
        let limit = self.limit_value.clone();
        let kind = match self.bound {
            Bound::Minimum => ValidationErrorKind::Minimum { limit },
            Bound::Maximum => ValidationErrorKind::Maximum { limit },
            Bound::ExclusiveMinimum => ValidationErrorKind::ExclusiveMinimum { limit },
            Bound::ExclusiveMaximum => ValidationErrorKind::ExclusiveMaximum { limit },
        };
        ctx.report(scope, instance, kind)
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let Some(limit) = (match schema {
        Value::Number(number) => Limit::from_number(number),
        _ => None,
    }) else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"number\""))));
    };
    let mut bound = match ctx.keyword() {
        "minimum" => Bound::Minimum,
        "maximum" => Bound::Maximum,
        "exclusiveMinimum" => Bound::ExclusiveMinimum,
        _ => Bound::ExclusiveMaximum,
    };
    // Draft 4 makes `minimum` and `maximum` exclusive with a boolean sibling
    if ctx.draft() == Draft::Draft4 {
        let flag = match bound {
            Bound::Minimum => parent.get("exclusiveMinimum"),
            Bound::Maximum => parent.get("exclusiveMaximum"),
            _ => None,
        };
        match flag {
            Some(Value::Bool(true)) => {
                bound = if bound == Bound::Minimum {
                    Bound::ExclusiveMinimum
                } else {
                    Bound::ExclusiveMaximum
                };
            }
            Some(Value::Bool(false)) | None => {}
            Some(other) => {
                return Some(Err(ctx.invalid(format!(
                    "exclusive flag {other} is not of type \"boolean\""
                ))))
            }
        }
    }
    Some(Ok(Box::new(LimitValidator {
        bound,
        limit,
        limit_value: schema.clone(),
    })))
}
