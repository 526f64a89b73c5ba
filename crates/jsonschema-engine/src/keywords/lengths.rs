//! Size limits of strings, arrays and objects.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::{helpers, CompilationResult},
    node::Scope,
    validator::{BoxedValidator, Validate},
};

#[derive(Debug, Clone, Copy)]
enum Measure {
    MinLength,
    MaxLength,
    MinItems,
    MaxItems,
    MinProperties,
    MaxProperties,
}

pub(crate) struct LengthValidator {
    measure: Measure,
    limit: u64,
}

impl LengthValidator {
    /// Size of the instance, if the keyword applies to it.
    fn size(&self, instance: &Value) -> Option<u64> {
        let size = match (self.measure, instance) {
            (Measure::MinLength | Measure::MaxLength, Value::String(item)) => {
                bytecount::num_chars(item.as_bytes())
            }
            (Measure::MinItems | Measure::MaxItems, Value::Array(items)) => items.len(),
            (Measure::MinProperties | Measure::MaxProperties, Value::Object(item)) => item.len(),
            _ => return None,
        };
        Some(size as u64)
    }
}

impl Validate for LengthValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Some(size) = self.size(instance) else {
            return Ok(());
        };
        let limit = self.limit;
        let kind = match self.measure {
            Measure::MinLength if size < limit => ValidationErrorKind::MinLength { limit },
            Measure::MaxLength if size > limit => ValidationErrorKind::MaxLength { limit },
            Measure::MinItems if size < limit => ValidationErrorKind::MinItems { limit },
            Measure::MaxItems if size > limit => ValidationErrorKind::MaxItems { limit },
            Measure::MinProperties if size < limit => ValidationErrorKind::MinProperties { limit },
            Measure::MaxProperties if size > limit => ValidationErrorKind::MaxProperties { limit },
            _ => return Ok(()),
        };
        ctx.report(scope, instance, kind)
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let measure = match ctx.keyword() {
        "minLength" => Measure::MinLength,
        "maxLength" => Measure::MaxLength,
        "minItems" => Measure::MinItems,
        "maxItems" => Measure::MaxItems,
        "minProperties" => Measure::MinProperties,
        _ => Measure::MaxProperties,
    };
    Some(
        helpers::non_negative_integer(ctx, schema)
            .map(|limit| Box::new(LengthValidator { measure, limit }) as BoxedValidator),
    )
}
