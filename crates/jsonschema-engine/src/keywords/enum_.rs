use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::{helpers, CompilationResult},
    node::Scope,
    validator::Validate,
};

pub(crate) struct EnumValidator {
    options: Value,
}

impl Validate for EnumValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Array(items) = &self.options else {
            return Ok(());
        };
        if items.iter().any(|item| helpers::equal(instance, item)) {
            Ok(())
        } else {
            ctx.report(
                scope,
                instance,
                ValidationErrorKind::Enum {
                    options: self.options.clone(),
                },
            )
        }
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    if schema.is_array() {
        Some(Ok(Box::new(EnumValidator {
            options: schema.clone(),
        })))
    } else {
        Some(Err(ctx.invalid(format!("{schema} is not of type \"array\""))))
    }
}
