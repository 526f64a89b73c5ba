//! `readOnly` and `writeOnly`.
//!
//! Both are annotations. They also assert when the evaluation declares the direction of the
//! data via [`crate::ExecutionConfig::with_read_only`] or [`crate::ExecutionConfig::with_write_only`].
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::Scope,
    validator::{BoxedValidator, Validate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

pub(crate) struct AccessValidator {
    access: Access,
    enabled: bool,
}

impl Validate for AccessValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        ctx.annotate(scope, || Value::Bool(self.enabled));
        if !self.enabled {
            return Ok(());
        }
        match self.access {
            Access::Read if ctx.read_only() => {
                ctx.report(scope, instance, ValidationErrorKind::ReadOnly)
            }
            Access::Write if ctx.write_only() => {
                ctx.report(scope, instance, ValidationErrorKind::WriteOnly)
            }
            _ => Ok(()),
        }
    }
}

fn compile(
    ctx: &compiler::Context<'_, '_>,
    schema: &Value,
    access: Access,
) -> Option<CompilationResult> {
    match schema {
        Value::Bool(enabled) => Some(Ok(Box::new(AccessValidator {
            access,
            enabled: *enabled,
        }) as BoxedValidator)),
        _ => Some(Err(ctx.invalid(format!("{schema} is not of type \"boolean\"")))),
    }
}

#[inline]
pub(crate) fn compile_read_only(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    compile(ctx, schema, Access::Read)
}

#[inline]
pub(crate) fn compile_write_only(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    compile(ctx, schema, Access::Write)
}
