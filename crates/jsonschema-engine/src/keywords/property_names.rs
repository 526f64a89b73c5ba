use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct PropertyNamesValidator {
    node: NodeId,
}

impl Validate for PropertyNamesValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        for name in item.keys() {
            // Names are not part of the instance, so their errors are detached from it
            let errors = ctx.evaluate_detached(
                self.node,
                &Value::String(name.clone()),
                scope.instance_location,
                scope.path,
            );
            if errors.is_empty() {
                continue;
            }
            ctx.report(
                scope,
                instance,
                ValidationErrorKind::PropertyNames {
                    property: name.clone(),
                },
            )?;
            ctx.extend(errors)?;
        }
        Ok(())
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
            .map(|node| Box::new(PropertyNamesValidator { node }) as BoxedValidator),
    )
}
