use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    keywords::{helpers, CompilationResult},
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct AllOfValidator {
    nodes: Vec<NodeId>,
}

impl Validate for AllOfValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        for (idx, node) in self.nodes.iter().enumerate() {
            ctx.evaluate(*node, instance, scope.instance_location, &scope.path.join(idx))?;
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
    Some(
        helpers::schema_array(ctx, "allOf", schema)
            .map(|nodes| Box::new(AllOfValidator { nodes }) as BoxedValidator),
    )
}
