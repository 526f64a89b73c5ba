use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    keywords::{helpers, CompilationResult},
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct PropertiesValidator {
    properties: Vec<(String, NodeId)>,
}

impl Validate for PropertiesValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        let mut matched = Vec::new();
        for (name, node) in &self.properties {
            if let Some(value) = item.get(name) {
                let instance_location = scope.instance_location.join(name.as_str());
                let path = scope.path.join(name.as_str());
                ctx.evaluate(*node, value, &instance_location, &path)?;
                matched.push(Value::String(name.clone()));
            }
        }
        ctx.annotate_evaluated(scope, || Value::Array(matched));
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let keyword = ctx.keyword();
    Some(
        helpers::schema_map(ctx, keyword, schema)
            .map(|properties| Box::new(PropertiesValidator { properties }) as BoxedValidator),
    )
}
