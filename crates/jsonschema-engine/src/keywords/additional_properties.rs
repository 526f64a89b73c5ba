//! `additionalProperties` applies to the properties that neither `properties` nor
//! `patternProperties` of the same schema cover.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{SchemaError, ValidationErrorKind},
    keywords::CompilationResult,
    node::{NodeId, Scope},
    regex_engine::Regex,
    validator::{BoxedValidator, Validate},
};

pub(crate) struct AdditionalPropertiesValidator {
    node: NodeId,
    properties: Vec<String>,
    patterns: Vec<Regex>,
    /// `additionalProperties: false`, reported as a single error.
    forbidden: bool,
}

impl AdditionalPropertiesValidator {
    fn is_additional(&self, name: &str) -> bool {
        !self.properties.iter().any(|property| property == name)
            && !self.patterns.iter().any(|regex| regex.is_match(name))
    }
}

impl Validate for AdditionalPropertiesValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        let additional = item.iter().filter(|(name, _)| self.is_additional(name));
        if self.forbidden {
            let unexpected: Vec<String> = additional.map(|(name, _)| name.clone()).collect();
            if !unexpected.is_empty() {
                ctx.report(
                    scope,
                    instance,
                    ValidationErrorKind::AdditionalProperties { unexpected },
                )?;
            }
            return Ok(());
        }
        let mut matched = Vec::new();
        for (name, value) in additional {
            let instance_location = scope.instance_location.join(name.as_str());
            ctx.evaluate(self.node, value, &instance_location, scope.path)?;
            matched.push(Value::String(name.clone()));
        }
        ctx.annotate_evaluated(scope, || Value::Array(matched));
        Ok(())
    }
}

fn compile_impl(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<AdditionalPropertiesValidator, SchemaError> {
    let properties = match parent.get("properties") {
        Some(Value::Object(properties)) => properties.keys().cloned().collect(),
        _ => Vec::new(),
    };
    let patterns = match parent.get("patternProperties") {
        Some(Value::Object(patterns)) => patterns
            .keys()
            .map(|pattern| ctx.regex(pattern))
            .collect::<Result<_, _>>()?,
        _ => Vec::new(),
    };
    Ok(AdditionalPropertiesValidator {
        node: ctx.keyword_subschema()?,
        properties,
        patterns,
        forbidden: schema == &Value::Bool(false),
    })
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(compile_impl(ctx, parent, schema).map(|validator| Box::new(validator) as BoxedValidator))
}
