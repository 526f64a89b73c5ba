//! `required` and `dependentRequired`.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{SchemaError, ValidationErrorKind},
    keywords::CompilationResult,
    node::Scope,
    validator::{BoxedValidator, Validate},
};

pub(crate) fn string_array(
    ctx: &compiler::Context<'_, '_>,
    value: &Value,
) -> Result<Vec<String>, SchemaError> {
    let Value::Array(items) = value else {
        return Err(ctx.invalid(format!("{value} is not of type \"array\"")));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(name) => Ok(name.clone()),
            other => Err(ctx.invalid(format!("{other} is not of type \"string\""))),
        })
        .collect()
}

struct RequiredProperty {
    name: String,
    read_only: bool,
    write_only: bool,
}

pub(crate) struct RequiredValidator {
    required: Vec<RequiredProperty>,
}

impl Validate for RequiredValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        if let Value::Object(item) = instance {
            for property in &self.required {
                if item.contains_key(&property.name)
                    || (property.read_only && ctx.read_only())
                    || (property.write_only && ctx.write_only())
                {
                    continue;
                }
                ctx.report(
                    scope,
                    instance,
                    ValidationErrorKind::Required {
                        property: property.name.clone(),
                    },
                )?;
            }
        }
        Ok(())
    }
}

/// Properties required because another property is present.
pub(crate) struct DependentRequiredValidator {
    dependencies: Vec<(String, Vec<String>)>,
}

impl DependentRequiredValidator {
    pub(crate) fn new(dependencies: Vec<(String, Vec<String>)>) -> Self {
        Self { dependencies }
    }
}

impl Validate for DependentRequiredValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Object(item) = instance else {
            return Ok(());
        };
        for (dependent, required) in &self.dependencies {
            if !item.contains_key(dependent) {
                continue;
            }
            for property in required {
                if !item.contains_key(property) {
                    ctx.report(
                        scope,
                        instance,
                        ValidationErrorKind::DependentRequired {
                            property: property.clone(),
                            dependent: dependent.clone(),
                        },
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn compile_required(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let flag = |name: &str, keyword: &str| {
        parent
            .get("properties")
            .and_then(|properties| properties.get(name))
            .and_then(|property| property.get(keyword))
            == Some(&Value::Bool(true))
    };
    Some(string_array(ctx, schema).map(|names| {
        let required = names
            .into_iter()
            .map(|name| RequiredProperty {
                read_only: flag(&name, "readOnly"),
                write_only: flag(&name, "writeOnly"),
                name,
            })
            .collect();
        Box::new(RequiredValidator { required }) as BoxedValidator
    }))
}

#[inline]
pub(crate) fn compile_dependent_required(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let Value::Object(map) = schema else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"object\""))));
    };
    let mut dependencies = Vec::with_capacity(map.len());
    for (dependent, required) in map {
        match string_array(ctx, required) {
            Ok(required) => dependencies.push((dependent.clone(), required)),
            Err(error) => return Some(Err(error)),
        }
    }
    Some(Ok(Box::new(DependentRequiredValidator::new(dependencies))))
}
