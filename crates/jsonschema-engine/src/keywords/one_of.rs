//! `oneOf`, and the OpenAPI `discriminator` that narrows down its error report.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{ValidationError, ValidationErrorKind},
    keywords::{helpers, CompilationResult},
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

/// Picks the `oneOf` branch an object claims to be.
///
/// It never changes the validation result, only which branch errors are reported.
#[derive(Debug)]
struct Discriminator {
    property_name: String,
    mapping: Vec<(String, String)>,
    /// Raw `$ref` of every branch.
    references: Vec<Option<String>>,
}

impl Discriminator {
    fn new(value: &Value, branches: &[Value]) -> Option<Discriminator> {
        let property_name = value.get("propertyName")?.as_str()?.to_string();
        let mapping = value
            .get("mapping")
            .and_then(Value::as_object)
            .map(|mapping| {
                mapping
                    .iter()
                    .filter_map(|(key, target)| Some((key.clone(), target.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        let references = branches
            .iter()
            .map(|branch| {
                branch
                    .get("$ref")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect();
        Some(Discriminator {
            property_name,
            mapping,
            references,
        })
    }

    fn select(&self, instance: &Value) -> Option<usize> {
        let value = instance.get(&self.property_name)?.as_str()?;
        let target = self
            .mapping
            .iter()
            .find(|(key, _)| key == value)
            .map(|(_, target)| target.as_str());
        let suffix = format!("/{value}");
        self.references.iter().position(|reference| {
            reference.as_deref().map_or(false, |reference| {
                Some(reference) == target || reference.ends_with(&suffix)
            })
        })
    }
}

pub(crate) struct OneOfValidator {
    nodes: Vec<NodeId>,
    discriminator: Option<Discriminator>,
}

impl Validate for OneOfValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let mut matched = Vec::new();
        let mut failures: Vec<Vec<ValidationError<'i>>> = Vec::with_capacity(self.nodes.len());
        for (idx, node) in self.nodes.iter().enumerate() {
            let path = scope.path.join(idx);
            let errors = ctx.branch(|ctx| ctx.evaluate(*node, instance, scope.instance_location, &path));
            if errors.is_empty() {
                matched.push(idx);
            }
            failures.push(errors);
        }
        match matched.len() {
            1 => Ok(()),
            0 => {
                ctx.report(scope, instance, ValidationErrorKind::OneOfNotValid)?;
                let selected = self
                    .discriminator
                    .as_ref()
                    .and_then(|discriminator| discriminator.select(instance));
                match selected {
                    Some(idx) => ctx.extend(failures.swap_remove(idx)),
                    None => ctx.extend(failures.into_iter().flatten().collect()),
                }
            }
            _ => ctx.report(
                scope,
                instance,
                ValidationErrorKind::OneOfMultipleValid { matched },
            ),
        }
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let discriminator = match (parent.get("discriminator"), schema) {
        (Some(value), Value::Array(branches))
            if ctx.options().uses_discriminator()
                && ctx.dialect().keyword("discriminator").is_some() =>
        {
            Discriminator::new(value, branches)
        }
        _ => None,
    };
    Some(helpers::schema_array(ctx, "oneOf", schema).map(|nodes| {
        Box::new(OneOfValidator {
            nodes,
            discriminator,
        }) as BoxedValidator
    }))
}

/// `discriminator` is read by `oneOf` and does nothing on its own.
#[inline]
pub(crate) fn compile_discriminator(
    _: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    _: &Value,
) -> Option<CompilationResult> {
    None
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}), &json!(1))]
    #[test_case(&json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}), &json!(2.5))]
    fn one_of_is_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test]
    fn multiple_valid() {
        tests_util::expect_errors(
            &json!({"oneOf": [{"type": "integer"}, {"minimum": 2}, true]}),
            &json!(3),
            &["must be valid to one and only one schema, but the schemas at indexes 0, 1, 2 are valid"],
        );
    }

    #[test]
    fn none_valid() {
        tests_util::expect_errors(
            &json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]}),
            &json!(1.5),
            &[
                "must be valid to one and only one schema, but none are valid",
                "must be of type integer",
                "must have a minimum value of 2",
            ],
        );
    }

    fn pets() -> Value {
        json!({
            "oneOf": [
                {"$ref": "#/components/schemas/Cat"},
                {"$ref": "#/components/schemas/Dog"}
            ],
            "discriminator": {"propertyName": "petType", "mapping": {"doggo": "#/components/schemas/Dog"}},
            "components": {
                "schemas": {
                    "Cat": {"required": ["meows", "petType"]},
                    "Dog": {"required": ["barks", "petType"]}
                }
            }
        })
    }

    fn messages(instance: &Value) -> Vec<String> {
        let validator = crate::options()
            .with_dialect(jsonschema_dialect::ids::OPENAPI_3_1)
            .with_discriminator(true)
            .build(&pets())
            .expect("Valid schema");
        validator.iter_errors(instance).map(|error| error.to_string()).collect()
    }

    #[test]
    fn discriminator_narrows_the_report() {
        assert_eq!(
            messages(&json!({"petType": "Cat"})),
            [
                "must be valid to one and only one schema, but none are valid",
                "required property 'meows' not found",
            ]
        );
        assert_eq!(
            messages(&json!({"petType": "doggo"})),
            [
                "must be valid to one and only one schema, but none are valid",
                "required property 'barks' not found",
            ]
        );
    }

    #[test]
    fn unknown_discriminator_value_reports_every_branch() {
        assert_eq!(messages(&json!({"petType": "Fish"})).len(), 3);
    }

    #[test]
    fn discriminator_never_changes_validity() {
        assert!(messages(&json!({"petType": "Dog", "barks": true})).is_empty());
    }
}
