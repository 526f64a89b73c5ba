use jsonschema_dialect::Draft;
use serde_json::{Map, Number, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{TypeKind, ValidationErrorKind},
    keywords::CompilationResult,
    node::Scope,
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
    validator::Validate,
};

pub(crate) struct TypeValidator {
    types: PrimitiveTypesBitMap,
    single: bool,
    /// Draft 4 does not consider `1.0` an integer.
    strict_integers: bool,
}

impl TypeValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance {
            Value::Number(number) => {
                self.types.contains_type(PrimitiveType::Number)
                    || (self.types.contains_type(PrimitiveType::Integer)
                        && is_integer(number, self.strict_integers))
            }
            other => self.types.contains_type(PrimitiveType::from(other)),
        }
    }
}

impl Validate for TypeValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        if self.is_valid(instance) {
            return Ok(());
        }
        let kind = match (self.single, self.types.iter().next()) {
            (true, Some(ty)) => TypeKind::Single(ty),
            _ => TypeKind::Multiple(self.types),
        };
        ctx.report(scope, instance, ValidationErrorKind::Type { kind })
    }
}

fn is_integer(number: &Number, strict: bool) -> bool {
    number.is_u64()
        || number.is_i64()
        || (!strict && number.as_f64().map_or(false, |value| value.fract() == 0.))
}

fn parse_type(ctx: &compiler::Context<'_, '_>, item: &Value) -> Result<PrimitiveType, crate::error::SchemaError> {
    match item {
        Value::String(name) => PrimitiveType::try_from(name.as_str())
            .map_err(|()| ctx.invalid(format!("'{name}' is not a valid type"))),
        other => Err(ctx.invalid(format!("{other} is not of type \"string\""))),
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let (mut types, single) = match schema {
        Value::Array(items) => {
            let mut types = PrimitiveTypesBitMap::new();
            for item in items {
                match parse_type(ctx, item) {
                    Ok(ty) => types = types.add_type(ty),
                    Err(error) => return Some(Err(error)),
                }
            }
            (types, false)
        }
        item => match parse_type(ctx, item) {
            Ok(ty) => (PrimitiveTypesBitMap::new().add_type(ty), true),
            Err(error) => return Some(Err(error)),
        },
    };
    // OpenAPI 3.0 widens the type with `nullable: true`
    if ctx.dialect().keyword("nullable").is_some()
        && parent.get("nullable") == Some(&Value::Bool(true))
    {
        types = types.add_type(PrimitiveType::Null);
    }
    Some(Ok(Box::new(TypeValidator {
        types,
        single,
        strict_integers: ctx.draft() == Draft::Draft4,
    })))
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, Draft};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"type": "array"}), &json!([]))]
    #[test_case(&json!({"type": "integer"}), &json!(1.0))]
    #[test_case(&json!({"type": "integer"}), &json!(-5))]
    #[test_case(&json!({"type": ["integer", "null"]}), &json!(null))]
    #[test_case(&json!({"type": ["string", "object"]}), &json!({}))]
    #[test_case(&json!({"type": "number"}), &json!(1.5))]
    fn type_is_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"type": "integer"}), &json!(1.5))]
    #[test_case(&json!({"type": "null"}), &json!(false))]
    #[test_case(&json!({"type": ["integer", "string"]}), &json!([]))]
    #[test_case(&json!({"type": []}), &json!(1))]
    fn type_is_not_valid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test]
    fn draft4_integers_are_strict() {
        tests_util::is_not_valid_with_draft(Draft::Draft4, &json!({"type": "integer"}), &json!(1.0));
        tests_util::is_valid_with_draft(Draft::Draft4, &json!({"type": "integer"}), &json!(1));
    }

    #[test_case(&json!({"type": "string"}), &json!(1), &["must be of type string"])]
    #[test_case(&json!({"type": ["null", "string"]}), &json!(1), &["must be of type [null, string]"])]
    fn messages(schema: &Value, instance: &Value, expected: &[&str]) {
        tests_util::expect_errors(schema, instance, expected);
    }

    #[test_case(&json!({"type": "strings"}), "'strings' is not a valid type")]
    #[test_case(&json!({"type": [1]}), "1 is not of type \"string\"")]
    fn invalid_types(schema: &Value, reason: &str) {
        let error = crate::validator_for(schema).expect_err("Invalid schema");
        assert!(error.to_string().ends_with(reason), "{error}");
    }

    #[test]
    fn nullable_in_openapi_30() {
        let schema = json!({"type": "string", "nullable": true});
        let validator = crate::openapi30::new(&schema).expect("Valid schema");
        assert!(validator.is_valid(&json!(null)));
        assert!(!validator.is_valid(&json!(1)));
        // Not a keyword of JSON Schema itself
        tests_util::is_not_valid(&schema, &json!(null));
    }
}
