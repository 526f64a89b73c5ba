use fraction::{BigFraction, BigUint};
use serde_json::{Map, Number, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::Scope,
    validator::Validate,
};

pub(crate) struct MultipleOfValidator {
    multiple_of: f64,
    /// The divisor as written in the schema, e.g. `0.01` is exactly `1/100`.
    decimal: Option<BigFraction>,
    limit: Value,
    integer: bool,
}

/// The exact value of the decimal text of `number`.
///
/// `None` for the exponent notation `serde_json` uses at the edges of the `f64` range.
fn decimal(number: &Number) -> Option<BigFraction> {
    number.to_string().parse().ok()
}

fn is_integer(fraction: &BigFraction) -> bool {
    fraction
        .denom()
        .map_or(false, |denom| denom == &BigUint::from(1_u8))
}

impl MultipleOfValidator {
    fn is_multiple(&self, number: &Number, item: f64) -> bool {
        if self.integer && item.fract() != 0. {
            return false;
        }
        if let (Some(divisor), Some(value)) = (&self.decimal, decimal(number)) {
            return is_integer(&(value / divisor.clone()));
        }
        if self.integer {
            return (item % self.multiple_of) == 0.;
        }
        let remainder = (item / self.multiple_of) % 1.;
        if remainder.is_nan() {
            // Involves heap allocations via the underlying `BigUint` type
            is_integer(&(BigFraction::from(item) / BigFraction::from(self.multiple_of)))
        } else {
            remainder < f64::EPSILON
        }
    }
}

impl Validate for MultipleOfValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::Number(number) = instance else {
            return Ok(());
        };
        let Some(item) = number.as_f64() else {
            return Ok(());
        };
        if self.is_multiple(number, item) {
            Ok(())
        } else {
            ctx.report(
                scope,
                instance,
                ValidationErrorKind::MultipleOf {
                    multiple_of: self.limit.clone(),
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
    let Value::Number(number) = schema else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"number\""))));
    };
    match number.as_f64() {
        Some(multiple_of) if multiple_of > 0. => Some(Ok(Box::new(MultipleOfValidator {
            multiple_of,
            decimal: decimal(number),
            limit: schema.clone(),
            integer: multiple_of.fract() == 0.,
        }))),
        _ => Some(Err(ctx.invalid(format!("{schema} is not strictly positive")))),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"multipleOf": 2}), &json!(4))]
    #[test_case(&json!({"multipleOf": 1.0}), &json!(4.0))]
    #[test_case(&json!({"multipleOf": 1.5}), &json!(3.0))]
    #[test_case(&json!({"multipleOf": 1.5}), &json!(4.5))]
    #[test_case(&json!({"multipleOf": 2}), &json!("3"))]
    #[test_case(&json!({"multipleOf": 0.01}), &json!(19.99))]
    #[test_case(&json!({"multipleOf": 0.01}), &json!(0.07))]
    #[test_case(&json!({"multipleOf": 0.01}), &json!(4.35))]
    #[test_case(&json!({"multipleOf": 0.1}), &json!(0.3))]
    #[test_case(&json!({"multipleOf": 0.0001}), &json!(-12.3457))]
    fn multiple_of_is_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"multipleOf": 1.0}), &json!(4.5))]
    #[test_case(&json!({"multipleOf": 2}), &json!(7))]
    #[test_case(&json!({"multipleOf": 0.123456789}), &json!(1e308))]
    #[test_case(&json!({"multipleOf": 0.01}), &json!(0.075))]
    #[test_case(&json!({"multipleOf": 2}), &json!(4.5))]
    fn multiple_of_is_not_valid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test_case(&json!({"multipleOf": 2}), &json!(3), "/multipleOf")]
    #[test_case(&json!({"multipleOf": 1.5}), &json!(5), "/multipleOf")]
    fn location(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_schema_location(schema, instance, expected);
    }

    #[test_case(&json!({"multipleOf": 0}))]
    #[test_case(&json!({"multipleOf": "2"}))]
    fn invalid_divisor(schema: &Value) {
        assert!(crate::validator_for(schema).is_err());
    }
}
