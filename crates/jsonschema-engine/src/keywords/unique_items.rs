use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::{helpers, CompilationResult},
    node::Scope,
    validator::Validate,
};

// Pairwise comparison is fine for the array sizes seen in practice and respects `1 == 1.0`
fn is_unique(items: &[Value]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(idx, item)| items[idx + 1..].iter().all(|other| !helpers::equal(item, other)))
}

pub(crate) struct UniqueItemsValidator;

impl Validate for UniqueItemsValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        match instance {
            Value::Array(items) if !is_unique(items) => {
                ctx.report(scope, instance, ValidationErrorKind::UniqueItems)
            }
            _ => Ok(()),
        }
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    match schema {
        Value::Bool(true) => Some(Ok(Box::new(UniqueItemsValidator))),
        Value::Bool(false) => None,
        _ => Some(Err(ctx.invalid(format!("{schema} is not of type \"boolean\"")))),
    }
}

#[cfg(test)]
mod tests {
    use super::is_unique;
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&[] => true)]
    #[test_case(&[json!(1), json!(2)] => true)]
    #[test_case(&[json!(1), json!(1.0)] => false)]
    #[test_case(&[json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1})] => false)]
    #[test_case(&[json!([1]), json!([true])] => true)]
    #[test_case(&[json!(0), json!(false)] => true)]
    fn uniqueness(items: &[Value]) -> bool {
        is_unique(items)
    }

    #[test]
    fn disabled() {
        tests_util::is_valid(&json!({"uniqueItems": false}), &json!([1, 1]));
    }

    #[test]
    fn message() {
        tests_util::expect_errors(
            &json!({"uniqueItems": true}),
            &json!([1, 1]),
            &["must have only unique items in the array"],
        );
    }
}
