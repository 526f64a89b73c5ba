use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::Scope,
    regex_engine::Regex,
    validator::{BoxedValidator, Validate},
};

pub(crate) struct PatternValidator {
    regex: Regex,
}

impl Validate for PatternValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        if let Value::String(item) = instance {
            if !self.regex.is_match(item) {
                return ctx.report(
                    scope,
                    instance,
                    ValidationErrorKind::Pattern {
                        pattern: self.regex.as_str().to_string(),
                    },
                );
            }
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
    let Value::String(pattern) = schema else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"string\""))));
    };
    Some(
        ctx.regex(pattern)
            .map(|regex| Box::new(PatternValidator { regex }) as BoxedValidator),
    )
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, RegexEngine};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(r"^[a-z]+$", "abc", true)]
    #[test_case(r"^[a-z]+$", "ab1", false)]
    #[test_case(r"\d", "x1", true)]
    #[test_case(r"^\W+$", "1_", false)]
    #[test_case(r"^\p{L}+$", "héllo", true)]
    fn matching(pattern: &str, text: &str, expected: bool) {
        let validator = crate::validator_for(&json!({"pattern": pattern})).expect("Valid schema");
        assert_eq!(validator.is_valid(&json!(text)), expected);
    }

    #[test]
    fn ignores_non_strings() {
        tests_util::is_valid(&json!({"pattern": "^a"}), &json!(1));
    }

    #[test]
    fn message() {
        tests_util::expect_errors(
            &json!({"pattern": "^a"}),
            &json!("b"),
            &["does not match the regex pattern ^a"],
        );
    }

    #[test_case(RegexEngine::Native)]
    #[test_case(RegexEngine::Ecma)]
    fn invalid_pattern(engine: RegexEngine) {
        let error = crate::options()
            .with_regex_engine(engine)
            .build(&json!({"pattern": "(unclosed"}))
            .expect_err("Invalid regex");
        assert!(error.to_string().contains("(unclosed"), "{error}");
    }

    #[test]
    fn schema_value() {
        let schema: Value = json!({"pattern": "^x"});
        let error = tests_util::validate(&schema, &json!("y"));
        assert_eq!(*error.schema, json!("^x"));
    }
}
