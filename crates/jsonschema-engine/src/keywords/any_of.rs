use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::{helpers, CompilationResult},
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct AnyOfValidator {
    nodes: Vec<NodeId>,
}

impl Validate for AnyOfValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let mut failures = Vec::new();
        let mut is_valid = false;
        for (idx, node) in self.nodes.iter().enumerate() {
            let path = scope.path.join(idx);
            let errors = ctx.branch(|ctx| ctx.evaluate(*node, instance, scope.instance_location, &path));
            if errors.is_empty() {
                is_valid = true;
                // Annotations of the remaining valid branches are still needed
                if !ctx.tracks_evaluated() {
                    break;
                }
            } else {
                failures.extend(errors);
            }
        }
        if is_valid {
            return Ok(());
        }
        ctx.report(scope, instance, ValidationErrorKind::AnyOf)?;
        ctx.extend(failures)
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(
        helpers::schema_array(ctx, "anyOf", schema)
            .map(|nodes| Box::new(AnyOfValidator { nodes }) as BoxedValidator),
    )
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"anyOf": [{"type": "string"}, {"type": "integer"}]}), &json!(1))]
    #[test_case(&json!({"anyOf": [{"type": "string"}, true]}), &json!(null))]
    fn any_of_is_valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test]
    fn summary_then_branch_errors() {
        tests_util::expect_errors(
            &json!({"anyOf": [{"type": "string"}, {"type": "integer"}]}),
            &json!(1.5),
            &[
                "must be valid to at least one schema in 'anyOf'",
                "must be of type string",
                "must be of type integer",
            ],
        );
    }

    #[test]
    fn branch_locations() {
        let schema = json!({"anyOf": [{"type": "string"}, {"minimum": 2}]});
        let validator = crate::validator_for(&schema).expect("Valid schema");
        let instance = json!(1);
        let paths: Vec<String> = validator
            .iter_errors(&instance)
            .map(|error| error.evaluation_path.as_pointer())
            .collect();
        assert_eq!(paths, ["/anyOf", "/anyOf/0/type", "/anyOf/1/minimum"]);
    }

    #[test]
    fn fail_fast_reports_only_the_summary() {
        let validator = crate::options()
            .fail_fast(true)
            .build(&json!({"anyOf": [{"type": "string"}, {"type": "integer"}]}))
            .expect("Valid schema");
        let errors: Vec<String> = validator
            .iter_errors(&json!(null))
            .map(|error| error.to_string())
            .collect();
        assert_eq!(errors, ["must be valid to at least one schema in 'anyOf'"]);
    }
}
