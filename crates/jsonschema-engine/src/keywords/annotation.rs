//! Keywords that only produce an annotation: `title`, `default`, unknown keywords and so on.
use serde_json::Value;

use crate::{
    context::{ExecutionContext, Halt},
    node::Scope,
    validator::{BoxedValidator, Validate},
};

pub(crate) struct AnnotationValidator;

impl AnnotationValidator {
    pub(crate) fn compile() -> BoxedValidator {
        Box::new(AnnotationValidator)
    }
}

impl Validate for AnnotationValidator {
    fn validate<'i>(
        &self,
        _: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        ctx.annotate(scope, || (*scope.keyword.value).clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn values_become_annotations() {
        let schema = json!({"title": "Age", "x-unit": "years", "minimum": 0});
        let validator = crate::options()
            .with_annotation_collection(true)
            .build(&schema)
            .expect("Valid schema");
        let instance = json!(5);
        let evaluation = validator.evaluate(&instance);
        let annotations: Vec<(&str, &serde_json::Value)> = evaluation
            .annotations()
            .map(|annotation| (annotation.keyword(), annotation.value()))
            .collect();
        assert_eq!(
            annotations,
            [("title", &json!("Age")), ("x-unit", &json!("years"))]
        );
    }

    #[test]
    fn nothing_is_recorded_by_default() {
        let validator = crate::validator_for(&json!({"title": "Age"})).expect("Valid schema");
        assert_eq!(validator.evaluate(&json!(5)).annotations().count(), 0);
    }
}
