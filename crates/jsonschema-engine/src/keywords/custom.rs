//! User-defined keywords.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{SchemaError, ValidationErrorKind},
    node::Scope,
    paths::SchemaLocation,
    validator::{BoxedValidator, Validate},
};

pub(crate) struct CustomKeyword {
    inner: Box<dyn Keyword>,
}

impl Validate for CustomKeyword {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        match self.inner.validate(instance) {
            Ok(()) => Ok(()),
            Err(message) => ctx.report(scope, instance, ValidationErrorKind::Custom { message }),
        }
    }
}

/// Trait that allows implementing custom validation for keywords.
pub trait Keyword: Send + Sync {
    /// Validate instance according to a custom specification.
    ///
    /// A custom keyword validator may be used when a validation that cannot be
    /// easily or efficiently expressed in JSON schema.
    ///
    /// # Errors
    ///
    /// Returns the message of the validation error.
    fn validate(&self, instance: &Value) -> Result<(), String>;
    /// Validate instance and return a boolean result.
    fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_ok()
    }
}

pub(crate) trait KeywordFactory: Send + Sync {
    fn init(
        &self,
        parent: &Map<String, Value>,
        schema: &Value,
        location: SchemaLocation,
    ) -> Result<Box<dyn Keyword>, SchemaError>;
}

impl<F> KeywordFactory for F
where
    F: Fn(&Map<String, Value>, &Value, SchemaLocation) -> Result<Box<dyn Keyword>, SchemaError>
        + Send
        + Sync,
{
    fn init(
        &self,
        parent: &Map<String, Value>,
        schema: &Value,
        location: SchemaLocation,
    ) -> Result<Box<dyn Keyword>, SchemaError> {
        self(parent, schema, location)
    }
}

pub(crate) fn compile(
    ctx: &compiler::Context<'_, '_>,
    factory: &dyn KeywordFactory,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Result<BoxedValidator, SchemaError> {
    let inner = factory.init(parent, schema, ctx.location().clone())?;
    Ok(Box::new(CustomKeyword { inner }))
}
