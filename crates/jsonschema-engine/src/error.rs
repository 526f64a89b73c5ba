//! Error types
use crate::{
    paths::{Location, SchemaLocation},
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
};
use serde_json::Value;
use std::{
    borrow::Cow,
    error,
    fmt::{self, Formatter},
    sync::Arc,
};

/// An error that can occur during validation.
#[derive(Debug, Clone)]
pub struct ValidationError<'a> {
    /// Value of the property that failed validation.
    pub instance: Cow<'a, Value>,
    /// Type of validation error.
    pub kind: ValidationErrorKind,
    /// The keyword that failed.
    pub keyword: Arc<str>,
    /// Path to the value that failed validation.
    pub instance_location: Location,
    /// Keyword and `$ref` hops taken to reach the failing keyword.
    pub evaluation_path: Location,
    /// Where the failing keyword is defined.
    pub schema_location: SchemaLocation,
    /// Value of the failing keyword.
    pub schema: Arc<Value>,
    /// Human-readable message, rendered in the locale of the evaluation.
    pub message: String,
}

/// An iterator over instances of [`ValidationError`] that represent validation error for the
/// input instance.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// if let Ok(validator) = jsonschema_engine::validator_for(&schema) {
///     let result = validator.validate(&instance);
///     if let Err(errors) = result {
///         for error in errors {
///             println!("Validation error: {}", error)
///         }
///     }
/// }
/// ```
pub type ErrorIterator<'a> = Box<dyn Iterator<Item = ValidationError<'a>> + Sync + Send + 'a>;

/// Shape of a `type` keyword that was not satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Single(PrimitiveType),
    Multiple(PrimitiveTypesBitMap),
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Single(ty) => write!(f, "{ty}"),
            TypeKind::Multiple(types) => write!(f, "{types}"),
        }
    }
}

/// Kinds of errors that may happen during validation
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    /// The input array contain more items than expected.
    AdditionalItems { limit: usize },
    /// Unexpected properties.
    AdditionalProperties { unexpected: Vec<String> },
    /// The input value is not valid under any of the schemas listed in the 'anyOf' keyword.
    AnyOf,
    /// The input value doesn't match expected constant.
    Constant { expected_value: Value },
    /// The input array doesn't contain items conforming to the specified schema.
    Contains,
    /// Too few items match the `contains` schema.
    MinContains { limit: u64, matched: usize },
    /// Too many items match the `contains` schema.
    MaxContains { limit: u64, matched: usize },
    /// The input value does not respect the defined contentEncoding
    ContentEncoding { content_encoding: String },
    /// The input value does not respect the defined contentMediaType
    ContentMediaType { content_media_type: String },
    /// Custom error message for user-defined validation.
    Custom { message: String },
    /// A property required by the presence of another one is missing.
    DependentRequired { property: String, dependent: String },
    /// The input value doesn't match any of specified options.
    Enum { options: Value },
    /// Value is too large.
    ExclusiveMaximum { limit: Value },
    /// Value is too small.
    ExclusiveMinimum { limit: Value },
    /// Everything is invalid for `false` schema.
    FalseSchema,
    /// When the input doesn't match to the specified format.
    Format { format: String },
    /// Too many items in an array.
    MaxItems { limit: u64 },
    /// Value is too large.
    Maximum { limit: Value },
    /// String is too long.
    MaxLength { limit: u64 },
    /// Too many properties in an object.
    MaxProperties { limit: u64 },
    /// Too few items in an array.
    MinItems { limit: u64 },
    /// Value is too small.
    Minimum { limit: Value },
    /// String is too short.
    MinLength { limit: u64 },
    /// Not enough properties in an object.
    MinProperties { limit: u64 },
    /// When some number is not a multiple of another number.
    MultipleOf { multiple_of: Value },
    /// Negated schema failed validation.
    Not { schema: Value },
    /// The given schema is valid under more than one of the schemas listed in the 'oneOf' keyword.
    OneOfMultipleValid { matched: Vec<usize> },
    /// The given schema is not valid under any of the schemas listed in the 'oneOf' keyword.
    OneOfNotValid,
    /// When the input doesn't match to a pattern.
    Pattern { pattern: String },
    /// A property name does not match the `propertyNames` schema.
    PropertyNames { property: String },
    /// A `readOnly` value in an instance that is written.
    ReadOnly,
    /// When a required property is missing.
    Required { property: String },
    /// When the input value doesn't match one or multiple required types.
    Type { kind: TypeKind },
    /// Unexpected items.
    UnevaluatedItems { unexpected: Vec<usize> },
    /// Unexpected properties.
    UnevaluatedProperties { unexpected: Vec<String> },
    /// When the input array has non-unique elements.
    UniqueItems,
    /// A `writeOnly` value in an instance that is read.
    WriteOnly,
}

impl ValidationErrorKind {
    /// Key of the message template for this error.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
            ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
            ValidationErrorKind::AnyOf => "anyOf",
            ValidationErrorKind::Constant { .. } => "const",
            ValidationErrorKind::Contains => "contains",
            ValidationErrorKind::MinContains { .. } => "minContains",
            ValidationErrorKind::MaxContains { .. } => "maxContains",
            ValidationErrorKind::ContentEncoding { .. } => "contentEncoding",
            ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
            ValidationErrorKind::Custom { .. } => "custom",
            ValidationErrorKind::DependentRequired { .. } => "dependentRequired",
            ValidationErrorKind::Enum { .. } => "enum",
            ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
            ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
            ValidationErrorKind::FalseSchema => "false",
            ValidationErrorKind::Format { .. } => "format",
            ValidationErrorKind::MaxItems { .. } => "maxItems",
            ValidationErrorKind::Maximum { .. } => "maximum",
            ValidationErrorKind::MaxLength { .. } => "maxLength",
            ValidationErrorKind::MaxProperties { .. } => "maxProperties",
            ValidationErrorKind::MinItems { .. } => "minItems",
            ValidationErrorKind::Minimum { .. } => "minimum",
            ValidationErrorKind::MinLength { .. } => "minLength",
            ValidationErrorKind::MinProperties { .. } => "minProperties",
            ValidationErrorKind::MultipleOf { .. } => "multipleOf",
            ValidationErrorKind::Not { .. } => "not",
            ValidationErrorKind::OneOfMultipleValid { .. } => "oneOf.multiple",
            ValidationErrorKind::OneOfNotValid => "oneOf",
            ValidationErrorKind::Pattern { .. } => "pattern",
            ValidationErrorKind::PropertyNames { .. } => "propertyNames",
            ValidationErrorKind::ReadOnly => "readOnly",
            ValidationErrorKind::Required { .. } => "required",
            ValidationErrorKind::Type { .. } => "type",
            ValidationErrorKind::UnevaluatedItems { .. } => "unevaluatedItems",
            ValidationErrorKind::UnevaluatedProperties { .. } => "unevaluatedProperties",
            ValidationErrorKind::UniqueItems => "uniqueItems",
            ValidationErrorKind::WriteOnly => "writeOnly",
        }
    }

    /// Positional arguments substituted into the message template.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        fn quoted(items: &[String]) -> String {
            items
                .iter()
                .map(|item| format!("'{item}'"))
                .collect::<Vec<_>>()
                .join(", ")
        }
        match self {
            ValidationErrorKind::AdditionalItems { limit } => vec![limit.to_string()],
            ValidationErrorKind::AdditionalProperties { unexpected }
            | ValidationErrorKind::UnevaluatedProperties { unexpected } => {
                vec![quoted(unexpected)]
            }
            ValidationErrorKind::UnevaluatedItems { unexpected } => vec![unexpected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")],
            ValidationErrorKind::Constant { expected_value } => vec![expected_value.to_string()],
            ValidationErrorKind::MinContains { limit, matched }
            | ValidationErrorKind::MaxContains { limit, matched } => {
                vec![limit.to_string(), matched.to_string()]
            }
            ValidationErrorKind::ContentEncoding { content_encoding } => {
                vec![content_encoding.clone()]
            }
            ValidationErrorKind::ContentMediaType { content_media_type } => {
                vec![content_media_type.clone()]
            }
            ValidationErrorKind::Custom { message } => vec![message.clone()],
            ValidationErrorKind::DependentRequired {
                property,
                dependent,
            } => vec![property.clone(), dependent.clone()],
            ValidationErrorKind::Enum { options } => vec![options.to_string()],
            ValidationErrorKind::ExclusiveMaximum { limit }
            | ValidationErrorKind::ExclusiveMinimum { limit }
            | ValidationErrorKind::Maximum { limit }
            | ValidationErrorKind::Minimum { limit } => vec![limit.to_string()],
            ValidationErrorKind::Format { format } => vec![format.clone()],
            ValidationErrorKind::MaxItems { limit }
            | ValidationErrorKind::MaxLength { limit }
            | ValidationErrorKind::MaxProperties { limit }
            | ValidationErrorKind::MinItems { limit }
            | ValidationErrorKind::MinLength { limit }
            | ValidationErrorKind::MinProperties { limit } => vec![limit.to_string()],
            ValidationErrorKind::MultipleOf { multiple_of } => vec![multiple_of.to_string()],
            ValidationErrorKind::Not { schema } => vec![schema.to_string()],
            ValidationErrorKind::OneOfMultipleValid { matched } => vec![matched
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")],
            ValidationErrorKind::Pattern { pattern } => vec![pattern.clone()],
            ValidationErrorKind::PropertyNames { property } => vec![property.clone()],
            ValidationErrorKind::Required { property } => vec![property.clone()],
            ValidationErrorKind::Type { kind } => vec![kind.to_string()],
            ValidationErrorKind::AnyOf
            | ValidationErrorKind::Contains
            | ValidationErrorKind::FalseSchema
            | ValidationErrorKind::OneOfNotValid
            | ValidationErrorKind::ReadOnly
            | ValidationErrorKind::UniqueItems
            | ValidationErrorKind::WriteOnly => Vec::new(),
        }
    }
}

impl<'a> ValidationError<'a> {
    /// Detach the error from the lifetime of the validated instance.
    #[must_use]
    pub fn into_owned(self) -> ValidationError<'static> {
        ValidationError {
            instance: Cow::Owned(self.instance.into_owned()),
            kind: self.kind,
            keyword: self.keyword,
            instance_location: self.instance_location,
            evaluation_path: self.evaluation_path,
            schema_location: self.schema_location,
            schema: self.schema,
            message: self.message,
        }
    }
    /// Positional arguments of the message template.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        self.kind.arguments()
    }
}

impl error::Error for ValidationError<'_> {}

impl fmt::Display for ValidationError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors raised while compiling a schema.
#[derive(Debug)]
pub enum SchemaError {
    /// A keyword value has the wrong shape, e.g. a non-numeric `minimum`.
    InvalidKeyword {
        keyword: String,
        location: String,
        reason: String,
    },
    /// A `pattern` or `patternProperties` key is not a valid regular expression.
    InvalidRegex {
        pattern: String,
        location: String,
        reason: String,
    },
    /// A reference target can not be found or retrieved.
    Unresolvable {
        reference: String,
        location: String,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    },
    /// The dialect of a schema resource can not be determined.
    Dialect(jsonschema_dialect::Error),
    /// A schema is neither an object nor a boolean, or violates its meta-schema.
    InvalidSchema { location: String, reason: String },
    /// A keyword is not known to the dialect and unknown keywords are rejected.
    UnknownKeyword { keyword: String, location: String },
    /// A format is not known and unknown formats are rejected.
    UnknownFormat { format: String, location: String },
    /// The validator was configured incorrectly.
    Configuration(ConfigurationError),
}

impl SchemaError {
    pub(crate) fn invalid_keyword(
        keyword: &str,
        location: &SchemaLocation,
        reason: impl Into<String>,
    ) -> SchemaError {
        SchemaError::InvalidKeyword {
            keyword: keyword.to_string(),
            location: location.to_string(),
            reason: reason.into(),
        }
    }
    pub(crate) fn invalid_regex(
        pattern: &str,
        location: &SchemaLocation,
        reason: impl Into<String>,
    ) -> SchemaError {
        SchemaError::InvalidRegex {
            pattern: pattern.to_string(),
            location: location.to_string(),
            reason: reason.into(),
        }
    }
    pub(crate) fn unresolvable(
        reference: impl Into<String>,
        location: &SchemaLocation,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> SchemaError {
        SchemaError::Unresolvable {
            reference: reference.into(),
            location: location.to_string(),
            source,
        }
    }
    pub(crate) fn invalid_schema(location: &SchemaLocation, reason: impl Into<String>) -> SchemaError {
        SchemaError::InvalidSchema {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidKeyword {
                keyword,
                location,
                reason,
            } => write!(f, "Invalid '{keyword}' at {location}: {reason}"),
            SchemaError::InvalidRegex {
                pattern,
                location,
                reason,
            } => write!(
                f,
                "'{pattern}' at {location} is not a valid regular expression: {reason}"
            ),
            SchemaError::Unresolvable {
                reference,
                location,
                source,
            } => {
                write!(f, "Reference '{reference}' at {location} can not be resolved")?;
                if let Some(source) = source {
                    write!(f, ": {source}")?;
                }
                Ok(())
            }
            SchemaError::Dialect(error) => error.fmt(f),
            SchemaError::InvalidSchema { location, reason } => {
                write!(f, "Invalid schema at {location}: {reason}")
            }
            SchemaError::UnknownKeyword { keyword, location } => {
                write!(f, "Unknown keyword '{keyword}' at {location}")
            }
            SchemaError::UnknownFormat { format, location } => {
                write!(f, "Unknown format '{format}' at {location}")
            }
            SchemaError::Configuration(error) => error.fmt(f),
        }
    }
}

impl error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SchemaError::Unresolvable {
                source: Some(source),
                ..
            } => Some(&**source),
            SchemaError::Dialect(error) => Some(error),
            SchemaError::Configuration(error) => Some(error),
            _ => None,
        }
    }
}

impl From<jsonschema_dialect::Error> for SchemaError {
    fn from(error: jsonschema_dialect::Error) -> Self {
        SchemaError::Dialect(error)
    }
}

impl From<ConfigurationError> for SchemaError {
    fn from(error: ConfigurationError) -> Self {
        SchemaError::Configuration(error)
    }
}

/// Invalid usage of [`crate::ValidationOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A locale tag is not of the `language[-REGION]` shape.
    InvalidLocale { tag: String },
    /// A custom keyword or format was registered with an empty name.
    EmptyName { kind: &'static str },
    /// A default dialect is not an absolute IRI.
    InvalidDialect { iri: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidLocale { tag } => write!(f, "Invalid locale tag '{tag}'"),
            ConfigurationError::EmptyName { kind } => write!(f, "Custom {kind} name is empty"),
            ConfigurationError::InvalidDialect { iri } => {
                write!(f, "Dialect '{iri}' is not an absolute IRI")
            }
        }
    }
}

impl error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(ValidationErrorKind::Minimum { limit: json!(1) }, "minimum", &["1"])]
    #[test_case(ValidationErrorKind::Required { property: "id".into() }, "required", &["id"])]
    #[test_case(ValidationErrorKind::AdditionalProperties { unexpected: vec!["a".into(), "b".into()] }, "additionalProperties", &["'a', 'b'"])]
    #[test_case(ValidationErrorKind::OneOfMultipleValid { matched: vec![0, 2] }, "oneOf.multiple", &["0, 2"])]
    #[test_case(ValidationErrorKind::Type { kind: TypeKind::Single(PrimitiveType::Integer) }, "type", &["integer"])]
    #[test_case(ValidationErrorKind::FalseSchema, "false", &[])]
    fn message_arguments(kind: ValidationErrorKind, key: &str, arguments: &[&str]) {
        assert_eq!(kind.message_key(), key);
        assert_eq!(kind.arguments(), arguments);
    }

    #[test]
    fn schema_error_display() {
        let location = SchemaLocation::new(
            "json-schema:///".into(),
            Location::from_pointer("/properties/a/pattern"),
        );
        let error = SchemaError::invalid_regex("(", &location, "unclosed group");
        assert_eq!(
            error.to_string(),
            "'(' at json-schema:///#/properties/a/pattern is not a valid regular expression: unclosed group"
        );
    }

    #[test]
    fn configuration_error_converts() {
        let error: SchemaError = ConfigurationError::InvalidLocale {
            tag: "??".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Invalid locale tag '??'");
    }
}
