use std::{fmt, sync::Arc};

use ahash::AHashMap;
use jsonschema_dialect::{
    iri, meta, DefaultDialectRegistry, DialectRegistry, Draft, Retrieve,
};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::sync::RwLock;

use crate::{
    compiler,
    error::{ConfigurationError, SchemaError},
    keywords::{
        custom::{Keyword, KeywordFactory},
        format::Format,
    },
    messages::{self, MessageSource, ResourceBundleMessageSource, DEFAULT_LOCALE},
    paths::SchemaLocation,
    regex_engine::RegexEngine,
    retriever::DefaultRetriever,
    walk::KeywordWalkListener,
    Validator,
};

/// What to do with keywords the dialect does not define.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeywordPolicy {
    /// Record their values as annotations.
    #[default]
    Annotate,
    /// Skip them.
    Ignore,
    /// Fail the build with [`SchemaError::UnknownKeyword`].
    Strict,
}

/// Configuration options for JSON Schema validation.
#[derive(Clone)]
pub struct ValidationOptions {
    draft: Option<Draft>,
    dialect: Option<String>,
    registry: Option<Arc<dyn DialectRegistry>>,
    /// Retriever for external resources
    pub(crate) retriever: Arc<dyn Retrieve>,
    /// Additional documents that should be addressable during compilation.
    pub(crate) resources: AHashMap<String, Value>,
    formats: AHashMap<String, Arc<dyn Format>>,
    validate_formats: Option<bool>,
    ignore_unknown_formats: bool,
    keywords: AHashMap<String, Arc<dyn KeywordFactory>>,
    unknown_keywords: UnknownKeywordPolicy,
    regex_engine: RegexEngine,
    validate_schema: bool,
    discriminator: bool,
    pub(crate) messages: Arc<dyn MessageSource>,
    pub(crate) locale: String,
    pub(crate) walk_listener: Option<Arc<dyn KeywordWalkListener>>,
    pub(crate) fail_fast: bool,
    pub(crate) annotation_collection: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            draft: None,
            dialect: None,
            registry: None,
            retriever: Arc::new(DefaultRetriever),
            resources: AHashMap::default(),
            formats: AHashMap::default(),
            validate_formats: None,
            ignore_unknown_formats: true,
            keywords: AHashMap::default(),
            unknown_keywords: UnknownKeywordPolicy::default(),
            regex_engine: RegexEngine::default(),
            validate_schema: false,
            discriminator: false,
            messages: Arc::new(ResourceBundleMessageSource::new()),
            locale: DEFAULT_LOCALE.to_string(),
            walk_listener: None,
            fail_fast: false,
            annotation_collection: false,
        }
    }
}

static META_VALIDATORS: Lazy<RwLock<AHashMap<String, Arc<Validator>>>> =
    Lazy::new(|| RwLock::new(AHashMap::new()));

impl ValidationOptions {
    /// IRI of the dialect used for schemas without `$schema`.
    pub(crate) fn default_dialect(&self) -> &str {
        match (&self.dialect, self.draft) {
            (Some(dialect), _) => dialect,
            (None, Some(draft)) => draft.meta_schema(),
            (None, None) => Draft::default().meta_schema(),
        }
    }
    pub(crate) fn dialect_registry(&self) -> &dyn DialectRegistry {
        match &self.registry {
            Some(registry) => &**registry,
            None => DefaultDialectRegistry::instance(),
        }
    }
    /// Build a JSON Schema validator using the current options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    ///
    /// let schema = json!({"type": "string"});
    /// let validator = jsonschema_engine::options()
    ///     .build(&schema)
    ///     .expect("A valid schema");
    ///
    /// assert!(validator.is_valid(&json!("Hello")));
    /// assert!(!validator.is_valid(&json!(42)));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the options are inconsistent, if the schema is not a valid schema of
    /// its dialect, or if any of its references can not be resolved.
    pub fn build(&self, schema: &Value) -> Result<Validator, SchemaError> {
        self.check()?;
        if self.validate_schema {
            self.validate_against_meta_schema(schema)?;
        }
        let tree = compiler::build(self, schema)?;
        Ok(Validator::from_parts(tree, Arc::new(self.clone())))
    }

    fn check(&self) -> Result<(), ConfigurationError> {
        if !messages::is_valid_locale(&self.locale) {
            return Err(ConfigurationError::InvalidLocale {
                tag: self.locale.clone(),
            });
        }
        if self.keywords.contains_key("") {
            return Err(ConfigurationError::EmptyName { kind: "keyword" });
        }
        if self.formats.contains_key("") {
            return Err(ConfigurationError::EmptyName { kind: "format" });
        }
        if let Some(dialect) = &self.dialect {
            if iri::parse(dialect).is_err() {
                return Err(ConfigurationError::InvalidDialect {
                    iri: dialect.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_against_meta_schema(&self, schema: &Value) -> Result<(), SchemaError> {
        let dialect = iri::normalize(
            Draft::declared_dialect(schema).unwrap_or_else(|| self.default_dialect()),
        )
        .to_string();
        let Some(validator) = meta_validator(&dialect)? else {
            tracing::debug!(dialect, "no meta-schema document available, skipping schema validation");
            return Ok(());
        };
        if let Some(error) = validator.iter_errors(schema).next() {
            return Err(SchemaError::InvalidSchema {
                location: format!("{}#{}", iri::DEFAULT_BASE_IRI, error.instance_location),
                reason: error.message,
            });
        }
        Ok(())
    }

    /// Set the draft of schemas that do not declare `$schema`.
    #[inline]
    pub fn with_draft(&mut self, draft: Draft) -> &mut Self {
        self.draft = Some(draft);
        self
    }
    /// Set the dialect of schemas that do not declare `$schema`, e.g. an OpenAPI dialect.
    ///
    /// Takes precedence over [`ValidationOptions::with_draft`].
    pub fn with_dialect(&mut self, iri: impl Into<String>) -> &mut Self {
        self.dialect = Some(iri.into());
        self
    }
    /// Use a custom dialect registry instead of the process-wide default one.
    pub fn with_dialect_registry(&mut self, registry: Arc<dyn DialectRegistry>) -> &mut Self {
        self.registry = Some(registry);
        self
    }
    /// Use a custom retriever for external resources.
    pub fn with_retriever(&mut self, retriever: impl Retrieve + 'static) -> &mut Self {
        self.retriever = Arc::new(retriever);
        self
    }
    /// Add a document that `$ref` can point to without retrieving it.
    ///
    /// ```rust
    /// use serde_json::json;
    ///
    /// let validator = jsonschema_engine::options()
    ///     .with_resource("https://example.com/name.json", json!({"type": "string"}))
    ///     .build(&json!({"properties": {"name": {"$ref": "https://example.com/name.json"}}}))
    ///     .expect("A valid schema");
    /// assert!(!validator.is_valid(&json!({"name": 1})));
    /// ```
    pub fn with_resource(&mut self, iri: impl Into<String>, document: Value) -> &mut Self {
        let iri = iri.into();
        self.resources
            .insert(iri::normalize(&iri).to_string(), document);
        self
    }
    /// Add many documents at once.
    pub fn with_resources(
        &mut self,
        pairs: impl Iterator<Item = (impl Into<String>, Value)>,
    ) -> &mut Self {
        for (iri, document) in pairs {
            self.with_resource(iri, document);
        }
        self
    }
    /// Register a custom format.
    ///
    /// ```rust
    /// use serde_json::json;
    ///
    /// fn currency(value: &str) -> bool {
    ///     value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase())
    /// }
    ///
    /// let validator = jsonschema_engine::options()
    ///     .with_format("currency", currency)
    ///     .should_validate_formats(true)
    ///     .build(&json!({"format": "currency"}))
    ///     .expect("A valid schema");
    /// assert!(validator.is_valid(&json!("USD")));
    /// assert!(!validator.is_valid(&json!("usd")));
    /// ```
    pub fn with_format<N, F>(&mut self, name: N, format: F) -> &mut Self
    where
        N: Into<String>,
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.insert(name.into(), Arc::new(format));
        self
    }
    pub(crate) fn get_format(&self, format: &str) -> Option<&Arc<dyn Format>> {
        self.formats.get(format)
    }
    /// Make `format` assert (`true`) or only annotate (`false`) regardless of the dialect.
    pub fn should_validate_formats(&mut self, yes: bool) -> &mut Self {
        self.validate_formats = Some(yes);
        self
    }
    pub(crate) fn validate_formats(&self) -> Option<bool> {
        self.validate_formats
    }
    /// Unknown formats are ignored by default. Set to `false` to reject them.
    pub fn should_ignore_unknown_formats(&mut self, yes: bool) -> &mut Self {
        self.ignore_unknown_formats = yes;
        self
    }
    pub(crate) const fn are_unknown_formats_ignored(&self) -> bool {
        self.ignore_unknown_formats
    }
    /// Register a custom keyword. It takes precedence over the dialect's keyword of the same
    /// name.
    ///
    /// ```rust
    /// use jsonschema_engine::{paths::SchemaLocation, Keyword, SchemaError};
    /// use serde_json::{json, Map, Value};
    ///
    /// struct Even;
    ///
    /// impl Keyword for Even {
    ///     fn validate(&self, instance: &Value) -> Result<(), String> {
    ///         match instance.as_u64() {
    ///             Some(value) if value % 2 == 1 => Err(format!("{value} is odd")),
    ///             _ => Ok(()),
    ///         }
    ///     }
    /// }
    ///
    /// fn even(
    ///     _: &Map<String, Value>,
    ///     _: &Value,
    ///     _: SchemaLocation,
    /// ) -> Result<Box<dyn Keyword>, SchemaError> {
    ///     Ok(Box::new(Even))
    /// }
    ///
    /// let validator = jsonschema_engine::options()
    ///     .with_keyword("even", even)
    ///     .build(&json!({"even": true}))
    ///     .expect("A valid schema");
    /// assert!(validator.is_valid(&json!(2)));
    /// assert!(!validator.is_valid(&json!(3)));
    /// ```
    pub fn with_keyword<N, F>(&mut self, name: N, factory: F) -> &mut Self
    where
        N: Into<String>,
        F: Fn(&Map<String, Value>, &Value, SchemaLocation) -> Result<Box<dyn Keyword>, SchemaError>
            + Send
            + Sync
            + 'static,
    {
        self.keywords.insert(name.into(), Arc::new(factory));
        self
    }
    pub(crate) fn keyword_factory(&self, name: &str) -> Option<&Arc<dyn KeywordFactory>> {
        self.keywords.get(name)
    }
    /// What to do with keywords the dialect does not define.
    pub fn with_unknown_keyword_policy(&mut self, policy: UnknownKeywordPolicy) -> &mut Self {
        self.unknown_keywords = policy;
        self
    }
    pub(crate) fn unknown_keyword_policy(&self) -> UnknownKeywordPolicy {
        self.unknown_keywords
    }
    /// Select the regular expression engine for `pattern`, `patternProperties` and the `regex`
    /// format.
    pub fn with_regex_engine(&mut self, engine: RegexEngine) -> &mut Self {
        self.regex_engine = engine;
        self
    }
    pub(crate) fn regex_engine(&self) -> RegexEngine {
        self.regex_engine
    }
    /// Validate the schema against its meta-schema before compiling it.
    pub fn should_validate_schema(&mut self, yes: bool) -> &mut Self {
        self.validate_schema = yes;
        self
    }
    /// Report only the errors of the branch an OpenAPI `discriminator` selects when `oneOf`
    /// fails.
    pub fn with_discriminator(&mut self, yes: bool) -> &mut Self {
        self.discriminator = yes;
        self
    }
    pub(crate) fn uses_discriminator(&self) -> bool {
        self.discriminator
    }
    /// Render error messages from a custom message source.
    pub fn with_message_source(&mut self, messages: Arc<dyn MessageSource>) -> &mut Self {
        self.messages = messages;
        self
    }
    /// Render error messages in this locale, e.g. `de-CH`.
    pub fn with_locale(&mut self, locale: impl Into<String>) -> &mut Self {
        self.locale = locale.into();
        self
    }
    /// Notify `listener` around every keyword evaluated by [`Validator::walk`].
    pub fn with_walk_listener(&mut self, listener: Arc<dyn KeywordWalkListener>) -> &mut Self {
        self.walk_listener = Some(listener);
        self
    }
    /// Stop evaluating at the first error.
    pub fn fail_fast(&mut self, yes: bool) -> &mut Self {
        self.fail_fast = yes;
        self
    }
    /// Collect the annotations of every keyword during evaluation.
    pub fn with_annotation_collection(&mut self, yes: bool) -> &mut Self {
        self.annotation_collection = yes;
        self
    }
}

/// Validator for a built-in meta-schema, built once per process.
fn meta_validator(dialect: &str) -> Result<Option<Arc<Validator>>, SchemaError> {
    if let Some(validator) = META_VALIDATORS
        .read()
        .expect("Lock is poisoned")
        .get(dialect)
    {
        return Ok(Some(Arc::clone(validator)));
    }
    let Some(document) = meta::lookup(dialect) else {
        return Ok(None);
    };
    let validator = Arc::new(
        ValidationOptions::default()
            .with_dialect(dialect)
            .should_validate_formats(false)
            .build(document)?,
    );
    META_VALIDATORS
        .write()
        .expect("Lock is poisoned")
        .insert(dialect.to_string(), Arc::clone(&validator));
    Ok(Some(validator))
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("draft", &self.draft)
            .field("dialect", &self.dialect)
            .field("resources", &self.resources.keys())
            .field("formats", &self.formats.keys())
            .field("validate_formats", &self.validate_formats)
            .field("ignore_unknown_formats", &self.ignore_unknown_formats)
            .field("keywords", &self.keywords.keys())
            .field("unknown_keywords", &self.unknown_keywords)
            .field("regex_engine", &self.regex_engine)
            .field("validate_schema", &self.validate_schema)
            .field("discriminator", &self.discriminator)
            .field("locale", &self.locale)
            .field("fail_fast", &self.fail_fast)
            .field("annotation_collection", &self.annotation_collection)
            .finish_non_exhaustive()
    }
}
