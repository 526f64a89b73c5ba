use core::fmt;
use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{builtin, iri, meta, Dialect, Draft, Error, Retrieve};

/// Resolves the dialect a schema document declares through `$schema`.
pub trait DialectRegistry: Send + Sync + fmt::Debug {
    /// Returns the dialect identified by `iri`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dialect is unknown and can not be loaded.
    fn get_dialect(&self, iri: &str, retriever: &dyn Retrieve) -> Result<Arc<Dialect>, Error>;
}

/// Registry that knows the built-in dialects, any dialects registered on it and loads every
/// other dialect from its meta-schema.
///
/// Loaded dialects are memoized for the lifetime of the registry.
#[derive(Debug, Default)]
pub struct DefaultDialectRegistry {
    custom: AHashMap<String, Arc<Dialect>>,
    loaded: RwLock<AHashMap<String, Arc<Dialect>>>,
}

static DEFAULT_REGISTRY: Lazy<DefaultDialectRegistry> = Lazy::new(DefaultDialectRegistry::new);

impl DefaultDialectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Process-wide registry shared by validators that are not given one explicitly.
    #[must_use]
    pub fn instance() -> &'static DefaultDialectRegistry {
        &DEFAULT_REGISTRY
    }
    /// Register a dialect, replacing a built-in or previously registered one with the same id.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.custom
            .insert(iri::normalize(dialect.id()).to_string(), Arc::new(dialect));
        self
    }

    fn cached(&self, iri: &str) -> Option<Arc<Dialect>> {
        self.loaded
            .read()
            .expect("Lock is poisoned")
            .get(iri)
            .cloned()
    }

    fn known(&self, iri: &str) -> Option<Arc<Dialect>> {
        let iri = iri::normalize(iri);
        self.custom
            .get(iri)
            .cloned()
            .or_else(|| builtin::lookup(iri))
    }

    fn load(
        &self,
        iri: &str,
        retriever: &dyn Retrieve,
        visiting: &mut Vec<String>,
    ) -> Result<Arc<Dialect>, Error> {
        let iri = iri::normalize(iri);
        if let Some(dialect) = self.known(iri).or_else(|| self.cached(iri)) {
            return Ok(dialect);
        }
        if visiting.iter().any(|seen| seen == iri) {
            return Err(Error::CyclicMetaSchema {
                iri: iri.to_string(),
            });
        }
        visiting.push(iri.to_string());
        let document = fetch(iri, retriever)?;
        let Some(object) = document.as_object() else {
            return Err(Error::invalid_meta_schema(iri, "not a JSON object"));
        };
        let blueprint = match object.get("$schema").and_then(Value::as_str) {
            Some(parent) if iri::normalize(parent) != iri => self.load(parent, retriever, visiting)?,
            _ => builtin::for_draft(Draft::Draft202012),
        };
        let mut builder = Dialect::builder_from(iri, &blueprint);
        match object.get("$vocabulary") {
            None => {}
            Some(Value::Object(vocabularies)) => {
                builder = builder.clear_vocabularies();
                for (vocabulary, required) in vocabularies {
                    let Some(required) = required.as_bool() else {
                        return Err(Error::invalid_meta_schema(
                            iri,
                            format!("'$vocabulary' value of '{vocabulary}' is not a boolean"),
                        ));
                    };
                    builder = builder.vocabulary(vocabulary.as_str(), required);
                }
            }
            Some(_) => {
                return Err(Error::invalid_meta_schema(
                    iri,
                    "'$vocabulary' is not a JSON object",
                ))
            }
        }
        let dialect = Arc::new(builder.build()?);
        tracing::debug!(dialect = %iri, draft = ?dialect.draft(), "loaded dialect from meta-schema");
        self.loaded
            .write()
            .expect("Lock is poisoned")
            .insert(iri.to_string(), Arc::clone(&dialect));
        Ok(dialect)
    }
}

fn fetch(iri: &str, retriever: &dyn Retrieve) -> Result<Value, Error> {
    if let Some(document) = meta::lookup(iri) {
        return Ok(document.clone());
    }
    let parsed = iri::parse(iri)?;
    retriever
        .retrieve(&parsed)
        .map_err(|error| Error::unretrievable(iri, Some(error)))
}

impl DialectRegistry for DefaultDialectRegistry {
    fn get_dialect(&self, iri: &str, retriever: &dyn Retrieve) -> Result<Arc<Dialect>, Error> {
        self.load(iri, retriever, &mut Vec::new())
    }
}

/// Registry that only knows the built-in dialects and the ones registered on it.
#[derive(Debug, Default)]
pub struct DisallowUnknownDialectRegistry {
    custom: AHashMap<String, Arc<Dialect>>,
}

impl DisallowUnknownDialectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.custom
            .insert(iri::normalize(dialect.id()).to_string(), Arc::new(dialect));
        self
    }
}

impl DialectRegistry for DisallowUnknownDialectRegistry {
    fn get_dialect(&self, iri: &str, _: &dyn Retrieve) -> Result<Arc<Dialect>, Error> {
        let normalized = iri::normalize(iri);
        self.custom
            .get(normalized)
            .cloned()
            .or_else(|| builtin::lookup(normalized))
            .ok_or_else(|| Error::unknown_dialect(iri))
    }
}
