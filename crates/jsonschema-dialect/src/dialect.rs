use std::str::FromStr;

use ahash::AHashMap;
use serde_json::Value;

use crate::{Draft, Error, Vocabulary, VocabularySet};

/// How a keyword participates in evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// The keyword is compiled into a validator.
    Validator,
    /// The keyword value is recorded as an annotation.
    Annotation,
    /// The keyword is recognized but has no evaluation aspect.
    NonValidation,
}

/// A named set of keywords, vocabularies and a specification version that governs how a schema
/// document is interpreted.
///
/// Dialects are immutable once built and are shared between threads behind `Arc`.
#[derive(Debug, Clone)]
pub struct Dialect {
    id: String,
    id_keyword: &'static str,
    draft: Draft,
    keywords: AHashMap<String, KeywordKind>,
    vocabularies: Vec<(String, bool)>,
    vocabulary_set: VocabularySet,
    asserts_formats: bool,
    // Kept so that dialects derived from this one can be rebuilt with other vocabularies.
    extra_keywords: Vec<(String, KeywordKind)>,
}

impl Dialect {
    /// Start building a dialect identified by `id`.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> DialectBuilder {
        DialectBuilder {
            id: id.into(),
            id_keyword: "$id",
            draft: Draft::default(),
            extra_keywords: Vec::new(),
            vocabularies: Vec::new(),
        }
    }
    /// Start building a dialect identified by `id` that copies `blueprint`'s configuration.
    #[must_use]
    pub fn builder_from(id: impl Into<String>, blueprint: &Dialect) -> DialectBuilder {
        DialectBuilder {
            id: id.into(),
            id_keyword: blueprint.id_keyword,
            draft: blueprint.draft,
            extra_keywords: blueprint.extra_keywords.clone(),
            vocabularies: blueprint.vocabularies.clone(),
        }
    }
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
    #[must_use]
    pub fn id_keyword(&self) -> &'static str {
        self.id_keyword
    }
    /// Specification version whose keyword semantics this dialect follows.
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.draft
    }
    #[must_use]
    pub fn keyword(&self, name: &str) -> Option<KeywordKind> {
        self.keywords.get(name).copied()
    }
    pub fn keywords(&self) -> impl Iterator<Item = (&str, KeywordKind)> {
        self.keywords.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
    /// Declared vocabularies with their `required` flag, in declaration order.
    #[must_use]
    pub fn vocabularies(&self) -> &[(String, bool)] {
        &self.vocabularies
    }
    #[must_use]
    pub fn has_vocabulary(&self, vocabulary: &Vocabulary) -> bool {
        self.vocabulary_set.contains(vocabulary)
    }
    /// Whether `format` asserts by default under this dialect.
    #[must_use]
    pub fn asserts_formats(&self) -> bool {
        self.asserts_formats
    }
    /// Reads the resource identifier of a schema object.
    #[must_use]
    pub fn read_id<'a>(&self, schema: &'a Value) -> Option<&'a str> {
        schema.get(self.id_keyword).and_then(Value::as_str)
    }
}

/// Builder for [`Dialect`].
#[derive(Debug, Clone)]
pub struct DialectBuilder {
    id: String,
    id_keyword: &'static str,
    draft: Draft,
    extra_keywords: Vec<(String, KeywordKind)>,
    vocabularies: Vec<(String, bool)>,
}

impl DialectBuilder {
    #[must_use]
    pub fn draft(mut self, draft: Draft) -> Self {
        self.draft = draft;
        self
    }
    #[must_use]
    pub fn id_keyword(mut self, id_keyword: &'static str) -> Self {
        self.id_keyword = id_keyword;
        self
    }
    /// Add a keyword that does not come from a vocabulary.
    #[must_use]
    pub fn keyword(mut self, name: impl Into<String>, kind: KeywordKind) -> Self {
        self.extra_keywords.push((name.into(), kind));
        self
    }
    #[must_use]
    pub fn keywords<'a>(mut self, keywords: impl IntoIterator<Item = &'a (&'a str, KeywordKind)>) -> Self {
        self.extra_keywords.extend(
            keywords
                .into_iter()
                .map(|(name, kind)| ((*name).to_string(), *kind)),
        );
        self
    }
    /// Add a vocabulary. Unknown required vocabularies fail the build.
    #[must_use]
    pub fn vocabulary(mut self, iri: impl Into<String>, required: bool) -> Self {
        let iri = iri.into();
        if let Some(existing) = self.vocabularies.iter_mut().find(|(id, _)| *id == iri) {
            existing.1 = required;
        } else {
            self.vocabularies.push((iri, required));
        }
        self
    }
    /// Drop every vocabulary declared so far.
    #[must_use]
    pub fn clear_vocabularies(mut self) -> Self {
        self.vocabularies.clear();
        self
    }
    /// Expand vocabularies into the final keyword table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRequiredVocabulary`] if a required vocabulary is not known.
    pub fn build(self) -> Result<Dialect, Error> {
        let mut keywords = AHashMap::with_capacity(self.extra_keywords.len() + 64);
        for (name, kind) in &self.extra_keywords {
            keywords.insert(name.clone(), *kind);
        }
        let mut vocabulary_set = VocabularySet::new();
        let mut asserts_formats = self.draft.asserts_formats_by_default();
        if self.draft.has_vocabularies() {
            for (iri, required) in &self.vocabularies {
                let vocabulary = match Vocabulary::from_str(iri) {
                    Ok(vocabulary) => vocabulary,
                    Err(never) => match never {},
                };
                if !vocabulary.is_known() {
                    if *required {
                        return Err(Error::unknown_required_vocabulary(&self.id, iri));
                    }
                    tracing::warn!(dialect = %self.id, vocabulary = %iri, "skipping unknown optional vocabulary");
                    continue;
                }
                for (name, kind) in vocabulary.keywords(self.draft) {
                    keywords.insert((*name).to_string(), *kind);
                }
                if vocabulary == Vocabulary::FormatAssertion {
                    asserts_formats = true;
                }
                vocabulary_set.add(vocabulary);
            }
        }
        Ok(Dialect {
            id: self.id,
            id_keyword: self.id_keyword,
            draft: self.draft,
            keywords,
            vocabularies: self.vocabularies,
            vocabulary_set,
            asserts_formats,
            extra_keywords: self.extra_keywords,
        })
    }
}
