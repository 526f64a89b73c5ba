use core::fmt;
use std::str::FromStr;

use ahash::AHashSet;

use crate::{ids, Draft, KeywordKind};

/// A named bundle of keywords that a dialect may include.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Vocabulary {
    Core,
    Applicator,
    Unevaluated,
    Validation,
    Metadata,
    Format,
    FormatAnnotation,
    FormatAssertion,
    Content,
    /// The OpenAPI 3.1 base vocabulary (`discriminator`, `xml`, `externalDocs`, `example`).
    OpenApiBase,
    Custom(String),
}

impl FromStr for Vocabulary {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            ids::VOCAB_2020_12_CORE | ids::VOCAB_2019_09_CORE => Vocabulary::Core,
            ids::VOCAB_2020_12_APPLICATOR | ids::VOCAB_2019_09_APPLICATOR => {
                Vocabulary::Applicator
            }
            ids::VOCAB_2020_12_UNEVALUATED => Vocabulary::Unevaluated,
            ids::VOCAB_2020_12_VALIDATION | ids::VOCAB_2019_09_VALIDATION => {
                Vocabulary::Validation
            }
            ids::VOCAB_2020_12_META_DATA | ids::VOCAB_2019_09_META_DATA => Vocabulary::Metadata,
            ids::VOCAB_2019_09_FORMAT => Vocabulary::Format,
            ids::VOCAB_2020_12_FORMAT_ANNOTATION => Vocabulary::FormatAnnotation,
            ids::VOCAB_2020_12_FORMAT_ASSERTION => Vocabulary::FormatAssertion,
            ids::VOCAB_2020_12_CONTENT | ids::VOCAB_2019_09_CONTENT => Vocabulary::Content,
            ids::VOCAB_OPENAPI_3_1_BASE => Vocabulary::OpenApiBase,
            other => Vocabulary::Custom(other.to_string()),
        })
    }
}

const CORE_2019_09: &[(&str, KeywordKind)] = &[
    ("$id", KeywordKind::NonValidation),
    ("$schema", KeywordKind::NonValidation),
    ("$anchor", KeywordKind::NonValidation),
    ("$ref", KeywordKind::Validator),
    ("$recursiveRef", KeywordKind::Validator),
    ("$recursiveAnchor", KeywordKind::NonValidation),
    ("$vocabulary", KeywordKind::NonValidation),
    ("$comment", KeywordKind::NonValidation),
    ("$defs", KeywordKind::NonValidation),
];

const CORE_2020_12: &[(&str, KeywordKind)] = &[
    ("$id", KeywordKind::NonValidation),
    ("$schema", KeywordKind::NonValidation),
    ("$anchor", KeywordKind::NonValidation),
    ("$ref", KeywordKind::Validator),
    ("$dynamicRef", KeywordKind::Validator),
    ("$dynamicAnchor", KeywordKind::NonValidation),
    ("$vocabulary", KeywordKind::NonValidation),
    ("$comment", KeywordKind::NonValidation),
    ("$defs", KeywordKind::NonValidation),
];

// `then`, `else`, `maxContains` and `minContains` are read by their owning keyword.
const APPLICATOR_2019_09: &[(&str, KeywordKind)] = &[
    ("additionalItems", KeywordKind::Validator),
    ("unevaluatedItems", KeywordKind::Validator),
    ("items", KeywordKind::Validator),
    ("contains", KeywordKind::Validator),
    ("additionalProperties", KeywordKind::Validator),
    ("unevaluatedProperties", KeywordKind::Validator),
    ("properties", KeywordKind::Validator),
    ("patternProperties", KeywordKind::Validator),
    ("dependentSchemas", KeywordKind::Validator),
    ("propertyNames", KeywordKind::Validator),
    ("if", KeywordKind::Validator),
    ("then", KeywordKind::NonValidation),
    ("else", KeywordKind::NonValidation),
    ("allOf", KeywordKind::Validator),
    ("anyOf", KeywordKind::Validator),
    ("oneOf", KeywordKind::Validator),
    ("not", KeywordKind::Validator),
];

const APPLICATOR_2020_12: &[(&str, KeywordKind)] = &[
    ("prefixItems", KeywordKind::Validator),
    ("items", KeywordKind::Validator),
    ("contains", KeywordKind::Validator),
    ("additionalProperties", KeywordKind::Validator),
    ("properties", KeywordKind::Validator),
    ("patternProperties", KeywordKind::Validator),
    ("dependentSchemas", KeywordKind::Validator),
    ("propertyNames", KeywordKind::Validator),
    ("if", KeywordKind::Validator),
    ("then", KeywordKind::NonValidation),
    ("else", KeywordKind::NonValidation),
    ("allOf", KeywordKind::Validator),
    ("anyOf", KeywordKind::Validator),
    ("oneOf", KeywordKind::Validator),
    ("not", KeywordKind::Validator),
];

const UNEVALUATED: &[(&str, KeywordKind)] = &[
    ("unevaluatedItems", KeywordKind::Validator),
    ("unevaluatedProperties", KeywordKind::Validator),
];

const VALIDATION: &[(&str, KeywordKind)] = &[
    ("multipleOf", KeywordKind::Validator),
    ("maximum", KeywordKind::Validator),
    ("exclusiveMaximum", KeywordKind::Validator),
    ("minimum", KeywordKind::Validator),
    ("exclusiveMinimum", KeywordKind::Validator),
    ("maxLength", KeywordKind::Validator),
    ("minLength", KeywordKind::Validator),
    ("pattern", KeywordKind::Validator),
    ("maxItems", KeywordKind::Validator),
    ("minItems", KeywordKind::Validator),
    ("uniqueItems", KeywordKind::Validator),
    ("maxContains", KeywordKind::NonValidation),
    ("minContains", KeywordKind::NonValidation),
    ("maxProperties", KeywordKind::Validator),
    ("minProperties", KeywordKind::Validator),
    ("required", KeywordKind::Validator),
    ("dependentRequired", KeywordKind::Validator),
    ("const", KeywordKind::Validator),
    ("enum", KeywordKind::Validator),
    ("type", KeywordKind::Validator),
];

const META_DATA: &[(&str, KeywordKind)] = &[
    ("title", KeywordKind::Annotation),
    ("description", KeywordKind::Annotation),
    ("default", KeywordKind::Annotation),
    ("deprecated", KeywordKind::Annotation),
    ("readOnly", KeywordKind::Validator),
    ("writeOnly", KeywordKind::Validator),
    ("examples", KeywordKind::Annotation),
];

const FORMAT: &[(&str, KeywordKind)] = &[("format", KeywordKind::Validator)];

const CONTENT: &[(&str, KeywordKind)] = &[
    ("contentEncoding", KeywordKind::Annotation),
    ("contentMediaType", KeywordKind::Annotation),
    ("contentSchema", KeywordKind::Annotation),
];

const OPENAPI_BASE: &[(&str, KeywordKind)] = &[
    ("discriminator", KeywordKind::Validator),
    ("example", KeywordKind::Annotation),
    ("externalDocs", KeywordKind::Annotation),
    ("xml", KeywordKind::Annotation),
];

impl Vocabulary {
    /// Keywords this vocabulary contributes under the given specification version.
    ///
    /// Custom vocabularies contribute nothing.
    #[must_use]
    pub fn keywords(&self, draft: Draft) -> &'static [(&'static str, KeywordKind)] {
        match (self, draft) {
            (Vocabulary::Core, Draft::Draft201909) => CORE_2019_09,
            (Vocabulary::Core, _) => CORE_2020_12,
            (Vocabulary::Applicator, Draft::Draft201909) => APPLICATOR_2019_09,
            (Vocabulary::Applicator, _) => APPLICATOR_2020_12,
            (Vocabulary::Unevaluated, _) => UNEVALUATED,
            (Vocabulary::Validation, _) => VALIDATION,
            (Vocabulary::Metadata, _) => META_DATA,
            (Vocabulary::Format | Vocabulary::FormatAnnotation | Vocabulary::FormatAssertion, _) => {
                FORMAT
            }
            (Vocabulary::Content, _) => CONTENT,
            (Vocabulary::OpenApiBase, _) => OPENAPI_BASE,
            (Vocabulary::Custom(_), _) => &[],
        }
    }
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Vocabulary::Custom(_))
    }
    const fn bit(&self) -> Option<u16> {
        match self {
            Vocabulary::Core => Some(1 << 0),
            Vocabulary::Applicator => Some(1 << 1),
            Vocabulary::Unevaluated => Some(1 << 2),
            Vocabulary::Validation => Some(1 << 3),
            Vocabulary::Metadata => Some(1 << 4),
            Vocabulary::Format => Some(1 << 5),
            Vocabulary::FormatAnnotation => Some(1 << 6),
            Vocabulary::FormatAssertion => Some(1 << 7),
            Vocabulary::Content => Some(1 << 8),
            Vocabulary::OpenApiBase => Some(1 << 9),
            Vocabulary::Custom(_) => None,
        }
    }
}

const NAMES: [&str; 10] = [
    "core",
    "applicator",
    "unevaluated",
    "validation",
    "meta-data",
    "format",
    "format-annotation",
    "format-assertion",
    "content",
    "openapi-base",
];

/// A set of vocabularies enabled for a dialect.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct VocabularySet {
    known: u16,
    custom: AHashSet<String>,
}

impl fmt::Debug for VocabularySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_list = f.debug_list();
        for (idx, name) in NAMES.iter().enumerate() {
            if self.known & (1 << idx) != 0 {
                debug_list.entry(name);
            }
        }
        let mut custom: Vec<_> = self.custom.iter().collect();
        custom.sort_unstable();
        for uri in custom {
            debug_list.entry(uri);
        }
        debug_list.finish()
    }
}

impl VocabularySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, vocabulary: Vocabulary) {
        match vocabulary.bit() {
            Some(bit) => self.known |= bit,
            None => {
                if let Vocabulary::Custom(uri) = vocabulary {
                    self.custom.insert(uri);
                }
            }
        }
    }
    #[must_use]
    pub fn contains(&self, vocabulary: &Vocabulary) -> bool {
        match (vocabulary.bit(), vocabulary) {
            (Some(bit), _) => self.known & bit != 0,
            (None, Vocabulary::Custom(uri)) => self.custom.contains(uri),
            (None, _) => false,
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known == 0 && self.custom.is_empty()
    }
}
