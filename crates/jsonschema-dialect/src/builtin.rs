//! Dialects of the standard drafts and the OpenAPI schema objects.
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{ids, iri, Dialect, Draft, KeywordKind};

use KeywordKind::{Annotation, NonValidation, Validator};

const DRAFT4_KEYWORDS: &[(&str, KeywordKind)] = &[
    ("$schema", NonValidation),
    ("id", NonValidation),
    ("$ref", Validator),
    ("title", Annotation),
    ("description", Annotation),
    ("default", Annotation),
    ("definitions", NonValidation),
    ("multipleOf", Validator),
    ("maximum", Validator),
    // Boolean modifiers of `maximum` and `minimum`
    ("exclusiveMaximum", NonValidation),
    ("minimum", Validator),
    ("exclusiveMinimum", NonValidation),
    ("maxLength", Validator),
    ("minLength", Validator),
    ("pattern", Validator),
    ("additionalItems", Validator),
    ("items", Validator),
    ("maxItems", Validator),
    ("minItems", Validator),
    ("uniqueItems", Validator),
    ("maxProperties", Validator),
    ("minProperties", Validator),
    ("required", Validator),
    ("additionalProperties", Validator),
    ("properties", Validator),
    ("patternProperties", Validator),
    ("dependencies", Validator),
    ("enum", Validator),
    ("type", Validator),
    ("format", Validator),
    ("allOf", Validator),
    ("anyOf", Validator),
    ("oneOf", Validator),
    ("not", Validator),
];

const DRAFT6_KEYWORDS: &[(&str, KeywordKind)] = &[
    ("$schema", NonValidation),
    ("$id", NonValidation),
    ("$ref", Validator),
    ("title", Annotation),
    ("description", Annotation),
    ("default", Annotation),
    ("examples", Annotation),
    ("definitions", NonValidation),
    ("multipleOf", Validator),
    ("maximum", Validator),
    ("exclusiveMaximum", Validator),
    ("minimum", Validator),
    ("exclusiveMinimum", Validator),
    ("maxLength", Validator),
    ("minLength", Validator),
    ("pattern", Validator),
    ("additionalItems", Validator),
    ("items", Validator),
    ("maxItems", Validator),
    ("minItems", Validator),
    ("uniqueItems", Validator),
    ("contains", Validator),
    ("maxProperties", Validator),
    ("minProperties", Validator),
    ("required", Validator),
    ("additionalProperties", Validator),
    ("properties", Validator),
    ("patternProperties", Validator),
    ("dependencies", Validator),
    ("propertyNames", Validator),
    ("const", Validator),
    ("enum", Validator),
    ("type", Validator),
    ("format", Validator),
    ("contentEncoding", Validator),
    ("contentMediaType", Validator),
    ("allOf", Validator),
    ("anyOf", Validator),
    ("oneOf", Validator),
    ("not", Validator),
];

const DRAFT7_ADDITIONS: &[(&str, KeywordKind)] = &[
    ("$comment", NonValidation),
    ("readOnly", Validator),
    ("writeOnly", Validator),
    ("if", Validator),
    ("then", NonValidation),
    ("else", NonValidation),
];

const OPENAPI_3_0_ADDITIONS: &[(&str, KeywordKind)] = &[
    // Read by `type`
    ("nullable", NonValidation),
    ("discriminator", Validator),
    ("readOnly", Validator),
    ("writeOnly", Validator),
    ("example", Annotation),
    ("externalDocs", Annotation),
    ("xml", Annotation),
    ("deprecated", Annotation),
];

// `definitions` stays recognized after it was replaced by `$defs`.
const LEGACY: &[(&str, KeywordKind)] = &[("definitions", NonValidation)];

fn build(builder: crate::DialectBuilder) -> Arc<Dialect> {
    Arc::new(builder.build().expect("Built-in dialects use known vocabularies"))
}

pub static DRAFT4: Lazy<Arc<Dialect>> = Lazy::new(|| {
    build(
        Dialect::builder(ids::DRAFT_4)
            .draft(Draft::Draft4)
            .id_keyword("id")
            .keywords(DRAFT4_KEYWORDS),
    )
});

pub static DRAFT6: Lazy<Arc<Dialect>> = Lazy::new(|| {
    build(
        Dialect::builder(ids::DRAFT_6)
            .draft(Draft::Draft6)
            .keywords(DRAFT6_KEYWORDS),
    )
});

pub static DRAFT7: Lazy<Arc<Dialect>> = Lazy::new(|| {
    build(
        Dialect::builder(ids::DRAFT_7)
            .draft(Draft::Draft7)
            .keywords(DRAFT6_KEYWORDS)
            .keywords(DRAFT7_ADDITIONS),
    )
});

pub static DRAFT201909: Lazy<Arc<Dialect>> = Lazy::new(|| {
    build(
        Dialect::builder(ids::DRAFT_2019_09)
            .draft(Draft::Draft201909)
            .keywords(LEGACY)
            .vocabulary(ids::VOCAB_2019_09_CORE, true)
            .vocabulary(ids::VOCAB_2019_09_APPLICATOR, true)
            .vocabulary(ids::VOCAB_2019_09_VALIDATION, true)
            .vocabulary(ids::VOCAB_2019_09_META_DATA, true)
            .vocabulary(ids::VOCAB_2019_09_FORMAT, false)
            .vocabulary(ids::VOCAB_2019_09_CONTENT, true),
    )
});

fn draft202012_builder(id: &str) -> crate::DialectBuilder {
    Dialect::builder(id)
        .draft(Draft::Draft202012)
        .keywords(LEGACY)
        .vocabulary(ids::VOCAB_2020_12_CORE, true)
        .vocabulary(ids::VOCAB_2020_12_APPLICATOR, true)
        .vocabulary(ids::VOCAB_2020_12_UNEVALUATED, true)
        .vocabulary(ids::VOCAB_2020_12_VALIDATION, true)
        .vocabulary(ids::VOCAB_2020_12_META_DATA, true)
        .vocabulary(ids::VOCAB_2020_12_FORMAT_ANNOTATION, true)
        .vocabulary(ids::VOCAB_2020_12_CONTENT, true)
}

pub static DRAFT202012: Lazy<Arc<Dialect>> =
    Lazy::new(|| build(draft202012_builder(ids::DRAFT_2020_12)));

pub static OPENAPI30: Lazy<Arc<Dialect>> = Lazy::new(|| {
    build(
        Dialect::builder(ids::OPENAPI_3_0)
            .draft(Draft::Draft4)
            .id_keyword("id")
            .keywords(DRAFT4_KEYWORDS)
            .keywords(OPENAPI_3_0_ADDITIONS),
    )
});

pub static OPENAPI31: Lazy<Arc<Dialect>> = Lazy::new(|| {
    build(draft202012_builder(ids::OPENAPI_3_1).vocabulary(ids::VOCAB_OPENAPI_3_1_BASE, false))
});

/// Returns the built-in dialect identified by `iri`.
#[must_use]
pub fn lookup(iri: &str) -> Option<Arc<Dialect>> {
    if let Some(draft) = Draft::from_meta_schema(iri) {
        return Some(for_draft(draft));
    }
    match iri::normalize(iri) {
        ids::OPENAPI_3_0 => Some(Arc::clone(&*OPENAPI30)),
        ids::OPENAPI_3_1 => Some(Arc::clone(&*OPENAPI31)),
        _ => None,
    }
}

/// Returns the standard dialect of a draft.
#[must_use]
pub fn for_draft(draft: Draft) -> Arc<Dialect> {
    let dialect: &Lazy<Arc<Dialect>> = match draft {
        Draft::Draft4 => &DRAFT4,
        Draft::Draft6 => &DRAFT6,
        Draft::Draft7 => &DRAFT7,
        Draft::Draft201909 => &DRAFT201909,
        Draft::Draft202012 => &DRAFT202012,
    };
    Arc::clone(&**dialect)
}
