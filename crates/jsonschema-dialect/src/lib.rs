//! Dialects, vocabularies and meta-schemas of JSON Schema and the OpenAPI schema object.
//!
//! A [`Dialect`] decides which keywords of a schema document are evaluated and how. Dialects
//! are looked up through a [`DialectRegistry`] by the IRI a document declares in `$schema`.
mod builtin;
mod dialect;
mod draft;
mod error;
pub mod ids;
pub mod iri;
pub mod meta;
mod registry;
mod retriever;
mod vocabularies;

pub use builtin::{for_draft, lookup as builtin};
pub use dialect::{Dialect, DialectBuilder, KeywordKind};
pub use draft::Draft;
pub use error::Error;
pub use registry::{DefaultDialectRegistry, DialectRegistry, DisallowUnknownDialectRegistry};
pub use retriever::{NoRetrieve, Retrieve};
pub use vocabularies::{Vocabulary, VocabularySet};
