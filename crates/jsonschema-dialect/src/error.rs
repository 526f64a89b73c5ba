use core::fmt;

/// Errors that can occur while resolving or building a dialect.
#[derive(Debug)]
pub enum Error {
    /// A dialect IRI is not known and the registry does not load unknown dialects.
    UnknownDialect { iri: String },
    /// A meta-schema declares a required vocabulary this crate does not know.
    UnknownRequiredVocabulary { dialect: String, vocabulary: String },
    /// A meta-schema could not be fetched.
    Unretrievable {
        iri: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// A meta-schema document is not a JSON object or its `$vocabulary` is malformed.
    InvalidMetaSchema { iri: String, reason: String },
    /// A meta-schema chain refers back to itself without reaching a known dialect.
    CyclicMetaSchema { iri: String },
    /// An IRI could not be parsed.
    InvalidIri { iri: String, source: url::ParseError },
}

impl Error {
    pub(crate) fn unknown_dialect(iri: impl Into<String>) -> Error {
        Error::UnknownDialect { iri: iri.into() }
    }
    pub(crate) fn unknown_required_vocabulary(
        dialect: impl Into<String>,
        vocabulary: impl Into<String>,
    ) -> Error {
        Error::UnknownRequiredVocabulary {
            dialect: dialect.into(),
            vocabulary: vocabulary.into(),
        }
    }
    pub(crate) fn unretrievable(
        iri: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Error {
        Error::Unretrievable {
            iri: iri.into(),
            source,
        }
    }
    pub(crate) fn invalid_meta_schema(iri: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::InvalidMetaSchema {
            iri: iri.into(),
            reason: reason.into(),
        }
    }
    pub(crate) fn invalid_iri(iri: impl Into<String>, source: url::ParseError) -> Error {
        Error::InvalidIri {
            iri: iri.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownDialect { iri } => {
                f.write_fmt(format_args!("Unknown dialect '{iri}'"))
            }
            Error::UnknownRequiredVocabulary { dialect, vocabulary } => f.write_fmt(format_args!(
                "Meta-schema '{dialect}' has unknown required vocabulary '{vocabulary}'"
            )),
            Error::Unretrievable { iri, source } => {
                f.write_fmt(format_args!("Meta-schema '{iri}' could not be retrieved"))?;
                if let Some(err) = source {
                    f.write_fmt(format_args!(": {err}"))?;
                }
                Ok(())
            }
            Error::InvalidMetaSchema { iri, reason } => {
                f.write_fmt(format_args!("Meta-schema '{iri}' is invalid: {reason}"))
            }
            Error::CyclicMetaSchema { iri } => f.write_fmt(format_args!(
                "Meta-schema '{iri}' does not lead to a known specification"
            )),
            Error::InvalidIri { iri, source } => {
                f.write_fmt(format_args!("Invalid IRI '{iri}': {source}"))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Unretrievable {
                source: Some(source),
                ..
            } => Some(&**source),
            Error::InvalidIri { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn unknown_required_vocabulary_message() {
        let error = Error::unknown_required_vocabulary(
            "https://example.com/meta",
            "https://example.com/vocab/custom",
        );
        assert_eq!(
            error.to_string(),
            "Meta-schema 'https://example.com/meta' has unknown required vocabulary 'https://example.com/vocab/custom'"
        );
    }

    #[test]
    fn unretrievable_includes_source() {
        let error = Error::unretrievable("https://example.com/meta", Some("offline".into()));
        assert_eq!(
            error.to_string(),
            "Meta-schema 'https://example.com/meta' could not be retrieved: offline"
        );
    }
}
