//! IRI helpers shared by dialect loading and schema compilation.
use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::Error;

/// Base IRI assigned to documents that do not declare one.
pub const DEFAULT_BASE_IRI: &str = "json-schema:///";

/// Parses an absolute IRI.
///
/// # Errors
///
/// Returns an error if the input is not an absolute IRI.
pub fn parse(iri: &str) -> Result<Url, Error> {
    Url::parse(iri).map_err(|error| Error::invalid_iri(iri, error))
}

/// Resolves the IRI reference against the given base and returns the target IRI.
///
/// # Errors
///
/// Returns an error if the reference can not be resolved against the base.
pub fn resolve(base: &Url, reference: &str) -> Result<Url, Error> {
    base.join(reference)
        .map_err(|error| Error::invalid_iri(reference, error))
}

/// Strips an empty trailing fragment, so `https://example.com/schema#` and
/// `https://example.com/schema` are treated as the same resource.
#[must_use]
pub fn normalize(iri: &str) -> &str {
    iri.strip_suffix('#').unwrap_or(iri)
}

/// Splits an IRI into its resource part and an optional fragment.
#[must_use]
pub fn split_fragment(iri: &str) -> (&str, Option<&str>) {
    match iri.split_once('#') {
        Some((resource, fragment)) => (resource, Some(fragment)),
        None => (iri, None),
    }
}

/// Returns the IRI without its fragment.
#[must_use]
pub fn without_fragment(iri: &Url) -> Url {
    let mut iri = iri.clone();
    iri.set_fragment(None);
    iri
}

/// Decodes a percent-encoded IRI fragment.
#[must_use]
pub fn decode_fragment(fragment: &str) -> Cow<'_, str> {
    percent_decode_str(fragment).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://example.com/root.json", "item.json", "https://example.com/item.json")]
    #[test_case("https://example.com/a/b.json", "../c.json#/x", "https://example.com/c.json#/x")]
    #[test_case("json-schema:///", "nested.json", "json-schema:///nested.json")]
    #[test_case("json-schema:///", "#foo", "json-schema:///#foo")]
    #[test_case("urn:uuid:deadbeef-1234-0000-0000-4321feebdaed", "#/$defs/bar", "urn:uuid:deadbeef-1234-0000-0000-4321feebdaed#/$defs/bar")]
    fn resolves_references(base: &str, reference: &str, expected: &str) {
        let base = parse(base).expect("Valid base");
        let resolved = resolve(&base, reference).expect("Resolvable reference");
        assert_eq!(resolved.as_str(), expected);
    }

    #[test_case("https://example.com/schema#", "https://example.com/schema")]
    #[test_case("https://example.com/schema", "https://example.com/schema")]
    #[test_case("https://example.com/schema#foo", "https://example.com/schema#foo")]
    fn normalizes_empty_fragment(input: &str, expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn decodes_fragment() {
        assert_eq!(decode_fragment("/%25percent"), "/%percent");
        assert_eq!(decode_fragment("/plain"), "/plain");
    }

    #[test]
    fn relative_iri_is_rejected() {
        assert!(parse("relative/path.json").is_err());
    }
}
