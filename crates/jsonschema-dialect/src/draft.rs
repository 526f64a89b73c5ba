use serde_json::Value;

use crate::{ids, iri};

/// JSON Schema specification versions, ordered by release.
#[non_exhaustive]
#[derive(Debug, Default, PartialEq, Copy, Clone, Hash, Eq, PartialOrd, Ord)]
pub enum Draft {
    /// JSON Schema Draft 4
    Draft4,
    /// JSON Schema Draft 6
    Draft6,
    /// JSON Schema Draft 7
    Draft7,
    /// JSON Schema Draft 2019-09
    Draft201909,
    /// JSON Schema Draft 2020-12
    #[default]
    Draft202012,
}

impl Draft {
    /// Maps a meta-schema IRI of one of the standard drafts to its version.
    #[must_use]
    pub fn from_meta_schema(iri: &str) -> Option<Draft> {
        match iri::normalize(iri) {
            ids::DRAFT_2020_12 => Some(Draft::Draft202012),
            ids::DRAFT_2019_09 => Some(Draft::Draft201909),
            ids::DRAFT_7 | "https://json-schema.org/draft-07/schema" => Some(Draft::Draft7),
            ids::DRAFT_6 | "https://json-schema.org/draft-06/schema" => Some(Draft::Draft6),
            ids::DRAFT_4 | "https://json-schema.org/draft-04/schema" => Some(Draft::Draft4),
            _ => None,
        }
    }
    /// The canonical meta-schema IRI of this draft.
    #[must_use]
    pub const fn meta_schema(self) -> &'static str {
        match self {
            Draft::Draft4 => ids::DRAFT_4,
            Draft::Draft6 => ids::DRAFT_6,
            Draft::Draft7 => ids::DRAFT_7,
            Draft::Draft201909 => ids::DRAFT_2019_09,
            Draft::Draft202012 => ids::DRAFT_2020_12,
        }
    }
    /// The keyword that declares a schema resource identifier.
    #[must_use]
    pub const fn id_keyword(self) -> &'static str {
        match self {
            Draft::Draft4 => "id",
            _ => "$id",
        }
    }
    /// Whether keywords are organized into vocabularies.
    #[must_use]
    pub fn has_vocabularies(self) -> bool {
        self >= Draft::Draft201909
    }
    /// Whether the siblings of `$ref` are ignored.
    #[must_use]
    pub fn ignores_ref_siblings(self) -> bool {
        self <= Draft::Draft7
    }
    /// Whether `format` asserts by default.
    #[must_use]
    pub fn asserts_formats_by_default(self) -> bool {
        self <= Draft::Draft7
    }
    /// The `$schema` value declared by the given schema document, if any.
    #[must_use]
    pub fn declared_dialect(contents: &Value) -> Option<&str> {
        contents
            .as_object()
            .and_then(|contents| contents.get("$schema"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use crate::Draft;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("https://json-schema.org/draft/2020-12/schema", Some(Draft::Draft202012); "detect Draft 2020-12")]
    #[test_case("https://json-schema.org/draft/2020-12/schema#", Some(Draft::Draft202012); "detect Draft 2020-12 with fragment")]
    #[test_case("https://json-schema.org/draft/2019-09/schema", Some(Draft::Draft201909); "detect Draft 2019-09")]
    #[test_case("http://json-schema.org/draft-07/schema#", Some(Draft::Draft7); "detect Draft 7")]
    #[test_case("http://json-schema.org/draft-06/schema", Some(Draft::Draft6); "detect Draft 6")]
    #[test_case("http://json-schema.org/draft-04/schema#", Some(Draft::Draft4); "detect Draft 4")]
    #[test_case("https://example.com/custom", None; "custom meta-schema")]
    fn test_from_meta_schema(iri: &str, expected: Option<Draft>) {
        assert_eq!(Draft::from_meta_schema(iri), expected);
    }

    #[test]
    fn test_ordering() {
        assert!(Draft::Draft4 < Draft::Draft6);
        assert!(Draft::Draft7 < Draft::Draft201909);
        assert!(Draft::Draft201909 < Draft::Draft202012);
    }

    #[test_case(Draft::Draft4, "id")]
    #[test_case(Draft::Draft7, "$id")]
    #[test_case(Draft::Draft202012, "$id")]
    fn test_id_keyword(draft: Draft, expected: &str) {
        assert_eq!(draft.id_keyword(), expected);
    }

    #[test]
    fn test_declared_dialect() {
        let schema = json!({"$schema": "http://json-schema.org/draft-07/schema#"});
        assert_eq!(
            Draft::declared_dialect(&schema),
            Some("http://json-schema.org/draft-07/schema#")
        );
        assert_eq!(Draft::declared_dialect(&json!(true)), None);
    }
}
