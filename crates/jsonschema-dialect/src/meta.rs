//! Meta-schemas of the standard drafts, embedded at compile time.
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{ids, iri};

macro_rules! meta_schema {
    ($vis:vis $name:ident, $path:expr) => {
        $vis static $name: Lazy<Value> = Lazy::new(|| {
            serde_json::from_slice(include_bytes!($path)).expect("Invalid meta-schema")
        });
    };
    ($name:ident, $path:expr) => {
        meta_schema!(pub(crate) $name, $path);
    };
}

meta_schema!(pub DRAFT4, "../metaschemas/draft4.json");
meta_schema!(pub DRAFT6, "../metaschemas/draft6.json");
meta_schema!(pub DRAFT7, "../metaschemas/draft7.json");
meta_schema!(pub DRAFT201909, "../metaschemas/draft2019-09/schema.json");
meta_schema!(DRAFT201909_CORE, "../metaschemas/draft2019-09/meta/core.json");
meta_schema!(
    DRAFT201909_APPLICATOR,
    "../metaschemas/draft2019-09/meta/applicator.json"
);
meta_schema!(
    DRAFT201909_VALIDATION,
    "../metaschemas/draft2019-09/meta/validation.json"
);
meta_schema!(
    DRAFT201909_META_DATA,
    "../metaschemas/draft2019-09/meta/meta-data.json"
);
meta_schema!(DRAFT201909_FORMAT, "../metaschemas/draft2019-09/meta/format.json");
meta_schema!(DRAFT201909_CONTENT, "../metaschemas/draft2019-09/meta/content.json");
meta_schema!(pub DRAFT202012, "../metaschemas/draft2020-12/schema.json");
meta_schema!(DRAFT202012_CORE, "../metaschemas/draft2020-12/meta/core.json");
meta_schema!(
    DRAFT202012_APPLICATOR,
    "../metaschemas/draft2020-12/meta/applicator.json"
);
meta_schema!(
    DRAFT202012_UNEVALUATED,
    "../metaschemas/draft2020-12/meta/unevaluated.json"
);
meta_schema!(
    DRAFT202012_VALIDATION,
    "../metaschemas/draft2020-12/meta/validation.json"
);
meta_schema!(
    DRAFT202012_META_DATA,
    "../metaschemas/draft2020-12/meta/meta-data.json"
);
meta_schema!(
    DRAFT202012_FORMAT_ANNOTATION,
    "../metaschemas/draft2020-12/meta/format-annotation.json"
);
meta_schema!(DRAFT202012_CONTENT, "../metaschemas/draft2020-12/meta/content.json");

/// IRIs of every embedded meta-schema document.
pub const KNOWN: [&str; 18] = [
    ids::DRAFT_4,
    ids::DRAFT_6,
    ids::DRAFT_7,
    ids::DRAFT_2019_09,
    "https://json-schema.org/draft/2019-09/meta/core",
    "https://json-schema.org/draft/2019-09/meta/applicator",
    "https://json-schema.org/draft/2019-09/meta/validation",
    "https://json-schema.org/draft/2019-09/meta/meta-data",
    "https://json-schema.org/draft/2019-09/meta/format",
    "https://json-schema.org/draft/2019-09/meta/content",
    ids::DRAFT_2020_12,
    "https://json-schema.org/draft/2020-12/meta/core",
    "https://json-schema.org/draft/2020-12/meta/applicator",
    "https://json-schema.org/draft/2020-12/meta/unevaluated",
    "https://json-schema.org/draft/2020-12/meta/validation",
    "https://json-schema.org/draft/2020-12/meta/meta-data",
    "https://json-schema.org/draft/2020-12/meta/format-annotation",
    "https://json-schema.org/draft/2020-12/meta/content",
];

/// Returns the embedded meta-schema document identified by `iri`.
///
/// A trailing empty fragment is ignored.
#[must_use]
pub fn lookup(iri: &str) -> Option<&'static Value> {
    let document: &'static Lazy<Value> = match iri::normalize(iri) {
        ids::DRAFT_4 => &DRAFT4,
        ids::DRAFT_6 => &DRAFT6,
        ids::DRAFT_7 => &DRAFT7,
        ids::DRAFT_2019_09 => &DRAFT201909,
        "https://json-schema.org/draft/2019-09/meta/core" => &DRAFT201909_CORE,
        "https://json-schema.org/draft/2019-09/meta/applicator" => &DRAFT201909_APPLICATOR,
        "https://json-schema.org/draft/2019-09/meta/validation" => &DRAFT201909_VALIDATION,
        "https://json-schema.org/draft/2019-09/meta/meta-data" => &DRAFT201909_META_DATA,
        "https://json-schema.org/draft/2019-09/meta/format" => &DRAFT201909_FORMAT,
        "https://json-schema.org/draft/2019-09/meta/content" => &DRAFT201909_CONTENT,
        ids::DRAFT_2020_12 => &DRAFT202012,
        "https://json-schema.org/draft/2020-12/meta/core" => &DRAFT202012_CORE,
        "https://json-schema.org/draft/2020-12/meta/applicator" => &DRAFT202012_APPLICATOR,
        "https://json-schema.org/draft/2020-12/meta/unevaluated" => &DRAFT202012_UNEVALUATED,
        "https://json-schema.org/draft/2020-12/meta/validation" => &DRAFT202012_VALIDATION,
        "https://json-schema.org/draft/2020-12/meta/meta-data" => &DRAFT202012_META_DATA,
        "https://json-schema.org/draft/2020-12/meta/format-annotation" => {
            &DRAFT202012_FORMAT_ANNOTATION
        }
        "https://json-schema.org/draft/2020-12/meta/content" => &DRAFT202012_CONTENT,
        _ => return None,
    };
    Some(&**document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn every_known_document_parses() {
        for iri in KNOWN {
            let document = lookup(iri).expect("Embedded meta-schema");
            assert!(document.is_object(), "{iri}");
        }
    }

    #[test_case("http://json-schema.org/draft-07/schema#", "$id")]
    #[test_case("http://json-schema.org/draft-04/schema#", "id")]
    #[test_case("https://json-schema.org/draft/2020-12/schema", "$id")]
    fn lookup_ignores_empty_fragment(iri: &str, id_keyword: &str) {
        let document = lookup(iri).expect("Embedded meta-schema");
        let declared = document[id_keyword].as_str().expect("Identifier");
        assert_eq!(iri::normalize(declared), iri::normalize(iri));
    }

    #[test]
    fn unknown_document() {
        assert!(lookup("https://example.com/meta").is_none());
    }
}
