pub(crate) mod additional_items;
pub(crate) mod additional_properties;
pub(crate) mod all_of;
pub(crate) mod annotation;
pub(crate) mod any_of;
pub(crate) mod const_;
pub(crate) mod contains;
pub(crate) mod content;
pub(crate) mod custom;
pub(crate) mod dependencies;
pub(crate) mod enum_;
pub(crate) mod format;
pub(crate) mod helpers;
pub(crate) mod if_;
pub(crate) mod items;
pub(crate) mod lengths;
pub(crate) mod limits;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod pattern_properties;
pub(crate) mod properties;
pub(crate) mod property_names;
pub(crate) mod read_only;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod type_;
pub(crate) mod unevaluated_items;
pub(crate) mod unevaluated_properties;
pub(crate) mod unique_items;

use jsonschema_dialect::Draft;
use serde_json::{Map, Value};

use crate::{compiler, error::SchemaError, validator::BoxedValidator};

pub(crate) type CompilationResult = Result<BoxedValidator, SchemaError>;

type CompileFunc =
    fn(&mut compiler::Context<'_, '_>, &Map<String, Value>, &Value) -> Option<CompilationResult>;

/// The compile function of a validating keyword.
///
/// Whether a keyword is evaluated at all is decided by the dialect, this only picks the
/// semantics of the draft the dialect is based on.
pub(crate) fn get_for_draft(draft: Draft, keyword: &str) -> Option<CompileFunc> {
    match (draft, keyword) {
        // Keywords common to all drafts
        (_, "$ref") => Some(ref_::compile_ref),
        (_, "additionalItems") => Some(additional_items::compile),
        (_, "additionalProperties") => Some(additional_properties::compile),
        (_, "allOf") => Some(all_of::compile),
        (_, "anyOf") => Some(any_of::compile),
        (_, "dependencies") => Some(dependencies::compile_dependencies),
        (_, "enum") => Some(enum_::compile),
        (_, "format") => Some(format::compile),
        (_, "items") => Some(items::compile),
        (_, "maxItems" | "maxLength" | "maxProperties" | "minItems" | "minLength" | "minProperties") => {
            Some(lengths::compile)
        }
        (_, "maximum" | "minimum" | "exclusiveMaximum" | "exclusiveMinimum") => {
            Some(limits::compile)
        }
        (_, "multipleOf") => Some(multiple_of::compile),
        (_, "not") => Some(not::compile),
        (_, "oneOf") => Some(one_of::compile),
        (_, "pattern") => Some(pattern::compile),
        (_, "patternProperties") => Some(pattern_properties::compile),
        (_, "properties") => Some(properties::compile),
        (_, "readOnly") => Some(read_only::compile_read_only),
        (_, "required") => Some(required::compile_required),
        (_, "type") => Some(type_::compile),
        (_, "uniqueItems") => Some(unique_items::compile),
        (_, "writeOnly") => Some(read_only::compile_write_only),
        (_, "discriminator") => Some(one_of::compile_discriminator),

        // Draft 6 and later
        (Draft::Draft6 | Draft::Draft7 | Draft::Draft201909 | Draft::Draft202012, "const") => {
            Some(const_::compile)
        }
        (Draft::Draft6 | Draft::Draft7 | Draft::Draft201909 | Draft::Draft202012, "contains") => {
            Some(contains::compile)
        }
        (
            Draft::Draft6 | Draft::Draft7 | Draft::Draft201909 | Draft::Draft202012,
            "propertyNames",
        ) => Some(property_names::compile),

        // Draft 6 and 7 specific
        (Draft::Draft6 | Draft::Draft7, "contentMediaType") => Some(content::compile_media_type),
        (Draft::Draft6 | Draft::Draft7, "contentEncoding") => {
            Some(content::compile_content_encoding)
        }

        // Draft 7 and later
        (Draft::Draft7 | Draft::Draft201909 | Draft::Draft202012, "if") => Some(if_::compile),

        // Draft 2019-09 and later
        (Draft::Draft201909 | Draft::Draft202012, "dependentRequired") => {
            Some(required::compile_dependent_required)
        }
        (Draft::Draft201909 | Draft::Draft202012, "dependentSchemas") => {
            Some(dependencies::compile_dependent_schemas)
        }
        (Draft::Draft201909 | Draft::Draft202012, "unevaluatedItems") => {
            Some(unevaluated_items::compile)
        }
        (Draft::Draft201909 | Draft::Draft202012, "unevaluatedProperties") => {
            Some(unevaluated_properties::compile)
        }

        // Draft 2019-09 specific
        (Draft::Draft201909, "$recursiveRef") => Some(ref_::compile_recursive_ref),

        // Draft 2020-12 specific
        (Draft::Draft202012, "$dynamicRef") => Some(ref_::compile_dynamic_ref),
        (Draft::Draft202012, "prefixItems") => Some(items::compile_prefix_items),

        (_, _) => None,
    }
}
