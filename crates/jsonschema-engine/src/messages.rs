//! Localized error messages.
//!
//! Errors carry a message key and positional arguments. The text is rendered once, when the error
//! is created, from a template looked up in a [`MessageSource`] for the locale of the evaluation.
use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, RwLock},
};

use ahash::AHashMap;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Source of message templates.
///
/// Templates use positional `{0}`, `{1}`, ... placeholders.
pub trait MessageSource: Send + Sync + fmt::Debug {
    /// Template for `key` in `locale`, or `None` if the source has none.
    fn message(&self, key: &str, locale: &str) -> Option<Cow<'_, str>>;
}

const ROOT: &[(&str, &str)] = &[
    ("additionalItems", "must have at most {0} items"),
    (
        "additionalProperties",
        "property {0} is not defined in the schema and the schema does not allow additional properties",
    ),
    ("anyOf", "must be valid to at least one schema in 'anyOf'"),
    ("const", "must be the constant value {0}"),
    (
        "contains",
        "does not contain an element that passes the 'contains' schema",
    ),
    (
        "minContains",
        "must contain at least {0} element(s) that pass the 'contains' schema, found {1}",
    ),
    (
        "maxContains",
        "must contain at most {0} element(s) that pass the 'contains' schema, found {1}",
    ),
    ("contentEncoding", "does not match content encoding {0}"),
    ("contentMediaType", "is not a valid {0} document"),
    ("custom", "{0}"),
    (
        "dependentRequired",
        "has a missing property '{0}' which is required because '{1}' is present",
    ),
    ("enum", "does not have a value in the enumeration {0}"),
    ("exclusiveMaximum", "must have an exclusive maximum value of {0}"),
    ("exclusiveMinimum", "must have an exclusive minimum value of {0}"),
    ("false", "is not allowed by a false schema"),
    ("format", "does not match the '{0}' format"),
    ("maxItems", "must have at most {0} items"),
    ("maximum", "must have a maximum value of {0}"),
    ("maxLength", "must be at most {0} characters long"),
    ("maxProperties", "must have at most {0} properties"),
    ("minItems", "must have at least {0} items"),
    ("minimum", "must have a minimum value of {0}"),
    ("minLength", "must be at least {0} characters long"),
    ("minProperties", "must have at least {0} properties"),
    ("multipleOf", "must be multiple of {0}"),
    ("not", "must not be valid to the schema {0}"),
    (
        "oneOf.multiple",
        "must be valid to one and only one schema, but the schemas at indexes {0} are valid",
    ),
    (
        "oneOf",
        "must be valid to one and only one schema, but none are valid",
    ),
    ("pattern", "does not match the regex pattern {0}"),
    ("propertyNames", "property name '{0}' is not valid"),
    ("readOnly", "is a readonly field, it cannot be changed"),
    ("required", "required property '{0}' not found"),
    ("type", "must be of type {0}"),
    (
        "unevaluatedItems",
        "items at indexes {0} are not evaluated and the schema does not allow unevaluated items",
    ),
    (
        "unevaluatedProperties",
        "property {0} is not evaluated and the schema does not allow unevaluated properties",
    ),
    ("uniqueItems", "must have only unique items in the array"),
    ("writeOnly", "is a write-only field, it cannot appear in the data"),
];

fn root_template(key: &str) -> Option<&'static str> {
    ROOT.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, template)| *template)
}

/// Whether `tag` has the `language[-REGION]` shape, e.g. `en`, `de-CH` or `es-419`.
pub(crate) fn is_valid_locale(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let language_ok = parts.next().map_or(false, |language| {
        (2..=3).contains(&language.len()) && language.bytes().all(|b| b.is_ascii_alphabetic())
    });
    let region_ok = match parts.next() {
        None => true,
        Some(region) => {
            (region.len() == 2 && region.bytes().all(|b| b.is_ascii_alphabetic()))
                || (region.len() == 3 && region.bytes().all(|b| b.is_ascii_digit()))
        }
    };
    language_ok && region_ok && parts.next().is_none()
}

/// `de-CH`, then `de`.
fn candidates(locale: &str) -> impl Iterator<Item = &str> {
    let language = locale.split_once('-').map(|(language, _)| language);
    std::iter::once(locale).chain(language)
}

/// Message source with an English root bundle and user bundles keyed by locale tag.
///
/// Lookups walk from the most specific locale to the root bundle, e.g. `de-CH`, `de`, root.
/// Resolved templates are cached.
#[derive(Debug, Default)]
pub struct ResourceBundleMessageSource {
    bundles: AHashMap<String, AHashMap<String, String>>,
    cache: RwLock<AHashMap<(String, String), Option<Arc<str>>>>,
}

impl ResourceBundleMessageSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add templates for `locale`. Later bundles for the same locale override earlier ones.
    #[must_use]
    pub fn with_bundle<K, V>(
        mut self,
        locale: impl Into<String>,
        templates: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let bundle = self.bundles.entry(locale.into()).or_default();
        for (key, template) in templates {
            bundle.insert(key.into(), template.into());
        }
        self
    }

    fn resolve(&self, key: &str, locale: &str) -> Option<Arc<str>> {
        candidates(locale)
            .find_map(|candidate| {
                self.bundles
                    .get(candidate)
                    .and_then(|bundle| bundle.get(key))
                    .map(|template| Arc::from(template.as_str()))
            })
            .or_else(|| root_template(key).map(Arc::from))
    }
}

impl MessageSource for ResourceBundleMessageSource {
    fn message(&self, key: &str, locale: &str) -> Option<Cow<'_, str>> {
        let cache_key = (locale.to_string(), key.to_string());
        if let Some(cached) = self.cache.read().expect("Lock is poisoned").get(&cache_key) {
            return cached.as_ref().map(|template| Cow::Owned(template.to_string()));
        }
        let resolved = self.resolve(key, locale);
        let template = resolved.as_ref().map(|template| Cow::Owned(template.to_string()));
        self.cache
            .write()
            .expect("Lock is poisoned")
            .insert(cache_key, resolved);
        template
    }
}

/// Substitutes `{N}` placeholders. Unknown placeholders are kept verbatim.
pub(crate) fn format_message(template: &str, arguments: &[String]) -> String {
    let mut output = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let placeholder = &after[..end];
                match placeholder
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| arguments.get(idx))
                {
                    Some(argument) => output.push_str(argument),
                    None => {
                        output.push('{');
                        output.push_str(placeholder);
                        output.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

/// Render the message for `key`, falling back to the English root bundle when the source has
/// no template.
pub(crate) fn render(
    source: &dyn MessageSource,
    key: &str,
    locale: &str,
    arguments: &[String],
) -> String {
    match source.message(key, locale) {
        Some(template) => format_message(&template, arguments),
        None => match root_template(key) {
            Some(template) => format_message(template, arguments),
            None => format!("{key} {}", arguments.join(", ")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("must have a minimum value of {0}", &["1"], "must have a minimum value of 1")]
    #[test_case("{1} before {0}", &["a", "b"], "b before a")]
    #[test_case("missing {3}", &["a"], "missing {3}")]
    #[test_case("unbalanced {0", &["a"], "unbalanced {0")]
    #[test_case("no placeholders", &[], "no placeholders")]
    fn formats_templates(template: &str, arguments: &[&str], expected: &str) {
        let arguments: Vec<String> = arguments.iter().map(ToString::to_string).collect();
        assert_eq!(format_message(template, &arguments), expected);
    }

    #[test_case("en", true)]
    #[test_case("de-CH", true)]
    #[test_case("es-419", true)]
    #[test_case("de_CH", false)]
    #[test_case("", false)]
    #[test_case("english", false)]
    #[test_case("de-CH-x", false)]
    fn locale_tags(tag: &str, expected: bool) {
        assert_eq!(is_valid_locale(tag), expected);
    }

    #[test]
    fn locale_fallback() {
        let source = ResourceBundleMessageSource::new()
            .with_bundle("de", [("minimum", "muss mindestens {0} sein")])
            .with_bundle("de-CH", [("required", "Pflichtfeld '{0}' fehlt")]);
        assert_eq!(
            source.message("required", "de-CH").as_deref(),
            Some("Pflichtfeld '{0}' fehlt")
        );
        assert_eq!(
            source.message("minimum", "de-CH").as_deref(),
            Some("muss mindestens {0} sein")
        );
        assert_eq!(
            source.message("maximum", "de-CH").as_deref(),
            Some("must have a maximum value of {0}")
        );
        // Cached lookups return the same templates
        assert_eq!(
            source.message("minimum", "de-CH").as_deref(),
            Some("muss mindestens {0} sein")
        );
        assert_eq!(source.message("nope", "de"), None);
    }

    #[test]
    fn render_falls_back_to_root() {
        #[derive(Debug)]
        struct Empty;
        impl MessageSource for Empty {
            fn message(&self, _: &str, _: &str) -> Option<Cow<'_, str>> {
                None
            }
        }
        assert_eq!(
            render(&Empty, "required", "fr", &["id".to_string()]),
            "required property 'id' not found"
        );
    }
}
