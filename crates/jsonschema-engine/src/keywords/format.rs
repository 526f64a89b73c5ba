//! Validator for `format` keyword.
//!
//! `format` always produces an annotation. Whether it also asserts depends on the dialect,
//! the validator options and the per-evaluation configuration, in increasing priority.
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
    sync::Arc,
};

use email_address::EmailAddress;
use fancy_regex::Regex;
use jsonschema_dialect::Draft;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use url::Url;
use uuid_simd::{parse_hyphenated, Out};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::{SchemaError, ValidationErrorKind},
    keywords::CompilationResult,
    node::Scope,
    regex_engine::RegexEngine,
    validator::{BoxedValidator, Validate},
};

static JSON_POINTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/(([^/~])|(~[01]))*)*\z").expect("Is a valid regex"));
static RELATIVE_JSON_POINTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~0|~1)*)*)\z").expect("Is a valid regex")
});
static URI_TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:(?:[^\x00-\x20"'<>%\\^`{|}]|%[0-9a-f]{2})|\{[+#./;?&=,!@|]?(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?(?:,(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?)*})*\z"#
    )
    .expect("Is a valid regex")
});
static REFERENCE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("json-schema:///").expect("Is a valid URL"));

/// A user-provided format check.
pub(crate) trait Format: Send + Sync + 'static {
    fn is_valid(&self, value: &str) -> bool;
}

impl<F> Format for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn is_valid(&self, value: &str) -> bool {
        self(value)
    }
}

fn is_valid_date(date: &str) -> bool {
    if date.len() != 10 {
        return false;
    }
    let bytes = date.as_bytes();
    // YYYY-MM-DD
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let Some(year) = parse_four_digits(&bytes[0..4]) else {
        return false;
    };
    let Some(month) = parse_two_digits(&bytes[5..7]) else {
        return false;
    };
    let Some(day) = parse_two_digits(&bytes[8..10]) else {
        return false;
    };
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days_in_month).contains(&day)
}

#[inline]
fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Decimal value of a run of ASCII digits.
#[inline]
fn parse_digits(bytes: &[u8]) -> Option<u16> {
    bytes.iter().try_fold(0_u16, |value, byte| {
        byte.is_ascii_digit()
            .then(|| value * 10 + u16::from(byte - b'0'))
    })
}

#[inline]
fn parse_four_digits(bytes: &[u8]) -> Option<u16> {
    parse_digits(&bytes[..4])
}

#[inline]
fn parse_two_digits(bytes: &[u8]) -> Option<u8> {
    parse_digits(&bytes[..2]).and_then(|value| u8::try_from(value).ok())
}

/// A leap second is only valid at 23:59:60 UTC.
fn is_leap_second_in_utc(hour: u8, minute: u8, offset_minutes: i16) -> bool {
    let utc = (i16::from(hour) * 60 + i16::from(minute) - offset_minutes).rem_euclid(24 * 60);
    utc == 23 * 60 + 59
}

fn is_valid_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    let len = bytes.len();
    // Shortest valid time is "HH:MM:SSZ"
    if len < 9 || bytes[2] != b':' || bytes[5] != b':' {
        return false;
    }
    let (Some(hour), Some(minute), Some(second)) = (
        parse_two_digits(&bytes[..2]),
        parse_two_digits(&bytes[3..5]),
        parse_two_digits(&bytes[6..8]),
    ) else {
        return false;
    };
    if hour > 23 || minute > 59 || second > 60 {
        return false;
    }
    let mut i = 8;
    if bytes[i] == b'.' {
        i += 1;
        let start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    if i == len {
        return false;
    }
    let offset_minutes = match bytes[i] {
        b'Z' | b'z' if i == len - 1 => 0,
        sign @ (b'+' | b'-') if len - i == 6 && bytes[i + 3] == b':' => {
            let (Some(offset_hour), Some(offset_minute)) = (
                parse_two_digits(&bytes[i + 1..i + 3]),
                parse_two_digits(&bytes[i + 4..i + 6]),
            ) else {
                return false;
            };
            if offset_hour > 23 || offset_minute > 59 {
                return false;
            }
            let offset = i16::from(offset_hour) * 60 + i16::from(offset_minute);
            if sign == b'+' {
                offset
            } else {
                -offset
            }
        }
        _ => return false,
    };
    second != 60 || is_leap_second_in_utc(hour, minute, offset_minutes)
}

fn is_valid_datetime(datetime: &str) -> bool {
    let Some(separator) = datetime.bytes().position(|b| b == b'T' || b == b't') else {
        return false;
    };
    let (date, time) = datetime.split_at(separator);
    is_valid_date(date) && is_valid_time(&time[1..])
}

fn is_valid_duration(duration: &str) -> bool {
    const DATE_UNITS: [u8; 4] = [b'Y', b'M', b'W', b'D'];
    const TIME_UNITS: [u8; 3] = [b'H', b'M', b'S'];

    let bytes = duration.as_bytes();
    let len = bytes.len();
    if len < 2 || bytes[0] != b'P' {
        return false;
    }
    let mut i = 1;
    let mut in_time = false;
    let mut has_component = false;
    let mut has_time_component = false;
    let mut has_weeks = false;
    // Units must appear at most once and in order
    let mut next_date_unit = 0;
    let mut next_time_unit = 0;
    while i < len {
        if bytes[i] == b'T' {
            if in_time {
                return false;
            }
            in_time = true;
            i += 1;
            continue;
        }
        let start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start || i == len {
            return false;
        }
        let unit = bytes[i];
        if in_time {
            let Some(idx) = TIME_UNITS[next_time_unit..].iter().position(|u| *u == unit) else {
                return false;
            };
            next_time_unit += idx + 1;
            has_time_component = true;
        } else {
            let Some(idx) = DATE_UNITS[next_date_unit..].iter().position(|u| *u == unit) else {
                return false;
            };
            // Weeks do not combine with other units
            if unit == b'W' {
                if has_component {
                    return false;
                }
                has_weeks = true;
            } else if has_weeks {
                return false;
            }
            next_date_unit += idx + 1;
        }
        has_component = true;
        i += 1;
    }
    has_component && (!in_time || has_time_component)
}

fn is_valid_hostname(hostname: &str) -> bool {
    let hostname = hostname.strip_suffix('.').unwrap_or(hostname);
    !hostname.is_empty()
        && hostname.len() <= 253
        && hostname.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

fn is_valid_idn_hostname(hostname: &str) -> bool {
    idna::domain_to_ascii(hostname).map_or(false, |ascii| is_valid_hostname(&ascii))
}

fn is_valid_email_with(email: &str, is_valid_domain: fn(&str) -> bool) -> bool {
    let Ok(parsed) = EmailAddress::from_str(email) else {
        return false;
    };
    let domain = parsed.domain();
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        if let Some(address) = literal.strip_prefix("IPv6:") {
            address.parse::<Ipv6Addr>().is_ok()
        } else {
            literal.parse::<Ipv4Addr>().is_ok()
        }
    } else {
        is_valid_domain(domain)
    }
}

fn is_valid_email(email: &str) -> bool {
    email.is_ascii() && is_valid_email_with(email, is_valid_hostname)
}

fn is_valid_idn_email(email: &str) -> bool {
    is_valid_email_with(email, is_valid_idn_hostname)
}

fn has_forbidden_uri_chars(value: &str) -> bool {
    value.chars().any(|c| {
        c.is_control() || matches!(c, ' ' | '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
    })
}

fn is_valid_iri(value: &str) -> bool {
    !has_forbidden_uri_chars(value) && Url::parse(value).is_ok()
}

fn is_valid_uri(value: &str) -> bool {
    value.is_ascii() && is_valid_iri(value)
}

fn is_valid_iri_reference(value: &str) -> bool {
    !has_forbidden_uri_chars(value) && REFERENCE_BASE.join(value).is_ok()
}

fn is_valid_uri_reference(value: &str) -> bool {
    value.is_ascii() && is_valid_iri_reference(value)
}

fn is_valid_ipv4(value: &str) -> bool {
    Ipv4Addr::from_str(value).is_ok()
}

fn is_valid_ipv6(value: &str) -> bool {
    Ipv6Addr::from_str(value).is_ok()
}

fn is_valid_json_pointer(value: &str) -> bool {
    JSON_POINTER_RE.is_match(value).unwrap_or(false)
}

fn is_valid_relative_json_pointer(value: &str) -> bool {
    RELATIVE_JSON_POINTER_RE.is_match(value).unwrap_or(false)
}

fn is_valid_uri_template(value: &str) -> bool {
    URI_TEMPLATE_RE.is_match(value).unwrap_or(false)
}

fn is_valid_uuid(value: &str) -> bool {
    let mut out = [0; 16];
    parse_hyphenated(value.as_bytes(), Out::from_mut(&mut out)).is_ok()
}

/// Built-in checks, available from the draft that introduced them.
fn builtin(format: &str, draft: Draft) -> Option<fn(&str) -> bool> {
    let check: fn(&str) -> bool = match format {
        "date" => is_valid_date,
        "date-time" => is_valid_datetime,
        "duration" => is_valid_duration,
        "email" => is_valid_email,
        "hostname" => is_valid_hostname,
        "idn-email" => is_valid_idn_email,
        "idn-hostname" => is_valid_idn_hostname,
        "ipv4" => is_valid_ipv4,
        "ipv6" => is_valid_ipv6,
        "iri" => is_valid_iri,
        "iri-reference" => is_valid_iri_reference,
        "json-pointer" => is_valid_json_pointer,
        "relative-json-pointer" => is_valid_relative_json_pointer,
        "time" => is_valid_time,
        "uri" => is_valid_uri,
        "uri-reference" => is_valid_uri_reference,
        "uri-template" => is_valid_uri_template,
        "uuid" => is_valid_uuid,
        _ => return None,
    };
    let since = match format {
        "json-pointer" | "uri-reference" | "uri-template" => Draft::Draft6,
        "idn-email" | "idn-hostname" | "iri" | "iri-reference" | "relative-json-pointer" => {
            Draft::Draft7
        }
        "duration" | "uuid" => Draft::Draft201909,
        _ => Draft::Draft4,
    };
    (draft >= since).then_some(check)
}

enum Check {
    Builtin(fn(&str) -> bool),
    Regex(RegexEngine),
    Custom(Arc<dyn Format>),
    /// Unknown format, only annotated.
    Unknown,
}

impl Check {
    fn is_valid(&self, value: &str) -> bool {
        match self {
            Check::Builtin(check) => check(value),
            Check::Regex(engine) => engine.compile(value).is_ok(),
            Check::Custom(format) => format.is_valid(value),
            Check::Unknown => true,
        }
    }
}

pub(crate) struct FormatValidator {
    format: String,
    check: Check,
    /// Whether the keyword asserts unless the evaluation says otherwise.
    asserts: bool,
}

impl Validate for FormatValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        ctx.annotate(scope, || Value::String(self.format.clone()));
        if let Value::String(item) = instance {
            if ctx.asserts_formats(self.asserts) && !self.check.is_valid(item) {
                return ctx.report(
                    scope,
                    instance,
                    ValidationErrorKind::Format {
                        format: self.format.clone(),
                    },
                );
            }
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let Value::String(format) = schema else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"string\""))));
    };
    let options = ctx.options();
    let asserts = options
        .validate_formats()
        .unwrap_or_else(|| ctx.dialect().asserts_formats());
    let check = if let Some(custom) = options.get_format(format) {
        Check::Custom(Arc::clone(custom))
    } else if format == "regex" {
        Check::Regex(options.regex_engine())
    } else if let Some(check) = builtin(format, ctx.draft()) {
        Check::Builtin(check)
    } else if asserts && !options.are_unknown_formats_ignored() {
        return Some(Err(SchemaError::UnknownFormat {
            format: format.clone(),
            location: ctx.location().to_string(),
        }));
    } else {
        tracing::warn!(format = %format, location = %ctx.location(), "unknown format");
        Check::Unknown
    };
    Some(Ok(Box::new(FormatValidator {
        format: format.clone(),
        check,
        asserts,
    }) as BoxedValidator))
}
