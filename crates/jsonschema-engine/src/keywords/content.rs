//! Validators for `contentMediaType` and `contentEncoding` keywords.
//!
//! Only Draft 6 and 7 assert them. Unknown media types and encodings are not checked.
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    keywords::CompilationResult,
    node::Scope,
    validator::{BoxedValidator, Validate},
};

type DecodeFunc = fn(&str) -> Option<Vec<u8>>;
type CheckFunc = fn(&[u8]) -> bool;

fn decode_base64(value: &str) -> Option<Vec<u8>> {
    STANDARD.decode(value).ok()
}

fn is_json(value: &[u8]) -> bool {
    serde_json::from_slice::<Value>(value).is_ok()
}

fn decoder(encoding: &str) -> Option<DecodeFunc> {
    match encoding {
        "base64" => Some(decode_base64),
        _ => None,
    }
}

fn checker(media_type: &str) -> Option<CheckFunc> {
    match media_type {
        "application/json" => Some(is_json),
        _ => None,
    }
}

/// Validator for `contentMediaType`, decoding with the sibling `contentEncoding` first.
pub(crate) struct ContentMediaTypeValidator {
    media_type: String,
    check: CheckFunc,
    decode: Option<DecodeFunc>,
}

impl Validate for ContentMediaTypeValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let Value::String(item) = instance else {
            return Ok(());
        };
        let valid = match self.decode {
            // Undecodable content is reported by `contentEncoding`
            Some(decode) => decode(item).map_or(true, |bytes| (self.check)(&bytes)),
            None => (self.check)(item.as_bytes()),
        };
        if valid {
            Ok(())
        } else {
            ctx.report(
                scope,
                instance,
                ValidationErrorKind::ContentMediaType {
                    content_media_type: self.media_type.clone(),
                },
            )
        }
    }
}

/// Validator for `contentEncoding` keyword.
pub(crate) struct ContentEncodingValidator {
    encoding: String,
    decode: DecodeFunc,
}

impl Validate for ContentEncodingValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        match instance {
            Value::String(item) if (self.decode)(item).is_none() => ctx.report(
                scope,
                instance,
                ValidationErrorKind::ContentEncoding {
                    content_encoding: self.encoding.clone(),
                },
            ),
            _ => Ok(()),
        }
    }
}

#[inline]
pub(crate) fn compile_media_type(
    ctx: &mut compiler::Context<'_, '_>,
    parent: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let Value::String(media_type) = schema else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"string\""))));
    };
    let check = checker(media_type)?;
    let decode = parent
        .get("contentEncoding")
        .and_then(Value::as_str)
        .and_then(decoder);
    Some(Ok(Box::new(ContentMediaTypeValidator {
        media_type: media_type.clone(),
        check,
        decode,
    }) as BoxedValidator))
}

#[inline]
pub(crate) fn compile_content_encoding(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    let Value::String(encoding) = schema else {
        return Some(Err(ctx.invalid(format!("{schema} is not of type \"string\""))));
    };
    let decode = decoder(encoding)?;
    Some(Ok(Box::new(ContentEncodingValidator {
        encoding: encoding.clone(),
        decode,
    }) as BoxedValidator))
}
