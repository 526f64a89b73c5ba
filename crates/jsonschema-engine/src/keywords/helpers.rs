use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};

use crate::{compiler, error::SchemaError, node::NodeId, paths::LocationSegment};

macro_rules! num_cmp {
    ($left:expr, $right:expr) => {
        if let Some(b) = $right.as_u64() {
            NumCmp::num_eq($left, b)
        } else if let Some(b) = $right.as_i64() {
            NumCmp::num_eq($left, b)
        } else {
            $right
                .as_f64()
                .map_or(false, |b| NumCmp::num_eq($left, b))
        }
    };
}

/// Equality of JSON values where `1` and `1.0` are the same number.
#[inline]
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Null, Value::Null) => true,
        (Value::Number(left), Value::Number(right)) => equal_numbers(left, right),
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => false,
    }
}

#[inline]
fn equal_numbers(left: &Number, right: &Number) -> bool {
    if let Some(a) = left.as_u64() {
        num_cmp!(a, right)
    } else if let Some(a) = left.as_i64() {
        num_cmp!(a, right)
    } else {
        left.as_f64().map_or(false, |a| num_cmp!(a, right))
    }
}

#[inline]
pub(crate) fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| equal(l, r))
}

#[inline]
pub(crate) fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).map_or(false, |other| equal(value, other)))
}

/// A keyword value that must be a non-negative integer, e.g. `maxLength`.
pub(crate) fn non_negative_integer(
    ctx: &compiler::Context<'_, '_>,
    value: &Value,
) -> Result<u64, SchemaError> {
    if let Some(value) = value.as_u64() {
        return Ok(value);
    }
    if let Some(float) = value.as_f64() {
        if float >= 0.0 && float.trunc() == float && float <= u64::MAX as f64 {
            // Precision loss is only possible beyond 2^53
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Ok(float as u64);
        }
    }
    Err(ctx.invalid(format!("{value} is not a non-negative integer")))
}

/// A keyword value that must be an array of schemas, e.g. `allOf`. Returns their nodes.
pub(crate) fn schema_array(
    ctx: &mut compiler::Context<'_, '_>,
    keyword: &str,
    value: &Value,
) -> Result<Vec<NodeId>, SchemaError> {
    let Value::Array(items) = value else {
        return Err(ctx.invalid(format!("{value} is not of type \"array\"")));
    };
    let mut nodes = Vec::with_capacity(items.len());
    for idx in 0..items.len() {
        nodes.push(ctx.subschema([LocationSegment::Property(keyword), LocationSegment::Index(idx)])?);
    }
    Ok(nodes)
}

/// A keyword value that must be an object of schemas, e.g. `properties`. Returns their nodes.
pub(crate) fn schema_map(
    ctx: &mut compiler::Context<'_, '_>,
    keyword: &str,
    value: &Value,
) -> Result<Vec<(String, NodeId)>, SchemaError> {
    let Value::Object(map) = value else {
        return Err(ctx.invalid(format!("{value} is not of type \"object\"")));
    };
    let mut nodes = Vec::with_capacity(map.len());
    for name in map.keys() {
        let node = ctx.subschema([LocationSegment::Property(keyword), LocationSegment::Property(name)])?;
        nodes.push((name.clone(), node));
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::equal;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!(1), &json!(1.0))]
    #[test_case(&json!([2]), &json!([2.0]))]
    #[test_case(&json!([-3]), &json!([-3.0]))]
    #[test_case(&json!({"a": 1}), &json!({"a": 1.0}))]
    #[test_case(&json!({"a": 1, "b": [true]}), &json!({"b": [true], "a": 1}))]
    fn are_equal(left: &Value, right: &Value) {
        assert!(equal(left, right));
    }

    #[test_case(&json!(1), &json!(2.0))]
    #[test_case(&json!([]), &json!(["foo"]))]
    #[test_case(&json!([-3]), &json!([-4.0]))]
    #[test_case(&json!({"a": 1}), &json!({"b": 1}))]
    #[test_case(&json!(false), &json!(0))]
    #[test_case(&json!(null), &json!(false))]
    fn are_not_equal(left: &Value, right: &Value) {
        assert!(!equal(left, right));
    }
}
