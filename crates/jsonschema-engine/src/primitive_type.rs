//! JSON types named by the `type` keyword.
use serde_json::Value;
use std::{convert::TryFrom, fmt};

/// For faster error handling in "type" keyword validator we have this enum, to match
/// with it instead of a string.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Null => "null",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }
    const fn bit(self) -> u8 {
        match self {
            PrimitiveType::Array => 1,
            PrimitiveType::Boolean => 1 << 1,
            PrimitiveType::Integer => 1 << 2,
            PrimitiveType::Null => 1 << 3,
            PrimitiveType::Number => 1 << 4,
            PrimitiveType::Object => 1 << 5,
            PrimitiveType::String => 1 << 6,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PrimitiveType {
    type Error = ();

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(PrimitiveType::Array),
            "boolean" => Ok(PrimitiveType::Boolean),
            "integer" => Ok(PrimitiveType::Integer),
            "null" => Ok(PrimitiveType::Null),
            "number" => Ok(PrimitiveType::Number),
            "object" => Ok(PrimitiveType::Object),
            "string" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

impl From<&Value> for PrimitiveType {
    fn from(instance: &Value) -> Self {
        match instance {
            Value::Null => PrimitiveType::Null,
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Number(_) => PrimitiveType::Number,
            Value::String(_) => PrimitiveType::String,
            Value::Array(_) => PrimitiveType::Array,
            Value::Object(_) => PrimitiveType::Object,
        }
    }
}

const ALL: [PrimitiveType; 7] = [
    PrimitiveType::Array,
    PrimitiveType::Boolean,
    PrimitiveType::Integer,
    PrimitiveType::Null,
    PrimitiveType::Number,
    PrimitiveType::Object,
    PrimitiveType::String,
];

/// Compact representation of multiple [`PrimitiveType`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveTypesBitMap {
    inner: u8,
}

impl PrimitiveTypesBitMap {
    pub(crate) const fn new() -> Self {
        Self { inner: 0 }
    }
    #[inline]
    #[must_use]
    pub(crate) const fn add_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.inner |= primitive_type.bit();
        self
    }
    #[must_use]
    pub const fn contains_type(self, primitive_type: PrimitiveType) -> bool {
        primitive_type.bit() & self.inner != 0
    }
    pub fn iter(self) -> impl Iterator<Item = PrimitiveType> {
        ALL.into_iter().filter(move |ty| self.contains_type(*ty))
    }
}

impl FromIterator<PrimitiveType> for PrimitiveTypesBitMap {
    fn from_iter<T: IntoIterator<Item = PrimitiveType>>(iter: T) -> Self {
        iter.into_iter()
            .fold(PrimitiveTypesBitMap::new(), PrimitiveTypesBitMap::add_type)
    }
}

impl fmt::Display for PrimitiveTypesBitMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, ty) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn bitmap_iteration_order() {
        let types: PrimitiveTypesBitMap = [PrimitiveType::String, PrimitiveType::Null]
            .into_iter()
            .collect();
        assert_eq!(
            types.iter().collect::<Vec<_>>(),
            vec![PrimitiveType::Null, PrimitiveType::String]
        );
        assert_eq!(types.to_string(), "[null, string]");
    }

    #[test_case(&json!(null), PrimitiveType::Null)]
    #[test_case(&json!(1), PrimitiveType::Number)]
    #[test_case(&json!("a"), PrimitiveType::String)]
    #[test_case(&json!({}), PrimitiveType::Object)]
    fn from_value(value: &Value, expected: PrimitiveType) {
        assert_eq!(PrimitiveType::from(value), expected);
    }
}
