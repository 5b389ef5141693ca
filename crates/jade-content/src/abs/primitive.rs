//! Primitive leaf values.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::onto::basic;

/// The value carried by an [`AbsPrimitive`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveValue {
    /// `BO_String`.
    String(String),
    /// `BO_Boolean`.
    Boolean(bool),
    /// `BO_Integer`.
    Integer(i64),
    /// `BO_Float`.
    Float(f64),
    /// `BO_Date`.
    Date(DateTime<Utc>),
    /// `BO_Byte-sequence`.
    ByteSequence(Vec<u8>),
}

impl PrimitiveValue {
    /// Basic-ontology type name of the value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => basic::STRING,
            Self::Boolean(_) => basic::BOOLEAN,
            Self::Integer(_) => basic::INTEGER,
            Self::Float(_) => basic::FLOAT,
            Self::Date(_) => basic::DATE,
            Self::ByteSequence(_) => basic::BYTE_SEQUENCE,
        }
    }
}

// Floats compare by bit pattern so that equality stays reflexive and
// consistent with hashing.
impl PartialEq for PrimitiveValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::ByteSequence(a), Self::ByteSequence(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PrimitiveValue {}

impl Hash for PrimitiveValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::String(v) => v.hash(state),
            Self::Boolean(v) => v.hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Date(v) => v.hash(state),
            Self::ByteSequence(v) => v.hash(state),
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Date(v) => write!(f, "{}", v.to_rfc3339()),
            Self::ByteSequence(v) => write!(f, "#{}bytes", v.len()),
        }
    }
}

/// A primitive term: a string, number, boolean, date or byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsPrimitive {
    value: PrimitiveValue,
}

impl AbsPrimitive {
    /// Wrap a primitive value.
    pub const fn new(value: PrimitiveValue) -> Self {
        Self { value }
    }

    /// A `BO_String` primitive.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(PrimitiveValue::String(value.into()))
    }

    /// A `BO_Boolean` primitive.
    pub const fn boolean(value: bool) -> Self {
        Self::new(PrimitiveValue::Boolean(value))
    }

    /// A `BO_Integer` primitive.
    pub const fn integer(value: i64) -> Self {
        Self::new(PrimitiveValue::Integer(value))
    }

    /// A `BO_Float` primitive.
    pub const fn float(value: f64) -> Self {
        Self::new(PrimitiveValue::Float(value))
    }

    /// A `BO_Date` primitive.
    pub const fn date(value: DateTime<Utc>) -> Self {
        Self::new(PrimitiveValue::Date(value))
    }

    /// A `BO_Byte-sequence` primitive.
    pub const fn byte_sequence(value: Vec<u8>) -> Self {
        Self::new(PrimitiveValue::ByteSequence(value))
    }

    /// Basic-ontology type name.
    pub const fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// The wrapped value.
    pub const fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    /// String value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            PrimitiveValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean.
    pub const fn as_boolean(&self) -> Option<bool> {
        match self.value {
            PrimitiveValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value, if this is an integer.
    pub const fn as_integer(&self) -> Option<i64> {
        match self.value {
            PrimitiveValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Float value; integers widen.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self.value {
            PrimitiveValue::Float(v) => Some(v),
            PrimitiveValue::Integer(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Date value, if this is a date.
    pub const fn as_date(&self) -> Option<DateTime<Utc>> {
        match self.value {
            PrimitiveValue::Date(v) => Some(v),
            _ => None,
        }
    }

    /// Byte content, if this is a byte sequence.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            PrimitiveValue::ByteSequence(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AbsPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
