//! Typed scalar values as supplied by callers for predicates, bounds and rows.

mod cell;


use std::{cmp::Ordering, fmt};
use tabula_primitives::DataType;

pub(crate) use cell::{decode_fixed_cell, encode_fixed_cell};

///
/// Value
///
/// One non-null scalar. Null is modelled by the surrounding container
/// (`Option`, row null bitmap, `IsNull` predicate), never as a variant.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UnixtimeMicros(i64),
    Date(i32),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UnixtimeMicros(_) => DataType::UnixtimeMicros,
            Self::Date(_) => DataType::Date,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::String(_) => DataType::String,
            Self::Binary(_) => DataType::Binary,
        }
    }

    /// Return whether this value may be stored in a column of `data_type`.
    #[must_use]
    pub fn is_compatible_with(&self, data_type: DataType) -> bool {
        self.data_type() == data_type
    }

    /// Compare two values of the same data type.
    ///
    /// Returns `None` when the data types differ. Floating point values use
    /// IEEE total ordering so every value has a position.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let ordering = match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int8(a), Self::Int8(b)) => a.cmp(b),
            (Self::Int16(a), Self::Int16(b)) => a.cmp(b),
            (Self::Int32(a), Self::Int32(b)) | (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Int64(a), Self::Int64(b))
            | (Self::UnixtimeMicros(a), Self::UnixtimeMicros(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::String(a), Self::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::Binary(a), Self::Binary(b)) => a.cmp(b),
            _ => return None,
        };

        Some(ordering)
    }

    /// Widen an integer-backed value to `i64`.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int8(v) => Some(*v as i64),
            Self::Int16(v) => Some(*v as i64),
            Self::Int32(v) | Self::Date(v) => Some(*v as i64),
            Self::Int64(v) | Self::UnixtimeMicros(v) => Some(*v),
            _ => None,
        }
    }

    /// Build an integer-backed value of `data_type`, if `raw` fits.
    #[must_use]
    pub fn from_i64(data_type: DataType, raw: i64) -> Option<Self> {
        let value = match data_type {
            DataType::Int8 => Self::Int8(i8::try_from(raw).ok()?),
            DataType::Int16 => Self::Int16(i16::try_from(raw).ok()?),
            DataType::Int32 => Self::Int32(i32::try_from(raw).ok()?),
            DataType::Date => Self::Date(i32::try_from(raw).ok()?),
            DataType::Int64 => Self::Int64(raw),
            DataType::UnixtimeMicros => Self::UnixtimeMicros(raw),
            _ => return None,
        };

        Some(value)
    }

    /// Smallest representable value of `data_type`, where one exists.
    ///
    /// Byte strings have a minimum (the empty string) but no maximum; floating
    /// point types have neither, since NaN orders outside the infinities.
    #[must_use]
    pub fn type_min(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::Bool => Some(Self::Bool(false)),
            DataType::String => Some(Self::String(String::new())),
            DataType::Binary => Some(Self::Binary(Vec::new())),
            DataType::Float | DataType::Double => None,
            _ => data_type
                .integer_domain()
                .and_then(|(min, _)| Self::from_i64(data_type, min)),
        }
    }

    /// Largest representable value of `data_type`, where one exists.
    #[must_use]
    pub fn type_max(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::Bool => Some(Self::Bool(true)),
            DataType::String | DataType::Binary | DataType::Float | DataType::Double => None,
            _ => data_type
                .integer_domain()
                .and_then(|(_, max)| Self::from_i64(data_type, max)),
        }
    }

    /// Payload bytes of a variable-length value.
    #[must_use]
    pub fn var_len_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(v) => Some(v.as_bytes()),
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) | Self::Date(v) => write!(f, "{v}"),
            Self::Int64(v) | Self::UnixtimeMicros(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "\"{v}\""),
            Self::Binary(v) => {
                f.write_str("0x")?;
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}
