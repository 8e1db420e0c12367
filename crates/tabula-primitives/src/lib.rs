#[macro_use]
mod macros;

use std::fmt;

///
/// DataType
///
/// Client-visible column type. Several data types may share one physical
/// representation (`Date` is an `Int32` on the wire, `String` is `Binary`).
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UnixtimeMicros,
    Date,
    Float,
    Double,
    String,
    Binary,
}

impl DataType {
    /// Return the full metadata descriptor for one data type.
    #[must_use]
    pub const fn metadata(self) -> TypeMetadata {
        data_type_registry!(metadata_from_registry, self)
    }

    #[must_use]
    pub const fn physical(self) -> PhysicalType {
        self.metadata().physical
    }

    /// Width in bytes of this type's cell in a contiguous row.
    ///
    /// Variable-length types report the width of their length prefix.
    #[must_use]
    pub const fn fixed_width(self) -> usize {
        self.metadata().fixed_width
    }

    #[must_use]
    pub const fn is_variable_length(self) -> bool {
        self.metadata().is_variable_length
    }

    /// Return whether range predicates are meaningful for this type.
    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        self.metadata().supports_ordering
    }

    /// Return whether this type may appear in a primary key.
    #[must_use]
    pub const fn is_keyable(self) -> bool {
        self.metadata().is_keyable
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        self.metadata().label
    }

    /// Inclusive integer domain of this type, for integer-backed types.
    ///
    /// Returns `None` for types whose domain is not a contiguous integer range.
    #[must_use]
    pub const fn integer_domain(self) -> Option<(i64, i64)> {
        match self {
            Self::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Int32 | Self::Date => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Int64 | Self::UnixtimeMicros => Some((i64::MIN, i64::MAX)),
            Self::Bool | Self::Float | Self::Double | Self::String | Self::Binary => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// PhysicalType
///
/// Storage representation shared by one or more data types.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PhysicalType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Binary,
}

///
/// TypeMetadata
///
/// Capability metadata shared by the schema, predicate and row layers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeMetadata {
    pub physical: PhysicalType,
    pub label: &'static str,
    pub fixed_width: usize,
    pub is_variable_length: bool,
    pub supports_ordering: bool,
    pub is_keyable: bool,
}

/// Ordered list of all data types in registry order.
pub const ALL_DATA_TYPES: [DataType; 11] = data_type_registry!(all_types_from_registry);

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_data_type_once() {
        let mut seen = ALL_DATA_TYPES.to_vec();
        seen.sort();
        seen.dedup();

        assert_eq!(seen.len(), ALL_DATA_TYPES.len());
    }

    #[test]
    fn variable_length_types_are_binary_backed() {
        for data_type in ALL_DATA_TYPES {
            if data_type.is_variable_length() {
                assert_eq!(data_type.physical(), PhysicalType::Binary);
                assert_eq!(data_type.fixed_width(), 4);
            }
        }
    }

    #[test]
    fn floating_and_bool_types_are_not_keyable() {
        assert!(!DataType::Bool.is_keyable());
        assert!(!DataType::Float.is_keyable());
        assert!(!DataType::Double.is_keyable());
        assert!(DataType::String.is_keyable());
        assert!(DataType::UnixtimeMicros.is_keyable());
    }

    #[test]
    fn integer_domains_match_physical_width() {
        assert_eq!(DataType::Int8.integer_domain(), Some((-128, 127)));
        assert_eq!(
            DataType::Date.integer_domain(),
            Some((i64::from(i32::MIN), i64::from(i32::MAX)))
        );
        assert_eq!(DataType::String.integer_domain(), None);
    }
}
