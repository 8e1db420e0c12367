//! Module: model::schema
//! Responsibility: column/table schema invariants and projection construction.
//! Does not own: catalog lookups or schema evolution.
//! Boundary: every scan and row layer resolves column names through here.

use crate::error::ErrorClass;
use std::collections::BTreeMap;
use tabula_primitives::DataType;
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },

    #[error("column index {index} out of range (schema has {num_columns} columns)")]
    ColumnIndexOutOfRange { index: usize, num_columns: usize },

    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    #[error("key column count {count} exceeds column count {num_columns}")]
    InvalidKeyColumnCount { count: usize, num_columns: usize },

    #[error("key column '{name}' must not be nullable")]
    NullableKeyColumn { name: String },

    #[error("key column '{name}' has non-keyable type {data_type}")]
    NonKeyableKeyColumn { name: String, data_type: DataType },

    #[error("key column '{name}' must not be virtual")]
    VirtualKeyColumn { name: String },
}

impl SchemaError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownColumn { .. } | Self::ColumnIndexOutOfRange { .. } => {
                ErrorClass::NotFound
            }
            _ => ErrorClass::InvalidArgument,
        }
    }
}

///
/// ColumnSchema
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnSchema {
    name: String,
    data_type: DataType,
    nullable: bool,
    is_virtual: bool,
}

impl ColumnSchema {
    /// Construct a non-nullable physical column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            is_virtual: false,
        }
    }

    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Construct a virtual column: projected by the server, never stored.
    #[must_use]
    pub fn new_virtual(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            is_virtual: true,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.is_virtual
    }
}

///
/// Schema
///
/// Ordered column list; the first `num_key_columns` columns form the primary
/// key, in key order. Projections carry no key columns.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
    num_key_columns: usize,
    name_index: BTreeMap<String, usize>,

    // Position of each column within the null bitmap (nullable columns only).
    null_slots: Vec<Option<usize>>,
    num_nullable: usize,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSchema>, num_key_columns: usize) -> Result<Self, SchemaError> {
        if num_key_columns > columns.len() {
            return Err(SchemaError::InvalidKeyColumnCount {
                count: num_key_columns,
                num_columns: columns.len(),
            });
        }

        let mut name_index = BTreeMap::new();
        for (idx, column) in columns.iter().enumerate() {
            if name_index.insert(column.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }

        for column in &columns[..num_key_columns] {
            if column.nullable {
                return Err(SchemaError::NullableKeyColumn {
                    name: column.name.clone(),
                });
            }
            if column.is_virtual {
                return Err(SchemaError::VirtualKeyColumn {
                    name: column.name.clone(),
                });
            }
            if !column.data_type.is_keyable() {
                return Err(SchemaError::NonKeyableKeyColumn {
                    name: column.name.clone(),
                    data_type: column.data_type,
                });
            }
        }

        let mut num_nullable = 0;
        let null_slots = columns
            .iter()
            .map(|column| {
                column.nullable.then(|| {
                    num_nullable += 1;
                    num_nullable - 1
                })
            })
            .collect();

        Ok(Self {
            columns,
            num_key_columns,
            name_index,
            null_slots,
            num_nullable,
        })
    }

    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, idx: usize) -> Option<&ColumnSchema> {
        self.columns.get(idx)
    }

    #[must_use]
    pub const fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn num_key_columns(&self) -> usize {
        self.num_key_columns
    }

    #[must_use]
    pub fn key_columns(&self) -> &[ColumnSchema] {
        &self.columns[..self.num_key_columns]
    }

    #[must_use]
    pub const fn num_nullable_columns(&self) -> usize {
        self.num_nullable
    }

    #[must_use]
    pub const fn has_nullables(&self) -> bool {
        self.num_nullable > 0
    }

    /// Resolve a column name to its index.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Resolve a column name to its index, failing on unknown names.
    pub fn column_index(&self, name: &str) -> Result<usize, SchemaError> {
        self.find_column(name)
            .ok_or_else(|| SchemaError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// Resolve and bounds-check a column index.
    pub fn checked_column(&self, idx: usize) -> Result<&ColumnSchema, SchemaError> {
        self.columns
            .get(idx)
            .ok_or(SchemaError::ColumnIndexOutOfRange {
                index: idx,
                num_columns: self.columns.len(),
            })
    }

    /// Null-bitmap slot of a column, or `None` when the column is not nullable.
    #[must_use]
    pub(crate) fn null_slot(&self, idx: usize) -> Option<usize> {
        self.null_slots.get(idx).copied().flatten()
    }

    /// Build a key-less schema holding exactly the named columns, in order.
    pub fn project_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, SchemaError> {
        let columns = names
            .iter()
            .map(|name| {
                let idx = self.column_index(name.as_ref())?;
                Ok(self.columns[idx].clone())
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Self::new(columns, 0)
    }

    /// Build a key-less schema holding exactly the indexed columns, in order.
    pub fn project_by_indexes(&self, indexes: &[usize]) -> Result<Self, SchemaError> {
        let columns = indexes
            .iter()
            .map(|&idx| self.checked_column(idx).cloned())
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Self::new(columns, 0)
    }

    /// Copy of this schema with one additional trailing column.
    pub fn with_appended_column(&self, column: ColumnSchema) -> Result<Self, SchemaError> {
        let mut columns = self.columns.clone();
        columns.push(column);

        Self::new(columns, self.num_key_columns)
    }
}

///
/// SchemaBuilder
///
/// Convenience builder; key columns must be added before value columns.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<ColumnSchema>,
    num_key_columns: usize,
}

impl SchemaBuilder {
    #[must_use]
    pub fn key_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns
            .insert(self.num_key_columns, ColumnSchema::new(name, data_type));
        self.num_key_columns += 1;
        self
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(ColumnSchema::new(name, data_type));
        self
    }

    #[must_use]
    pub fn nullable_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns
            .push(ColumnSchema::new(name, data_type).nullable(true));
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.columns, self.num_key_columns)
    }
}

///
/// TESTS
///
