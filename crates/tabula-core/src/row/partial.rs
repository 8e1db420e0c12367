//! Module: row::partial
//! Responsibility: sparse, typed staging of one row's column values.
//! Does not own: the wire layout (see `row::operation`).
//! Boundary: values are validated here, at assignment, never at encode time.

use crate::{
    key::KeyEncodeError,
    model::{ColumnSchema, Schema, SchemaError},
    row::{RowError, bitmap::Bitmap},
    value::{Value, decode_fixed_cell, encode_fixed_cell},
};
use std::{collections::BTreeMap, sync::Arc};

///
/// ColumnRef
///
/// Anything that names a column of a row: its index or its name.
///

pub trait ColumnRef {
    fn resolve(&self, schema: &Schema) -> Result<usize, SchemaError>;
}

impl ColumnRef for usize {
    fn resolve(&self, schema: &Schema) -> Result<usize, SchemaError> {
        schema.checked_column(*self).map(|_| *self)
    }
}

impl ColumnRef for &str {
    fn resolve(&self, schema: &Schema) -> Result<usize, SchemaError> {
        schema.column_index(self)
    }
}

///
/// Cell
///
/// Staged state of one column.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Unset,
    Null,
    Value(Value),
}

impl Cell {
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset | Self::Null => None,
        }
    }
}

///
/// PartialRow
///
/// A row where each column is unset, null, or holds a typed value.
///
/// Fixed-width values live in one contiguous buffer at per-column offsets in
/// schema order; string and binary values are held out of line until the row
/// is encoded.
///

#[derive(Clone, Debug, PartialEq)]
pub struct PartialRow {
    schema: Arc<Schema>,
    isset: Bitmap,
    nulls: Bitmap,
    fixed: Vec<u8>,
    fixed_offsets: Vec<Option<usize>>,
    varlen: BTreeMap<usize, Value>,
}

impl PartialRow {
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        let mut fixed_len = 0;
        let fixed_offsets = schema
            .columns()
            .iter()
            .map(|column| {
                let data_type = column.data_type();
                (!data_type.is_variable_length()).then(|| {
                    let offset = fixed_len;
                    fixed_len += data_type.fixed_width();
                    offset
                })
            })
            .collect();

        Self {
            isset: Bitmap::new(schema.num_columns()),
            nulls: Bitmap::new(schema.num_nullable_columns()),
            fixed: vec![0; fixed_len],
            fixed_offsets,
            varlen: BTreeMap::new(),
            schema,
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn set_bool(&mut self, column: impl ColumnRef, value: bool) -> Result<(), RowError> {
        self.set_value(column, Value::Bool(value))
    }

    pub fn set_i8(&mut self, column: impl ColumnRef, value: i8) -> Result<(), RowError> {
        self.set_value(column, Value::Int8(value))
    }

    pub fn set_i16(&mut self, column: impl ColumnRef, value: i16) -> Result<(), RowError> {
        self.set_value(column, Value::Int16(value))
    }

    pub fn set_i32(&mut self, column: impl ColumnRef, value: i32) -> Result<(), RowError> {
        self.set_value(column, Value::Int32(value))
    }

    pub fn set_i64(&mut self, column: impl ColumnRef, value: i64) -> Result<(), RowError> {
        self.set_value(column, Value::Int64(value))
    }

    pub fn set_unixtime_micros(
        &mut self,
        column: impl ColumnRef,
        micros: i64,
    ) -> Result<(), RowError> {
        self.set_value(column, Value::UnixtimeMicros(micros))
    }

    /// Set a date column to a day offset from the Unix epoch.
    pub fn set_date(&mut self, column: impl ColumnRef, days: i32) -> Result<(), RowError> {
        self.set_value(column, Value::Date(days))
    }

    pub fn set_f32(&mut self, column: impl ColumnRef, value: f32) -> Result<(), RowError> {
        self.set_value(column, Value::Float(value))
    }

    pub fn set_f64(&mut self, column: impl ColumnRef, value: f64) -> Result<(), RowError> {
        self.set_value(column, Value::Double(value))
    }

    pub fn set_string(
        &mut self,
        column: impl ColumnRef,
        value: impl Into<String>,
    ) -> Result<(), RowError> {
        self.set_value(column, Value::String(value.into()))
    }

    pub fn set_binary(
        &mut self,
        column: impl ColumnRef,
        value: impl Into<Vec<u8>>,
    ) -> Result<(), RowError> {
        self.set_value(column, Value::Binary(value.into()))
    }

    /// Assign a typed value; the value's type must match the column exactly.
    pub fn set_value(&mut self, column: impl ColumnRef, value: Value) -> Result<(), RowError> {
        let idx = column.resolve(&self.schema)?;
        let col = self.column_schema(idx);

        if !value.is_compatible_with(col.data_type()) {
            return Err(RowError::TypeMismatch {
                column: col.name().to_string(),
                expected: col.data_type(),
                found: value.data_type(),
            });
        }
        if let Some(bytes) = value.var_len_bytes()
            && u32::try_from(bytes.len()).is_err()
        {
            return Err(RowError::ValueTooLarge {
                column: col.name().to_string(),
                len: bytes.len(),
            });
        }

        self.store(idx, value);

        Ok(())
    }

    /// Mark a nullable column as explicitly null.
    pub fn set_null(&mut self, column: impl ColumnRef) -> Result<(), RowError> {
        let idx = column.resolve(&self.schema)?;
        let Some(slot) = self.schema.null_slot(idx) else {
            return Err(RowError::NullNotAllowed {
                column: self.column_schema(idx).name().to_string(),
            });
        };

        self.store_null(idx, slot);

        Ok(())
    }

    /// Return a column to the unset state.
    pub fn unset(&mut self, column: impl ColumnRef) -> Result<(), RowError> {
        let idx = column.resolve(&self.schema)?;

        self.clear_value(idx);
        self.isset.clear(idx);
        if let Some(slot) = self.schema.null_slot(idx) {
            self.nulls.clear(slot);
        }

        Ok(())
    }

    pub fn is_set(&self, column: impl ColumnRef) -> Result<bool, RowError> {
        let idx = column.resolve(&self.schema)?;

        Ok(self.isset.get(idx))
    }

    pub fn is_null(&self, column: impl ColumnRef) -> Result<bool, RowError> {
        let idx = column.resolve(&self.schema)?;

        Ok(self.is_null_at(idx))
    }

    /// Current state of one column.
    pub fn cell(&self, column: impl ColumnRef) -> Result<Cell, RowError> {
        let idx = column.resolve(&self.schema)?;

        Ok(self.cell_at(idx))
    }

    /// Number of columns currently set (null or valued).
    #[must_use]
    pub fn num_set_columns(&self) -> usize {
        (0..self.schema.num_columns())
            .filter(|&idx| self.isset.get(idx))
            .count()
    }

    /// Values of every primary-key column, in key order.
    pub(crate) fn key_values(&self) -> Result<Vec<Value>, KeyEncodeError> {
        self.schema
            .key_columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.cell_at(idx)
                    .into_value()
                    .ok_or_else(|| KeyEncodeError::MissingKeyColumn {
                        column: column.name().to_string(),
                    })
            })
            .collect()
    }

    pub(crate) fn cell_at(&self, idx: usize) -> Cell {
        if !self.isset.get(idx) {
            return Cell::Unset;
        }
        if self.is_null_at(idx) {
            return Cell::Null;
        }

        match self.fixed_cell(idx) {
            Some(bytes) => Cell::Value(
                decode_fixed_cell(self.column_schema(idx).data_type(), bytes)
                    .expect("PartialRow invariant: fixed cell holds a valid value"),
            ),
            None => self
                .varlen
                .get(&idx)
                .cloned()
                .map_or(Cell::Unset, Cell::Value),
        }
    }

    pub(crate) fn is_null_at(&self, idx: usize) -> bool {
        self.schema
            .null_slot(idx)
            .is_some_and(|slot| self.nulls.get(slot))
    }

    /// Fixed-width bytes of a column, or `None` for variable-length columns.
    pub(crate) fn fixed_cell(&self, idx: usize) -> Option<&[u8]> {
        let offset = self.fixed_offsets[idx]?;
        let width = self.column_schema(idx).data_type().fixed_width();

        Some(&self.fixed[offset..offset + width])
    }

    /// Out-of-line payload of a set, non-null variable-length column.
    pub(crate) fn var_len_payload(&self, idx: usize) -> Option<&[u8]> {
        self.varlen.get(&idx).and_then(Value::var_len_bytes)
    }

    pub(crate) const fn isset_bitmap(&self) -> &Bitmap {
        &self.isset
    }

    pub(crate) const fn null_bitmap(&self) -> &Bitmap {
        &self.nulls
    }

    // Mark a column null through its null-bitmap slot.
    pub(crate) fn store_null(&mut self, idx: usize, slot: usize) {
        self.clear_value(idx);
        self.isset.set(idx);
        self.nulls.set(slot);
    }

    // Store a value already checked against the column type.
    pub(crate) fn store(&mut self, idx: usize, value: Value) {
        self.isset.set(idx);
        if let Some(slot) = self.schema.null_slot(idx) {
            self.nulls.clear(slot);
        }

        match self.fixed_offsets[idx] {
            Some(offset) => {
                let mut cell = Vec::with_capacity(8);
                encode_fixed_cell(&mut cell, &value);
                self.fixed[offset..offset + cell.len()].copy_from_slice(&cell);
            }
            None => {
                self.varlen.insert(idx, value);
            }
        }
    }

    fn clear_value(&mut self, idx: usize) {
        if let Some(offset) = self.fixed_offsets[idx] {
            let width = self.column_schema(idx).data_type().fixed_width();
            self.fixed[offset..offset + width].fill(0);
        }
        self.varlen.remove(&idx);
    }

    fn column_schema(&self, idx: usize) -> &ColumnSchema {
        &self.schema.columns()[idx]
    }
}
