//! Module: row::operation
//! Responsibility: one row mutation, its exact encoded size, and the wire codec.
//! Does not own: batching or request framing.
//! Boundary: the encoded layout is
//! `[opcode][isset][null if any nullable][fixed cells][u32 len + payload per varlen]`.

use crate::{
    model::Schema,
    obs::sink::{MetricsEvent, record},
    row::{PartialRow, RowDecodeError, RowError, WriteKind, bitmap::Bitmap},
    value::{Value, decode_fixed_cell},
};
use std::sync::Arc;
use tabula_primitives::DataType;

/// Width of the length prefix written ahead of each variable-length payload.
const VAR_LEN_PREFIX: usize = 4;

///
/// WriteOperation
///
/// A staged row plus the mutation intent it carries.
///
/// The first size query or encode seals the operation: the encoded size is
/// computed once and memoized, and the row can no longer be mutated, so the
/// memoized size always matches the bytes `encode` produces.
///

#[derive(Clone, Debug, PartialEq)]
pub struct WriteOperation {
    kind: WriteKind,
    row: PartialRow,
    sealed_size: Option<usize>,
}

impl WriteOperation {
    #[must_use]
    pub const fn new(kind: WriteKind, row: PartialRow) -> Self {
        Self {
            kind,
            row,
            sealed_size: None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> WriteKind {
        self.kind
    }

    #[must_use]
    pub const fn row(&self) -> &PartialRow {
        &self.row
    }

    /// Mutable access to the staged row, refused once sealed.
    pub fn row_mut(&mut self) -> Result<&mut PartialRow, RowError> {
        if self.sealed_size.is_some() {
            return Err(RowError::Sealed);
        }

        Ok(&mut self.row)
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed_size.is_some()
    }

    /// Freeze the row and memoize its encoded size.
    pub fn seal(&mut self) -> usize {
        if let Some(size) = self.sealed_size {
            return size;
        }

        let size = encoded_size(&self.row);
        self.sealed_size = Some(size);
        record(MetricsEvent::RowSealed { size: size as u64 });

        size
    }

    /// Exact number of bytes `encode` produces. Seals the operation.
    pub fn size_in_buffer(&mut self) -> usize {
        self.seal()
    }

    /// Encode into a fresh buffer. Seals the operation.
    pub fn encode(&mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.seal());
        self.encode_into(&mut out);

        out
    }

    /// Append the encoded operation to `out`. Seals the operation.
    pub fn encode_into(&mut self, out: &mut Vec<u8>) {
        let size = self.seal();
        let start = out.len();
        let row = &self.row;
        let schema = row.schema();

        out.push(self.kind.opcode());
        out.extend_from_slice(row.isset_bitmap().as_bytes());
        if schema.has_nullables() {
            out.extend_from_slice(row.null_bitmap().as_bytes());
        }

        for idx in valued_columns(row) {
            if let Some(cell) = row.fixed_cell(idx) {
                out.extend_from_slice(cell);
            }
        }
        for idx in valued_columns(row) {
            if let Some(payload) = row.var_len_payload(idx) {
                let len = u32::try_from(payload.len())
                    .expect("PartialRow invariant: payload length fits in u32");
                out.extend_from_slice(&len.to_le_bytes());
                out.extend_from_slice(payload);
            }
        }

        debug_assert_eq!(out.len() - start, size, "memoized size must match encoding");
        record(MetricsEvent::RowEncoded {
            bytes: (out.len() - start) as u64,
        });
    }

    /// Decode one encoded operation against `schema`.
    ///
    /// The decoded operation is unsealed.
    pub fn decode(schema: Arc<Schema>, bytes: &[u8]) -> Result<Self, RowDecodeError> {
        let mut reader = Reader::new(bytes);

        let opcode = reader.take("opcode", 1)?[0];
        let kind = WriteKind::from_opcode(opcode).ok_or(RowDecodeError::UnknownOpcode { opcode })?;

        let num_columns = schema.num_columns();
        let num_nullable = schema.num_nullable_columns();
        let isset = Bitmap::from_bytes(
            reader.take("isset bitmap", Bitmap::byte_len(num_columns))?,
            num_columns,
        );
        let nulls = if num_nullable > 0 {
            Bitmap::from_bytes(
                reader.take("null bitmap", Bitmap::byte_len(num_nullable))?,
                num_nullable,
            )
        } else {
            Bitmap::new(0)
        };

        let mut row = PartialRow::new(schema.clone());
        let mut varlen_columns = Vec::new();

        for (idx, column) in schema.columns().iter().enumerate() {
            let is_null = schema.null_slot(idx).is_some_and(|slot| nulls.get(slot));
            if !isset.get(idx) {
                if is_null {
                    return Err(RowDecodeError::NullWithoutIsset {
                        column: column.name().to_string(),
                    });
                }
                continue;
            }
            if let Some(slot) = schema.null_slot(idx).filter(|_| is_null) {
                row.store_null(idx, slot);
                continue;
            }

            let data_type = column.data_type();
            if data_type.is_variable_length() {
                varlen_columns.push(idx);
                continue;
            }

            let cell = reader.take(column.name(), data_type.fixed_width())?;
            let value = decode_fixed_cell(data_type, cell).ok_or_else(|| {
                RowDecodeError::InvalidCell {
                    column: column.name().to_string(),
                    data_type,
                }
            })?;
            row.store(idx, value);
        }

        for idx in varlen_columns {
            let column = &schema.columns()[idx];
            let prefix = reader.take(column.name(), VAR_LEN_PREFIX)?;
            let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
            let payload = reader.take(column.name(), len)?.to_vec();

            let value = match column.data_type() {
                DataType::String => {
                    Value::String(String::from_utf8(payload).map_err(|_| {
                        RowDecodeError::InvalidUtf8 {
                            column: column.name().to_string(),
                        }
                    })?)
                }
                _ => Value::Binary(payload),
            };
            row.store(idx, value);
        }

        if reader.remaining() > 0 {
            return Err(RowDecodeError::TrailingBytes {
                len: reader.remaining(),
            });
        }

        Ok(Self::new(kind, row))
    }

    /// Split into intent and row.
    #[must_use]
    pub fn into_parts(self) -> (WriteKind, PartialRow) {
        (self.kind, self.row)
    }
}

/// `1 + ceil(N/8) + ceil(M/8) + Σ width(set, non-null) + Σ payload(set, non-null varlen)`.
fn encoded_size(row: &PartialRow) -> usize {
    let schema = row.schema();
    let mut size = 1 + Bitmap::byte_len(schema.num_columns());
    if schema.has_nullables() {
        size += Bitmap::byte_len(schema.num_nullable_columns());
    }

    for idx in valued_columns(row) {
        size += schema.columns()[idx].data_type().fixed_width();
        size += row.var_len_payload(idx).map_or(0, <[u8]>::len);
    }

    size
}

// Columns that are set and not null, in schema order.
fn valued_columns(row: &PartialRow) -> impl Iterator<Item = usize> + '_ {
    (0..row.schema().num_columns())
        .filter(|&idx| row.isset_bitmap().get(idx) && !row.is_null_at(idx))
}

///
/// Reader
///

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    const fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, section: &str, len: usize) -> Result<&'a [u8], RowDecodeError> {
        let Some(chunk) = self.bytes.get(self.offset..self.offset + len) else {
            return Err(RowDecodeError::Truncated {
                section: section.to_string(),
                needed: len,
                remaining: self.remaining(),
            });
        };
        self.offset += len;

        Ok(chunk)
    }
}
