//! Module: key::ordered
//! Responsibility: per-component order-preserving byte transforms.
//! Does not own: bound merging or scan semantics.
//! Boundary: used by scan bounds, prefix promotion and partition keys.

use crate::{key::KeyEncodeError, model::Schema, value::Value};
use tabula_primitives::DataType;

const ESCAPE: u8 = 0x00;
const ESCAPED_ZERO: u8 = 0xFF;
const TERMINATOR: [u8; 2] = [0x00, 0x00];

/// Encode every value as the leading components of `schema`'s primary key.
///
/// Fewer values than key columns encode a key prefix; the prefix's bytes are a
/// byte-prefix of every full key that starts with the same values.
pub fn encode_key_values(schema: &Schema, values: &[Value]) -> Result<Vec<u8>, KeyEncodeError> {
    if values.len() > schema.num_key_columns() {
        return Err(KeyEncodeError::TooManyComponents {
            found: values.len(),
            max: schema.num_key_columns(),
        });
    }

    let mut out = Vec::new();
    for (column, value) in schema.key_columns().iter().zip(values) {
        if !value.is_compatible_with(column.data_type()) {
            return Err(KeyEncodeError::TypeMismatch {
                column: column.name().to_string(),
                expected: column.data_type(),
                found: value.data_type(),
            });
        }
        encode_key_component(&mut out, value)?;
    }

    Ok(out)
}

/// Decode an encoded key (or key prefix) back into its component values.
pub fn decode_key_values(schema: &Schema, bytes: &[u8]) -> Result<Vec<Value>, KeyEncodeError> {
    let mut values = Vec::new();
    let mut offset = 0;

    for column in schema.key_columns() {
        if offset == bytes.len() {
            break;
        }
        let value = decode_component(column.name(), column.data_type(), bytes, &mut offset)?;
        values.push(value);
    }

    if offset != bytes.len() {
        return Err(KeyEncodeError::TrailingBytes {
            len: bytes.len() - offset,
        });
    }

    Ok(values)
}

/// Append one key component so lexicographic byte order matches value order.
fn encode_key_component(out: &mut Vec<u8>, value: &Value) -> Result<(), KeyEncodeError> {
    match value {
        Value::Int8(v) => out.push(v.cast_unsigned() ^ 0x80),
        Value::Int16(v) => out.extend_from_slice(&(v.cast_unsigned() ^ (1u16 << 15)).to_be_bytes()),
        Value::Int32(v) | Value::Date(v) => {
            out.extend_from_slice(&(v.cast_unsigned() ^ (1u32 << 31)).to_be_bytes());
        }
        Value::Int64(v) | Value::UnixtimeMicros(v) => {
            out.extend_from_slice(&(v.cast_unsigned() ^ (1u64 << 63)).to_be_bytes());
        }
        Value::String(v) => push_terminated_bytes(out, v.as_bytes()),
        Value::Binary(v) => push_terminated_bytes(out, v),
        Value::Bool(_) | Value::Float(_) | Value::Double(_) => {
            return Err(KeyEncodeError::UnsupportedKeyType {
                data_type: value.data_type(),
            });
        }
    }

    Ok(())
}

// Byte strings are escaped so component boundaries remain unambiguous.
fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == ESCAPE {
            out.extend_from_slice(&[ESCAPE, ESCAPED_ZERO]);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&TERMINATOR);
}

fn decode_component(
    column: &str,
    data_type: DataType,
    bytes: &[u8],
    offset: &mut usize,
) -> Result<Value, KeyEncodeError> {
    if data_type.is_variable_length() {
        let raw = read_terminated_bytes(column, bytes, offset)?;
        return Ok(match data_type {
            DataType::String => {
                Value::String(String::from_utf8(raw).map_err(|_| KeyEncodeError::InvalidUtf8 {
                    column: column.to_string(),
                })?)
            }
            _ => Value::Binary(raw),
        });
    }

    let width = data_type.fixed_width();
    let end = *offset + width;
    let Some(chunk) = bytes.get(*offset..end) else {
        return Err(KeyEncodeError::Truncated {
            column: column.to_string(),
        });
    };
    *offset = end;

    let value = match data_type {
        DataType::Int8 => Value::Int8((chunk[0] ^ 0x80).cast_signed()),
        DataType::Int16 => {
            Value::Int16((u16::from_be_bytes([chunk[0], chunk[1]]) ^ (1u16 << 15)).cast_signed())
        }
        DataType::Int32 | DataType::Date => {
            let raw = (u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ (1u32 << 31))
                .cast_signed();
            if data_type == DataType::Date {
                Value::Date(raw)
            } else {
                Value::Int32(raw)
            }
        }
        DataType::Int64 | DataType::UnixtimeMicros => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            let raw = (u64::from_be_bytes(buf) ^ (1u64 << 63)).cast_signed();
            if data_type == DataType::UnixtimeMicros {
                Value::UnixtimeMicros(raw)
            } else {
                Value::Int64(raw)
            }
        }
        _ => return Err(KeyEncodeError::UnsupportedKeyType { data_type }),
    };

    Ok(value)
}

fn read_terminated_bytes(
    column: &str,
    bytes: &[u8],
    offset: &mut usize,
) -> Result<Vec<u8>, KeyEncodeError> {
    let mut out = Vec::new();

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(KeyEncodeError::Truncated {
                column: column.to_string(),
            });
        };
        *offset += 1;

        if byte != ESCAPE {
            out.push(byte);
            continue;
        }

        match bytes.get(*offset) {
            Some(&ESCAPE) => {
                *offset += 1;
                return Ok(out);
            }
            Some(&ESCAPED_ZERO) => {
                *offset += 1;
                out.push(ESCAPE);
            }
            Some(_) => {
                return Err(KeyEncodeError::InvalidEscape {
                    column: column.to_string(),
                });
            }
            None => {
                return Err(KeyEncodeError::Truncated {
                    column: column.to_string(),
                });
            }
        }
    }
}
