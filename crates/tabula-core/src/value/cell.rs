use crate::value::Value;
use tabula_primitives::DataType;

/// Write the little-endian fixed cell of a fixed-width value.
///
/// Variable-length values have no fixed cell; callers write their length
/// prefix and payload separately.
pub(crate) fn encode_fixed_cell(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Bool(v) => out.push(u8::from(*v)),
        Value::Int8(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int32(v) | Value::Date(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int64(v) | Value::UnixtimeMicros(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::String(_) | Value::Binary(_) => {}
    }
}

/// Decode one fixed cell of `data_type`; `bytes` must be exactly the type width.
pub(crate) fn decode_fixed_cell(data_type: DataType, bytes: &[u8]) -> Option<Value> {
    let value = match data_type {
        DataType::Bool => match bytes {
            [0] => Value::Bool(false),
            [1] => Value::Bool(true),
            _ => return None,
        },
        DataType::Int8 => Value::Int8(i8::from_le_bytes(bytes.try_into().ok()?)),
        DataType::Int16 => Value::Int16(i16::from_le_bytes(bytes.try_into().ok()?)),
        DataType::Int32 => Value::Int32(i32::from_le_bytes(bytes.try_into().ok()?)),
        DataType::Date => Value::Date(i32::from_le_bytes(bytes.try_into().ok()?)),
        DataType::Int64 => Value::Int64(i64::from_le_bytes(bytes.try_into().ok()?)),
        DataType::UnixtimeMicros => {
            Value::UnixtimeMicros(i64::from_le_bytes(bytes.try_into().ok()?))
        }
        DataType::Float => Value::Float(f32::from_le_bytes(bytes.try_into().ok()?)),
        DataType::Double => Value::Double(f64::from_le_bytes(bytes.try_into().ok()?)),
        DataType::String | DataType::Binary => return None,
    };

    Some(value)
}
