use crate::{
    model::{Schema, SchemaError},
    obs::{MetricsEvent, MetricsSink, with_metrics_sink},
    row::{Cell, PartialRow, RowDecodeError, RowError, WriteKind, WriteOperation},
    value::Value,
};
use proptest::prelude::*;
use std::{cell::RefCell, sync::Arc};
use tabula_primitives::DataType;

fn schema() -> Arc<Schema> {
    Arc::new(
        Schema::builder()
            .key_column("id", DataType::Int32)
            .key_column("name", DataType::String)
            .nullable_column("score", DataType::Double)
            .nullable_column("note", DataType::String)
            .column("flag", DataType::Bool)
            .nullable_column("payload", DataType::Binary)
            .build()
            .expect("schema should build"),
    )
}

fn sample_row() -> PartialRow {
    let mut row = PartialRow::new(schema());
    row.set_i32("id", 7).unwrap();
    row.set_string("name", "abc").unwrap();
    row.set_null("score").unwrap();
    row.set_bool("flag", true).unwrap();
    row
}

#[test]
fn encoded_layout_matches_the_wire_format() {
    let mut op = WriteOperation::new(WriteKind::Insert, sample_row());

    let bytes = op.encode();

    assert_eq!(
        bytes,
        vec![
            1,           // opcode
            0b0001_0111, // isset: id, name, score, flag
            0b0000_0001, // null: score
            7, 0, 0, 0,  // id
            1,           // flag
            3, 0, 0, 0, b'a', b'b', b'c', // name
        ]
    );
}

#[test]
fn size_counts_widths_and_payloads_of_valued_columns() {
    let mut op = WriteOperation::new(WriteKind::Upsert, sample_row());

    // 1 + ceil(6/8) + ceil(3/8) + id 4 + name (4 + 3) + flag 1
    assert_eq!(op.size_in_buffer(), 15);
    assert_eq!(op.encode().len(), 15);
}

#[test]
fn null_bitmap_is_omitted_without_nullable_columns() {
    let schema = Arc::new(
        Schema::builder()
            .key_column("id", DataType::Int64)
            .build()
            .unwrap(),
    );
    let mut row = PartialRow::new(schema);
    row.set_i64(0usize, -1).unwrap();
    let mut op = WriteOperation::new(WriteKind::Delete, row);

    assert_eq!(op.size_in_buffer(), 1 + 1 + 8);
    assert_eq!(op.encode()[..2], [3u8, 0b0000_0001]);
}

#[test]
fn size_is_memoized_and_the_row_is_sealed() {
    let mut op = WriteOperation::new(WriteKind::Insert, sample_row());
    assert!(!op.is_sealed());

    let first = op.size_in_buffer();

    assert!(op.is_sealed());
    assert_eq!(op.row_mut().unwrap_err(), RowError::Sealed);
    assert_eq!(op.size_in_buffer(), first);
}

#[test]
fn rows_stay_mutable_until_sealed() {
    let mut op = WriteOperation::new(WriteKind::Update, sample_row());

    op.row_mut().unwrap().set_binary("payload", vec![9, 9]).unwrap();

    assert_eq!(op.size_in_buffer(), 15 + 4 + 2);
}

#[test]
fn setters_validate_type_nullability_and_column() {
    let mut row = PartialRow::new(schema());

    assert_eq!(
        row.set_i64("id", 1),
        Err(RowError::TypeMismatch {
            column: "id".to_string(),
            expected: DataType::Int32,
            found: DataType::Int64,
        })
    );
    assert_eq!(
        row.set_null("flag"),
        Err(RowError::NullNotAllowed {
            column: "flag".to_string()
        })
    );
    assert_eq!(
        row.set_i32("missing", 1),
        Err(RowError::Schema(SchemaError::UnknownColumn {
            name: "missing".to_string()
        }))
    );
    assert!(matches!(
        row.set_i32(17usize, 1),
        Err(RowError::Schema(SchemaError::ColumnIndexOutOfRange { .. }))
    ));
    assert_eq!(row.num_set_columns(), 0);
}

#[test]
fn cells_report_unset_null_and_values() {
    let mut row = sample_row();

    assert_eq!(row.cell("id").unwrap(), Cell::Value(Value::Int32(7)));
    assert_eq!(row.cell("name").unwrap(), Cell::Value(Value::from("abc")));
    assert_eq!(row.cell("score").unwrap(), Cell::Null);
    assert_eq!(row.cell("note").unwrap(), Cell::Unset);

    row.set_f64("score", 2.5).unwrap();
    assert_eq!(row.cell(2usize).unwrap(), Cell::Value(Value::Double(2.5)));
    assert!(!row.is_null("score").unwrap());

    row.unset("score").unwrap();
    assert!(!row.is_set("score").unwrap());
    assert_eq!(row.num_set_columns(), 3);
}

#[test]
fn decode_inverts_encode_for_the_sample_row() {
    let mut op = WriteOperation::new(WriteKind::InsertIgnore, sample_row());
    let bytes = op.encode();

    let decoded = WriteOperation::decode(schema(), &bytes).unwrap();

    assert_eq!(decoded.kind(), WriteKind::InsertIgnore);
    assert_eq!(decoded.row(), &sample_row());
    assert!(!decoded.is_sealed());
}

#[test]
fn decode_rejects_malformed_input() {
    let mut op = WriteOperation::new(WriteKind::Insert, sample_row());
    let bytes = op.encode();

    let mut bad_opcode = bytes.clone();
    bad_opcode[0] = 4;
    assert_eq!(
        WriteOperation::decode(schema(), &bad_opcode),
        Err(RowDecodeError::UnknownOpcode { opcode: 4 })
    );

    let truncated = &bytes[..bytes.len() - 1];
    assert!(matches!(
        WriteOperation::decode(schema(), truncated),
        Err(RowDecodeError::Truncated { .. })
    ));

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert_eq!(
        WriteOperation::decode(schema(), &trailing),
        Err(RowDecodeError::TrailingBytes { len: 1 })
    );

    let mut null_not_set = bytes;
    null_not_set[2] |= 0b0000_0010; // note is null but unset
    assert_eq!(
        WriteOperation::decode(schema(), &null_not_set),
        Err(RowDecodeError::NullWithoutIsset {
            column: "note".to_string()
        })
    );
}

#[test]
fn sealing_and_encoding_emit_metrics_events() {
    struct Capture(RefCell<Vec<MetricsEvent>>);

    impl MetricsSink for Capture {
        fn record(&self, event: MetricsEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    let sink = Capture(RefCell::new(Vec::new()));
    with_metrics_sink(&sink, || {
        let mut op = WriteOperation::new(WriteKind::Insert, sample_row());
        op.encode();
    });

    assert_eq!(
        sink.0.into_inner(),
        vec![
            MetricsEvent::RowSealed { size: 15 },
            MetricsEvent::RowEncoded { bytes: 15 },
        ]
    );
}

fn staged<T: std::fmt::Debug + Clone>(
    value: impl Strategy<Value = T>,
) -> impl Strategy<Value = Option<Option<T>>> {
    prop::option::of(prop::option::of(value))
}

proptest! {
    #[test]
    fn decode_recovers_every_staged_column(
        opcode_idx in 0usize..WriteKind::ALL.len(),
        id in prop::option::of(any::<i32>()),
        name in prop::option::of("\\PC{0,6}"),
        score in staged(any::<f64>()),
        note in staged("\\PC{0,6}"),
        flag in prop::option::of(any::<bool>()),
        payload in staged(prop::collection::vec(any::<u8>(), 0..8)),
    ) {
        let mut row = PartialRow::new(schema());
        if let Some(v) = id {
            row.set_i32("id", v).unwrap();
        }
        if let Some(v) = name {
            row.set_string("name", v).unwrap();
        }
        match score {
            Some(Some(v)) => row.set_f64("score", v).unwrap(),
            Some(None) => row.set_null("score").unwrap(),
            None => {}
        }
        match note {
            Some(Some(v)) => row.set_string("note", v).unwrap(),
            Some(None) => row.set_null("note").unwrap(),
            None => {}
        }
        if let Some(v) = flag {
            row.set_bool("flag", v).unwrap();
        }
        match payload {
            Some(Some(v)) => row.set_binary("payload", v).unwrap(),
            Some(None) => row.set_null("payload").unwrap(),
            None => {}
        }

        let kind = WriteKind::ALL[opcode_idx];
        let mut op = WriteOperation::new(kind, row.clone());
        let size = op.size_in_buffer();
        let bytes = op.encode();
        prop_assert_eq!(bytes.len(), size);

        let decoded = WriteOperation::decode(schema(), &bytes).unwrap();
        prop_assert_eq!(decoded.kind(), kind);
        prop_assert_eq!(decoded.row(), &row);
    }
}
