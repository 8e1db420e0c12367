use std::sync::Arc;
use tabula_core::{
    Error,
    prelude::*,
    row::{Cell, RowError},
};

fn schema() -> Result<Arc<Schema>, Error> {
    let schema = Schema::builder()
        .key_column("id", DataType::Int64)
        .column("active", DataType::Bool)
        .nullable_column("label", DataType::String)
        .nullable_column("blob", DataType::Binary)
        .nullable_column("ratio", DataType::Float)
        .build()?;

    Ok(Arc::new(schema))
}

#[test]
fn every_write_kind_round_trips_its_opcode() -> Result<(), Error> {
    let schema = schema()?;

    for kind in WriteKind::ALL {
        let mut row = PartialRow::new(Arc::clone(&schema));
        row.set_i64(0usize, 42)?;
        let mut op = WriteOperation::new(kind, row);

        let bytes = op.encode();
        assert_eq!(bytes[0], kind.opcode());

        let decoded = WriteOperation::decode(Arc::clone(&schema), &bytes)?;
        assert_eq!(decoded.kind(), kind);
        assert_eq!(decoded.row().cell("id")?, Cell::Value(Value::Int64(42)));
    }

    Ok(())
}

#[test]
fn size_follows_the_bitmap_and_payload_formula() -> Result<(), Error> {
    let schema = schema()?;
    let mut row = PartialRow::new(Arc::clone(&schema));
    row.set_i64("id", 1)?;
    row.set_bool("active", false)?;
    row.set_binary("blob", vec![1, 2, 3, 4, 5])?;
    row.set_null("label")?;

    let mut op = WriteOperation::new(WriteKind::UpsertIgnore, row);

    // 1 opcode + 1 isset + 1 null + 8 id + 1 active + (4 + 5) blob
    assert_eq!(op.size_in_buffer(), 21);
    assert_eq!(op.encode().len(), 21);

    Ok(())
}

#[test]
fn sealed_operations_reject_mutation() -> Result<(), Error> {
    let mut row = PartialRow::new(schema()?);
    row.set_i64("id", 9)?;
    let mut op = WriteOperation::new(WriteKind::Update, row);

    op.row_mut()?.set_string("label", "x")?;
    let size = op.size_in_buffer();

    assert!(matches!(op.row_mut(), Err(RowError::Sealed)));
    assert_eq!(op.size_in_buffer(), size);

    Ok(())
}
