use crate::model::Schema;
use std::sync::Arc;

///
/// Table
///
/// Catalog handle for one table: its name and shared schema.
/// Scan configurations and rows hold the schema through this `Arc`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    name: String,
    schema: Arc<Schema>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema: Arc::new(schema),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}
