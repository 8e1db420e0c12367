//! Runtime data model definitions.
//!
//! This module contains the client-side view of catalog concepts: column
//! schemas, table schemas, and the table handle a scan or write is bound to.
//! The catalog itself is external; types here are handed to us fully formed
//! and only validated for the invariants the client relies on.
//!
//! In general:
//! - the catalog defines *what exists*
//! - `model` defines *what the client encodes against*

mod schema;
mod table;

pub use schema::{ColumnSchema, Schema, SchemaBuilder, SchemaError};
pub use table::Table;
