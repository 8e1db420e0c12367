//! Module: partition
//! Responsibility: partition-key framing and partition range metadata.
//! Does not own: partition-schema definition or tablet location.
//! Boundary: partition-key bounds of a scan are expressed in these bytes.

use crate::{
    key::{KeyEncodeError, decode_key_values},
    model::Schema,
    value::Value,
};
use std::{cmp::Ordering, fmt};

/// Size of one encoded hash-bucket component in a partition key.
pub const ENCODED_BUCKET_SIZE: usize = 4;

///
/// PartitionKey
///
/// Hash-bucket components (big-endian `u32` each) followed by the encoded
/// range key. Byte order of the encoding is partition order.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct PartitionKey {
    hash_buckets: Vec<u32>,
    range_key: Vec<u8>,
}

impl PartitionKey {
    #[must_use]
    pub const fn new(hash_buckets: Vec<u32>, range_key: Vec<u8>) -> Self {
        Self {
            hash_buckets,
            range_key,
        }
    }

    /// Partition key with no hash components.
    #[must_use]
    pub const fn from_range_key(range_key: Vec<u8>) -> Self {
        Self::new(Vec::new(), range_key)
    }

    #[must_use]
    pub fn hash_buckets(&self) -> &[u32] {
        &self.hash_buckets
    }

    #[must_use]
    pub fn range_key(&self) -> &[u8] {
        &self.range_key
    }

    /// Return whether this key leaves its side of a range unbounded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hash_buckets.is_empty() && self.range_key.is_empty()
    }

    #[must_use]
    pub fn encoded(&self) -> Vec<u8> {
        let capacity = self.hash_buckets.len() * ENCODED_BUCKET_SIZE + self.range_key.len();
        let mut out = Vec::with_capacity(capacity);
        for bucket in &self.hash_buckets {
            out.extend_from_slice(&bucket.to_be_bytes());
        }
        out.extend_from_slice(&self.range_key);

        out
    }
}

///
/// Partition
///
/// One partition of a table: the `[start, end)` partition-key range it owns
/// plus the hash buckets its keys fall into. Empty start/end keys are open.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Partition {
    partition_key_start: Vec<u8>,
    partition_key_end: Vec<u8>,
    hash_buckets: Vec<u32>,
}

impl Partition {
    #[must_use]
    pub const fn new(
        partition_key_start: Vec<u8>,
        partition_key_end: Vec<u8>,
        hash_buckets: Vec<u32>,
    ) -> Self {
        Self {
            partition_key_start,
            partition_key_end,
            hash_buckets,
        }
    }

    #[must_use]
    pub fn partition_key_start(&self) -> &[u8] {
        &self.partition_key_start
    }

    #[must_use]
    pub fn partition_key_end(&self) -> &[u8] {
        &self.partition_key_end
    }

    #[must_use]
    pub fn hash_buckets(&self) -> &[u32] {
        &self.hash_buckets
    }

    /// Range-key portion of the start partition key.
    #[must_use]
    pub fn range_key_start(&self) -> &[u8] {
        self.range_key(&self.partition_key_start)
    }

    /// Range-key portion of the end partition key.
    #[must_use]
    pub fn range_key_end(&self) -> &[u8] {
        self.range_key(&self.partition_key_end)
    }

    /// Decode the start range key into key-column values.
    pub fn decoded_range_key_start(&self, schema: &Schema) -> Result<Vec<Value>, KeyEncodeError> {
        decode_key_values(schema, self.range_key_start())
    }

    /// Decode the end range key into key-column values.
    pub fn decoded_range_key_end(&self, schema: &Schema) -> Result<Vec<Value>, KeyEncodeError> {
        decode_key_values(schema, self.range_key_end())
    }

    /// Return whether this is the last partition of the table.
    #[must_use]
    pub fn is_end_partition(&self) -> bool {
        self.partition_key_end.is_empty()
    }

    /// Return whether any key in `[lower, upper)` falls in this partition.
    ///
    /// Empty `lower`/`upper` are open bounds.
    #[must_use]
    pub fn overlaps(&self, lower: &[u8], upper: &[u8]) -> bool {
        let starts_before_upper = upper.is_empty() || self.partition_key_start.as_slice() < upper;
        let ends_after_lower = self.is_end_partition() || lower < self.partition_key_end.as_slice();

        starts_before_upper && ends_after_lower
    }

    fn range_key<'a>(&self, partition_key: &'a [u8]) -> &'a [u8] {
        let buckets_len = self.hash_buckets.len() * ENCODED_BUCKET_SIZE;
        partition_key.get(buckets_len..).unwrap_or_default()
    }
}

// Partitions of one table never share a start key, so start order is total.
impl Ord for Partition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partition_key_start.cmp(&other.partition_key_start)
    }
}

impl PartialOrd for Partition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_key_or(f, &self.partition_key_start, "<start>")?;
        f.write_str(", ")?;
        write_key_or(f, &self.partition_key_end, "<end>")?;
        f.write_str(")")
    }
}

fn write_key_or(f: &mut fmt::Formatter<'_>, key: &[u8], open: &str) -> fmt::Result {
    if key.is_empty() {
        return f.write_str(open);
    }
    for byte in key {
        write!(f, "{byte:02x}")?;
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::encode_key_values;
    use tabula_primitives::DataType;

    #[test]
    fn encoded_partition_key_prefixes_hash_buckets() {
        let key = PartitionKey::new(vec![1, 258], vec![0xAA]);

        assert_eq!(key.encoded(), vec![0, 0, 0, 1, 0, 0, 1, 2, 0xAA]);
        assert!(!key.is_empty());
        assert!(PartitionKey::default().is_empty());
    }

    #[test]
    fn range_keys_strip_hash_components() {
        let start = PartitionKey::new(vec![3], vec![7, 7]).encoded();
        let partition = Partition::new(start, Vec::new(), vec![3]);

        assert_eq!(partition.range_key_start(), &[7, 7]);
        assert_eq!(partition.range_key_end(), &[] as &[u8]);
        assert!(partition.is_end_partition());
    }

    #[test]
    fn decoded_range_keys_use_the_table_key_columns() {
        let schema = Schema::builder()
            .key_column("id", DataType::Int32)
            .build()
            .unwrap();
        let range = encode_key_values(&schema, &[Value::Int32(-4)]).unwrap();
        let partition = Partition::new(range, Vec::new(), Vec::new());

        assert_eq!(
            partition.decoded_range_key_start(&schema).unwrap(),
            vec![Value::Int32(-4)]
        );
        assert!(partition.decoded_range_key_end(&schema).unwrap().is_empty());
    }

    #[test]
    fn overlap_treats_empty_keys_as_open() {
        let middle = Partition::new(vec![10], vec![20], Vec::new());

        assert!(middle.overlaps(&[], &[]));
        assert!(middle.overlaps(&[15], &[16]));
        assert!(!middle.overlaps(&[20], &[]));
        assert!(!middle.overlaps(&[], &[10]));
        assert!(middle.overlaps(&[], &[11]));
    }

    #[test]
    fn partitions_order_and_display_by_start_key() {
        let first = Partition::new(Vec::new(), vec![0x10], Vec::new());
        let second = Partition::new(vec![0x10], Vec::new(), Vec::new());

        assert!(first < second);
        assert_eq!(first.to_string(), "[<start>, 10)");
        assert_eq!(second.to_string(), "[10, <end>)");
    }
}
