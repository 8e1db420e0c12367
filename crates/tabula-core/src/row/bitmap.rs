///
/// Bitmap
///
/// Fixed-length bit set, least-significant bit first within each byte.
/// Padding bits of the last byte are always clear.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Bitmap {
    bytes: Vec<u8>,
    len: usize,
}

impl Bitmap {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; Self::byte_len(len)],
            len,
        }
    }

    /// Rebuild a bitmap of `len` bits from its encoded bytes.
    ///
    /// `bytes` must hold exactly `byte_len(len)` bytes; padding bits are cleared.
    pub(crate) fn from_bytes(bytes: &[u8], len: usize) -> Self {
        let mut bitmap = Self {
            bytes: bytes.to_vec(),
            len,
        };
        if let Some(last) = bitmap.bytes.last_mut() {
            let used = len % 8;
            if used != 0 {
                *last &= (1u8 << used) - 1;
            }
        }

        bitmap
    }

    /// Number of bytes needed to hold `len` bits.
    pub(crate) const fn byte_len(len: usize) -> usize {
        len.div_ceil(8)
    }

    pub(crate) fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        self.bytes[idx / 8] & (1 << (idx % 8)) != 0
    }

    pub(crate) fn set(&mut self, idx: usize) {
        debug_assert!(idx < self.len);
        self.bytes[idx / 8] |= 1 << (idx % 8);
    }

    pub(crate) fn clear(&mut self, idx: usize) {
        debug_assert!(idx < self.len);
        self.bytes[idx / 8] &= !(1 << (idx % 8));
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_packed_lsb_first() {
        let mut bitmap = Bitmap::new(10);
        bitmap.set(0);
        bitmap.set(9);

        assert_eq!(bitmap.as_bytes(), &[0b0000_0001, 0b0000_0010]);
        assert!(bitmap.get(9));
        assert!(!bitmap.get(8));

        bitmap.clear(0);
        assert_eq!(bitmap.as_bytes(), &[0, 0b0000_0010]);
    }

    #[test]
    fn from_bytes_masks_padding_bits() {
        let bitmap = Bitmap::from_bytes(&[0xFF], 3);

        assert_eq!(bitmap.as_bytes(), &[0b0000_0111]);
        assert_eq!(Bitmap::byte_len(0), 0);
        assert_eq!(Bitmap::byte_len(8), 1);
        assert_eq!(Bitmap::byte_len(9), 2);
    }
}
