// Padded input buffer.
//
// Block-at-a-time scanning reads full 64-byte blocks, including past the
// logical end of the input. Instead of a raw-pointer contract ("caller
// guarantees N readable bytes after the end"), the buffer owns its bytes and
// appends the padding itself, so every block access is a plain safe slice.
// Padding bytes are zero, which classifies as nothing, so the tail block
// needs no special casing downstream.

use static_assertions::const_assert;

/// Bytes consumed per scan step. Every bitmask carries one bit per block
/// byte, least-significant bit = earliest byte.
pub const BLOCK_WIDTH: usize = 64;

/// Readable, zeroed bytes guaranteed past the logical end of the input.
pub const PADDING: usize = 64;

const_assert!(PADDING >= BLOCK_WIDTH);

/// Owned input bytes plus guaranteed zero padding.
#[derive(Debug, Clone)]
pub struct PaddedBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl PaddedBuffer {
    /// Copies `data` and appends `PADDING` zero bytes.
    ///
    /// Scan positions are u32, so inputs are capped at 4 GiB.
    pub fn new(data: &[u8]) -> Self {
        debug_assert!(
            data.len() <= u32::MAX as usize,
            "input exceeds the 4 GiB position range"
        );
        let mut bytes = Vec::with_capacity(data.len() + PADDING);
        bytes.extend_from_slice(data);
        bytes.resize(data.len() + PADDING, 0);
        PaddedBuffer {
            bytes,
            len: data.len(),
        }
    }

    /// Logical input length (padding excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The input bytes, without padding.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Blocks a scan visits: `ceil(len / BLOCK_WIDTH)`, zero for empty input.
    #[inline]
    pub fn block_count(&self) -> usize {
        (self.len + BLOCK_WIDTH - 1) / BLOCK_WIDTH
    }

    /// The `i`-th block. The final block reads into the padding.
    #[inline]
    pub fn block(&self, i: usize) -> &[u8; BLOCK_WIDTH] {
        debug_assert!(i < self.block_count(), "block index out of range");
        let start = i * BLOCK_WIDTH;
        self.bytes[start..start + BLOCK_WIDTH]
            .try_into()
            .expect("padding guarantees a full block")
    }
}

impl From<&[u8]> for PaddedBuffer {
    fn from(data: &[u8]) -> Self {
        PaddedBuffer::new(data)
    }
}

impl From<&str> for PaddedBuffer {
    fn from(data: &str) -> Self {
        PaddedBuffer::new(data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_blocks() {
        let buf = PaddedBuffer::new(b"");
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.block_count(), 0);
        assert_eq!(buf.as_bytes(), b"");
    }

    #[test]
    fn test_block_count_rounds_up() {
        assert_eq!(PaddedBuffer::new(&[b'x'; 1]).block_count(), 1);
        assert_eq!(PaddedBuffer::new(&[b'x'; 63]).block_count(), 1);
        assert_eq!(PaddedBuffer::new(&[b'x'; 64]).block_count(), 1);
        assert_eq!(PaddedBuffer::new(&[b'x'; 65]).block_count(), 2);
        assert_eq!(PaddedBuffer::new(&[b'x'; 128]).block_count(), 2);
        assert_eq!(PaddedBuffer::new(&[b'x'; 129]).block_count(), 3);
    }

    #[test]
    fn test_tail_block_is_zero_padded() {
        let buf = PaddedBuffer::new(b"abc");
        let block = buf.block(0);
        assert_eq!(&block[..3], b"abc");
        assert!(block[3..].iter().all(|&b| b == 0), "padding must be zeroed");
    }

    #[test]
    fn test_blocks_partition_the_input() {
        let data: Vec<u8> = (0..150u8).collect();
        let buf = PaddedBuffer::new(&data);
        assert_eq!(buf.block_count(), 3);
        assert_eq!(&buf.block(0)[..], &data[0..64]);
        assert_eq!(&buf.block(1)[..], &data[64..128]);
        assert_eq!(&buf.block(2)[..22], &data[128..150]);
        assert!(buf.block(2)[22..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_as_bytes_excludes_padding() {
        let buf = PaddedBuffer::from("hello");
        assert_eq!(buf.as_bytes(), b"hello");
        assert_eq!(buf.len(), 5);
    }
}
