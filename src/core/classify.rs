// Byte classifier — locates backslashes and quotes while copying a block.
//
// ## SWAR comparison
// Each 64-byte block is walked as eight u64 words (little-endian, so byte
// order matches bit order). A byte-equality test XORs the word against a
// broadcast of the needle and detects zero bytes with bit arithmetic; the
// eight per-byte flags are then gathered into one bit each by a multiply.
// No architecture intrinsics, no `unsafe`.
//
// ## Mask orientation
// Bit i of every returned mask corresponds to byte i of the block
// (least-significant bit first), matching the rest of the scanner.

use super::bitmask::trailing_zero_index;
use crate::padding::BLOCK_WIDTH;

const ONE: u64 = u64::MAX / 255; // 0x0101_0101_0101_0101
const HIGH: u64 = ONE << 7; // 0x8080_8080_8080_8080

// Scatters the eight per-byte high bits to distinct positions, landing them
// contiguously in bits 56..64. The bit spacing (8 vs 7) makes every partial
// product position unique, so the multiply never carries.
const PACK: u64 = 0x0002_0408_1020_4081;

/// Per-byte zero detector: byte i of the result is 0x80 iff byte i of `w`
/// is 0x00.
///
/// Every byte of `w | HIGH` is at least 0x80, so subtracting 0x01 per byte
/// cannot borrow across byte lanes. The shorter `(w - ONE) & !w & HIGH`
/// form does borrow, and misreports a 0x01 byte sitting directly above a
/// true zero.
#[inline]
fn zero_bytes(w: u64) -> u64 {
    !(w | (w | HIGH).wrapping_sub(ONE)) & HIGH
}

/// Gathers the eight per-byte high bits of `flags` into bits 0..8.
#[inline]
fn movemask(flags: u64) -> u64 {
    flags.wrapping_mul(PACK) >> 56
}

/// One bit per block byte equal to `needle`.
#[inline]
pub(crate) fn eq_mask(block: &[u8; BLOCK_WIDTH], needle: u8) -> u64 {
    let fill = ONE * u64::from(needle);
    let mut mask = 0u64;
    for (i, word) in block.chunks_exact(8).enumerate() {
        let w = u64::from_le_bytes(word.try_into().unwrap());
        mask |= movemask(zero_bytes(w ^ fill)) << (8 * i);
    }
    mask
}

// ---------------------------------------------------------------------------
// Block classification
// ---------------------------------------------------------------------------

/// Backslash and quote positions within one block. The two masks are
/// disjoint: a byte is at most one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockClassification {
    pub backslash: u64,
    pub quote: u64,
}

impl BlockClassification {
    /// Classifies every byte of `block` in one SWAR pass.
    #[inline]
    pub fn of(block: &[u8; BLOCK_WIDTH]) -> Self {
        let fill_backslash = ONE * u64::from(b'\\');
        let fill_quote = ONE * u64::from(b'"');
        let mut backslash = 0u64;
        let mut quote = 0u64;
        for (i, word) in block.chunks_exact(8).enumerate() {
            let w = u64::from_le_bytes(word.try_into().unwrap());
            backslash |= movemask(zero_bytes(w ^ fill_backslash)) << (8 * i);
            quote |= movemask(zero_bytes(w ^ fill_quote)) << (8 * i);
        }
        BlockClassification { backslash, quote }
    }

    /// True when a quote appears before any backslash in the block.
    ///
    /// `wrapping_sub` turns an empty backslash mask into all-ones, so any
    /// quote qualifies when there is no backslash at all.
    #[inline]
    pub fn has_quote_first(&self) -> bool {
        (self.backslash.wrapping_sub(1) & self.quote) != 0
    }

    /// True when a backslash appears before any quote in the block.
    #[inline]
    pub fn has_backslash(&self) -> bool {
        (self.quote.wrapping_sub(1) & self.backslash) != 0
    }

    /// Position of the first quote. Callers check `has_quote_first` (or the
    /// mask) before asking.
    #[inline]
    pub fn quote_index(&self) -> u32 {
        trailing_zero_index(self.quote)
    }

    /// Position of the first backslash. Callers check `has_backslash` first.
    #[inline]
    pub fn backslash_index(&self) -> u32 {
        trailing_zero_index(self.backslash)
    }
}

/// Copies `src` to `dst` and classifies every byte in the same pass.
///
/// The copy is unconditional: it happens even when the caller will cut the
/// block short at a closing quote, keeping the store off the critical path
/// of the mask computation. `src` always spans a full block; the padded
/// input buffer guarantees the final block is readable.
#[inline]
pub fn copy_and_find(src: &[u8; BLOCK_WIDTH], dst: &mut [u8; BLOCK_WIDTH]) -> BlockClassification {
    dst.copy_from_slice(src);
    BlockClassification::of(src)
}
