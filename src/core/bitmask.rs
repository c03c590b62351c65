// Branch-free bitmask primitives.
//
// Everything here is LSB-first: bit i of a mask corresponds to byte i of a
// 64-byte block, so "earlier in the input" means "lower bit position". Each
// helper is a handful of dependent ALU ops with no data-dependent branches.

/// Index of the lowest set bit.
///
/// Callers check the mask is nonzero first (the usual pattern pairs this
/// with a `has_*` query); zero input is a caller bug.
#[inline]
pub fn trailing_zero_index(mask: u64) -> u32 {
    debug_assert!(mask != 0, "no set bit to index");
    mask.trailing_zeros()
}

/// Full 64-bit subtraction with borrow-in and borrow-out.
///
/// `borrow` holds 0 or 1 and is updated in place with the borrow out of the
/// whole operation. `borrowing_sub` is still unstable; two `overflowing_sub`
/// steps compile to the same subtract-with-borrow sequence.
#[inline]
pub fn subtract_with_borrow(minuend: u64, subtrahend: u64, borrow: &mut u64) -> u64 {
    debug_assert!(*borrow <= 1, "borrow flag must be 0 or 1");
    let (diff, b0) = minuend.overflowing_sub(subtrahend);
    let (diff, b1) = diff.overflowing_sub(*borrow);
    *borrow = (b0 | b1) as u64;
    diff
}

/// Running parity: bit i of the result is the XOR of all input bits at
/// positions `0..=i`.
///
/// The cascade is 6 dependent XOR+shift ops (~6 cycles), comparable to a
/// single CLMUL/PMULL instruction (~3-4 cycle latency + setup). Using the
/// portable version keeps the scanner free of `unsafe`.
#[inline]
pub fn prefix_parity_scan(mut x: u64) -> u64 {
    x ^= x << 1;
    x ^= x << 2;
    x ^= x << 4;
    x ^= x << 8;
    x ^= x << 16;
    x ^= x << 32;
    x
}
