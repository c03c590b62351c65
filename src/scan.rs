// Scan driver — whole documents in, string indexes out.
//
// Drives the block pipeline over a padded buffer: classify the block, build
// the value-start mask from the separator set, feed the string scanner, and
// pair successive quote bits into spans. One document is inherently
// sequential (two scalars of carry chain every block into the next); across
// documents nothing is shared, so the parallel entry point is a plain
// data-parallel map with no locking.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::classify::{eq_mask, BlockClassification};
use crate::core::index::{StringIndex, StringSpan};
use crate::core::strings::StringScanner;
use crate::error::ScanError;
use crate::padding::{PaddedBuffer, BLOCK_WIDTH};

/// Bytes whose follower is presumed to start a value.
///
/// A quote right after one of these (or at document start) is treated as an
/// opener by the fast path. Purely a performance heuristic: any set gives
/// correct results, a fitting set keeps more blocks off the parity
/// fallback. The default covers minified structured text; inputs with
/// whitespace before their openers still scan correctly, just slower.
pub const DEFAULT_SEPARATORS: &[u8] = b",:[{";

/// Scans one document with [`DEFAULT_SEPARATORS`].
pub fn scan(buf: &PaddedBuffer) -> Result<StringIndex, ScanError> {
    scan_with_separators(buf, DEFAULT_SEPARATORS)
}

/// Scans one document, presuming quotes right after a `separators` byte
/// open strings.
pub fn scan_with_separators(
    buf: &PaddedBuffer,
    separators: &[u8],
) -> Result<StringIndex, ScanError> {
    trace!(len = buf.len(), blocks = buf.block_count(), "scan start");

    let mut scanner = StringScanner::default();
    let mut spans = Vec::with_capacity(buf.len() / 32 + 4);
    let mut open: Option<u32> = None;
    let mut sep_carry = 1u64; // document start is a value start

    for i in 0..buf.block_count() {
        let block = buf.block(i);
        let class = BlockClassification::of(block);

        let mut sep_hits = 0u64;
        for &sep in separators {
            sep_hits |= eq_mask(block, sep);
        }
        let separated_values = (sep_hits << 1) | sep_carry;
        sep_carry = sep_hits >> 63;

        let strings = scanner.next(class.backslash, class.quote, separated_values);

        // Successive quote bits pair up as open/close.
        let base = (i * BLOCK_WIDTH) as u32;
        let mut quote = strings.quote;
        while quote != 0 {
            let pos = base + quote.trailing_zeros();
            match open {
                None => open = Some(pos),
                Some(start) => {
                    spans.push(StringSpan { start, end: pos });
                    open = None;
                }
            }
            quote &= quote - 1; // clear lowest set bit
        }
    }

    scanner.finish()?;
    debug_assert!(open.is_none(), "balanced quotes leave no dangling opener");
    debug!(spans = spans.len(), "scan complete");
    Ok(StringIndex {
        spans,
        input_len: buf.len() as u32,
    })
}

/// Scans many documents in parallel; one result per document, in order.
pub fn scan_parallel(bufs: &[PaddedBuffer]) -> Vec<Result<StringIndex, ScanError>> {
    bufs.par_iter().map(scan).collect()
}
