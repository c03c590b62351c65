// stringscan - Branch-free pre-scan of quoted strings in structured text
//
// Pipeline, block by block (64 bytes, one u64 bitmask each):
// 1. Classify: backslash and quote positions (core::classify)
// 2. Escape geometry: which bytes a backslash run consumes (core::escape)
// 3. String membership: subtraction fast path + parity fallback
//    (core::strings)
// 4. Index: quote pairs become string spans (core::index, scan driver)
//
// Only two scalars cross block boundaries, so a document scans
// sequentially; separate documents scan in parallel (scan_parallel).

mod core;
mod error;
mod padding;
mod scan;

pub use crate::core::{
    copy_and_find, prefix_parity_scan, subtract_with_borrow, trailing_zero_index,
    BlockClassification, ContentIter, EscapeScanner, EscapedBytes, StringBlock, StringIndex,
    StringScanner, StringSpan,
};
pub use error::ScanError;
pub use padding::{PaddedBuffer, BLOCK_WIDTH, PADDING};
pub use scan::{scan, scan_parallel, scan_with_separators, DEFAULT_SEPARATORS};

// Opt-in allocator for standalone binaries; library consumers keep their own.
#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
