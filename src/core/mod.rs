// Core primitives for the string pre-scan

pub mod bitmask;
pub mod classify;
pub mod escape;
pub mod index;
pub mod strings;

pub use bitmask::{prefix_parity_scan, subtract_with_borrow, trailing_zero_index};
pub use classify::{copy_and_find, BlockClassification};
pub use escape::{EscapeScanner, EscapedBytes};
pub use index::{ContentIter, StringIndex, StringSpan};
pub use strings::{StringBlock, StringScanner};
