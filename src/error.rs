// Scan errors.
//
// The pre-scan can reject an input for exactly one reason: it ended while
// still inside a string. Everything else this stage might dislike (index
// queries on empty masks, out-of-range block access) is a caller bug and is
// enforced with debug assertions, not error values.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The document ended with an unterminated string literal.
    #[error("input ended inside an unclosed string")]
    UnclosedString,
}
