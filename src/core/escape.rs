// Escape-run scanner — which bytes does a backslash run consume?
//
// A run of k consecutive backslashes escapes the byte after it iff k is odd;
// inside the run, bytes alternate escape/escaped starting with escape. The
// whole classification for a 64-byte block falls out of one subtraction:
// adding a run to a constant of odd-position bits makes the borrow chain
// compute the run-length parity for every run at once.
//
// Escape parity is tracked across the entire stream, not just inside
// strings; whether a stray backslash outside a string is legal input is a
// later stage's question.

/// Bits at odd positions. Subtracting a run start from this pattern encodes
/// run parity in the borrow chain.
const ODD_BITS: u64 = 0xAAAA_AAAA_AAAA_AAAA;

/// Escape classification for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapedBytes {
    /// Bytes consumed by a preceding backslash (the `n` of `\n`, an escaped
    /// quote, an escaped backslash).
    pub escaped: u64,
    /// Backslashes acting as escape characters (the `\` of `\n`). Disjoint
    /// from `escaped`.
    pub escape: u64,
}

/// Carries backslash-run parity across block boundaries.
///
/// The carry is 1 exactly when the previous block ended with an escape
/// character whose target is byte 0 of the next block.
#[derive(Debug, Default, Clone)]
pub struct EscapeScanner {
    next_is_escaped: u64,
}

impl EscapeScanner {
    /// Classifies one block given its backslash mask.
    #[inline]
    pub fn next(&mut self, backslash: u64) -> EscapedBytes {
        if backslash == 0 {
            // Most blocks. Only the carried-in escape can mark anything.
            let escaped = self.next_is_escaped;
            self.next_is_escaped = 0;
            return EscapedBytes { escaped, escape: 0 };
        }

        // A backslash already consumed by the carry cannot start a run.
        let potential_escape = backslash & !self.next_is_escaped;

        // Runs end up as borrow chains: each run subtracted from ODD_BITS
        // flips exactly the bits whose distance from the run start is even,
        // which is the alternation we want. The subtraction must wrap: a
        // block of 64 backslashes underflows and the wrapped result is the
        // correct one.
        let maybe_escaped = potential_escape << 1;
        let even_series = (maybe_escaped | ODD_BITS).wrapping_sub(potential_escape);
        let escape_and_terminal = even_series ^ ODD_BITS;

        let escaped = escape_and_terminal ^ (backslash | self.next_is_escaped);
        let escape = escape_and_terminal & backslash;
        self.next_is_escaped = escape >> 63;
        EscapedBytes { escaped, escape }
    }
}
