// String scanner — which bytes sit inside quoted strings?
//
// ## Fast path
// When every quote's role matches its position (a quote right after a
// separator opens, any other quote closes), one subtraction classifies the
// whole block: each opener starts a borrow run that its closer terminates,
// and the final borrow is the carry into the next block.
//
// ## Fallback
// The position heuristic lies on inputs like `"ab,"` (a closer right after
// a separator) or `ab"cd"` (an opener mid-text). A violation is detected
// from the subtraction result itself and the block is reclassified by quote
// parity, which is correct for every input and only a few ops slower. Which
// path ran is not observable: masks, carries and errors come out identical.
//
// ## State
// Two scalars cross block boundaries: the escape scanner's run parity and
// the in-string flag (0 or 1), which doubles as the fast path's borrow.

use super::bitmask::{prefix_parity_scan, subtract_with_borrow};
use super::escape::EscapeScanner;
use crate::error::ScanError;

/// One block's string classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringBlock {
    /// Bytes inside a string, both delimiter quotes included. For an
    /// unclosed string the run extends to the end of the block.
    pub in_string: u64,
    /// Unescaped quotes. Set bits pair up open/close in position order.
    pub quote: u64,
}

/// Tracks string membership block by block.
#[derive(Debug, Default, Clone)]
pub struct StringScanner {
    escape: EscapeScanner,
    still_in_string: u64,
}

impl StringScanner {
    /// Classifies one block.
    ///
    /// `separated_values` marks value-start positions: bit i set when byte
    /// i-1 was a separator, plus bit 0 at document start. It only steers
    /// the fast path; a wrong mask diverts to the fallback, never to a
    /// wrong answer.
    #[inline]
    pub fn next(&mut self, backslash: u64, raw_quote: u64, separated_values: u64) -> StringBlock {
        let quote = self.next_unescaped_quotes(backslash, raw_quote);
        let in_string = self.next_in_string(quote, separated_values);
        StringBlock {
            // Both computations mark [open, close); OR the quotes back in so
            // both delimiters test as inside. Carries were already taken
            // from the raw masks.
            in_string: in_string | quote,
            quote,
        }
    }

    /// Scan verdict once every block has been consumed.
    pub fn finish(&self) -> Result<(), ScanError> {
        if self.still_in_string != 0 {
            return Err(ScanError::UnclosedString);
        }
        Ok(())
    }

    #[inline]
    fn next_unescaped_quotes(&mut self, backslash: u64, raw_quote: u64) -> u64 {
        raw_quote & !self.escape.next(backslash).escaped
    }

    #[inline]
    fn next_in_string(&mut self, quote: u64, separated_values: u64) -> u64 {
        // Quotes in value-start position are presumed openers, the rest
        // presumed closers.
        let lead_quote = quote & separated_values;
        let trailing_quote = quote & !lead_quote;

        let was_still_in_string = self.still_in_string;
        let in_string = subtract_with_borrow(trailing_quote, lead_quote, &mut self.still_in_string);

        // The subtraction holds only if every quote played its presumed
        // role: an opener must land inside the string it opens, a closer
        // outside the one it closes. At the first mismatched quote the
        // difference is still intact, so this test has no false negatives.
        if ((lead_quote & !in_string) | (trailing_quote & in_string)) != 0 {
            // Parity recovery. The carry joins at bit 0: starting inside a
            // string flips the running parity everywhere.
            self.still_in_string = was_still_in_string;
            let fixed = prefix_parity_scan(quote ^ self.still_in_string);
            self.still_in_string = fixed >> 63;
            return fixed;
        }

        in_string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bitmask::{prefix_parity_scan, subtract_with_borrow};
    use assert_hex::assert_eq_hex;

    const BLOCK_WIDTH: usize = 64;

    fn byte_mask(block: &[u8; BLOCK_WIDTH], needle: u8) -> u64 {
        let mut mask = 0u64;
        for (i, &b) in block.iter().enumerate() {
            if b == needle {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Drives the scanner over `input`, computing separator masks the same
    /// way the scan driver does. Returns per-block results and the verdict.
    fn scan_blocks(
        input: &[u8],
        separators: &[u8],
    ) -> (Vec<StringBlock>, Result<(), ScanError>) {
        let mut scanner = StringScanner::default();
        let mut sep_carry = 1u64; // document start is a value start
        let blocks = input
            .chunks(BLOCK_WIDTH)
            .map(|chunk| {
                let mut block = [0u8; BLOCK_WIDTH];
                block[..chunk.len()].copy_from_slice(chunk);
                let mut seps = 0u64;
                for &s in separators {
                    seps |= byte_mask(&block, s);
                }
                let separated_values = (seps << 1) | sep_carry;
                sep_carry = seps >> 63;
                scanner.next(
                    byte_mask(&block, b'\\'),
                    byte_mask(&block, b'"'),
                    separated_values,
                )
            })
            .collect();
        (blocks, scanner.finish())
    }

    #[test]
    fn test_escaped_quote_stays_inside() {
        // positions: a=0 "=1 b=2 \=3 "=4 c=5 "=6 d=7
        let (blocks, status) = scan_blocks(b"a\"b\\\"c\"d", b",:[{");
        assert_eq_hex!(blocks[0].in_string, 0b0111_1110);
        assert_eq_hex!(blocks[0].quote, (1 << 1) | (1 << 6));
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_both_delimiters_count_as_inside() {
        // positions: x=0 "=1 a=2 b=3 "=4 y=5
        let (blocks, status) = scan_blocks(b"x\"ab\"y", b",:[{");
        assert_eq_hex!(blocks[0].in_string, 0b01_1110);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_fast_path_strings_between_separators() {
        // positions: "=0 a=1 b=2 "=3 ,=4 "=5 c=6 d=7 "=8
        let (blocks, status) = scan_blocks(b"\"ab\",\"cd\"", b",:[{");
        assert_eq_hex!(blocks[0].in_string, 0b1_1110_1111);
        assert_eq_hex!(blocks[0].quote, 0b1_0010_1001);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_closer_right_after_separator_recovers() {
        // positions: "=0 a=1 b=2 ,=3 "=4 x=5 — the comma is string content,
        // so the closing quote sits in value-start position and the fast
        // path must not be trusted
        let (blocks, status) = scan_blocks(b"\"ab,\"x", b",:[{");
        assert_eq_hex!(blocks[0].in_string, 0b01_1111);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_opener_mid_text_recovers() {
        // positions: a=0 b=1 "=2 c=3 d=4 "=5 — no separator before the
        // opener, both quotes land in trailing position
        let (blocks, status) = scan_blocks(b"ab\"cd\"", b",:[{");
        assert_eq_hex!(blocks[0].in_string, 0b11_1100);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_adjacent_strings_yield_separate_runs() {
        // positions: "=0 a=1 "=2 "=3 b=4 "=5
        let (blocks, status) = scan_blocks(b"\"a\"\"b\"", b",:[{");
        assert_eq_hex!(blocks[0].in_string, 0b11_1111);
        assert_eq_hex!(blocks[0].quote, 0b10_1101);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_string_spanning_blocks_keeps_the_carry() {
        // opener at 60, content through the boundary, closer at 71
        let mut input = vec![b'x'; 60];
        input.push(b'"');
        input.extend_from_slice(&[b'a'; 10]);
        input.push(b'"');
        let (blocks, status) = scan_blocks(&input, b",:[{");
        assert_eq!(blocks.len(), 2);
        assert_eq_hex!(blocks[0].in_string, 0xF000_0000_0000_0000);
        assert_eq_hex!(blocks[1].in_string, 0xFF);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_unclosed_string_is_reported_at_finish() {
        let (_, status) = scan_blocks(b"\"abc", b",:[{");
        assert_eq!(status, Err(ScanError::UnclosedString));

        // odd quote count deep into the document
        let (_, status) = scan_blocks(b"a\"b\"c\"", b",:[{");
        assert_eq!(status, Err(ScanError::UnclosedString));
    }

    #[test]
    fn test_unclosed_string_floods_following_blocks() {
        // one opener, then two quote-free blocks: everything stays inside
        let mut input = vec![b'"'];
        input.extend_from_slice(&[b'x'; 130]);
        let (blocks, status) = scan_blocks(&input, b",:[{");
        assert_eq!(blocks.len(), 3);
        assert_eq_hex!(blocks[0].in_string, u64::MAX);
        assert_eq_hex!(blocks[1].in_string, u64::MAX);
        assert_eq_hex!(blocks[2].in_string, u64::MAX);
        assert_eq!(status, Err(ScanError::UnclosedString));
    }

    #[test]
    fn test_finish_on_fresh_scanner_is_clean() {
        assert_eq!(StringScanner::default().finish(), Ok(()));
    }

    #[test]
    fn test_escaped_backslash_before_closer() {
        // positions: "=0 a=1 \=2 \=3 "=4 — the pair of backslashes resolves
        // to a literal backslash, so the quote at 4 closes
        let (blocks, status) = scan_blocks(b"\"a\\\\\"", b",:[{");
        assert_eq_hex!(blocks[0].quote, (1 << 0) | (1 << 4));
        assert_eq_hex!(blocks[0].in_string, 0b1_1111);
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_fast_and_fallback_agree_when_the_heuristic_holds() {
        // Generated documents of the shape the fast path is built for:
        // strings between separators, openers right after a separator,
        // closers right before one. Both classifications must produce the
        // same mask and the same carry on every block.
        let mut state = 0xDEAD_BEEF_CAFE_1234u64;
        let mut rand = move |limit: u64| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % limit
        };

        for _ in 0..50 {
            let mut input = Vec::new();
            for _ in 0..rand(12) + 1 {
                input.push(b'"');
                for _ in 0..rand(40) {
                    input.push(b'a' + rand(26) as u8);
                }
                input.push(b'"');
                input.push(b',');
            }

            let mut fast_borrow = 0u64;
            let mut parity_carry = 0u64;
            let mut sep_carry = 1u64;
            for chunk in input.chunks(BLOCK_WIDTH) {
                let mut block = [0u8; BLOCK_WIDTH];
                block[..chunk.len()].copy_from_slice(chunk);
                let quote = byte_mask(&block, b'"');
                let seps = byte_mask(&block, b',');
                let separated_values = (seps << 1) | sep_carry;
                sep_carry = seps >> 63;

                let lead_quote = quote & separated_values;
                let trailing_quote = quote & !lead_quote;
                let fast = subtract_with_borrow(trailing_quote, lead_quote, &mut fast_borrow);
                let parity = prefix_parity_scan(quote ^ parity_carry);
                parity_carry = parity >> 63;

                assert_eq_hex!(fast, parity);
                assert_eq!(fast_borrow, parity_carry);
            }
        }
    }
}
