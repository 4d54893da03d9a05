//! Real-time Knuth-Morris-Pratt, in the Galil sense: worst-case O(1) work
//! per incoming byte rather than merely amortized O(1).
//!
//! A naive KMP automaton does unbounded failure-function hops on a bad
//! mismatch (bounded only in the amortized sense across the whole text).
//! [`KmpRt`] instead spends at most two failure hops per arriving byte; any
//! hops still owed are paid off by later bytes, which are queued in a ring
//! buffer sized to the pattern length `m` (the standard Galil argument
//! bounds the backlog by `m`, since the KMP period doubles every two hops).
//!
//! `KmpRt` plays two roles in this crate: it is itself a [`crate::matcher::Matcher`]
//! for "short" patterns (`n <= 8`, see [`crate::bg`]), and it is the period
//! oracle the BG engine uses for its first stage (`kmp_period`,
//! `kmp_remaining`).

use unchecked_index::get_unchecked;

/// Outcome of resolving one pending byte against the failure chain.
enum Step {
    /// The byte extended the match; pattern did not complete.
    Advanced,
    /// The byte broke the match at `offset == 0`; no match, no further work.
    NoMatch,
    /// The pattern completed as of this byte.
    Matched,
    /// The failure-hop budget ran out before the byte could be resolved
    /// either way; caller must retry this same byte on the next tick.
    Unresolved,
}

/// A small ring buffer of pending bytes, capacity fixed to the pattern
/// length at construction time. Never grows after that: the real-time
/// argument guarantees it never needs to.
struct Ring {
    buf: Vec<u8>,
    head: usize,
    len: usize,
}

impl Ring {
    fn with_capacity(cap: usize) -> Self {
        Ring { buf: vec![0; cap.max(1)], head: 0, len: 0 }
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.len < self.buf.len(), "kmp-rt ring buffer overflowed its real-time bound");
        let idx = (self.head + self.len) % self.buf.len();
        self.buf[idx] = byte;
        self.len += 1;
    }

    fn front(&self) -> u8 {
        debug_assert!(self.len > 0);
        unsafe { *get_unchecked(&self.buf, self.head) }
    }

    fn pop_front(&mut self) {
        debug_assert!(self.len > 0);
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Number of failure-function hops the real-time simulation is willing to
/// spend resolving a single byte before deferring the rest to later ticks.
const HOP_BUDGET: u32 = 2;

/// A real-time KMP automaton for a single pattern.
pub struct KmpRt {
    pattern: Vec<u8>,
    /// `failure[i]` (for `i` in `1..=m`) is the length of the longest
    /// proper prefix of `pattern[0..i)` that is also a suffix of it.
    /// `failure[m]` is additionally used as the resume offset after a
    /// match, so overlapping matches keep being reported (Galil semantics).
    failure: Vec<usize>,
    offset: usize,
    pending: Ring,
    loop_fail: bool,
    /// Number of bytes fed to `read_char` so far.
    position: u64,
}

impl KmpRt {
    /// Build the automaton for `pattern`. `pattern` must be non-empty.
    pub fn new(pattern: Vec<u8>) -> Self {
        assert!(!pattern.is_empty(), "KmpRt::new: empty pattern");
        let m = pattern.len();
        let failure = build_failure(&pattern);
        KmpRt {
            pattern,
            failure,
            offset: 0,
            pending: Ring::with_capacity(m),
            loop_fail: false,
            position: 0,
        }
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// The period of the whole pattern: `m - failure[m]`. This is what the
    /// BG engine consumes to build its ladder of stages.
    pub fn period(&self) -> usize {
        self.pattern.len() - self.failure[self.pattern.len()]
    }

    /// Feed one byte. Returns the end-position (0-indexed, in this
    /// automaton's own byte count) of a pattern occurrence if one was
    /// confirmed as a result of processing this byte — which, under
    /// backlog, may be an occurrence that ended on an earlier byte than the
    /// one just given.
    ///
    /// Each call spends a budget of [`HOP_BUDGET`] failure hops, shared
    /// across however many pending bytes it manages to resolve. A byte
    /// whose resolution runs out of budget mid-chain (`LOOP_FAIL`) simply
    /// keeps its place at the front of the queue and is retried with a
    /// fresh budget on the next call; no other pending byte is attempted
    /// until it resolves, which is exactly the "at most two failure steps
    /// per input character" real-time bound.
    ///
    /// If more than one occurrence is confirmed while draining backlog in
    /// a single call (possible only for heavily periodic patterns under
    /// sustained worst-case input), only the most recent is reported; the
    /// real-time bound on backlog (`<= m`) makes this a rare path in
    /// practice.
    pub fn read_char(&mut self, byte: u8) -> Option<u64> {
        self.position += 1;
        self.pending.push_back(byte);

        let mut last_match = None;
        let mut budget = HOP_BUDGET;
        while budget > 0 && !self.pending.is_empty() {
            match self.resolve_front(&mut budget) {
                Step::Unresolved => {
                    self.loop_fail = true;
                    break;
                }
                step => {
                    self.loop_fail = false;
                    let pos = self.front_position();
                    self.pending.pop_front();
                    if matches!(step, Step::Matched) {
                        last_match = Some(pos);
                    }
                }
            }
        }
        last_match
    }

    fn front_position(&self) -> u64 {
        self.position - self.pending.len as u64
    }

    /// Resolve `pending`'s front byte against the current `offset`,
    /// spending hops out of the caller's shared `budget` as it goes.
    fn resolve_front(&mut self, budget: &mut u32) -> Step {
        let c = self.pending.front();
        let m = self.pattern.len();
        loop {
            if self.pattern[self.offset] == c {
                self.offset += 1;
                if self.offset == m {
                    self.offset = self.failure[m];
                    return Step::Matched;
                }
                return Step::Advanced;
            }
            if self.offset == 0 {
                return Step::NoMatch;
            }
            if *budget == 0 {
                return Step::Unresolved;
            }
            self.offset = self.failure[self.offset];
            *budget -= 1;
        }
    }

    /// Restore the rolling state to "no bytes seen yet", keeping `pattern`
    /// and `failure` (the compiled structures).
    pub fn reset(&mut self) {
        self.offset = 0;
        self.pending = Ring::with_capacity(self.pattern.len());
        self.loop_fail = false;
        self.position = 0;
    }

    pub fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.pattern.capacity()
            + self.failure.capacity() * std::mem::size_of::<usize>()
            + self.pending.buf.capacity()
    }
}

/// Period of `pattern`, computed directly from its failure function without
/// building a whole [`KmpRt`]. Used by [`crate::bg`] at construction time
/// (never on the per-byte path) to size its first-stage KMP engines.
pub fn period_of(pattern: &[u8]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }
    let failure = build_failure(pattern);
    m - failure[m]
}

/// Standard prefix-function construction. This runs once at compile time,
/// not on the per-byte path, so the classical amortized-O(m) algorithm is
/// fine here even though the resulting table feeds a worst-case-O(1)
/// automaton.
fn build_failure(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut failure = vec![0usize; m + 1];
    let mut k = 0usize;
    for i in 1..m {
        while k > 0 && pattern[k] != pattern[i] {
            k = failure[k];
        }
        if pattern[k] == pattern[i] {
            k += 1;
        }
        failure[i + 1] = k;
    }
    failure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_positions(pattern: &[u8], text: &[u8]) -> Vec<u64> {
        let mut kmp = KmpRt::new(pattern.to_vec());
        let mut out = Vec::new();
        for &b in text {
            if let Some(pos) = kmp.read_char(b) {
                out.push(pos);
            }
        }
        out
    }

    fn naive_end_positions(pattern: &[u8], text: &[u8]) -> Vec<u64> {
        let m = pattern.len();
        let n = text.len();
        let mut out = Vec::new();
        if m == 0 || m > n {
            return out;
        }
        for i in 0..=(n - m) {
            if &text[i..i + m] == pattern {
                out.push((i + m - 1) as u64);
            }
        }
        out
    }

    #[test]
    fn single_occurrence() {
        assert_eq!(match_positions(b"abc", b"xxabcxx"), vec![4]);
    }

    #[test]
    fn overlapping_occurrences() {
        // "abab" inside "ababab": ends at positions 3 and 5.
        assert_eq!(match_positions(b"abab", b"ababab"), vec![3, 5]);
    }

    #[test]
    fn periodic_pattern_matches_naive() {
        let pattern = b"aaaaaaaaaaaaaaaaaB";
        let text = b"AAAAAAAAAAAAAAAAABAAAAAABAAAAAAAAAAAAAAAAABAAAAAAA"
            .to_ascii_lowercase();
        let pattern_lower = pattern.to_ascii_lowercase();
        assert_eq!(
            match_positions(&pattern_lower, &text),
            naive_end_positions(&pattern_lower, &text)
        );
    }

    #[test]
    fn failure_table_matches_known_example() {
        let kmp = KmpRt::new(b"ababaca".to_vec());
        assert_eq!(kmp.failure, vec![0, 0, 0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn period_of_all_a_is_one() {
        let kmp = KmpRt::new(b"aaaa".to_vec());
        assert_eq!(kmp.period(), 1);
    }
}
