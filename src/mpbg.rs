//! Multi-pattern wrapper: fans every stream byte out to one [`Bg`] engine
//! per dictionary pattern, and reports the longest pattern that matched at
//! this byte.
//!
//! This is the only component that needs `PatternId`; a single `Bg` engine
//! knows nothing about identity, only "did my pattern just end here".

use crate::bg::{Bg, DEFAULT_PRIME};
use crate::patterns_tree::PatternId;

struct Entry {
    engine: Bg,
    id: PatternId,
    len: usize,
}

/// `create` / `add_pattern` / `compile` / `read_char` / `reset` /
/// `total_mem`, specialized to fan out across one [`Bg`] per pattern.
pub struct MpBg {
    p: u64,
    entries: Vec<Entry>,
    compiled: bool,
    next_seed: u64,
}

impl MpBg {
    pub fn new() -> Self {
        MpBg::with_prime(DEFAULT_PRIME)
    }

    pub fn with_prime(p: u64) -> Self {
        MpBg { p, entries: Vec::new(), compiled: false, next_seed: 0 }
    }

    pub fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        debug_assert!(!self.compiled, "MpBg::add_pattern called after compile");
        if bytes.is_empty() {
            return;
        }
        let seed = self.next_seed;
        self.next_seed += 1;
        self.entries.push(Entry { engine: Bg::new(bytes.to_vec(), self.p, seed), id, len: bytes.len() });
    }

    pub fn compile(&mut self) {
        self.compiled = true;
    }

    /// Feed one byte to every pattern's engine; return the id of the
    /// longest pattern among those whose occurrence ends exactly here.
    pub fn read_char(&mut self, byte: u8) -> PatternId {
        debug_assert!(self.compiled, "MpBg::read_char called before compile");
        let mut best: Option<(usize, PatternId)> = None;
        for entry in &mut self.entries {
            if entry.engine.read_char(byte) {
                if best.map_or(true, |(len, _)| entry.len > len) {
                    best = Some((entry.len, entry.id));
                }
            }
        }
        best.map_or(PatternId::NONE, |(_, id)| id)
    }

    pub fn reset(&mut self) {
        debug_assert!(self.compiled, "MpBg::reset called before compile");
        for entry in &mut self.entries {
            entry.engine.reset();
        }
    }

    pub fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>() + self.entries.iter().map(|e| e.engine.total_mem()).sum::<usize>()
    }

    /// Sum of fingerprint collisions logged across every pattern's engine,
    /// surfaced in `EngineStats` for a run's summary.
    pub fn collisions(&self) -> u64 {
        self.entries.iter().map(|e| e.engine.collisions()).sum()
    }
}

impl Default for MpBg {
    fn default() -> Self {
        MpBg::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_wins_on_shared_suffix() {
        let mut tree_ids = Vec::new();
        let _tree = crate::patterns_tree::build(
            vec![(0u32, 1u32, b"ab".to_vec()), (0u32, 2u32, b"abab".to_vec())],
            |bytes: &[u8], pid: PatternId| tree_ids.push((bytes.to_vec(), pid)),
        );
        let ab_id = tree_ids.iter().find(|(b, _)| b == b"ab").unwrap().1;
        let abab_id = tree_ids.iter().find(|(b, _)| b == b"abab").unwrap().1;

        let mut mp = MpBg::new();
        mp.add_pattern(b"ab", ab_id);
        mp.add_pattern(b"abab", abab_id);
        mp.compile();

        let mut results = Vec::new();
        for &b in b"ababab" {
            results.push(mp.read_char(b));
        }

        assert_eq!(results[1], ab_id);
        assert_eq!(results[3], abab_id);
        assert_eq!(results[5], abab_id);
    }

    #[test]
    fn empty_dictionary_never_matches() {
        let mut mp = MpBg::new();
        mp.compile();
        for &b in b"hello" {
            assert!(mp.read_char(b).is_none());
        }
    }
}
