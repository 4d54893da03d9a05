//! Aho-Corasick reference engine: the harness's oracle.
//!
//! Two variants share the same construction idea (a trie over dictionary
//! patterns, failure links set by breadth-first traversal, and an `output`
//! link precomputed per state so `read_char` never has to chase more than
//! one failure chain to discover "the longest dictionary pattern ending
//! here"): [`AhoCorasick`] stores each state's transitions in a dense
//! 256-entry table (fast, memory-heavy); [`AhoCorasickLowMem`] stores them
//! as a linked sibling list (memory-frugal, a linear scan per transition).
//!
//! Follows the classical multi-pattern Aho-Corasick construction: trie, then
//! BFS failure links, then output compression.

use crate::patterns_tree::PatternId;

const NONE: u32 = u32::MAX;
const ROOT: u32 = 0;

// --- Dense (full) variant ----------------------------------------------

struct BuildNode {
    children: [u32; 256],
    terminal: PatternId,
}

impl BuildNode {
    fn new() -> Self {
        BuildNode { children: [NONE; 256], terminal: PatternId::NONE }
    }
}

struct State {
    children: [u32; 256],
    fail: u32,
    output: PatternId,
}

/// Full Aho-Corasick automaton: every state carries a dense 256-way
/// transition table. `read_char` still walks failure links at read time when
/// a transition is missing (see `read_char` below); only the representation
/// of a state's transitions differs from the *low-memory* variant, not
/// whether the walk happens.
pub struct AhoCorasick {
    building: Vec<BuildNode>,
    states: Vec<State>,
    compiled: bool,
    current: u32,
}

impl AhoCorasick {
    pub fn new() -> Self {
        AhoCorasick { building: vec![BuildNode::new()], states: Vec::new(), compiled: false, current: ROOT }
    }

    pub fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        debug_assert!(!self.compiled, "AhoCorasick::add_pattern called after compile");
        if bytes.is_empty() {
            return;
        }
        let mut node = ROOT;
        for &b in bytes {
            let next = self.building[node as usize].children[b as usize];
            if next == NONE {
                self.building.push(BuildNode::new());
                let new_idx = (self.building.len() - 1) as u32;
                self.building[node as usize].children[b as usize] = new_idx;
                node = new_idx;
            } else {
                node = next;
            }
        }
        self.building[node as usize].terminal = id;
    }

    pub fn compile(&mut self) {
        debug_assert!(!self.compiled, "AhoCorasick::compile called twice");
        let n = self.building.len();
        let mut states: Vec<State> =
            (0..n).map(|i| State { children: self.building[i].children, fail: ROOT, output: self.building[i].terminal }).collect();

        // Root's missing edges self-loop, so the per-character walk never
        // needs a separate "did we reach root" check.
        for c in 0..256usize {
            if states[ROOT as usize].children[c] == NONE {
                states[ROOT as usize].children[c] = ROOT;
            }
        }

        let mut queue = std::collections::VecDeque::new();
        for c in 0..256usize {
            let child = states[ROOT as usize].children[c];
            if child != ROOT {
                states[child as usize].fail = ROOT;
                queue.push_back(child);
            }
        }

        while let Some(u) = queue.pop_front() {
            for c in 0..256usize {
                let v = states[u as usize].children[c];
                if v == NONE {
                    continue;
                }
                let mut f = states[u as usize].fail;
                while states[f as usize].children[c] == NONE {
                    f = states[f as usize].fail;
                }
                // Root's table has no `NONE` entries (filled with self-loops
                // above), so this always terminates with a real state.
                let resolved_fail = states[f as usize].children[c];
                states[v as usize].fail = resolved_fail;
                let fail_output = states[resolved_fail as usize].output;
                if states[v as usize].output.is_none() {
                    states[v as usize].output = fail_output;
                }
                queue.push_back(v);
            }
        }

        self.states = states;
        self.building = Vec::new();
        self.compiled = true;
        self.current = ROOT;
    }

    pub fn read_char(&mut self, byte: u8) -> PatternId {
        debug_assert!(self.compiled, "AhoCorasick::read_char called before compile");
        let c = byte as usize;
        let mut state = self.current;
        while self.states[state as usize].children[c] == NONE {
            state = self.states[state as usize].fail;
        }
        state = self.states[state as usize].children[c];
        self.current = state;
        self.states[state as usize].output
    }

    pub fn reset(&mut self) {
        debug_assert!(self.compiled, "AhoCorasick::reset called before compile");
        self.current = ROOT;
    }

    pub fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>() + self.states.capacity() * std::mem::size_of::<State>()
    }
}

impl Default for AhoCorasick {
    fn default() -> Self {
        AhoCorasick::new()
    }
}

// --- Low-memory variant --------------------------------------------------

struct LowBuildNode {
    first_child: u32,
    next_sibling: u32,
    byte: u8,
    terminal: PatternId,
}

struct LowState {
    first_child: u32,
    next_sibling: u32,
    byte: u8,
    fail: u32,
    output: PatternId,
}

/// Low-memory Aho-Corasick: transitions are a singly-linked sibling list
/// per node rather than a dense table, trading a linear scan over a node's
/// real out-degree (typically small for natural-language dictionaries) for
/// `O(sum of pattern lengths)` total memory instead of `O(sum * 256)`.
pub struct AhoCorasickLowMem {
    building: Vec<LowBuildNode>,
    states: Vec<LowState>,
    compiled: bool,
    current: u32,
}

impl AhoCorasickLowMem {
    pub fn new() -> Self {
        AhoCorasickLowMem {
            building: vec![LowBuildNode { first_child: NONE, next_sibling: NONE, byte: 0, terminal: PatternId::NONE }],
            states: Vec::new(),
            compiled: false,
            current: ROOT,
        }
    }

    fn build_child(&self, node: u32, byte: u8) -> u32 {
        let mut cur = self.building[node as usize].first_child;
        while cur != NONE {
            if self.building[cur as usize].byte == byte {
                return cur;
            }
            cur = self.building[cur as usize].next_sibling;
        }
        NONE
    }

    pub fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        debug_assert!(!self.compiled, "AhoCorasickLowMem::add_pattern called after compile");
        if bytes.is_empty() {
            return;
        }
        let mut node = ROOT;
        for &b in bytes {
            let existing = self.build_child(node, b);
            node = if existing != NONE {
                existing
            } else {
                let new_idx = self.building.len() as u32;
                let sibling = self.building[node as usize].first_child;
                self.building.push(LowBuildNode { first_child: NONE, next_sibling: sibling, byte: b, terminal: PatternId::NONE });
                self.building[node as usize].first_child = new_idx;
                new_idx
            };
        }
        self.building[node as usize].terminal = id;
    }

    fn state_child(states: &[LowState], node: u32, byte: u8) -> u32 {
        let mut cur = states[node as usize].first_child;
        while cur != NONE {
            if states[cur as usize].byte == byte {
                return cur;
            }
            cur = states[cur as usize].next_sibling;
        }
        NONE
    }

    pub fn compile(&mut self) {
        debug_assert!(!self.compiled, "AhoCorasickLowMem::compile called twice");
        let n = self.building.len();
        let mut states: Vec<LowState> = (0..n)
            .map(|i| LowState {
                first_child: self.building[i].first_child,
                next_sibling: self.building[i].next_sibling,
                byte: self.building[i].byte,
                fail: ROOT,
                output: self.building[i].terminal,
            })
            .collect();

        let mut queue = std::collections::VecDeque::new();
        let mut child = states[ROOT as usize].first_child;
        while child != NONE {
            states[child as usize].fail = ROOT;
            queue.push_back(child);
            child = states[child as usize].next_sibling;
        }

        while let Some(u) = queue.pop_front() {
            let mut child = states[u as usize].first_child;
            while child != NONE {
                let byte = states[child as usize].byte;
                let mut f = states[u as usize].fail;
                let resolved_fail = loop {
                    if f == ROOT {
                        let c = Self::state_child(&states, ROOT, byte);
                        break if c == NONE { ROOT } else { c };
                    }
                    let c = Self::state_child(&states, f, byte);
                    if c != NONE {
                        break c;
                    }
                    f = states[f as usize].fail;
                };
                states[child as usize].fail = resolved_fail;
                if states[child as usize].output.is_none() {
                    states[child as usize].output = states[resolved_fail as usize].output;
                }
                queue.push_back(child);
                child = states[child as usize].next_sibling;
            }
        }

        self.states = states;
        self.building = Vec::new();
        self.compiled = true;
        self.current = ROOT;
    }

    pub fn read_char(&mut self, byte: u8) -> PatternId {
        debug_assert!(self.compiled, "AhoCorasickLowMem::read_char called before compile");
        let mut state = self.current;
        loop {
            let next = Self::state_child(&self.states, state, byte);
            if next != NONE {
                self.current = next;
                return self.states[next as usize].output;
            }
            if state == ROOT {
                self.current = ROOT;
                return PatternId::NONE;
            }
            state = self.states[state as usize].fail;
        }
    }

    pub fn reset(&mut self) {
        debug_assert!(self.compiled, "AhoCorasickLowMem::reset called before compile");
        self.current = ROOT;
    }

    pub fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>() + self.states.capacity() * std::mem::size_of::<LowState>()
    }
}

impl Default for AhoCorasickLowMem {
    fn default() -> Self {
        AhoCorasickLowMem::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns_tree::{self, build};

    fn small_tree() -> (patterns_tree::PatternsTree, Vec<(Vec<u8>, PatternId)>) {
        let mut added = Vec::new();
        let tree = build(
            vec![
                (0u32, 1u32, b"fg".to_vec()),
                (0u32, 2u32, b"efg".to_vec()),
                (0u32, 3u32, b"afg".to_vec()),
                (0u32, 4u32, b"cdefg".to_vec()),
                (0u32, 5u32, b"abcdefg".to_vec()),
            ],
            |bytes: &[u8], id: PatternId| added.push((bytes.to_vec(), id)),
        );
        (tree, added)
    }

    fn find(added: &[(Vec<u8>, PatternId)], pat: &[u8]) -> PatternId {
        added.iter().find(|(b, _)| b == pat).unwrap().1
    }

    #[test]
    fn dense_ac_scenario_two_from_spec() {
        let (_tree, added) = small_tree();
        let mut ac = AhoCorasick::new();
        for (bytes, id) in &added {
            ac.add_pattern(bytes, *id);
        }
        ac.compile();

        let mut last = PatternId::NONE;
        for &b in b"xabcdefg" {
            last = ac.read_char(b);
        }
        assert_eq!(last, find(&added, b"abcdefg"));

        ac.reset();
        let mut last = PatternId::NONE;
        for &b in b"zzfg" {
            last = ac.read_char(b);
        }
        assert_eq!(last, find(&added, b"fg"));
    }

    #[test]
    fn low_mem_ac_agrees_with_dense_ac() {
        let (_tree, added) = small_tree();
        let mut dense = AhoCorasick::new();
        let mut lowmem = AhoCorasickLowMem::new();
        for (bytes, id) in &added {
            dense.add_pattern(bytes, *id);
            lowmem.add_pattern(bytes, *id);
        }
        dense.compile();
        lowmem.compile();

        for &b in b"xabcdefgzzfgafgendofinput" {
            assert_eq!(dense.read_char(b), lowmem.read_char(b));
        }
    }

    #[test]
    fn no_match_returns_none() {
        let mut added = Vec::new();
        let _tree = patterns_tree::build(vec![(0u32, 1u32, b"xyz".to_vec())], |bytes: &[u8], id: PatternId| {
            added.push((bytes.to_vec(), id))
        });
        let mut ac = AhoCorasick::new();
        ac.add_pattern(b"xyz", added[0].1);
        ac.compile();
        for &b in b"abcabcabc" {
            assert!(ac.read_char(b).is_none());
        }
    }
}
